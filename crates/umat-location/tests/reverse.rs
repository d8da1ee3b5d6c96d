use pretty_assertions::assert_eq;
use std::sync::Arc;
use umat_location::{
    CachedLocationSource, FetchOutcome, HydrateOutcome, LevelPhase, LocationId, LocationLevel,
    LocationResolutionError, LocationResolver, LocationSelection, LocationSelector, PathResolution,
    SourceError,
};
use umat_test_utils::{pacitan_selection, FixtureSource, SourceCall};

fn leaf() -> LocationId {
    LocationId::new("350101")
}

#[tokio::test]
async fn test_leaf_resolves_with_three_sequential_lookups() {
    let fixture = Arc::new(FixtureSource::new());
    let resolver = LocationResolver::from_arc(Arc::clone(&fixture));

    let resolved = resolver.resolve_full_path_from_leaf(Some(&leaf())).await.unwrap();

    assert_eq!(resolved, Some(pacitan_selection()));
    assert_eq!(
        fixture.calls(),
        vec![
            SourceCall::Lookup(LocationLevel::Locality, LocationId::new("350101")),
            SourceCall::Lookup(LocationLevel::District, LocationId::new("3501")),
            SourceCall::Lookup(LocationLevel::City, LocationId::new("35")),
        ]
    );
}

#[tokio::test]
async fn test_failed_lookup_names_its_level() {
    let fixture = Arc::new(FixtureSource::new());
    fixture.fail_on(LocationLevel::District);
    let resolver = LocationResolver::from_arc(Arc::clone(&fixture));

    let err = resolver
        .resolve_full_path_from_leaf(Some(&leaf()))
        .await
        .unwrap_err();

    assert_eq!(err.level(), LocationLevel::District);
    assert_eq!(fixture.call_count(), 2);
}

#[tokio::test]
async fn test_unknown_leaf_is_not_found() {
    let resolver = LocationResolver::new(FixtureSource::new());

    let err = resolver
        .resolve_full_path_from_leaf(Some(&LocationId::new("999999")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LocationResolutionError::LookupFailed {
            level: LocationLevel::Locality,
            source: SourceError::NotFound { .. },
        }
    ));
}

#[tokio::test]
async fn test_reconcile_reports_unchanged_chain() {
    let resolver = LocationResolver::new(FixtureSource::new());

    let same = resolver
        .reconcile(&pacitan_selection(), Some(&leaf()))
        .await
        .unwrap();
    assert_eq!(same, PathResolution::Unchanged);

    let other = resolver
        .reconcile(&LocationSelection::new(), Some(&leaf()))
        .await
        .unwrap();
    assert_eq!(other, PathResolution::Resolved(pacitan_selection()));

    let blank = resolver
        .reconcile(&pacitan_selection(), None)
        .await
        .unwrap();
    assert_eq!(blank, PathResolution::Empty);
}

#[tokio::test]
async fn test_hydrating_matching_selection_changes_nothing() {
    let fixture = Arc::new(FixtureSource::new());
    let selector = LocationSelector::with_selection(
        LocationResolver::from_arc(Arc::clone(&fixture)),
        pacitan_selection(),
    );
    let version = selector.version();

    let outcome = selector.hydrate_from_leaf(Some(&leaf())).await.unwrap();

    assert_eq!(outcome, HydrateOutcome::Unchanged);
    assert_eq!(selector.version(), version);
    assert_eq!(selector.selection(), pacitan_selection());
    assert_eq!(fixture.call_count(), 3);
}

#[tokio::test]
async fn test_hydration_loads_every_level() {
    let fixture = Arc::new(FixtureSource::new());
    let selector = LocationSelector::new(LocationResolver::from_arc(Arc::clone(&fixture)));

    let outcome = selector.hydrate_from_leaf(Some(&leaf())).await.unwrap();

    assert_eq!(outcome, HydrateOutcome::Applied(pacitan_selection()));
    for level in LocationLevel::ALL {
        assert_eq!(selector.phase(level), LevelPhase::Selected);
    }
    assert_eq!(selector.options(LocationLevel::Province).len(), 3);
    assert_eq!(selector.options(LocationLevel::District).len(), 2);
    assert_eq!(selector.options(LocationLevel::Locality).len(), 2);
    assert!(selector.validate());
}

#[tokio::test]
async fn test_hydration_failure_leaves_state_untouched() {
    let fixture = Arc::new(FixtureSource::new());
    fixture.fail_on(LocationLevel::City);
    let selector = LocationSelector::new(LocationResolver::from_arc(Arc::clone(&fixture)));

    let err = selector.hydrate_from_leaf(Some(&leaf())).await.unwrap_err();

    assert_eq!(err.level(), LocationLevel::City);
    assert!(selector.selection().is_empty());
    assert_eq!(selector.version(), 0);
}

#[tokio::test]
async fn test_user_edit_during_hydration_wins() {
    let fixture = Arc::new(FixtureSource::new());
    let selector = Arc::new(LocationSelector::new(LocationResolver::from_arc(
        Arc::clone(&fixture),
    )));

    let gate = fixture.hold(LocationLevel::City);
    let pending = tokio::spawn({
        let selector = Arc::clone(&selector);
        async move { selector.hydrate_from_leaf(Some(&leaf())).await }
    });

    gate.entered().await;
    selector
        .select(LocationLevel::Province, Some("11".into()))
        .await;
    gate.release();

    let outcome = pending.await.unwrap().unwrap();
    assert_eq!(outcome, HydrateOutcome::Superseded);
    assert_eq!(selector.selection().province, Some(LocationId::new("11")));
    assert_eq!(selector.selection().locality, None);
}

#[tokio::test]
async fn test_option_lists_loading_during_hydration_do_not_supersede_it() {
    let fixture = Arc::new(FixtureSource::new());
    let selector = Arc::new(LocationSelector::new(LocationResolver::from_arc(
        Arc::clone(&fixture),
    )));

    let provinces_gate = fixture.hold(LocationLevel::Province);
    let provinces = tokio::spawn({
        let selector = Arc::clone(&selector);
        async move { selector.load_provinces().await }
    });
    provinces_gate.entered().await;

    let city_gate = fixture.hold(LocationLevel::City);
    let hydration = tokio::spawn({
        let selector = Arc::clone(&selector);
        async move { selector.hydrate_from_leaf(Some(&leaf())).await }
    });
    city_gate.entered().await;

    provinces_gate.release();
    assert_eq!(provinces.await.unwrap(), FetchOutcome::Applied(3));

    city_gate.release();
    let outcome = hydration.await.unwrap().unwrap();

    assert_eq!(outcome, HydrateOutcome::Applied(pacitan_selection()));
    assert_eq!(selector.selection(), pacitan_selection());
    for level in LocationLevel::ALL {
        assert_eq!(selector.phase(level), LevelPhase::Selected);
    }
}

#[tokio::test]
async fn test_cached_source_serves_repeat_resolution() {
    let fixture = Arc::new(FixtureSource::new());
    let cached = CachedLocationSource::new(Arc::clone(&fixture), 1_000);
    let resolver = LocationResolver::new(cached);

    let first = resolver.resolve_full_path_from_leaf(Some(&leaf())).await.unwrap();
    assert_eq!(fixture.call_count(), 3);
    fixture.clear_calls();

    let second = resolver.resolve_full_path_from_leaf(Some(&leaf())).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fixture.call_count(), 0);
}
