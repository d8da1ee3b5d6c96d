use proptest::prelude::*;
use std::sync::Arc;
use umat_location::{
    FetchOutcome, LevelPhase, LocationId, LocationLevel, LocationResolver, LocationSelector,
};
use umat_test_utils::{arb_level, arb_location_id, arb_selection, FixtureSource, SourceCall};

fn selector_over(fixture: &Arc<FixtureSource>) -> Arc<LocationSelector<FixtureSource>> {
    Arc::new(LocationSelector::new(LocationResolver::from_arc(Arc::clone(
        fixture,
    ))))
}

fn names(selector: &LocationSelector<FixtureSource>, level: LocationLevel) -> Vec<String> {
    selector
        .options(level)
        .into_iter()
        .map(|node| node.name)
        .collect()
}

#[tokio::test]
async fn test_forward_cascade_populates_each_level() {
    let fixture = Arc::new(FixtureSource::new());
    let selector = selector_over(&fixture);

    assert_eq!(selector.load_provinces().await, FetchOutcome::Applied(3));
    assert_eq!(
        names(&selector, LocationLevel::Province),
        vec!["Aceh", "Jawa Timur", "Sumatera Utara"]
    );

    let outcome = selector
        .select(LocationLevel::Province, Some("11".into()))
        .await;
    assert_eq!(outcome, FetchOutcome::Applied(2));
    assert_eq!(
        names(&selector, LocationLevel::City),
        vec!["Kabupaten Aceh Singkil", "Kabupaten Simeulue"]
    );

    selector
        .select(LocationLevel::City, Some("1101".into()))
        .await;
    selector
        .select(LocationLevel::District, Some("110101".into()))
        .await;
    let outcome = selector
        .select(LocationLevel::Locality, Some("1101012001".into()))
        .await;

    assert_eq!(outcome, FetchOutcome::Skipped);
    assert!(selector.selection().is_complete());
    assert!(selector.validate());
    for level in LocationLevel::ALL {
        assert_eq!(selector.phase(level), LevelPhase::Selected);
    }
}

#[tokio::test]
async fn test_changing_province_discards_in_flight_district_fetch() {
    let fixture = Arc::new(FixtureSource::new());
    let selector = selector_over(&fixture);

    selector.load_provinces().await;
    selector
        .select(LocationLevel::Province, Some("11".into()))
        .await;

    let gate = fixture.hold(LocationLevel::District);
    let pending = tokio::spawn({
        let selector = Arc::clone(&selector);
        async move {
            selector
                .select(LocationLevel::City, Some("1101".into()))
                .await
        }
    });

    gate.entered().await;
    assert_eq!(selector.phase(LocationLevel::District), LevelPhase::Loading);

    let outcome = selector
        .select(LocationLevel::Province, Some("12".into()))
        .await;
    assert_eq!(outcome, FetchOutcome::Applied(2));

    let selection = selector.selection();
    assert_eq!(selection.province, Some(LocationId::new("12")));
    assert_eq!(selection.city, None);
    assert_eq!(selection.district, None);
    assert_eq!(selection.locality, None);

    gate.release();
    assert_eq!(pending.await.unwrap(), FetchOutcome::Discarded);

    assert_eq!(selector.phase(LocationLevel::District), LevelPhase::Empty);
    assert!(selector.options(LocationLevel::District).is_empty());
    assert_eq!(
        names(&selector, LocationLevel::City),
        vec!["Kabupaten Nias", "Kota Medan"]
    );
    assert!(selector.validate());
}

#[tokio::test]
async fn test_blank_parent_makes_no_source_calls() {
    let fixture = Arc::new(FixtureSource::new());
    let resolver = LocationResolver::from_arc(Arc::clone(&fixture));
    let blank = LocationId::new("");

    for level in [
        LocationLevel::City,
        LocationLevel::District,
        LocationLevel::Locality,
    ] {
        assert!(resolver.fetch_options(level, None).await.is_empty());
        assert!(resolver.fetch_options(level, Some(&blank)).await.is_empty());
    }

    let selector = LocationSelector::new(resolver);
    assert_eq!(
        selector.load(LocationLevel::Locality).await,
        FetchOutcome::Skipped
    );
    assert_eq!(
        selector.select(LocationLevel::Province, Some(blank)).await,
        FetchOutcome::Skipped
    );

    assert_eq!(fixture.call_count(), 0);
}

#[tokio::test]
async fn test_failed_level_stays_empty_and_recovers() {
    let fixture = Arc::new(FixtureSource::new());
    let selector = selector_over(&fixture);
    fixture.fail_on(LocationLevel::City);

    let outcome = selector
        .select(LocationLevel::Province, Some("35".into()))
        .await;
    assert_eq!(outcome, FetchOutcome::Failed);
    assert_eq!(selector.phase(LocationLevel::City), LevelPhase::Empty);

    fixture.recover(LocationLevel::City);
    assert_eq!(
        selector.load(LocationLevel::City).await,
        FetchOutcome::Applied(1)
    );
    assert_eq!(
        fixture.calls().last(),
        Some(&SourceCall::Children(
            LocationLevel::City,
            Some(LocationId::new("35"))
        ))
    );
}

proptest! {
    #[test]
    fn prop_setting_a_level_clears_everything_below(
        selection in arb_selection(),
        level in arb_level(),
        value in arb_location_id(),
    ) {
        let next = selection.apply_selection(level, Some(value.clone()));

        prop_assert_eq!(next.get(level), Some(&value));
        for above in level.above() {
            prop_assert_eq!(next.get(above), selection.get(above));
        }
        for below in level.below() {
            prop_assert_eq!(next.get(below), None);
        }
    }

    #[test]
    fn prop_clearing_a_level_clears_everything_below(
        selection in arb_selection(),
        level in arb_level(),
    ) {
        let next = selection.apply_selection(level, None);

        for cleared in std::iter::once(level).chain(level.below()) {
            prop_assert_eq!(next.get(cleared), None);
        }
        for above in level.above() {
            prop_assert_eq!(next.get(above), selection.get(above));
        }
    }
}
