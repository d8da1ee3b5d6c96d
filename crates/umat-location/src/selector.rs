//! Per-form cascading dropdown controller
//!
//! One [`LocationSelector`] backs one location picker. Each level moves
//! through [`LevelState`]:
//!
//! ```text
//! Empty ──fetch──▶ Loading ──ok──▶ Populated ──pick──▶ Selected
//!   ▲                 │                                   │
//!   └─────failure─────┘        (lower levels reset to Empty, next level loads)
//! ```
//!
//! Every fetch carries a ticket. A result is committed only while its level
//! is still `Loading` with that same ticket, so a late answer for a parent the
//! user has since changed is dropped instead of overwriting newer state.

use crate::error::{LocationResolutionError, SourceResult};
use crate::level::LocationLevel;
use crate::node::{LocationId, LocationNode};
use crate::resolver::{LocationResolver, PathResolution};
use crate::selection::{validate_chain, LocationSelection};
use crate::source::LocationSource;
use parking_lot::Mutex;
use std::fmt;

/// State of one dropdown level
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LevelState {
    /// No options and no value
    #[default]
    Empty,
    /// Options requested; `ticket` identifies the request
    Loading {
        /// Ticket of the in-flight request
        ticket: u64,
    },
    /// Options available, nothing picked
    Populated(Vec<LocationNode>),
    /// Value picked from the options
    Selected {
        /// Options shown alongside the value
        options: Vec<LocationNode>,
        /// Picked value
        value: LocationId,
    },
}

impl LevelState {
    /// Data-free view of this state
    #[inline]
    #[must_use]
    pub fn phase(&self) -> LevelPhase {
        match self {
            Self::Empty => LevelPhase::Empty,
            Self::Loading { .. } => LevelPhase::Loading,
            Self::Populated(_) => LevelPhase::Populated,
            Self::Selected { .. } => LevelPhase::Selected,
        }
    }

    /// Options held by this state
    #[inline]
    #[must_use]
    pub fn options(&self) -> &[LocationNode] {
        match self {
            Self::Populated(options) | Self::Selected { options, .. } => options,
            Self::Empty | Self::Loading { .. } => &[],
        }
    }

    fn into_options(self) -> Vec<LocationNode> {
        match self {
            Self::Populated(options) | Self::Selected { options, .. } => options,
            Self::Empty | Self::Loading { .. } => Vec::new(),
        }
    }

    fn is_loading(&self, ticket: u64) -> bool {
        matches!(self, Self::Loading { ticket: t } if *t == ticket)
    }
}

/// Phase of a level without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    /// See [`LevelState::Empty`]
    Empty,
    /// See [`LevelState::Loading`]
    Loading,
    /// See [`LevelState::Populated`]
    Populated,
    /// See [`LevelState::Selected`]
    Selected,
}

/// What happened to a fetch started by the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Options committed; carries their count
    Applied(usize),
    /// Source failed; the level went back to `Empty`
    Failed,
    /// Result arrived after the level moved on and was dropped
    Discarded,
    /// Nothing to fetch (no child level, cleared value or missing parent)
    Skipped,
}

/// Result of hydrating a selector from a stored leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrateOutcome {
    /// Leaf was blank; state untouched
    Empty,
    /// Stored chain already matched; state untouched
    Unchanged,
    /// Chain applied and option lists loaded
    Applied(LocationSelection),
    /// Selection was edited or reset while resolving; resolved chain dropped
    ///
    /// Option lists loading in the meantime do not count as an edit.
    Superseded,
}

#[derive(Debug, Default)]
struct SelectorState {
    selection: LocationSelection,
    levels: [LevelState; 4],
    next_ticket: u64,
    version: u64,
    // Bumped only when the selection itself is replaced or edited.
    selection_generation: u64,
}

impl SelectorState {
    fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn start_loading(&mut self, level: LocationLevel) -> u64 {
        let ticket = self.issue_ticket();
        self.levels[level.index()] = LevelState::Loading { ticket };
        self.version += 1;
        ticket
    }

    fn commit(
        &mut self,
        level: LocationLevel,
        ticket: u64,
        result: SourceResult<Vec<LocationNode>>,
    ) -> FetchOutcome {
        let slot = &mut self.levels[level.index()];
        if !slot.is_loading(ticket) {
            tracing::debug!(%level, ticket, "discarding stale location options");
            return FetchOutcome::Discarded;
        }

        self.version += 1;
        match result {
            Ok(options) => {
                let count = options.len();
                *slot = match self.selection.get(level) {
                    Some(value) => LevelState::Selected {
                        options,
                        value: value.clone(),
                    },
                    None => LevelState::Populated(options),
                };
                FetchOutcome::Applied(count)
            }
            Err(error) => {
                tracing::warn!(%level, %error, "location options unavailable");
                *slot = LevelState::Empty;
                FetchOutcome::Failed
            }
        }
    }
}

/// Cascading location picker state for one form
pub struct LocationSelector<S> {
    resolver: LocationResolver<S>,
    state: Mutex<SelectorState>,
}

impl<S> fmt::Debug for LocationSelector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationSelector")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl<S: LocationSource> LocationSelector<S> {
    /// Create selector with every level empty
    #[inline]
    #[must_use]
    pub fn new(resolver: LocationResolver<S>) -> Self {
        Self::with_selection(resolver, LocationSelection::default())
    }

    /// Create selector pre-populated with a stored selection
    ///
    /// Option lists are not loaded; call [`load_chain`](Self::load_chain).
    #[must_use]
    pub fn with_selection(resolver: LocationResolver<S>, selection: LocationSelection) -> Self {
        Self {
            resolver,
            state: Mutex::new(SelectorState {
                selection,
                ..SelectorState::default()
            }),
        }
    }

    /// Resolver used for fetches
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &LocationResolver<S> {
        &self.resolver
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> LocationSelection {
        self.state.lock().selection.clone()
    }

    /// Current state of a level
    #[must_use]
    pub fn state(&self, level: LocationLevel) -> LevelState {
        self.state.lock().levels[level.index()].clone()
    }

    /// Current phase of a level
    #[must_use]
    pub fn phase(&self, level: LocationLevel) -> LevelPhase {
        self.state.lock().levels[level.index()].phase()
    }

    /// Options currently shown for a level
    #[must_use]
    pub fn options(&self, level: LocationLevel) -> Vec<LocationNode> {
        self.state.lock().levels[level.index()].options().to_vec()
    }

    /// Mutation counter; bumps on every state change
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.lock().version
    }

    /// Check the selection against the options loaded so far
    #[must_use]
    pub fn validate(&self) -> bool {
        let state = self.state.lock();
        validate_chain(
            &state.selection,
            state.levels.iter().flat_map(LevelState::options),
        )
    }

    /// Clear every level and the selection
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.selection = LocationSelection::default();
        state.levels = Default::default();
        state.version += 1;
        state.selection_generation += 1;
    }

    /// Load the options of one level for the currently selected parent
    pub async fn load(&self, level: LocationLevel) -> FetchOutcome {
        let (ticket, parent) = {
            let mut state = self.state.lock();
            let parent = match level.parent() {
                None => None,
                Some(parent_level) => match state.selection.get(parent_level) {
                    Some(parent) => Some(parent.clone()),
                    None => return FetchOutcome::Skipped,
                },
            };
            (state.start_loading(level), parent)
        };

        let result = self
            .resolver
            .try_fetch_options(level, parent.as_ref())
            .await;
        self.state.lock().commit(level, ticket, result)
    }

    /// Load the province list
    pub async fn load_provinces(&self) -> FetchOutcome {
        self.load(LocationLevel::Province).await
    }

    /// Pick (or clear, with `None`) the value of a level
    ///
    /// Applies the cascade clear first, then loads the next level's options
    /// for the new value. Any fetch still in flight for a lower level is
    /// invalidated.
    pub async fn select(&self, level: LocationLevel, value: Option<LocationId>) -> FetchOutcome {
        let value = value.filter(|v| !v.is_blank());
        {
            let mut state = self.state.lock();
            state.selection = state.selection.apply_selection(level, value.clone());

            let idx = level.index();
            let current = std::mem::take(&mut state.levels[idx]);
            state.levels[idx] = match (&value, current) {
                (Some(value), current) => LevelState::Selected {
                    options: current.into_options(),
                    value: value.clone(),
                },
                (None, LevelState::Selected { options, .. }) => LevelState::Populated(options),
                (None, current) => current,
            };
            for lower in level.below() {
                state.levels[lower.index()] = LevelState::Empty;
            }
            state.version += 1;
            state.selection_generation += 1;
        }

        match (value, level.child()) {
            (Some(_), Some(child)) => self.load(child).await,
            _ => FetchOutcome::Skipped,
        }
    }

    /// Load the options of every level the current selection reaches
    ///
    /// Provinces always load; each lower level loads when its parent is set.
    /// Requests run concurrently and commit independently.
    pub async fn load_chain(&self) -> Vec<(LocationLevel, FetchOutcome)> {
        let requests: Vec<(LocationLevel, u64, Option<LocationId>)> = {
            let mut state = self.state.lock();
            let selection = state.selection.clone();
            LocationLevel::ALL
                .into_iter()
                .filter_map(|level| {
                    let parent = match level.parent() {
                        None => None,
                        Some(parent_level) => Some(selection.get(parent_level)?.clone()),
                    };
                    Some((level, state.start_loading(level), parent))
                })
                .collect()
        };

        let fetches = requests.into_iter().map(|(level, ticket, parent)| async move {
            let result = self
                .resolver
                .try_fetch_options(level, parent.as_ref())
                .await;
            (level, ticket, result)
        });
        let results = futures::future::join_all(fetches).await;

        let mut state = self.state.lock();
        results
            .into_iter()
            .map(|(level, ticket, result)| (level, state.commit(level, ticket, result)))
            .collect()
    }

    /// Pre-populate the picker from a stored locality id
    ///
    /// Resolves the full chain and, unless it already matches the current
    /// selection, applies it and loads every level's options. If the selection
    /// changes while the chain is being resolved, the resolved chain is dropped.
    ///
    /// # Errors
    /// [`LocationResolutionError::LookupFailed`] when any lookup along the
    /// chain fails; the state is left untouched.
    pub async fn hydrate_from_leaf(
        &self,
        leaf: Option<&LocationId>,
    ) -> Result<HydrateOutcome, LocationResolutionError> {
        let (current, generation) = {
            let state = self.state.lock();
            (state.selection.clone(), state.selection_generation)
        };

        let selection = match self.resolver.reconcile(&current, leaf).await? {
            PathResolution::Empty => return Ok(HydrateOutcome::Empty),
            PathResolution::Unchanged => return Ok(HydrateOutcome::Unchanged),
            PathResolution::Resolved(selection) => selection,
        };

        {
            let mut state = self.state.lock();
            if state.selection_generation != generation {
                tracing::debug!("selection changed during hydration; dropping resolved chain");
                return Ok(HydrateOutcome::Superseded);
            }
            state.selection = selection.clone();
            state.levels = Default::default();
            state.version += 1;
            state.selection_generation += 1;
        }

        tracing::info!(
            locality = ?selection.locality,
            district = ?selection.district,
            "hydrated location picker"
        );
        self.load_chain().await;
        Ok(HydrateOutcome::Applied(selection))
    }
}
