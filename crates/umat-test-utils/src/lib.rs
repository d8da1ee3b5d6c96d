//! Testing utilities for the Umat admin workspace
//!
//! Shared fixtures and proptest strategies.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Notify;
use umat_location::{
    LocationId, LocationLevel, LocationNode, LocationSelection, LocationSource, SourceError,
};
use umat_permission::{modules, Action, ModulePermission, Policy, Scope};

/// One call made against a [`FixtureSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Children(LocationLevel, Option<LocationId>),
    Lookup(LocationLevel, LocationId),
}

/// Holds one fetch in flight until released
#[derive(Debug, Default)]
pub struct FetchGate {
    entered: Notify,
    release: Notify,
}

impl FetchGate {
    /// Wait until a fetch reaches the gate
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the held fetch continue
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// In-memory location source with a small slice of the real hierarchy
///
/// Provinces 11 (Aceh), 12 (Sumatera Utara) and 35 (Jawa Timur), each with a
/// couple of cities, districts and localities.
#[derive(Debug)]
pub struct FixtureSource {
    nodes: Vec<LocationNode>,
    calls: Mutex<Vec<SourceCall>>,
    failing: Mutex<HashSet<LocationLevel>>,
    gates: Mutex<HashMap<LocationLevel, Arc<FetchGate>>>,
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::with_nodes(sample_nodes())
    }
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(nodes: Vec<LocationNode>) -> Self {
        Self {
            nodes,
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Make every call at `level` fail with [`SourceError::Unavailable`]
    pub fn fail_on(&self, level: LocationLevel) {
        self.failing.lock().insert(level);
    }

    pub fn recover(&self, level: LocationLevel) {
        self.failing.lock().remove(&level);
    }

    /// Hold the next call at `level` until the gate is released
    pub fn hold(&self, level: LocationLevel) -> Arc<FetchGate> {
        let gate = Arc::new(FetchGate::default());
        self.gates.lock().insert(level, Arc::clone(&gate));
        gate
    }

    fn record(&self, call: SourceCall) {
        self.calls.lock().push(call);
    }

    async fn pass_gate(&self, level: LocationLevel) {
        let gate = self.gates.lock().remove(&level);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }

    fn check_failing(&self, level: LocationLevel) -> Result<(), SourceError> {
        if self.failing.lock().contains(&level) {
            return Err(SourceError::Unavailable(format!("{level} fixture offline")));
        }
        Ok(())
    }
}

#[async_trait]
impl LocationSource for FixtureSource {
    async fn children(
        &self,
        level: LocationLevel,
        parent: Option<LocationId>,
    ) -> Result<Vec<LocationNode>, SourceError> {
        self.record(SourceCall::Children(level, parent.clone()));

        self.pass_gate(level).await;
        self.check_failing(level)?;
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.level == level && (level == LocationLevel::Province || n.parent == parent))
            .cloned()
            .collect())
    }

    async fn lookup(
        &self,
        level: LocationLevel,
        id: LocationId,
    ) -> Result<LocationNode, SourceError> {
        self.record(SourceCall::Lookup(level, id.clone()));
        self.pass_gate(level).await;
        self.check_failing(level)?;
        self.nodes
            .iter()
            .find(|n| n.level == level && n.id == id)
            .cloned()
            .ok_or(SourceError::NotFound { level, id })
    }
}

/// Sample hierarchy used by [`FixtureSource::default`]
pub fn sample_nodes() -> Vec<LocationNode> {
    use LocationLevel::{City, District, Locality};

    vec![
        LocationNode::province("11", "Aceh"),
        LocationNode::province("12", "Sumatera Utara"),
        LocationNode::province("35", "Jawa Timur"),
        LocationNode::child(City, "1101", "Kabupaten Simeulue", "11"),
        LocationNode::child(City, "1102", "Kabupaten Aceh Singkil", "11"),
        LocationNode::child(City, "1201", "Kabupaten Nias", "12"),
        LocationNode::child(City, "1275", "Kota Medan", "12"),
        LocationNode::child(City, "35", "Kabupaten Pacitan", "35"),
        LocationNode::child(District, "110101", "Teupah Selatan", "1101"),
        LocationNode::child(District, "110102", "Simeulue Timur", "1101"),
        LocationNode::child(District, "127501", "Medan Kota", "1275"),
        LocationNode::child(District, "3501", "Donorojo", "35"),
        LocationNode::child(District, "3502", "Punung", "35"),
        LocationNode::child(Locality, "1101012001", "Latiung", "110101"),
        LocationNode::child(Locality, "1275011001", "Pasar Merah Timur", "127501"),
        LocationNode::child(Locality, "350101", "Sendang", "3501"),
        LocationNode::child(Locality, "350102", "Kalak", "3501"),
    ]
}

/// Full selection for locality 350101
pub fn pacitan_selection() -> LocationSelection {
    LocationSelection::full("35", "35", "3501", "350101")
}

// Strategies

pub fn arb_scope() -> impl Strategy<Value = Scope> {
    prop_oneof![Just(Scope::Nasional), Just(Scope::Wilayah)]
}

pub fn arb_action() -> impl Strategy<Value = Action> {
    proptest::sample::select(Action::ALL.to_vec())
}

/// Non-empty capability set with a scope
pub fn arb_module_permission() -> impl Strategy<Value = ModulePermission> {
    (
        arb_scope(),
        proptest::sample::subsequence(Action::ALL.to_vec(), 1..=Action::ALL.len()),
    )
        .prop_map(|(scope, actions)| ModulePermission::new(scope).with_actions(actions))
}

/// Policy over distinct known modules, in random insertion order
///
/// Every module carries at least one capability so the flat form can
/// reproduce it.
pub fn arb_policy() -> impl Strategy<Value = Policy> {
    proptest::sample::subsequence(modules::ALL.to_vec(), 0..=modules::ALL.len())
        .prop_shuffle()
        .prop_flat_map(|names| {
            let count = names.len();
            (
                Just(names),
                proptest::collection::vec(arb_module_permission(), count),
            )
        })
        .prop_map(|(names, permissions)| {
            names
                .into_iter()
                .map(str::to_string)
                .zip(permissions)
                .collect()
        })
}

pub fn arb_level() -> impl Strategy<Value = LocationLevel> {
    proptest::sample::select(LocationLevel::ALL.to_vec())
}

pub fn arb_location_id() -> impl Strategy<Value = LocationId> {
    "[0-9]{2,10}".prop_map(|id: String| LocationId::new(id))
}

/// Arbitrary selection, not necessarily contiguous
pub fn arb_selection() -> impl Strategy<Value = LocationSelection> {
    (
        proptest::option::of(arb_location_id()),
        proptest::option::of(arb_location_id()),
        proptest::option::of(arb_location_id()),
        proptest::option::of(arb_location_id()),
    )
        .prop_map(|(province, city, district, locality)| LocationSelection {
            province,
            city,
            district,
            locality,
        })
}
