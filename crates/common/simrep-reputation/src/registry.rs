use crate::action::ReputationAction;
use crate::category::{CategoryCatalog, CategoryKey};
use crate::error::{ReputationError, Result};
use crate::metrics::ReputationMetricsHook;
use crate::record::{CategoryUpdate, RecordSnapshot, ReputationRecord};
use crate::sim::{Sim, SimId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of applying an action to a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryResult {
    Applied(CategoryUpdate),
    Failed {
        category: CategoryKey,
        error: String,
        #[serde(skip)]
        source: ReputationError,
    },
}

/// Aggregate outcome of [`ReputationRegistry::process_action`].
///
/// Categories with zero impact produce no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub sim: SimId,
    pub description: String,
    pub results: Vec<CategoryResult>,
}

impl ActionOutcome {
    pub fn applied(&self) -> impl Iterator<Item = &CategoryUpdate> {
        self.results.iter().filter_map(|r| match r {
            CategoryResult::Applied(update) => Some(update),
            CategoryResult::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&CategoryKey, &ReputationError)> {
        self.results.iter().filter_map(|r| match r {
            CategoryResult::Failed {
                category, source, ..
            } => Some((category, source)),
            CategoryResult::Applied(_) => None,
        })
    }

    /// True when every nonzero impact was applied.
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Owns every sim's reputation record and applies actions to them.
#[derive(Debug)]
pub struct ReputationRegistry {
    catalog: Arc<CategoryCatalog>,
    records: HashMap<SimId, ReputationRecord>,
    metrics_hook: Option<Arc<dyn ReputationMetricsHook + Send + Sync>>,
}

impl ReputationRegistry {
    /// Creates a new registry without metrics reporting.
    pub fn new(catalog: Arc<CategoryCatalog>) -> Self {
        Self {
            catalog,
            records: HashMap::new(),
            metrics_hook: None,
        }
    }

    /// Creates a new registry with metrics reporting enabled.
    pub fn with_metrics_hook(
        catalog: Arc<CategoryCatalog>,
        hook: Arc<dyn ReputationMetricsHook + Send + Sync>,
    ) -> Self {
        Self {
            catalog,
            records: HashMap::new(),
            metrics_hook: Some(hook),
        }
    }

    pub fn catalog(&self) -> &Arc<CategoryCatalog> {
        &self.catalog
    }

    /// Register a sim, creating an empty record on first sight.
    ///
    /// Registering the same sim again is a no-op and keeps its points. An id that
    /// is already bound to a sim with a different name is rejected.
    pub fn register_sim<S: Sim + ?Sized>(&mut self, sim: &S) -> Result<()> {
        let id = sim.sim_id();
        if let Some(existing) = self.records.get(&id) {
            if existing.sim().name != sim.name() {
                warn!(
                    "Refusing to rebind sim {} from '{}' to '{}'",
                    id,
                    existing.sim().name,
                    sim.name()
                );
                return Err(ReputationError::DuplicateActorConflict {
                    id,
                    registered: existing.sim().name.clone(),
                    attempted: sim.name().to_string(),
                });
            }
            return Ok(());
        }

        debug!("Registering sim {} ({})", id, sim.name());
        self.records.insert(
            id,
            ReputationRecord::new(sim.identity(), Arc::clone(&self.catalog)),
        );
        if let Some(hook) = &self.metrics_hook {
            hook.sim_registered(id);
        }
        Ok(())
    }

    pub fn is_registered(&self, id: SimId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn reputation_data<S: Sim + ?Sized>(&self, sim: &S) -> Result<&ReputationRecord> {
        self.reputation_data_by_id(sim.sim_id())
    }

    pub fn reputation_data_by_id(&self, id: SimId) -> Result<&ReputationRecord> {
        self.records.get(&id).ok_or(ReputationError::NotRegistered(id))
    }

    /// Adjust a single category for a registered sim.
    pub fn modify_points(&mut self, id: SimId, category: &CategoryKey, delta: i64) -> Result<i64> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(ReputationError::NotRegistered(id))?;
        let update = record.apply_delta(category, delta)?;
        if let Some(hook) = &self.metrics_hook {
            hook.points_updated(id, &update);
        }
        Ok(update.current)
    }

    /// Apply `action` to the sim's record, one catalog category at a time.
    ///
    /// Categories are visited in catalog order. A failure on one category is
    /// recorded in the outcome and does not stop the remaining categories.
    pub fn process_action<S, A>(&mut self, sim: &S, action: &A) -> Result<ActionOutcome>
    where
        S: Sim + ?Sized,
        A: ReputationAction + ?Sized,
    {
        let id = sim.sim_id();
        let record = self
            .records
            .get_mut(&id)
            .ok_or(ReputationError::NotRegistered(id))?;

        let mut results = Vec::new();
        for category in self.catalog.iter() {
            let applied = action
                .reputation_impact(category)
                .map_err(|source| ReputationError::ImpactFailed {
                    category: category.key().clone(),
                    source,
                })
                .and_then(|delta| match delta {
                    0 => Ok(None),
                    delta => record.apply_delta(category.key(), delta).map(Some),
                });

            match applied {
                Ok(None) => {}
                Ok(Some(update)) => {
                    debug!(
                        "'{}' moved {} of sim {} from {} to {}",
                        action.description(),
                        update.category,
                        id,
                        update.previous,
                        update.current
                    );
                    if let Some(hook) = &self.metrics_hook {
                        hook.points_updated(id, &update);
                    }
                    results.push(CategoryResult::Applied(update));
                }
                Err(error) => {
                    warn!(
                        "'{}' could not be applied to {} of sim {}: {}",
                        action.description(),
                        category.key(),
                        id,
                        error
                    );
                    if let Some(hook) = &self.metrics_hook {
                        hook.category_failed(id, category.key(), &error);
                    }
                    results.push(CategoryResult::Failed {
                        category: category.key().clone(),
                        error: error.to_string(),
                        source: error,
                    });
                }
            }
        }

        Ok(ActionOutcome {
            sim: id,
            description: action.description().to_string(),
            results,
        })
    }

    /// Registered sim ids in ascending order.
    pub fn sim_ids(&self) -> Vec<SimId> {
        let mut ids: Vec<_> = self.records.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn snapshot(&self, id: SimId) -> Result<RecordSnapshot> {
        self.reputation_data_by_id(id).map(ReputationRecord::snapshot)
    }

    /// Snapshots of every record, ordered by sim id.
    pub fn snapshots(&self) -> Vec<RecordSnapshot> {
        self.sim_ids()
            .into_iter()
            .filter_map(|id| self.records.get(&id).map(ReputationRecord::snapshot))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::FixedImpactAction;
    use crate::category::Category;
    use crate::error::ImpactError;
    use crate::sim::SimIdentity;
    use std::sync::Mutex;

    fn catalog() -> Arc<CategoryCatalog> {
        Arc::new(
            CategoryCatalog::new(vec![
                Category::new("Kind", "Helps others", 100).unwrap(),
                Category::new("Funny", "Makes others laugh", 50).unwrap(),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = ReputationRegistry::new(catalog());
        let bella = SimIdentity::new(1, "Bella");

        registry.register_sim(&bella).unwrap();
        registry.modify_points(bella.id, &"Kind".into(), 40).unwrap();
        registry.register_sim(&bella).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.reputation_data(&bella).unwrap().get_points(&"Kind".into()),
            40
        );
    }

    #[test]
    fn conflicting_identity_is_rejected() {
        let mut registry = ReputationRegistry::new(catalog());
        registry.register_sim(&SimIdentity::new(1, "Bella")).unwrap();

        let err = registry
            .register_sim(&SimIdentity::new(1, "Mortimer"))
            .unwrap_err();
        assert!(matches!(
            err,
            ReputationError::DuplicateActorConflict { id: SimId(1), .. }
        ));
        assert_eq!(registry.reputation_data_by_id(SimId(1)).unwrap().sim().name, "Bella");
    }

    #[test]
    fn unregistered_sim_is_reported() {
        let mut registry = ReputationRegistry::new(catalog());
        let ghost = SimIdentity::new(2, "Ghost");
        let action = FixedImpactAction::new("Boo").with_impact("Funny", 1);

        assert_eq!(
            registry.process_action(&ghost, &action).unwrap_err(),
            ReputationError::NotRegistered(SimId(2))
        );
        assert!(registry.reputation_data(&ghost).is_err());
        assert!(registry.modify_points(SimId(2), &"Kind".into(), 1).is_err());
    }

    #[test]
    fn zero_impact_categories_are_not_written() {
        let mut registry = ReputationRegistry::new(catalog());
        let bella = SimIdentity::new(1, "Bella");
        registry.register_sim(&bella).unwrap();

        let action = FixedImpactAction::new("Helped a neighbour")
            .with_impact("Kind", 10)
            .with_impact("Funny", 0);
        let outcome = registry.process_action(&bella, &action).unwrap();

        assert!(outcome.is_clean());
        assert_eq!(outcome.results.len(), 1);
        let record = registry.reputation_data(&bella).unwrap();
        assert_eq!(record.get_points(&"Kind".into()), 10);
        assert!(!record.is_touched(&"Funny".into()));
    }

    struct FailsOn(&'static str);

    impl ReputationAction for FailsOn {
        fn description(&self) -> &str {
            "Unstable"
        }

        fn reputation_impact(&self, category: &Category) -> std::result::Result<i64, ImpactError> {
            if category.name() == self.0 {
                Err(ImpactError::new("boom"))
            } else {
                Ok(7)
            }
        }
    }

    #[test]
    fn failing_category_does_not_block_others() {
        let mut registry = ReputationRegistry::new(catalog());
        let bella = SimIdentity::new(1, "Bella");
        registry.register_sim(&bella).unwrap();

        let outcome = registry.process_action(&bella, &FailsOn("Kind")).unwrap();

        assert!(!outcome.is_clean());
        let failures: Vec<_> = outcome.failures().map(|(c, _)| c.as_str()).collect();
        assert_eq!(failures, ["Kind"]);
        assert_eq!(outcome.applied().count(), 1);

        let record = registry.reputation_data(&bella).unwrap();
        assert_eq!(record.get_points(&"Funny".into()), 7);
        assert!(!record.is_touched(&"Kind".into()));
    }

    #[derive(Debug, Default)]
    struct RecordingHook {
        events: Mutex<Vec<String>>,
    }

    impl ReputationMetricsHook for RecordingHook {
        fn sim_registered(&self, sim: SimId) {
            self.events.lock().unwrap().push(format!("register {}", sim));
        }

        fn points_updated(&self, sim: SimId, update: &CategoryUpdate) {
            self.events
                .lock()
                .unwrap()
                .push(format!("update {} {}={}", sim, update.category, update.current));
        }

        fn category_failed(&self, sim: SimId, category: &CategoryKey, error: &ReputationError) {
            self.events
                .lock()
                .unwrap()
                .push(format!("fail {} {} {}", sim, category, error.kind()));
        }
    }

    #[test]
    fn metrics_hook_sees_registrations_and_updates() {
        let hook = Arc::new(RecordingHook::default());
        let mut registry = ReputationRegistry::with_metrics_hook(catalog(), hook.clone());
        let bella = SimIdentity::new(1, "Bella");

        registry.register_sim(&bella).unwrap();
        registry.register_sim(&bella).unwrap();
        registry.process_action(&bella, &FailsOn("Funny")).unwrap();

        let events = hook.events.lock().unwrap().clone();
        assert_eq!(
            events,
            [
                "register #1",
                "update #1 Kind=7",
                "fail #1 Funny impact_failed",
            ]
        );
    }

    #[test]
    fn snapshots_are_ordered_by_id() {
        let mut registry = ReputationRegistry::new(catalog());
        for (id, name) in [(3, "C"), (1, "A"), (2, "B")] {
            registry.register_sim(&SimIdentity::new(id, name)).unwrap();
        }
        let names: Vec<_> = registry
            .snapshots()
            .into_iter()
            .map(|s| s.sim.name)
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
    }
}
