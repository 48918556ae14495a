use crate::action::ReputationAction;
use crate::category::{CategoryCatalog, CategoryKey};
use crate::error::Result;
use crate::record::RecordSnapshot;
use crate::registry::{ActionOutcome, ReputationRegistry};
use crate::sim::{Sim, SimId};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A registry shared between the simulation thread and its readers.
///
/// Cloning yields another handle to the same registry. Writers take the lock for
/// the duration of one operation; readers only ever receive snapshots.
#[derive(Debug, Clone)]
pub struct SharedReputationRegistry {
    inner: Arc<RwLock<ReputationRegistry>>,
    catalog: Arc<CategoryCatalog>,
}

impl SharedReputationRegistry {
    pub fn new(registry: ReputationRegistry) -> Self {
        let catalog = Arc::clone(registry.catalog());
        Self {
            inner: Arc::new(RwLock::new(registry)),
            catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<CategoryCatalog> {
        &self.catalog
    }

    pub async fn register_sim<S: Sim + ?Sized>(&self, sim: &S) -> Result<()> {
        self.inner.write().await.register_sim(sim)
    }

    pub async fn process_action<S, A>(&self, sim: &S, action: &A) -> Result<ActionOutcome>
    where
        S: Sim + ?Sized,
        A: ReputationAction + ?Sized,
    {
        self.inner.write().await.process_action(sim, action)
    }

    pub async fn modify_points(&self, id: SimId, category: &CategoryKey, delta: i64) -> Result<i64> {
        self.inner.write().await.modify_points(id, category, delta)
    }

    pub async fn points(&self, id: SimId, category: &CategoryKey) -> Result<i64> {
        let registry = self.inner.read().await;
        Ok(registry.reputation_data_by_id(id)?.get_points(category))
    }

    pub async fn snapshot(&self, id: SimId) -> Result<RecordSnapshot> {
        self.inner.read().await.snapshot(id)
    }

    pub async fn snapshots(&self) -> Vec<RecordSnapshot> {
        self.inner.read().await.snapshots()
    }
}
