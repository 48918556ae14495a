use crate::category::{CategoryCatalog, CategoryKey};
use crate::error::{ReputationError, Result};
use crate::sim::{SimId, SimIdentity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Result of applying a single delta to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryUpdate {
    pub category: CategoryKey,
    /// Delta requested by the caller, before clamping.
    pub delta: i64,
    pub previous: i64,
    pub current: i64,
}

impl CategoryUpdate {
    /// Whether the stored value differs from `previous + delta`.
    pub fn clamped(&self) -> bool {
        self.previous.saturating_add(self.delta) != self.current
    }
}

/// Per-sim reputation points, keyed by category.
///
/// Owned by the [`ReputationRegistry`](crate::ReputationRegistry). Every stored
/// value lies within `[0, max_points]` of its category; categories that were never
/// touched read as 0.
#[derive(Debug, Clone)]
pub struct ReputationRecord {
    sim: SimIdentity,
    catalog: Arc<CategoryCatalog>,
    points: BTreeMap<CategoryKey, i64>,
}

impl ReputationRecord {
    pub(crate) fn new(sim: SimIdentity, catalog: Arc<CategoryCatalog>) -> Self {
        Self {
            sim,
            catalog,
            points: BTreeMap::new(),
        }
    }

    pub fn sim(&self) -> &SimIdentity {
        &self.sim
    }

    pub fn sim_id(&self) -> SimId {
        self.sim.id
    }

    /// Stored points for `category`, or 0 if it has never been modified.
    pub fn get_points(&self, category: &CategoryKey) -> i64 {
        self.points.get(category).copied().unwrap_or(0)
    }

    /// Whether `category` has been materialized in this record.
    pub fn is_touched(&self, category: &CategoryKey) -> bool {
        self.points.contains_key(category)
    }

    /// Add `delta` to `category`, saturating at the category bounds.
    ///
    /// Returns the new value. Fails with `UnknownCategory` if the category is not in
    /// the catalog, in which case the record is left untouched.
    pub fn modify_points(&mut self, category: &CategoryKey, delta: i64) -> Result<i64> {
        self.apply_delta(category, delta).map(|update| update.current)
    }

    /// Like [`modify_points`](Self::modify_points), reporting the previous value too.
    pub fn apply_delta(&mut self, category: &CategoryKey, delta: i64) -> Result<CategoryUpdate> {
        let definition = self
            .catalog
            .get(category)
            .ok_or_else(|| ReputationError::UnknownCategory(category.clone()))?;

        let previous = self.get_points(category);
        let current = definition.clamp(previous.saturating_add(delta));
        self.points.insert(category.clone(), current);

        Ok(CategoryUpdate {
            category: category.clone(),
            delta,
            previous,
            current,
        })
    }

    /// Materialized entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryKey, i64)> {
        self.points.iter().map(|(k, v)| (k, *v))
    }

    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            sim: self.sim.clone(),
            points: self
                .catalog
                .keys()
                .map(|key| (key.clone(), self.get_points(key)))
                .collect(),
        }
    }
}

/// Read-only copy of a record, with every catalog category filled in.
///
/// Points are listed in catalog definition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub sim: SimIdentity,
    pub points: Vec<(CategoryKey, i64)>,
}

impl RecordSnapshot {
    pub fn get(&self, category: &CategoryKey) -> i64 {
        self.points
            .iter()
            .find(|(key, _)| key == category)
            .map_or(0, |(_, points)| *points)
    }
}
