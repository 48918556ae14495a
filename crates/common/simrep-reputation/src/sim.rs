//! Actor identity and the capability surface sims expose for reputation.

use crate::category::CategoryKey;
use crate::error::Result;
use crate::registry::ReputationRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Unique identifier of a simulated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimId(pub u64);

impl fmt::Display for SimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for SimId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Minimal identity record of a sim: id, display name and opaque trait labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimIdentity {
    pub id: SimId,
    pub name: String,
    #[serde(default)]
    pub traits: BTreeSet<String>,
}

impl SimIdentity {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: SimId(id),
            name: name.into(),
            traits: BTreeSet::new(),
        }
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits.extend(traits.into_iter().map(Into::into));
        self
    }

    pub fn has_trait(&self, label: &str) -> bool {
        self.traits.contains(label)
    }
}

/// Anything that can be tracked by the reputation registry.
///
/// A sim carries no reputation state of its own. The reputation operations are
/// pass-throughs to the record the registry keeps under [`Sim::sim_id`], so any
/// two handles with the same id observe the same values.
pub trait Sim {
    fn sim_id(&self) -> SimId;

    fn name(&self) -> &str;

    fn traits(&self) -> &BTreeSet<String>;

    /// Snapshot of this sim's identity, as stored by the registry.
    fn identity(&self) -> SimIdentity {
        SimIdentity {
            id: self.sim_id(),
            name: self.name().to_string(),
            traits: self.traits().clone(),
        }
    }

    /// Current points for `category`.
    fn get_reputation(&self, registry: &ReputationRegistry, category: &CategoryKey) -> Result<i64> {
        Ok(registry
            .reputation_data_by_id(self.sim_id())?
            .get_points(category))
    }

    /// Adjust points for `category` by `delta`, returning the clamped new value.
    fn modify_reputation(
        &self,
        registry: &mut ReputationRegistry,
        category: &CategoryKey,
        delta: i64,
    ) -> Result<i64> {
        registry.modify_points(self.sim_id(), category, delta)
    }
}

impl Sim for SimIdentity {
    fn sim_id(&self) -> SimId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn traits(&self) -> &BTreeSet<String> {
        &self.traits
    }
}
