//! Actions: discrete events that declare a point impact per category.

use crate::category::{Category, CategoryKey};
use crate::error::ImpactError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capability interface implemented by every action that affects reputation.
///
/// Implementations must be pure: the impact depends only on the category and the
/// action's own fixed state. Mutation is left to the registry.
pub trait ReputationAction {
    fn description(&self) -> &str;

    /// Signed point impact on `category`. Zero means "no effect".
    fn reputation_impact(&self, category: &Category) -> Result<i64, ImpactError>;
}

/// Action with an explicit per-category impact table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedImpactAction {
    pub description: String,
    #[serde(default)]
    pub impacts: BTreeMap<CategoryKey, i64>,
}

impl FixedImpactAction {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            impacts: BTreeMap::new(),
        }
    }

    pub fn with_impact(mut self, category: impl Into<CategoryKey>, delta: i64) -> Self {
        self.impacts.insert(category.into(), delta);
        self
    }
}

impl ReputationAction for FixedImpactAction {
    fn description(&self) -> &str {
        &self.description
    }

    fn reputation_impact(&self, category: &Category) -> Result<i64, ImpactError> {
        Ok(self.impacts.get(category.key()).copied().unwrap_or(0))
    }
}

const KIND: &str = "Kind";
const FUNNY: &str = "Funny";
const MEAN: &str = "Mean";
const GENEROUS: &str = "Generous";

/// Largest Kind bonus a single donation can earn.
const DONATION_KIND_CAP: i64 = 25;

/// Built-in action variants, mostly useful for scenarios and demos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuiltinAction {
    /// Donate `amount` simoleons to charity.
    DonateCharity { amount: i64 },
    /// Play a prank of the given severity on someone.
    Prank { severity: i64 },
    Fixed(FixedImpactAction),
}

fn donation_impact(amount: i64, key: &str) -> Result<i64, ImpactError> {
    if key != KIND && key != GENEROUS {
        return Ok(0);
    }
    if amount < 0 {
        return Err(ImpactError::new(format!(
            "donation amount must not be negative, got {}",
            amount
        )));
    }
    Ok(match key {
        KIND => (amount / 10).min(DONATION_KIND_CAP),
        _ => amount / 5,
    })
}

fn prank_impact(severity: i64, key: &str) -> i64 {
    match key {
        FUNNY => severity.saturating_mul(2),
        KIND => severity.saturating_neg(),
        MEAN => severity,
        _ => 0,
    }
}

impl ReputationAction for BuiltinAction {
    fn description(&self) -> &str {
        match self {
            Self::DonateCharity { .. } => "Donated to charity",
            Self::Prank { .. } => "Played a prank",
            Self::Fixed(action) => action.description(),
        }
    }

    fn reputation_impact(&self, category: &Category) -> Result<i64, ImpactError> {
        match self {
            Self::DonateCharity { amount } => donation_impact(*amount, category.name()),
            Self::Prank { severity } => Ok(prank_impact(*severity, category.name())),
            Self::Fixed(action) => action.reputation_impact(category),
        }
    }
}
