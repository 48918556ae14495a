use crate::category::CategoryKey;
use crate::sim::SimId;
use thiserror::Error;

/// Error returned by an action when it cannot compute its impact on a category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ImpactError(pub String);

impl ImpactError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Errors produced by the reputation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReputationError {
    #[error("Invalid category definition '{name}': {reason}")]
    InvalidCategoryDefinition { name: String, reason: String },

    #[error("Sim {0} is not registered")]
    NotRegistered(SimId),

    #[error("Unknown reputation category: {0}")]
    UnknownCategory(CategoryKey),

    #[error("Sim id {id} is already bound to '{registered}', refusing to register '{attempted}'")]
    DuplicateActorConflict {
        id: SimId,
        registered: String,
        attempted: String,
    },

    #[error("Impact computation failed for category {category}: {source}")]
    ImpactFailed {
        category: CategoryKey,
        #[source]
        source: ImpactError,
    },
}

impl ReputationError {
    pub(crate) fn invalid_category(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCategoryDefinition {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Short, stable label for the error kind, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCategoryDefinition { .. } => "invalid_category_definition",
            Self::NotRegistered(_) => "not_registered",
            Self::UnknownCategory(_) => "unknown_category",
            Self::DuplicateActorConflict { .. } => "duplicate_actor_conflict",
            Self::ImpactFailed { .. } => "impact_failed",
        }
    }
}

pub type Result<T, E = ReputationError> = std::result::Result<T, E>;

/// Errors raised while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
