#![forbid(unsafe_code)]

//! Multi-category reputation tracking for simulated actors.
//!
//! A [`CategoryCatalog`] fixes the reputation dimensions, a [`ReputationRegistry`]
//! owns one [`ReputationRecord`] per registered [`Sim`], and actions implementing
//! [`ReputationAction`] declare how many points they add to or take from each
//! category. Points are always clamped to `[0, max_points]`.

pub mod action;
pub mod category;
pub mod config;
pub mod error;
pub mod metrics;
pub mod record;
pub mod registry;
pub mod shared;
pub mod sim;

pub use action::{BuiltinAction, FixedImpactAction, ReputationAction};
pub use category::{Category, CategoryCatalog, CategoryKey};
pub use config::{CatalogConfig, CategoryConfig};
pub use error::{ConfigError, ImpactError, ReputationError};
pub use metrics::{PrometheusReputationMetrics, ReputationMetricsHook};
pub use record::{CategoryUpdate, RecordSnapshot, ReputationRecord};
pub use registry::{ActionOutcome, CategoryResult, ReputationRegistry};
pub use shared::SharedReputationRegistry;
pub use sim::{Sim, SimId, SimIdentity};
