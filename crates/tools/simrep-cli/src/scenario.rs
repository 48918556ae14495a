use anyhow::{Context, Result};
use serde::Deserialize;
use simrep_reputation::{
    ActionOutcome, BuiltinAction, ReputationError, ReputationRegistry, SimId, SimIdentity,
};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// A scripted sequence of sims and the actions they perform.
///
/// ```json
/// {
///   "sims": [{ "id": 1, "name": "Bella", "traits": ["Cheerful"] }],
///   "events": [{ "sim_id": 1, "action": { "type": "prank", "severity": 2 } }]
/// }
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct Scenario {
    #[serde(default)]
    pub sims: Vec<SimIdentity>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioEvent {
    pub sim_id: SimId,
    pub action: BuiltinAction,
}

/// Everything that happened while replaying a scenario.
#[derive(Debug, Default)]
pub struct ScenarioReport {
    pub outcomes: Vec<ActionOutcome>,
    pub rejected: Vec<(SimId, ReputationError)>,
}

impl Scenario {
    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse scenario JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {:?}", path))?;
        Self::from_json_str(&contents)
    }

    /// Register every sim, then process every event in order.
    ///
    /// Registration conflicts and events for unknown sims are collected in the
    /// report instead of aborting the run.
    pub fn run(&self, registry: &mut ReputationRegistry) -> ScenarioReport {
        let mut report = ScenarioReport::default();

        for sim in &self.sims {
            if let Err(e) = registry.register_sim(sim) {
                warn!("Skipping sim {}: {}", sim.id, e);
                report.rejected.push((sim.id, e));
            }
        }

        for event in &self.events {
            let outcome = registry
                .reputation_data_by_id(event.sim_id)
                .map(|record| record.sim().clone())
                .and_then(|sim| registry.process_action(&sim, &event.action));
            match outcome {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => {
                    warn!("Event for sim {} rejected: {}", event.sim_id, e);
                    report.rejected.push((event.sim_id, e));
                }
            }
        }

        info!(
            "Replayed {} events ({} rejected)",
            report.outcomes.len(),
            report.rejected.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simrep_reputation::{CatalogConfig, CategoryCatalog};
    use std::io::Write;
    use std::sync::Arc;

    fn registry() -> ReputationRegistry {
        let catalog = CategoryCatalog::from_config(&CatalogConfig::default_sims()).unwrap();
        ReputationRegistry::new(Arc::new(catalog))
    }

    const SCENARIO: &str = r#"{
        "sims": [
            { "id": 1, "name": "Bella", "traits": ["Cheerful"] },
            { "id": 2, "name": "Mortimer" },
            { "id": 1, "name": "Impostor" }
        ],
        "events": [
            { "sim_id": 1, "action": { "type": "donate_charity", "amount": 120 } },
            { "sim_id": 2, "action": { "type": "prank", "severity": 4 } },
            { "sim_id": 9, "action": { "type": "prank", "severity": 1 } },
            { "sim_id": 2, "action": { "type": "fixed", "description": "Apologised", "impacts": { "Kind": 10 } } }
        ]
    }"#;

    #[test]
    fn replays_events_and_collects_rejections() {
        let scenario = Scenario::from_json_str(SCENARIO).unwrap();
        let mut registry = registry();

        let report = scenario.run(&mut registry);

        assert_eq!(report.outcomes.len(), 3);
        let rejected: Vec<_> = report.rejected.iter().map(|(id, e)| (id.0, e.kind())).collect();
        assert_eq!(
            rejected,
            [(1, "duplicate_actor_conflict"), (9, "not_registered")]
        );

        let bella = registry.snapshot(SimId(1)).unwrap();
        assert_eq!(bella.get(&"Kind".into()), 12);
        assert_eq!(bella.get(&"Generous".into()), 24);

        let mortimer = registry.snapshot(SimId(2)).unwrap();
        assert_eq!(mortimer.get(&"Funny".into()), 8);
        assert_eq!(mortimer.get(&"Mean".into()), 4);
        assert_eq!(mortimer.get(&"Kind".into()), 10);
    }

    #[test]
    fn loads_scenario_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SCENARIO).unwrap();
        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.sims.len(), 3);
        assert_eq!(scenario.events.len(), 4);
    }

    #[test]
    fn bundled_demo_replays() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../..");
        let config = CatalogConfig::load(root.join("config/catalog.toml")).unwrap();
        let catalog = Arc::new(CategoryCatalog::from_config(&config).unwrap());
        let mut registry = ReputationRegistry::new(catalog.clone());

        let scenario = Scenario::load(&root.join("scenarios/prank_night.json")).unwrap();
        let report = scenario.run(&mut registry);

        assert_eq!(report.outcomes.len(), 5);
        assert_eq!(report.rejected.len(), 1);
        let negative_donation = report.outcomes.last().unwrap();
        let failed: Vec<_> = negative_donation.failures().map(|(c, _)| c.as_str()).collect();
        assert_eq!(failed, ["Kind", "Generous"]);

        let bella = registry.snapshot(SimId(1)).unwrap();
        let order: Vec<_> = bella.points.iter().map(|(k, _)| k.as_str()).collect();
        let catalog_order: Vec<_> = catalog.keys().map(|k| k.as_str()).collect();
        assert_eq!(order, catalog_order);

        let don = registry.snapshot(SimId(3)).unwrap();
        assert_eq!(don.get(&"Funny".into()), 50);
        assert_eq!(don.get(&"Mean".into()), 35);
        assert_eq!(don.get(&"Kind".into()), 0);
    }

    #[test]
    fn rejects_unknown_action_type() {
        let err = Scenario::from_json_str(
            r#"{ "events": [{ "sim_id": 1, "action": { "type": "juggle" } }] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("scenario"));
    }
}
