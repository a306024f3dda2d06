use colored::Colorize;
use gamebridge_core::{BridgeConfig, GameServicesSession, MemoryService, ServiceCall};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::scenarios::{Scenario, fixture_listing};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub failures: Vec<String>,
    /// Outbound writes the scenario sent to the service.
    pub calls: Vec<ServiceCall>,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

pub struct LogicTester {
    config: BridgeConfig,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(config: BridgeConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }

    pub async fn run_scenario(&self, scenario: &dyn Scenario) -> ScenarioResult {
        if self.verbose {
            println!(
                "🧪 Testing scenario: {} ({})",
                scenario.name().bright_white(),
                scenario.description()
            );
        }

        let mut session =
            GameServicesSession::new(self.config.clone(), MemoryService::new(fixture_listing()));
        let start_time = Instant::now();
        let outcome = scenario.run(&mut session).await;
        let duration = start_time.elapsed();
        session.end();

        let failures = match outcome {
            Ok(()) => Vec::new(),
            Err(err) => {
                log::debug!("Scenario {} failed: {err:#}", scenario.name());
                if self.verbose {
                    println!("  ❌ {}", format!("{err:#}").red());
                }
                vec![format!("{err:#}")]
            }
        };

        ScenarioResult {
            scenario_name: scenario.name().to_string(),
            passed: failures.is_empty(),
            failures,
            calls: session.service().writes(),
            duration,
        }
    }

    pub async fn run_all(&self, scenarios: &[Box<dyn Scenario>]) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(self.run_scenario(scenario.as_ref()).await);
        }
        results
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}
