use serde::{Deserialize, Serialize};

use super::types::ScenarioName;

pub const DEFAULT_INFLATION_RATE: f64 = 0.03;
/// The "4% rule": the nest egg must be 25x the first year's income.
pub const DEFAULT_WITHDRAWAL_RATE: f64 = 0.04;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScenarioDescriptor {
    pub name: ScenarioName,
    pub annual_return_rate: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedScenarioRates {
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
}

impl Default for FixedScenarioRates {
    fn default() -> Self {
        Self {
            conservative: 0.04,
            moderate: 0.07,
            aggressive: 0.10,
        }
    }
}

impl FixedScenarioRates {
    pub fn descriptors(&self) -> [ScenarioDescriptor; 3] {
        [
            ScenarioDescriptor {
                name: ScenarioName::Conservative,
                annual_return_rate: self.conservative,
            },
            ScenarioDescriptor {
                name: ScenarioName::Moderate,
                annual_return_rate: self.moderate,
            },
            ScenarioDescriptor {
                name: ScenarioName::Aggressive,
                annual_return_rate: self.aggressive,
            },
        ]
    }
}

/// Rates the engine applies to every calculation. All values are fractions
/// (0.03 means 3%).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub inflation_rate: f64,
    pub withdrawal_rate: f64,
    pub fixed_scenarios: FixedScenarioRates,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inflation_rate: DEFAULT_INFLATION_RATE,
            withdrawal_rate: DEFAULT_WITHDRAWAL_RATE,
            fixed_scenarios: FixedScenarioRates::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.inflation_rate.is_finite() || self.inflation_rate <= -1.0 {
            return Err("inflation rate must be > -100%".to_string());
        }

        if !self.withdrawal_rate.is_finite() || self.withdrawal_rate <= 0.0 {
            return Err("withdrawal rate must be > 0".to_string());
        }

        for descriptor in self.fixed_scenarios.descriptors() {
            if !descriptor.annual_return_rate.is_finite() || descriptor.annual_return_rate < 0.0 {
                return Err(format!("{} return rate must be >= 0", descriptor.name));
            }
        }

        Ok(())
    }

    /// The user-supplied scenario, present only for a finite positive percentage.
    pub fn custom_scenario(
        &self,
        custom_annual_return_percent: Option<f64>,
    ) -> Option<ScenarioDescriptor> {
        custom_annual_return_percent
            .filter(|percent| percent.is_finite() && *percent > 0.0)
            .map(|percent| ScenarioDescriptor {
                name: ScenarioName::Custom,
                annual_return_rate: percent / 100.0,
            })
    }
}
