use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::PlanningInputs;

/// A named calculation kept for one account. `results` is the full result set
/// as an opaque JSON snapshot; only `inputs` is fed back into the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedScenario {
    pub id: Uuid,
    pub account_id: String,
    pub name: String,
    #[serde(flatten)]
    pub inputs: PlanningInputs,
    pub required_monthly_savings: u64,
    pub results: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewScenario {
    pub account_id: String,
    pub name: String,
    pub inputs: PlanningInputs,
    pub required_monthly_savings: u64,
    pub results: serde_json::Value,
}

pub trait ScenarioStore: Send + Sync {
    fn save(&self, scenario: NewScenario) -> SavedScenario;

    /// Oldest first.
    fn list(&self, account_id: &str) -> Vec<SavedScenario>;

    /// Returns `false` when the account has no scenario with that id.
    fn delete(&self, account_id: &str, id: Uuid) -> bool;
}

#[derive(Debug, Default)]
pub struct InMemoryScenarioStore {
    by_account: RwLock<HashMap<String, Vec<SavedScenario>>>,
}

impl InMemoryScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioStore for InMemoryScenarioStore {
    fn save(&self, scenario: NewScenario) -> SavedScenario {
        let saved = SavedScenario {
            id: Uuid::new_v4(),
            account_id: scenario.account_id,
            name: scenario.name,
            inputs: scenario.inputs,
            required_monthly_savings: scenario.required_monthly_savings,
            results: scenario.results,
            created_at: Utc::now(),
        };
        self.by_account
            .write()
            .entry(saved.account_id.clone())
            .or_default()
            .push(saved.clone());
        saved
    }

    fn list(&self, account_id: &str) -> Vec<SavedScenario> {
        self.by_account
            .read()
            .get(account_id)
            .cloned()
            .unwrap_or_default()
    }

    fn delete(&self, account_id: &str, id: Uuid) -> bool {
        let mut by_account = self.by_account.write();
        let Some(scenarios) = by_account.get_mut(account_id) else {
            return false;
        };
        let before = scenarios.len();
        scenarios.retain(|scenario| scenario.id != id);
        before != scenarios.len()
    }
}
