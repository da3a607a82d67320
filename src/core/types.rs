use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One calculation request. Ranges are enforced by the form layer; the engine
/// only re-checks that retirement comes after the current age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningInputs {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_savings: f64,
    pub desired_monthly_income: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_annual_return_percent: Option<f64>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioName {
    Conservative,
    Moderate,
    Aggressive,
    Custom,
}

impl ScenarioName {
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioName::Conservative => "conservative",
            ScenarioName::Moderate => "moderate",
            ScenarioName::Aggressive => "aggressive",
            ScenarioName::Custom => "custom",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ScenarioName::Conservative => "Conservative",
            ScenarioName::Moderate => "Moderate",
            ScenarioName::Aggressive => "Aggressive",
            ScenarioName::Custom => "Custom",
        }
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub annual_return_rate: f64,
    pub required_monthly_savings: u64,
    pub future_monthly_income_target: u64,
    pub todays_purchasing_power_equivalent: u64,
    pub total_nest_egg_required_at_retirement: u64,
    pub progress_to_goal_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResultSet {
    pub conservative: ScenarioResult,
    pub moderate: ScenarioResult,
    pub aggressive: ScenarioResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<ScenarioResult>,
    pub inflation_rate: f64,
    pub years_to_retirement: u32,
}

impl ProjectionResultSet {
    pub fn get(&self, name: ScenarioName) -> Option<&ScenarioResult> {
        match name {
            ScenarioName::Conservative => Some(&self.conservative),
            ScenarioName::Moderate => Some(&self.moderate),
            ScenarioName::Aggressive => Some(&self.aggressive),
            ScenarioName::Custom => self.custom.as_ref(),
        }
    }

    /// Active scenarios in display order; `custom` only when present.
    pub fn scenarios(&self) -> impl Iterator<Item = (ScenarioName, &ScenarioResult)> {
        [
            ScenarioName::Conservative,
            ScenarioName::Moderate,
            ScenarioName::Aggressive,
            ScenarioName::Custom,
        ]
        .into_iter()
        .filter_map(move |name| self.get(name).map(|scenario| (name, scenario)))
    }
}

/// One chart sample. Serializes flat, e.g.
/// `{"age":35,"year":5,"conservative":268207,"moderate":158222,...}`.
/// `year_offset` goes on the wire as `"year"`, the key chart consumers read.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthPoint {
    pub age: u32,
    pub year_offset: u32,
    pub values: Vec<(ScenarioName, u64)>,
}

impl GrowthPoint {
    pub fn value(&self, name: ScenarioName) -> Option<u64> {
        self.values
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| *value)
    }
}

impl Serialize for GrowthPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.values.len()))?;
        map.serialize_entry("age", &self.age)?;
        map.serialize_entry("year", &self.year_offset)?;
        for (name, value) in &self.values {
            map.serialize_entry(name.as_str(), value)?;
        }
        map.end()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

/// Row of the per-scenario monthly savings bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsBar {
    pub name: ScenarioName,
    pub label: String,
    pub annual_return_rate: f64,
    pub value: u64,
}
