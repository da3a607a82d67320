use serde::{Deserialize, Serialize};

use super::form::{PlanForm, build_inputs};
use crate::core::PlanningInputs;

/// Query-string shape of a shared calculator link:
/// `age=30&retirement=65&savings=25000&income=4000`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retirement: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<f64>,
    #[serde(rename = "customRoi", skip_serializing_if = "Option::is_none")]
    pub custom_roi: Option<f64>,
}

impl From<&PlanningInputs> for ShareQuery {
    fn from(inputs: &PlanningInputs) -> Self {
        Self {
            age: Some(inputs.current_age),
            retirement: Some(inputs.retirement_age),
            savings: Some(inputs.current_savings),
            income: Some(inputs.desired_monthly_income),
            custom_roi: inputs.custom_annual_return_percent,
        }
    }
}

impl From<ShareQuery> for PlanForm {
    fn from(query: ShareQuery) -> Self {
        Self {
            current_age: query.age,
            retirement_age: query.retirement,
            current_savings: query.savings,
            desired_monthly_income: query.income,
            custom_annual_return_percent: query.custom_roi,
        }
    }
}

/// Floats are written as shortest round-trip decimals, so parsing the link
/// back yields bit-identical inputs.
pub fn to_query(inputs: &PlanningInputs) -> Result<String, String> {
    serde_urlencoded::to_string(ShareQuery::from(inputs))
        .map_err(|e| format!("Failed to encode share link: {e}"))
}

pub fn from_query(query: &str) -> Result<PlanningInputs, String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let parsed = serde_urlencoded::from_str::<ShareQuery>(query)
        .map_err(|e| format!("Invalid share link: {e}"))?;
    build_inputs(parsed.into())
}
