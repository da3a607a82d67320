use serde::Deserialize;

use crate::core::PlanningInputs;

pub const MIN_CURRENT_AGE: u32 = 18;
pub const MIN_RETIREMENT_AGE: u32 = 50;
pub const MAX_AGE: u32 = 100;
pub const MIN_MONTHLY_INCOME: f64 = 100.0;
pub const MIN_CUSTOM_RETURN_PERCENT: f64 = 0.1;
pub const MAX_CUSTOM_RETURN_PERCENT: f64 = 50.0;

/// Calculator form as submitted by a client. Every field is optional on the
/// wire so a missing value can be reported by name.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanForm {
    pub current_age: Option<u32>,
    pub retirement_age: Option<u32>,
    pub current_savings: Option<f64>,
    pub desired_monthly_income: Option<f64>,
    pub custom_annual_return_percent: Option<f64>,
}

/// Checks the form ranges. Whether retirement comes after the current age is
/// left to the engine.
pub fn build_inputs(form: PlanForm) -> Result<PlanningInputs, String> {
    let Some(current_age) = form.current_age else {
        return Err("currentAge is required".to_string());
    };
    let Some(retirement_age) = form.retirement_age else {
        return Err("retirementAge is required".to_string());
    };
    let Some(current_savings) = form.current_savings else {
        return Err("currentSavings is required".to_string());
    };
    let Some(desired_monthly_income) = form.desired_monthly_income else {
        return Err("desiredMonthlyIncome is required".to_string());
    };

    let inputs = PlanningInputs {
        current_age,
        retirement_age,
        current_savings,
        desired_monthly_income,
        custom_annual_return_percent: form.custom_annual_return_percent,
    };
    validate_inputs(&inputs)?;
    Ok(inputs)
}

pub fn validate_inputs(inputs: &PlanningInputs) -> Result<(), String> {
    if !(MIN_CURRENT_AGE..=MAX_AGE).contains(&inputs.current_age) {
        return Err(format!(
            "currentAge must be between {MIN_CURRENT_AGE} and {MAX_AGE}"
        ));
    }

    if !(MIN_RETIREMENT_AGE..=MAX_AGE).contains(&inputs.retirement_age) {
        return Err(format!(
            "retirementAge must be between {MIN_RETIREMENT_AGE} and {MAX_AGE}"
        ));
    }

    if !inputs.current_savings.is_finite() || inputs.current_savings < 0.0 {
        return Err("currentSavings cannot be negative".to_string());
    }

    if !inputs.desired_monthly_income.is_finite()
        || inputs.desired_monthly_income < MIN_MONTHLY_INCOME
    {
        return Err(format!(
            "desiredMonthlyIncome must be at least {MIN_MONTHLY_INCOME}"
        ));
    }

    if let Some(percent) = inputs.custom_annual_return_percent {
        if !(MIN_CUSTOM_RETURN_PERCENT..=MAX_CUSTOM_RETURN_PERCENT).contains(&percent) {
            return Err(format!(
                "customAnnualReturnPercent must be between {MIN_CUSTOM_RETURN_PERCENT} and {MAX_CUSTOM_RETURN_PERCENT}"
            ));
        }
    }

    Ok(())
}
