use super::types::{ProjectionResultSet, SavingsBar, ScenarioName};

/// Rows for the required-monthly-savings bar chart, one per active scenario.
pub fn savings_chart(results: &ProjectionResultSet) -> Vec<SavingsBar> {
    results
        .scenarios()
        .map(|(name, scenario)| SavingsBar {
            name,
            label: scenario_label(name, scenario.annual_return_rate),
            annual_return_rate: scenario.annual_return_rate,
            value: scenario.required_monthly_savings,
        })
        .collect()
}

fn scenario_label(name: ScenarioName, annual_return_rate: f64) -> String {
    let percent = (annual_return_rate * 1000.0).round() / 10.0;
    if name == ScenarioName::Custom || percent.fract() != 0.0 {
        format!("{} ({percent:.1}%)", name.title())
    } else {
        format!("{} ({percent:.0}%)", name.title())
    }
}
