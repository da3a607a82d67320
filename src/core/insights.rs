use super::types::{Insight, InsightKind, PlanningInputs, ProjectionResultSet, ScenarioName};

/// Conservative needs at least this multiple of the moderate contribution
/// before it is flagged.
const CONSERVATIVE_WARNING_RATIO: f64 = 1.5;

pub fn derive_insights(inputs: &PlanningInputs, results: &ProjectionResultSet) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(3);

    let (best_name, best) =
        if results.aggressive.required_monthly_savings < results.moderate.required_monthly_savings {
            (ScenarioName::Aggressive, &results.aggressive)
        } else {
            (ScenarioName::Moderate, &results.moderate)
        };
    insights.push(Insight {
        kind: InsightKind::Success,
        title: "Best Case Scenario".to_string(),
        description: format!(
            "{} portfolio requires only ${}/month to reach your goal",
            best_name.title(),
            best.required_monthly_savings
        ),
    });

    let conservative = results.conservative.required_monthly_savings;
    let moderate = results.moderate.required_monthly_savings;
    if conservative > 0 && conservative as f64 >= moderate as f64 * CONSERVATIVE_WARNING_RATIO {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Conservative Challenge".to_string(),
            description: format!(
                "Low-risk approach needs ${}/month - consider increasing risk tolerance",
                conservative
            ),
        });
    }

    // Only this text groups thousands; the two amounts above print plain.
    let multiplier = (1.0 + results.inflation_rate).powf(f64::from(results.years_to_retirement));
    let future_income = (inputs.desired_monthly_income * multiplier).round().max(0.0) as u64;
    insights.push(Insight {
        kind: InsightKind::Info,
        title: "Inflation Impact".to_string(),
        description: format!(
            "Your ${} goal today will need ${}/month in {} years",
            group_thousands(inputs.desired_monthly_income.round().max(0.0) as u64),
            group_thousands(future_income),
            results.years_to_retirement
        ),
    });

    insights
}

/// `1234567` -> `"1,234,567"`.
pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
