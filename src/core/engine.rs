use serde::{Serialize, Serializer};

use super::config::{EngineConfig, ScenarioDescriptor};
use super::error::ValidationError;
use super::types::{GrowthPoint, PlanningInputs, ProjectionResultSet, ScenarioResult};

pub const GROWTH_STEP_YEARS: u32 = 5;

/// Scenario-independent figures, computed once per call.
#[derive(Debug, Clone, Copy)]
struct RetirementTarget {
    years_to_retirement: u32,
    future_monthly_income: f64,
    nest_egg_required: f64,
}

impl RetirementTarget {
    fn total_months(self) -> f64 {
        months_after(self.years_to_retirement)
    }
}

pub fn compute_scenarios(
    inputs: &PlanningInputs,
    config: &EngineConfig,
) -> Result<ProjectionResultSet, ValidationError> {
    let target = retirement_target(inputs, config)?;

    let [conservative, moderate, aggressive] = config
        .fixed_scenarios
        .descriptors()
        .map(|descriptor| evaluate_scenario(inputs, target, descriptor));
    let custom = config
        .custom_scenario(inputs.custom_annual_return_percent)
        .map(|descriptor| evaluate_scenario(inputs, target, descriptor));

    tracing::debug!(
        years_to_retirement = target.years_to_retirement,
        custom = custom.is_some(),
        "computed retirement scenarios"
    );

    Ok(ProjectionResultSet {
        conservative,
        moderate,
        aggressive,
        custom,
        inflation_rate: config.inflation_rate,
        years_to_retirement: target.years_to_retirement,
    })
}

/// Balance samples every [`GROWTH_STEP_YEARS`] years from today up to, but
/// never past, the retirement horizon. A horizon that is not a multiple of the
/// step ends on the last whole step (33 years yields a final point at 30).
pub fn compute_growth_series<'a>(
    inputs: &'a PlanningInputs,
    results: &'a ProjectionResultSet,
) -> GrowthSeries<'a> {
    GrowthSeries { inputs, results }
}

fn retirement_target(
    inputs: &PlanningInputs,
    config: &EngineConfig,
) -> Result<RetirementTarget, ValidationError> {
    config.validate().map_err(ValidationError::InvalidConfig)?;

    if inputs.retirement_age <= inputs.current_age {
        return Err(ValidationError::RetirementNotAfterCurrent {
            current_age: inputs.current_age,
            retirement_age: inputs.retirement_age,
        });
    }

    if !inputs.desired_monthly_income.is_finite() || inputs.desired_monthly_income <= 0.0 {
        return Err(ValidationError::NonPositiveIncome {
            desired_monthly_income: inputs.desired_monthly_income,
        });
    }

    let years_to_retirement = inputs.retirement_age - inputs.current_age;
    let future_monthly_income = inputs.desired_monthly_income
        * (1.0 + config.inflation_rate).powf(f64::from(years_to_retirement));
    let nest_egg_required = future_monthly_income * 12.0 / config.withdrawal_rate;

    Ok(RetirementTarget {
        years_to_retirement,
        future_monthly_income,
        nest_egg_required,
    })
}

fn evaluate_scenario(
    inputs: &PlanningInputs,
    target: RetirementTarget,
    descriptor: ScenarioDescriptor,
) -> ScenarioResult {
    let monthly_rate = descriptor.annual_return_rate / 12.0;
    let total_months = target.total_months();

    let future_savings = compound(inputs.current_savings, monthly_rate, total_months);
    let additional_needed = (target.nest_egg_required - future_savings).max(0.0);
    let required_monthly = required_contribution(additional_needed, monthly_rate, total_months);
    let progress = (future_savings / target.nest_egg_required * 100.0).round();

    ScenarioResult {
        annual_return_rate: descriptor.annual_return_rate,
        required_monthly_savings: round_currency(required_monthly),
        future_monthly_income_target: round_currency(target.future_monthly_income),
        todays_purchasing_power_equivalent: round_currency(inputs.desired_monthly_income),
        total_nest_egg_required_at_retirement: round_currency(target.nest_egg_required),
        progress_to_goal_percent: progress.clamp(0.0, 100.0) as u32,
    }
}

/// Level monthly deposit, paid at the end of each month, that grows to
/// `additional_needed` after `months`.
fn required_contribution(additional_needed: f64, monthly_rate: f64, months: f64) -> f64 {
    if additional_needed <= 0.0 {
        return 0.0;
    }
    if monthly_rate > 0.0 {
        additional_needed * monthly_rate / ((1.0 + monthly_rate).powf(months) - 1.0)
    } else {
        additional_needed / months
    }
}

/// Value after `months` of a level end-of-month deposit stream.
fn accumulated_contributions(monthly_deposit: f64, monthly_rate: f64, months: f64) -> f64 {
    if monthly_deposit <= 0.0 {
        return 0.0;
    }
    if monthly_rate > 0.0 {
        monthly_deposit * ((1.0 + monthly_rate).powf(months) - 1.0) / monthly_rate
    } else {
        monthly_deposit * months
    }
}

fn compound(principal: f64, monthly_rate: f64, months: f64) -> f64 {
    principal * (1.0 + monthly_rate).powf(months)
}

// Month counts stay in f64: ages are unbounded u32 once the form layer is
// bypassed, and `years * 12` overflows u32 well inside that range.
fn months_after(years: u32) -> f64 {
    f64::from(years) * 12.0
}

fn round_currency(value: f64) -> u64 {
    // `as` saturates: negatives clamp to 0 and NaN maps to 0.
    value.round() as u64
}

/// Finite, restartable view over the chart samples for one result set. Each
/// call to [`GrowthSeries::iter`] starts again from year zero.
#[derive(Debug, Clone, Copy)]
pub struct GrowthSeries<'a> {
    inputs: &'a PlanningInputs,
    results: &'a ProjectionResultSet,
}

impl<'a> GrowthSeries<'a> {
    pub fn iter(&self) -> GrowthPoints<'a> {
        GrowthPoints {
            inputs: self.inputs,
            results: self.results,
            next_year: Some(0),
        }
    }

    pub fn len(&self) -> usize {
        (self.results.years_to_retirement / GROWTH_STEP_YEARS) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn to_vec(&self) -> Vec<GrowthPoint> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &GrowthSeries<'a> {
    type Item = GrowthPoint;
    type IntoIter = GrowthPoints<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for GrowthSeries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[derive(Debug, Clone)]
pub struct GrowthPoints<'a> {
    inputs: &'a PlanningInputs,
    results: &'a ProjectionResultSet,
    next_year: Option<u32>,
}

impl Iterator for GrowthPoints<'_> {
    type Item = GrowthPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let year = self.next_year?;
        if year > self.results.years_to_retirement {
            self.next_year = None;
            return None;
        }
        self.next_year = year.checked_add(GROWTH_STEP_YEARS);

        let months = months_after(year);
        let values = self
            .results
            .scenarios()
            .map(|(name, scenario)| {
                let monthly_rate = scenario.annual_return_rate / 12.0;
                let savings = compound(self.inputs.current_savings, monthly_rate, months);
                let contributions = accumulated_contributions(
                    scenario.required_monthly_savings as f64,
                    monthly_rate,
                    months,
                );
                (name, round_currency(savings + contributions))
            })
            .collect();

        Some(GrowthPoint {
            age: self.inputs.current_age.saturating_add(year),
            year_offset: year,
            values,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next_year {
            Some(year) if year <= self.results.years_to_retirement => {
                ((self.results.years_to_retirement - year) / GROWTH_STEP_YEARS) as usize + 1
            }
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GrowthPoints<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ScenarioName;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_inputs() -> PlanningInputs {
        PlanningInputs {
            current_age: 30,
            retirement_age: 65,
            current_savings: 25_000.0,
            desired_monthly_income: 4_000.0,
            custom_annual_return_percent: None,
        }
    }

    fn compute(inputs: &PlanningInputs) -> ProjectionResultSet {
        compute_scenarios(inputs, &EngineConfig::default()).expect("valid inputs")
    }

    #[test]
    fn sample_plan_matches_closed_form_figures() {
        let results = compute(&sample_inputs());

        assert_eq!(results.years_to_retirement, 35);
        assert_approx(results.inflation_rate, 0.03);

        let expected_income = (4_000.0 * 1.03_f64.powf(35.0)).round() as u64;
        assert_eq!(expected_income, 11_255);
        for (_, scenario) in results.scenarios() {
            assert_eq!(scenario.future_monthly_income_target, expected_income);
            assert_eq!(scenario.todays_purchasing_power_equivalent, 4_000);
            assert_eq!(scenario.total_nest_egg_required_at_retirement, 3_376_635);
        }

        assert_eq!(results.conservative.required_monthly_savings, 3_585);
        assert_eq!(results.moderate.required_monthly_savings, 1_715);
        assert_eq!(results.aggressive.required_monthly_savings, 674);
        assert_eq!(results.conservative.progress_to_goal_percent, 3);
        assert_eq!(results.moderate.progress_to_goal_percent, 9);
        assert_eq!(results.aggressive.progress_to_goal_percent, 24);
        assert!(
            results.moderate.required_monthly_savings
                < results.conservative.required_monthly_savings
        );
        assert!(results.custom.is_none());
    }

    #[test]
    fn custom_scenario_uses_percent_as_annual_rate() {
        let mut inputs = sample_inputs();
        inputs.custom_annual_return_percent = Some(8.5);

        let results = compute(&inputs);
        let custom = results.custom.as_ref().expect("custom scenario present");
        assert_approx(custom.annual_return_rate, 0.085);
        assert_eq!(custom.required_monthly_savings, 1_114);
        assert_eq!(custom.progress_to_goal_percent, 14);
        assert_eq!(results.scenarios().count(), 4);
    }

    #[test]
    fn custom_scenario_absent_for_zero_or_missing_percent() {
        let mut inputs = sample_inputs();
        assert!(compute(&inputs).custom.is_none());

        inputs.custom_annual_return_percent = Some(0.0);
        assert!(compute(&inputs).custom.is_none());
    }

    #[test]
    fn rejects_retirement_at_or_before_current_age() {
        let mut inputs = sample_inputs();
        inputs.current_age = 40;
        inputs.retirement_age = 40;
        let err = compute_scenarios(&inputs, &EngineConfig::default())
            .expect_err("equal ages must fail");
        assert_eq!(
            err,
            ValidationError::RetirementNotAfterCurrent {
                current_age: 40,
                retirement_age: 40
            }
        );
        assert!(err.to_string().contains("retirement age must exceed current age"));

        inputs.retirement_age = 39;
        assert!(compute_scenarios(&inputs, &EngineConfig::default()).is_err());
    }

    #[test]
    fn rejects_zero_income_instead_of_dividing_by_zero() {
        let mut inputs = sample_inputs();
        inputs.desired_monthly_income = 0.0;
        let err = compute_scenarios(&inputs, &EngineConfig::default())
            .expect_err("zero income must fail");
        assert!(matches!(err, ValidationError::NonPositiveIncome { .. }));

        inputs.desired_monthly_income = f64::NAN;
        assert!(compute_scenarios(&inputs, &EngineConfig::default()).is_err());
    }

    #[test]
    fn goal_already_met_needs_no_contribution() {
        let mut inputs = sample_inputs();
        inputs.current_savings = 5_000_000.0;

        let results = compute(&inputs);
        for (_, scenario) in results.scenarios() {
            assert_eq!(scenario.required_monthly_savings, 0);
            assert_eq!(scenario.progress_to_goal_percent, 100);
        }
    }

    #[test]
    fn zero_savings_reports_zero_progress() {
        let mut inputs = sample_inputs();
        inputs.current_savings = 0.0;

        let results = compute(&inputs);
        assert_eq!(results.moderate.progress_to_goal_percent, 0);
        assert!(results.moderate.required_monthly_savings > 0);
    }

    #[test]
    fn zero_rate_scenario_saves_in_a_straight_line() {
        let mut config = EngineConfig::default();
        config.fixed_scenarios.conservative = 0.0;
        let inputs = PlanningInputs {
            current_age: 60,
            retirement_age: 70,
            current_savings: 100_000.0,
            desired_monthly_income: 1_000.0,
            custom_annual_return_percent: None,
        };

        let results = compute_scenarios(&inputs, &config).expect("valid inputs");
        let future_income = 1_000.0 * 1.03_f64.powf(10.0);
        let nest_egg = future_income * 12.0 / 0.04;
        let expected = ((nest_egg - 100_000.0) / 120.0).round() as u64;
        assert_eq!(results.conservative.required_monthly_savings, expected);
        assert_eq!(expected, 2_526);
        assert_eq!(
            results.conservative.progress_to_goal_percent,
            (100_000.0 / nest_egg * 100.0).round() as u32
        );

        // Without growth the balance is savings plus deposits made so far.
        let points = compute_growth_series(&inputs, &results).to_vec();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].value(ScenarioName::Conservative), Some(100_000));
        assert_eq!(
            points[1].value(ScenarioName::Conservative),
            Some(100_000 + expected * 60)
        );
        assert_eq!(
            points[2].value(ScenarioName::Conservative),
            Some(100_000 + expected * 120)
        );
        assert_eq!(points[2].value(ScenarioName::Conservative), Some(403_120));
    }

    #[test]
    fn rejects_config_that_skipped_validation() {
        let zero_withdrawal = EngineConfig {
            withdrawal_rate: 0.0,
            ..EngineConfig::default()
        };
        let err = compute_scenarios(&sample_inputs(), &zero_withdrawal)
            .expect_err("zero withdrawal rate must fail");
        assert!(matches!(err, ValidationError::InvalidConfig(_)));
        assert!(err.to_string().contains("withdrawal rate"));

        let mut negative_return = EngineConfig::default();
        negative_return.fixed_scenarios.conservative = -0.12;
        let err = compute_scenarios(&sample_inputs(), &negative_return)
            .expect_err("negative return rate must fail");
        assert_eq!(
            err,
            ValidationError::InvalidConfig("conservative return rate must be >= 0".to_string())
        );
    }

    #[test]
    fn extreme_ages_degrade_without_overflow() {
        let inputs = PlanningInputs {
            current_age: 0,
            retirement_age: 400_000_000,
            ..sample_inputs()
        };
        let results = compute(&inputs);
        assert_eq!(results.years_to_retirement, 400_000_000);
        assert_eq!(results.moderate.total_nest_egg_required_at_retirement, u64::MAX);

        let series = compute_growth_series(&inputs, &results);
        assert_eq!(series.len(), 80_000_001);
        let ages: Vec<u32> = series.iter().take(2).map(|p| p.age).collect();
        assert_eq!(ages, vec![0, 5]);

        let late = PlanningInputs {
            current_age: u32::MAX - 1,
            retirement_age: u32::MAX,
            ..sample_inputs()
        };
        let results = compute(&late);
        let points = compute_growth_series(&late, &results).to_vec();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].age, u32::MAX - 1);
    }

    #[test]
    fn config_rates_flow_through_instead_of_globals() {
        let config = EngineConfig {
            inflation_rate: 0.0,
            withdrawal_rate: 0.05,
            ..EngineConfig::default()
        };
        let results = compute_scenarios(&sample_inputs(), &config).expect("valid inputs");
        assert_eq!(results.moderate.future_monthly_income_target, 4_000);
        assert_eq!(results.moderate.total_nest_egg_required_at_retirement, 960_000);
        assert_approx(results.inflation_rate, 0.0);
    }

    #[test]
    fn growth_series_steps_every_five_years_through_retirement() {
        let inputs = sample_inputs();
        let results = compute(&inputs);
        let series = compute_growth_series(&inputs, &results);

        let years: Vec<u32> = series.iter().map(|p| p.year_offset).collect();
        assert_eq!(years, vec![0, 5, 10, 15, 20, 25, 30, 35]);
        assert_eq!(series.len(), 8);

        let points = series.to_vec();
        assert_eq!(points[0].age, 30);
        assert_eq!(points[7].age, 65);
        assert_eq!(points[0].value(ScenarioName::Moderate), Some(25_000));
        assert_eq!(points[1].value(ScenarioName::Conservative), Some(268_207));
        assert_eq!(points[7].value(ScenarioName::Moderate), Some(3_376_462));
        assert_eq!(points[7].value(ScenarioName::Aggressive), Some(3_374_900));
        assert_eq!(points[7].value(ScenarioName::Custom), None);
    }

    #[test]
    fn growth_series_stops_at_last_whole_step_before_retirement() {
        let mut inputs = sample_inputs();
        inputs.retirement_age = 63;
        let results = compute(&inputs);
        let series = compute_growth_series(&inputs, &results);

        let years: Vec<u32> = series.iter().map(|p| p.year_offset).collect();
        assert_eq!(years, vec![0, 5, 10, 15, 20, 25, 30]);
        assert_eq!(series.iter().len(), 7);
        assert_eq!(series.to_vec().last().map(|p| p.age), Some(60));
    }

    #[test]
    fn growth_series_is_restartable_and_includes_custom() {
        let mut inputs = sample_inputs();
        inputs.custom_annual_return_percent = Some(8.5);
        let results = compute(&inputs);
        let series = compute_growth_series(&inputs, &results);

        let first: Vec<_> = series.iter().collect();
        let second: Vec<_> = (&series).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first[7].value(ScenarioName::Custom), Some(3_376_092));
        assert_eq!(first[0].values.len(), 4);
    }

    #[test]
    fn growth_series_serializes_flat_points() {
        let mut inputs = sample_inputs();
        inputs.retirement_age = 34;
        let results = compute(&inputs);
        let json = serde_json::to_value(compute_growth_series(&inputs, &results))
            .expect("series should serialize");

        let points = json.as_array().expect("array of points");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0]["age"], 30);
        assert_eq!(points[0]["year"], 0);
        assert_eq!(points[0]["conservative"], 25_000);
        assert!(points[0].get("custom").is_none());
    }

    #[test]
    fn text_parsed_inputs_give_identical_results() {
        let parsed = PlanningInputs {
            current_age: "30".parse().expect("age"),
            retirement_age: "65".parse().expect("retirement"),
            current_savings: "25000".parse().expect("savings"),
            desired_monthly_income: "4000".parse().expect("income"),
            custom_annual_return_percent: None,
        };
        assert_eq!(compute(&parsed), compute(&sample_inputs()));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_results_are_deterministic_and_ordered_by_rate(
            current_age in 18u32..90,
            horizon in 1u32..50,
            savings_cents in 0u64..500_000_000,
            income in 100u32..40_000,
            custom_bp in 10u32..5_000,
        ) {
            let inputs = PlanningInputs {
                current_age,
                retirement_age: current_age + horizon,
                current_savings: savings_cents as f64 / 100.0,
                desired_monthly_income: f64::from(income),
                custom_annual_return_percent: Some(f64::from(custom_bp) / 100.0),
            };

            let first = compute(&inputs);
            let second = compute(&inputs);
            prop_assert_eq!(&first, &second);

            prop_assert!(first.aggressive.required_monthly_savings <= first.moderate.required_monthly_savings);
            prop_assert!(first.moderate.required_monthly_savings <= first.conservative.required_monthly_savings);
            prop_assert!(first.custom.is_some());

            for (_, scenario) in first.scenarios() {
                prop_assert!(scenario.progress_to_goal_percent <= 100);
                prop_assert_eq!(
                    scenario.total_nest_egg_required_at_retirement,
                    first.moderate.total_nest_egg_required_at_retirement
                );
            }

            let series = compute_growth_series(&inputs, &first);
            prop_assert_eq!(series.iter().count(), (horizon / GROWTH_STEP_YEARS) as usize + 1);
            for point in series.iter() {
                prop_assert!(point.year_offset <= horizon);
                prop_assert_eq!(point.year_offset % GROWTH_STEP_YEARS, 0);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_savings_covering_goal_need_nothing_more(
            current_age in 18u32..60,
            horizon in 1u32..40,
            income in 100u32..10_000,
        ) {
            let config = EngineConfig::default();
            let years = f64::from(horizon);
            let nest_egg = f64::from(income) * 1.03_f64.powf(years) * 12.0 / 0.04;
            let inputs = PlanningInputs {
                current_age,
                retirement_age: current_age + horizon,
                current_savings: nest_egg,
                desired_monthly_income: f64::from(income),
                custom_annual_return_percent: None,
            };

            let results = compute_scenarios(&inputs, &config).expect("valid inputs");
            for (_, scenario) in results.scenarios() {
                prop_assert_eq!(scenario.required_monthly_savings, 0);
                prop_assert_eq!(scenario.progress_to_goal_percent, 100);
            }
        }
    }
}
