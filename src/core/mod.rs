mod chart;
mod config;
mod engine;
mod error;
mod insights;
mod types;

pub use chart::savings_chart;
pub use config::{
    DEFAULT_INFLATION_RATE, DEFAULT_WITHDRAWAL_RATE, EngineConfig, FixedScenarioRates,
    ScenarioDescriptor,
};
pub use engine::{
    GROWTH_STEP_YEARS, GrowthPoints, GrowthSeries, compute_growth_series, compute_scenarios,
};
pub use error::ValidationError;
pub use insights::derive_insights;
pub use types::{
    GrowthPoint, Insight, InsightKind, PlanningInputs, ProjectionResultSet, SavingsBar,
    ScenarioName, ScenarioResult,
};
