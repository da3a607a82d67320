use thiserror::Error;

/// The only failure the projection engine reports. Raised before any output
/// is produced, so callers never see a partially populated result set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("retirement age must exceed current age (current {current_age}, retirement {retirement_age})")]
    RetirementNotAfterCurrent {
        current_age: u32,
        retirement_age: u32,
    },
    #[error("desired monthly income must be positive (got {desired_monthly_income})")]
    NonPositiveIncome { desired_monthly_income: f64 },
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}
