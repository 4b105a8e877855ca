mod engine;
mod format;
mod grades;
mod report;
mod scenarios;
mod statutory_age;
mod types;
mod validation;

pub use engine::{
    ACCRUAL_RATE, EARLIEST_CLAIM_AGE, RawNumber, STATUTORY_CLAIM_AGE, calculate_for_mode,
    calculate_pension, calculate_pension_at_age, claim_age_factor,
};
pub use format::{format_currency, format_grouped, format_monthly};
pub use grades::{
    GradeTable, GradeTableError, LABOR_INSURANCE, LABOR_INSURANCE_GRADES, resolve_grade,
};
pub use report::render_report;
pub use scenarios::{
    EXTENSION_YEARS, Scenario, ScenarioInputs, ScenarioKind, ScenarioReport, build_scenarios,
    current_grade,
};
pub use statutory_age::{DEFAULT_STATUTORY_AGE, resolve_statutory_age};
pub use types::{
    CalculationResult, ClaimMode, ComparisonRow, Estimate, EstimateStatus, PensionOption,
};
pub use validation::{InputError, check_projected_grade, check_working_span};
