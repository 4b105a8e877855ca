use super::engine::calculate_for_mode;
use super::grades::{LABOR_INSURANCE, resolve_grade};
use super::statutory_age::resolve_statutory_age;
use super::types::{CalculationResult, ClaimMode, ComparisonRow, Estimate};
use super::validation::{InputError, check_working_span};

/// Extra insured years assumed by the "keep working" scenarios.
pub const EXTENSION_YEARS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInputs {
    /// ROC calendar birth year.
    pub birth_year: Option<u32>,
    pub work_start_age: Option<u32>,
    pub retirement_age: Option<u32>,
    pub insured_years: Option<u32>,
    pub current_salary: Option<u32>,
    /// Average insured salary over the last 60 months before retiring; a table grade.
    pub projected_salary: u32,
    pub claim_mode: ClaimMode,
}

impl Default for ScenarioInputs {
    fn default() -> Self {
        Self {
            birth_year: None,
            work_start_age: None,
            retirement_age: None,
            insured_years: None,
            current_salary: None,
            projected_salary: LABOR_INSURANCE.max(),
            claim_mode: ClaimMode::Fixed,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScenarioKind {
    Current,
    Projected,
    ExtendedCurrent,
    ExtendedProjected,
}

impl ScenarioKind {
    /// Chart order.
    pub const ALL: [ScenarioKind; 4] = [
        ScenarioKind::Current,
        ScenarioKind::Projected,
        ScenarioKind::ExtendedCurrent,
        ScenarioKind::ExtendedProjected,
    ];

    /// Order of the result cards and the printed plans A to D.
    pub const CARD_ORDER: [ScenarioKind; 4] = [
        ScenarioKind::Current,
        ScenarioKind::ExtendedCurrent,
        ScenarioKind::Projected,
        ScenarioKind::ExtendedProjected,
    ];

    pub fn chart_label(self) -> &'static str {
        match self {
            ScenarioKind::Current => "目前薪資",
            ScenarioKind::Projected => "預期薪資",
            ScenarioKind::ExtendedCurrent => "續拚(原薪)",
            ScenarioKind::ExtendedProjected => "續拚(調薪)",
        }
    }

    pub fn card_title(self) -> &'static str {
        match self {
            ScenarioKind::Projected => "調薪後預估",
            other => other.chart_label(),
        }
    }

    pub fn uses_current_salary(self) -> bool {
        matches!(self, ScenarioKind::Current | ScenarioKind::ExtendedCurrent)
    }

    pub fn is_extended(self) -> bool {
        matches!(
            self,
            ScenarioKind::ExtendedCurrent | ScenarioKind::ExtendedProjected
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub kind: ScenarioKind,
    /// Insured salary fed to the calculator; 0 when no current grade is known.
    pub salary: u32,
    pub years: Option<u32>,
    pub estimate: Estimate,
}

impl Scenario {
    pub fn result_or_empty(&self) -> CalculationResult {
        self.estimate.clone().into_result_or_empty()
    }

    pub fn comparison_row(&self) -> ComparisonRow {
        ComparisonRow::from_result(self.kind.chart_label(), &self.result_or_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub statutory_age: u32,
    pub current_grade: Option<u32>,
    pub projected_salary: u32,
    /// In [`ScenarioKind::ALL`] order.
    pub scenarios: Vec<Scenario>,
    /// Advisory only; the scenarios are computed regardless.
    pub working_span_error: Option<InputError>,
}

impl ScenarioReport {
    pub fn scenario(&self, kind: ScenarioKind) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.kind == kind)
    }

    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        self.scenarios.iter().map(Scenario::comparison_row).collect()
    }

    /// False when no scenario has a statutory-age amount, in which case the chart is hidden.
    pub fn has_chart_data(&self) -> bool {
        self.comparison_rows().iter().any(|row| row.amount2 != 0)
    }
}

/// Grade for the declared current salary, or `None` while no salary applies.
pub fn current_grade(current_salary: Option<u32>) -> Option<u32> {
    current_salary
        .map(|salary| resolve_grade(f64::from(salary)))
        .filter(|&grade| grade > 0)
}

/// Builds the four independent scenario estimates.
pub fn build_scenarios(inputs: &ScenarioInputs) -> ScenarioReport {
    let statutory_age = inputs
        .birth_year
        .map(|year| resolve_statutory_age(f64::from(year)))
        .unwrap_or_else(|| resolve_statutory_age(f64::NAN));
    let current_grade = current_grade(inputs.current_salary);
    let working_span_error = check_working_span(
        inputs.work_start_age,
        inputs.retirement_age,
        inputs.insured_years,
    )
    .err();

    let scenarios = ScenarioKind::ALL
        .iter()
        .map(|&kind| evaluate_scenario(inputs, kind, current_grade))
        .collect();

    let report = ScenarioReport {
        statutory_age,
        current_grade,
        projected_salary: inputs.projected_salary,
        scenarios,
        working_span_error,
    };
    tracing::debug!(
        statutory_age,
        current_grade = ?report.current_grade,
        chart = report.has_chart_data(),
        "built scenario report"
    );
    report
}

fn evaluate_scenario(
    inputs: &ScenarioInputs,
    kind: ScenarioKind,
    current_grade: Option<u32>,
) -> Scenario {
    let salary = if kind.uses_current_salary() {
        current_grade.unwrap_or(0)
    } else {
        inputs.projected_salary
    };
    let years = if kind.is_extended() {
        inputs
            .insured_years
            .filter(|&years| years > 0)
            .and_then(|years| years.checked_add(EXTENSION_YEARS))
    } else {
        inputs.insured_years
    };

    let estimate = match years {
        Some(years) => calculate_for_mode(inputs.claim_mode, salary, years, inputs.retirement_age),
        None => Estimate::Pending,
    };

    Scenario {
        kind,
        salary,
        years,
        estimate,
    }
}
