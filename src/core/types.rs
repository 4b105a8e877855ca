use serde::Serialize;

/// One claim-age payout for a single scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionOption {
    pub age: u32,
    pub amount: u64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_label: Option<String>,
}

impl PensionOption {
    fn empty() -> Self {
        Self {
            age: 0,
            amount: 0,
            label: String::new(),
            sub_label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub option1: PensionOption,
    pub option2: PensionOption,
    pub total_years: f64,
}

impl CalculationResult {
    /// Zeroed result with blank labels, shown while inputs are incomplete.
    pub fn empty() -> Self {
        Self {
            option1: PensionOption::empty(),
            option2: PensionOption::empty(),
            total_years: 0.0,
        }
    }
}

/// Outcome of one calculator call.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    /// Salary or years missing, unparseable or not positive.
    Pending,
    Ready(CalculationResult),
}

impl Estimate {
    pub fn is_pending(&self) -> bool {
        matches!(self, Estimate::Pending)
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            Estimate::Pending => None,
            Estimate::Ready(result) => Some(result),
        }
    }

    pub fn into_result_or_empty(self) -> CalculationResult {
        match self {
            Estimate::Pending => CalculationResult::empty(),
            Estimate::Ready(result) => result,
        }
    }

    pub fn status(&self) -> EstimateStatus {
        match self {
            Estimate::Pending => EstimateStatus::Pending,
            Estimate::Ready(_) => EstimateStatus::Ready,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateStatus {
    Pending,
    Ready,
}

/// Which pair of claim ages the calculator compares.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ClaimMode {
    /// Age 60 against age 65, ignoring any planned retirement age.
    #[default]
    Fixed,
    /// The planned retirement age against five years later.
    PlannedAge,
}

/// Flattened scenario row for the comparison chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub scenario: String,
    pub amount1: u64,
    pub amount2: u64,
    pub label1: String,
    pub label2: String,
}

impl ComparisonRow {
    pub fn from_result(scenario: &str, result: &CalculationResult) -> Self {
        Self {
            scenario: scenario.to_string(),
            amount1: result.option1.amount,
            amount2: result.option2.amount,
            label1: result.option1.label.clone(),
            label2: result.option2.label.clone(),
        }
    }
}
