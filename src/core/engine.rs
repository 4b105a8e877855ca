use super::types::{CalculationResult, ClaimMode, Estimate, PensionOption};

/// Pension accrual per insured year, as a share of the insured salary.
pub const ACCRUAL_RATE: f64 = 0.0155;
pub const EARLIEST_CLAIM_AGE: u32 = 60;
pub const STATUTORY_CLAIM_AGE: u32 = 65;
/// Flat reduction at the earliest claim age: 4% for each of the 5 early years.
pub const EARLY_CLAIM_FACTOR: f64 = 0.8;
pub const ADJUSTMENT_PER_YEAR: f64 = 0.04;
pub const MAX_ADJUSTMENT_YEARS: i64 = 5;
/// Gap between the two options of the planned-age comparison.
pub const DEFERRAL_YEARS: u32 = 5;

/// Input that may or may not hold a usable number: already-parsed values or raw form text.
pub trait RawNumber {
    fn to_number(&self) -> Option<f64>;
}

impl RawNumber for f64 {
    fn to_number(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl RawNumber for u32 {
    fn to_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl RawNumber for i64 {
    fn to_number(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl RawNumber for str {
    fn to_number(&self) -> Option<f64> {
        let normalized = self.trim().replace(',', "");
        if normalized.is_empty() {
            return None;
        }
        match normalized.parse::<f64>() {
            Ok(value) => value.to_number(),
            Err(e) => {
                tracing::debug!(input = %self, "ignoring non-numeric input: {}", e);
                None
            }
        }
    }
}

impl RawNumber for String {
    fn to_number(&self) -> Option<f64> {
        self.as_str().to_number()
    }
}

impl<T: RawNumber> RawNumber for Option<T> {
    fn to_number(&self) -> Option<f64> {
        self.as_ref().and_then(RawNumber::to_number)
    }
}

impl<T: RawNumber + ?Sized> RawNumber for &T {
    fn to_number(&self) -> Option<f64> {
        (**self).to_number()
    }
}

/// Monthly pension before any claim-age adjustment.
pub fn base_amount(salary: f64, years: f64) -> f64 {
    salary * years * ACCRUAL_RATE
}

/// Payout multiplier for claiming at `age`: 4% per year away from 65, capped at 5 years.
pub fn claim_age_factor(age: u32) -> f64 {
    let diff = (i64::from(age) - i64::from(STATUTORY_CLAIM_AGE))
        .clamp(-MAX_ADJUSTMENT_YEARS, MAX_ADJUSTMENT_YEARS);
    1.0 + diff as f64 * ADJUSTMENT_PER_YEAR
}

fn round_amount(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

fn positive_inputs(salary: impl RawNumber, years: impl RawNumber) -> Option<(f64, f64)> {
    let salary = salary.to_number()?;
    let years = years.to_number()?;
    (salary > 0.0 && years > 0.0).then_some((salary, years))
}

/// Compares claiming at 60 (20% reduction) with claiming at 65 (full amount).
pub fn calculate_pension(salary: impl RawNumber, years: impl RawNumber) -> Estimate {
    let Some((salary, years)) = positive_inputs(salary, years) else {
        return Estimate::Pending;
    };
    let base = base_amount(salary, years);

    Estimate::Ready(CalculationResult {
        option1: PensionOption {
            age: EARLIEST_CLAIM_AGE,
            amount: round_amount(base * EARLY_CLAIM_FACTOR),
            label: format!("{EARLIEST_CLAIM_AGE}歲請領"),
            sub_label: Some("(提前5年請領，減給20%)".to_string()),
        },
        option2: PensionOption {
            age: STATUTORY_CLAIM_AGE,
            amount: round_amount(base),
            label: format!("{STATUTORY_CLAIM_AGE}歲請領"),
            sub_label: Some("(法定請領年齡，全額給付)".to_string()),
        },
        total_years: years,
    })
}

/// Compares retiring at the planned age with drawing five years later.
///
/// A planned age below 60 is shown as given, but its amount is computed as if
/// drawn at 60, the earliest age payments can start. A missing planned age
/// counts as 60.
pub fn calculate_pension_at_age(
    salary: impl RawNumber,
    years: impl RawNumber,
    planned_age: impl RawNumber,
) -> Estimate {
    let Some((salary, years)) = positive_inputs(salary, years) else {
        return Estimate::Pending;
    };
    let planned_age = planned_age
        .to_number()
        .map(f64::trunc)
        .filter(|age| *age >= 1.0 && *age <= f64::from(u32::MAX))
        .map(|age| age as u32)
        .unwrap_or(EARLIEST_CLAIM_AGE);
    let start_age = planned_age.max(EARLIEST_CLAIM_AGE);
    let deferred_age = start_age.saturating_add(DEFERRAL_YEARS);
    let base = base_amount(salary, years);

    Estimate::Ready(CalculationResult {
        option1: PensionOption {
            age: planned_age,
            amount: round_amount(base * claim_age_factor(start_age)),
            label: format!("{planned_age}歲退休"),
            sub_label: (planned_age < EARLIEST_CLAIM_AGE)
                .then(|| format!("(依規定{start_age}歲起領)")),
        },
        option2: PensionOption {
            age: deferred_age,
            amount: round_amount(base * claim_age_factor(deferred_age)),
            label: format!("{deferred_age}歲"),
            sub_label: Some("(往後+5年)".to_string()),
        },
        total_years: years,
    })
}

/// Runs the calculator selected by `mode`. `planned_age` is only read in
/// [`ClaimMode::PlannedAge`].
pub fn calculate_for_mode(
    mode: ClaimMode,
    salary: impl RawNumber,
    years: impl RawNumber,
    planned_age: impl RawNumber,
) -> Estimate {
    match mode {
        ClaimMode::Fixed => calculate_pension(salary, years),
        ClaimMode::PlannedAge => calculate_pension_at_age(salary, years, planned_age),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn ready(estimate: Estimate) -> CalculationResult {
        match estimate {
            Estimate::Ready(result) => result,
            Estimate::Pending => panic!("expected a computed result"),
        }
    }

    #[test]
    fn non_positive_inputs_are_pending() {
        assert!(calculate_pension(0.0, 30.0).is_pending());
        assert!(calculate_pension(30_000.0, 0.0).is_pending());
        assert!(calculate_pension(-1.0, 30.0).is_pending());
        assert!(calculate_pension("30000", "-5").is_pending());
    }

    #[test]
    fn unparseable_inputs_are_pending() {
        assert!(calculate_pension("", "30").is_pending());
        assert!(calculate_pension("abc", "30").is_pending());
        assert!(calculate_pension("30000", "   ").is_pending());
        assert!(calculate_pension(f64::NAN, 30.0).is_pending());
        assert!(calculate_pension(None::<u32>, 30u32).is_pending());
    }

    #[test]
    fn pending_flattens_to_empty_sentinel() {
        let result = calculate_pension(0.0, 30.0).into_result_or_empty();
        assert_eq!(result.option1.amount, 0);
        assert_eq!(result.option2.amount, 0);
        assert_eq!(result.option1.label, "");
        assert_eq!(result.option2.label, "");
        assert_eq!(result.option1.age, 0);
        assert_eq!(result.total_years, 0.0);
        assert_eq!(result, CalculationResult::empty());
    }

    #[test]
    fn thirty_years_at_30000() {
        let result = ready(calculate_pension(30_000.0, 30.0));
        assert_eq!(result.option1.age, 60);
        assert_eq!(result.option1.amount, 11_160);
        assert_eq!(result.option2.age, 65);
        assert_eq!(result.option2.amount, 13_950);
        assert_eq!(result.total_years, 30.0);
        assert_eq!(result.option1.label, "60歲請領");
        assert_eq!(result.option2.label, "65歲請領");
        assert!(result.option1.sub_label.is_some());
        assert!(result.option2.sub_label.is_some());
    }

    #[test]
    fn top_grade_thirty_five_years_rounds_to_nearest() {
        // 45800 * 35 * 1.55% = 24846.5
        let result = ready(calculate_pension(45_800.0, 35.0));
        assert_eq!(result.option1.amount, 19_877);
        assert_eq!(result.option2.amount, 24_847);
    }

    #[test]
    fn string_inputs_match_numeric_inputs() {
        assert_eq!(
            calculate_pension("30000", "30"),
            calculate_pension(30_000.0, 30.0)
        );
        assert_eq!(
            calculate_pension(" 30,000 ", String::from("30")),
            calculate_pension(30_000u32, 30u32)
        );
    }

    #[test]
    fn total_years_echoes_parsed_value() {
        let result = ready(calculate_pension("45800", "12.5"));
        assert_eq!(result.total_years, 12.5);
    }

    #[test]
    fn claim_age_factor_is_capped_at_five_years() {
        assert!((claim_age_factor(60) - 0.8).abs() < 1e-12);
        assert!((claim_age_factor(55) - 0.8).abs() < 1e-12);
        assert!((claim_age_factor(65) - 1.0).abs() < 1e-12);
        assert!((claim_age_factor(67) - 1.08).abs() < 1e-12);
        assert!((claim_age_factor(70) - 1.2).abs() < 1e-12);
        assert!((claim_age_factor(80) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn planned_age_mode_compares_planned_age_with_five_years_later() {
        let result = ready(calculate_pension_at_age(30_000.0, 30.0, 62u32));
        assert_eq!(result.option1.age, 62);
        assert_eq!(result.option1.label, "62歲退休");
        assert_eq!(result.option1.sub_label, None);
        // 13950 * 0.88
        assert_eq!(result.option1.amount, 12_276);
        assert_eq!(result.option2.age, 67);
        assert_eq!(result.option2.label, "67歲");
        assert_eq!(result.option2.sub_label.as_deref(), Some("(往後+5年)"));
        // 13950 * 1.08
        assert_eq!(result.option2.amount, 15_066);
    }

    #[test]
    fn planned_age_below_60_is_drawn_from_60() {
        let result = ready(calculate_pension_at_age("30000", "30", "55"));
        assert_eq!(result.option1.age, 55);
        assert_eq!(result.option1.label, "55歲退休");
        assert_eq!(result.option1.sub_label.as_deref(), Some("(依規定60歲起領)"));
        assert_eq!(result.option1.amount, 11_160);
        assert_eq!(result.option2.age, 65);
        assert_eq!(result.option2.amount, 13_950);
    }

    #[test]
    fn missing_planned_age_counts_as_60() {
        let blank = ready(calculate_pension_at_age("30000", "30", ""));
        let zero = ready(calculate_pension_at_age("30000", "30", 0u32));
        assert_eq!(blank.option1.age, 60);
        assert_eq!(blank.option2.age, 65);
        assert_eq!(blank, zero);
    }

    #[test]
    fn planned_age_mode_shares_pending_rule() {
        assert!(calculate_pension_at_age("", "30", "60").is_pending());
        assert!(calculate_pension_at_age("30000", "0", "60").is_pending());
    }

    #[test]
    fn planned_age_at_the_integer_limit_is_capped_not_wrapped() {
        let result = ready(calculate_pension_at_age("30000", "30", "4294967295"));
        assert_eq!(result.option1.age, u32::MAX);
        assert_eq!(result.option2.age, u32::MAX);
        // both ages sit past the five-year deferral cap: 13950 * 1.2
        assert_eq!(result.option1.amount, 16_740);
        assert_eq!(result.option2.amount, 16_740);
    }

    #[test]
    fn fixed_mode_ignores_planned_age() {
        let at_55 = calculate_for_mode(ClaimMode::Fixed, 30_000.0, 30.0, 55u32);
        let at_70 = calculate_for_mode(ClaimMode::Fixed, 30_000.0, 30.0, 70u32);
        assert_eq!(at_55, at_70);
        assert_eq!(at_55, calculate_pension(30_000.0, 30.0));
    }

    proptest! {
        #[test]
        fn prop_statutory_option_never_below_early_option(
            salary in 1u32..200_000,
            years in 1u32..60
        ) {
            let result = ready(calculate_pension(salary, years));
            prop_assert!(result.option2.amount >= result.option1.amount);
        }

        #[test]
        fn prop_calculation_is_idempotent(
            salary in 0.01f64..100_000.0,
            years in 0.01f64..60.0
        ) {
            let first = calculate_pension(salary, years);
            let second = calculate_pension(salary, years);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_deferred_option_never_below_planned_option(
            salary in 1u32..100_000,
            years in 1u32..50,
            planned_age in 1u32..80
        ) {
            let result = ready(calculate_pension_at_age(salary, years, planned_age));
            prop_assert!(result.option2.amount >= result.option1.amount);
            prop_assert_eq!(result.option2.age, planned_age.max(60) + 5);
        }
    }
}
