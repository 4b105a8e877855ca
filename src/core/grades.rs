use thiserror::Error;

/// Labor insurance monthly salary grades, capped at 45,800 for old-age pension purposes.
pub const LABOR_INSURANCE_GRADES: [u32; 13] = [
    27_470, 27_600, 28_800, 30_300, 31_800, 33_300, 34_800, 36_300, 38_200, 40_100, 42_000,
    43_900, 45_800,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradeTableError {
    #[error("grade table must contain at least one grade")]
    Empty,
    #[error("grade {value} at position {index} is not above the previous grade")]
    NotAscending { index: usize, value: u32 },
}

/// Ordered salary bracket ceilings. Always non-empty and strictly ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeTable {
    grades: &'static [u32],
}

pub const LABOR_INSURANCE: GradeTable = GradeTable {
    grades: &LABOR_INSURANCE_GRADES,
};

impl GradeTable {
    pub fn new(grades: &'static [u32]) -> Result<Self, GradeTableError> {
        if grades.is_empty() {
            return Err(GradeTableError::Empty);
        }
        for (index, pair) in grades.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(GradeTableError::NotAscending {
                    index: index + 1,
                    value: pair[1],
                });
            }
        }
        Ok(Self { grades })
    }

    pub fn grades(&self) -> &'static [u32] {
        self.grades
    }

    pub fn max(&self) -> u32 {
        self.grades[self.grades.len() - 1]
    }

    pub fn contains(&self, grade: u32) -> bool {
        self.grades.binary_search(&grade).is_ok()
    }

    /// Smallest grade at or above `salary`, capped at the top grade.
    /// Non-positive and NaN salaries resolve to 0, meaning no grade applies.
    pub fn resolve(&self, salary: f64) -> u32 {
        if salary.is_nan() || salary <= 0.0 {
            return 0;
        }
        self.grades
            .iter()
            .copied()
            .find(|&grade| f64::from(grade) >= salary)
            .unwrap_or_else(|| self.max())
    }
}

pub fn resolve_grade(salary: f64) -> u32 {
    LABOR_INSURANCE.resolve(salary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    #[test]
    fn non_positive_salary_has_no_grade() {
        assert_eq!(resolve_grade(0.0), 0);
        assert_eq!(resolve_grade(-1.0), 0);
        assert_eq!(resolve_grade(-50_000.0), 0);
        assert_eq!(resolve_grade(f64::NAN), 0);
    }

    #[test]
    fn exact_grade_resolves_to_itself() {
        assert_eq!(resolve_grade(27_470.0), 27_470);
        assert_eq!(resolve_grade(45_800.0), 45_800);
    }

    #[test]
    fn salary_between_grades_rounds_up_to_next_grade() {
        assert_eq!(resolve_grade(27_471.0), 27_600);
        assert_eq!(resolve_grade(36_000.0), 36_300);
        assert_eq!(resolve_grade(0.5), 27_470);
    }

    #[test]
    fn salary_above_table_is_capped() {
        assert_eq!(resolve_grade(45_801.0), 45_800);
        assert_eq!(resolve_grade(50_000.0), 45_800);
        assert_eq!(resolve_grade(f64::INFINITY), 45_800);
    }

    #[test]
    fn builtin_table_passes_checked_constructor() {
        let table = GradeTable::new(&LABOR_INSURANCE_GRADES).expect("valid table");
        assert_eq!(table, LABOR_INSURANCE);
        assert_eq!(table.max(), 45_800);
        assert!(table.contains(38_200));
        assert!(!table.contains(38_000));
    }

    #[test]
    fn checked_constructor_rejects_bad_tables() {
        static EMPTY: [u32; 0] = [];
        static FLAT: [u32; 3] = [100, 200, 200];
        assert_eq!(GradeTable::new(&EMPTY), Err(GradeTableError::Empty));
        assert_eq!(
            GradeTable::new(&FLAT),
            Err(GradeTableError::NotAscending {
                index: 2,
                value: 200
            })
        );
    }

    proptest! {
        #[test]
        fn prop_resolve_grade_is_monotonic(a in -10_000.0f64..80_000.0, b in -10_000.0f64..80_000.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(resolve_grade(low) <= resolve_grade(high));
        }

        #[test]
        fn prop_positive_salary_maps_to_table_grade(salary in 0.01f64..200_000.0) {
            let grade = resolve_grade(salary);
            prop_assert!(LABOR_INSURANCE.contains(grade));
            if salary <= f64::from(LABOR_INSURANCE.max()) {
                prop_assert!(f64::from(grade) >= salary);
            } else {
                prop_assert_eq!(grade, LABOR_INSURANCE.max());
            }
        }
    }
}
