use thiserror::Error;

use super::grades::LABOR_INSURANCE;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("預計退休年紀必須大於開始工作年紀")]
    RetirementNotAfterWorkStart {
        work_start_age: u32,
        retirement_age: u32,
    },

    #[error("投保年資 ({insured_years}年) 不可大於工作期間 ({span}年)")]
    InsuredYearsExceedSpan { insured_years: u32, span: u32 },

    #[error("預計投保薪資 {0} 不是勞保投保級距")]
    UnknownProjectedGrade(u32),
}

/// Checks that the insured years fit between starting work and retiring.
/// Only runs once all three values are known.
pub fn check_working_span(
    work_start_age: Option<u32>,
    retirement_age: Option<u32>,
    insured_years: Option<u32>,
) -> Result<(), InputError> {
    let (Some(work_start_age), Some(retirement_age), Some(insured_years)) =
        (work_start_age, retirement_age, insured_years)
    else {
        return Ok(());
    };

    if retirement_age <= work_start_age {
        return Err(InputError::RetirementNotAfterWorkStart {
            work_start_age,
            retirement_age,
        });
    }
    let span = retirement_age - work_start_age;
    if insured_years > span {
        return Err(InputError::InsuredYearsExceedSpan {
            insured_years,
            span,
        });
    }
    Ok(())
}

/// The projected salary is picked from the grade list, so anything else is rejected.
pub fn check_projected_grade(projected_salary: u32) -> Result<(), InputError> {
    if LABOR_INSURANCE.contains(projected_salary) {
        Ok(())
    } else {
        Err(InputError::UnknownProjectedGrade(projected_salary))
    }
}
