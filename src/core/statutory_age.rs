/// Full-pension age assumed when no usable birth year is given.
pub const DEFAULT_STATUTORY_AGE: u32 = 65;

/// `(first ROC birth year, statutory age)`, ascending. Years before the first
/// listed threshold fall into the first band.
pub const STATUTORY_AGE_STEPS: [(u32, u32); 6] =
    [(0, 60), (47, 61), (48, 62), (49, 63), (50, 64), (51, 65)];

/// Statutory full-pension age for a birth year in the ROC calendar
/// (Gregorian year minus 1911).
pub fn resolve_statutory_age(roc_birth_year: f64) -> u32 {
    if roc_birth_year.is_nan() || roc_birth_year <= 0.0 {
        return DEFAULT_STATUTORY_AGE;
    }
    let year = roc_birth_year.floor();
    STATUTORY_AGE_STEPS
        .iter()
        .rev()
        .find(|(first_year, _)| year >= f64::from(*first_year))
        .map(|&(_, age)| age)
        .unwrap_or(DEFAULT_STATUTORY_AGE)
}
