/// Formats whole New Taiwan dollars the way the zh-TW locale displays them, e.g. `$13,950`.
pub fn format_currency(amount: i64) -> String {
    let grouped = format_grouped(amount.unsigned_abs());
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Same as [`format_currency`] with a trailing per-month marker.
pub fn format_monthly(amount: u64) -> String {
    format!("${}/月", format_grouped(amount))
}

/// Digits with comma thousands separators, e.g. `36,300`.
pub fn format_grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_amounts_have_no_separator() {
        assert_eq!(format_currency(0), "$0");
        assert_eq!(format_currency(7), "$7");
        assert_eq!(format_currency(999), "$999");
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_currency(1_000), "$1,000");
        assert_eq!(format_currency(13_950), "$13,950");
        assert_eq!(format_currency(45_800), "$45,800");
        assert_eq!(format_currency(1_234_567), "$1,234,567");
    }

    #[test]
    fn negative_amounts_lead_with_minus() {
        assert_eq!(format_currency(-11_160), "-$11,160");
        assert_eq!(format_currency(i64::MIN), "-$9,223,372,036,854,775,808");
    }

    #[test]
    fn grouped_without_symbol() {
        assert_eq!(format_grouped(36_300), "36,300");
        assert_eq!(format_grouped(100), "100");
    }

    #[test]
    fn monthly_suffix() {
        assert_eq!(format_monthly(19_878), "$19,878/月");
    }
}
