use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub const MIN_COMPENSATION: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
pub const MAX_COMPENSATION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// 只保留數字與一個小數點，小數最多兩位；開頭的 `.` 補成 `0.`
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut seen_dot = false;
    let mut fraction_digits = 0;

    for c in raw.chars() {
        match c {
            '0'..='9' if seen_dot => {
                if fraction_digits < 2 {
                    out.push(c);
                    fraction_digits += 1;
                }
            }
            '0'..='9' => out.push(c),
            '.' if seen_dot => break,
            '.' => {
                seen_dot = true;
                out.push(c);
            }
            _ => {}
        }
    }

    if out.starts_with('.') {
        out.insert(0, '0');
    }
    out
}

/// Sanitizes then coerces to an amount. Empty input is a required-field
/// error, never zero.
pub fn parse(raw: &str) -> Result<Decimal, String> {
    let sanitized = sanitize(raw);
    let digits = sanitized.trim_end_matches('.');
    if digits.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }

    let amount = Decimal::from_str(digits).map_err(|_| "Enter a valid amount".to_string())?;
    check_amount(amount)
}

/// Bounds and precision on an already-typed amount, e.g. one read back
/// from a stored draft. Sign is kept, unlike `parse`.
pub fn check_amount(amount: Decimal) -> Result<Decimal, String> {
    if amount < MIN_COMPENSATION {
        return Err("Must be at least $5".to_string());
    }
    if amount > MAX_COMPENSATION {
        return Err("Must be at most $1,000,000".to_string());
    }
    if amount.normalize().scale() > 2 {
        return Err("Use at most two decimal places".to_string());
    }
    Ok(amount)
}

/// Display form used when the field loses focus or is re-opened.
pub fn format(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("12.345abc"), "12.34");
        assert_eq!(sanitize("$1,250.5"), "1250.5");
        assert_eq!(sanitize("1.2.3"), "1.2");
        assert_eq!(sanitize(".75"), "0.75");
        assert_eq!(sanitize("abc"), "");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_empty_input_is_required_not_zero() {
        assert_eq!(parse("").unwrap_err(), REQUIRED_MESSAGE);
        assert_eq!(parse("usd").unwrap_err(), REQUIRED_MESSAGE);
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!(parse("12.345abc").unwrap(), Decimal::new(1234, 2));
        assert_eq!(parse("5").unwrap(), Decimal::new(5, 0));
        assert_eq!(parse("12.").unwrap(), Decimal::new(12, 0));
        assert!(parse("4.99").is_err());
        assert!(parse("1000000.01").is_err());
        assert_eq!(parse("1000000").unwrap(), MAX_COMPENSATION);
    }

    #[test]
    fn test_check_amount_keeps_sign_and_precision() {
        assert_eq!(check_amount(Decimal::new(-50, 0)).unwrap_err(), "Must be at least $5");
        assert!(check_amount(Decimal::new(499, 2)).is_err());
        assert!(check_amount(Decimal::new(100000001, 2)).is_err());
        assert!(check_amount(Decimal::new(12345, 3)).is_err());
        // 尾端的 0 不算精度
        assert_eq!(check_amount(Decimal::new(12500, 3)).unwrap(), Decimal::new(12500, 3));
    }

    #[test]
    fn test_format_two_decimals() {
        assert_eq!(format(Decimal::new(12, 0)), "12.00");
        assert_eq!(format(Decimal::new(12345, 3)), "12.35");
    }
}
