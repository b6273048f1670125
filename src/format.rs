//! Display formatting for amounts and dates. Stored values are never
//! rounded; rounding happens here only.

use bigdecimal::{BigDecimal, Signed};
use chrono::NaiveDate;

/// Formats an amount as US dollars: `$1,234.57`, `-$0.50`.
pub fn format_currency(value: &BigDecimal) -> String {
    // Half-up on the magnitude; `with_scale` truncates.
    let half_cent = BigDecimal::new(5.into(), 3);
    let (cents, _) = (value.abs() + half_cent)
        .with_scale(2)
        .as_bigint_and_exponent();

    let mut digits = cents.to_string();
    let negative = value.is_negative() && digits.chars().any(|c| c != '0');
    while digits.len() < 3 {
        digits.insert(0, '0');
    }
    let (whole, fraction) = digits.split_at(digits.len() - 2);

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{fraction}")
}

/// Formats a date the way invoice lists show it: `Sep 15, 2023`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn currency(raw: &str) -> String {
        format_currency(&BigDecimal::from_str(raw).unwrap())
    }

    #[test]
    fn currency_uses_two_decimals() {
        assert_eq!(currency("0"), "$0.00");
        assert_eq!(currency("3.6"), "$3.60");
        assert_eq!(currency("0.05"), "$0.05");
        assert_eq!(currency("20"), "$20.00");
    }

    #[test]
    fn currency_rounds_half_up() {
        assert_eq!(currency("53.9964"), "$54.00");
        assert_eq!(currency("0.125"), "$0.13");
        assert_eq!(currency("0.0018"), "$0.00");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency("999.99"), "$999.99");
        assert_eq!(currency("3008.9174"), "$3,008.92");
        assert_eq!(currency("1234567.891"), "$1,234,567.89");
    }

    #[test]
    fn currency_negative() {
        assert_eq!(currency("-0.5"), "-$0.50");
        assert_eq!(currency("-1500"), "-$1,500.00");
    }

    #[test]
    fn date_short_month() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 5).unwrap();
        assert_eq!(format_date(date), "Sep 5, 2023");
    }
}
