//! Display formatting for rupee amounts and percentages

use rust_decimal::{Decimal, RoundingStrategy};

pub const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount as rupees with Indian digit grouping, e.g. `₹ 12,34,567.50`
pub fn format_currency(amount: Decimal) -> String {
    if amount.is_zero() {
        return format!("{CURRENCY_SYMBOL} 0.00");
    }
    format!("{CURRENCY_SYMBOL} {}", format_indian_number(amount, 2))
}

/// Format a fraction as a percentage with two decimals, e.g. `0.1523` -> `15.23%`
pub fn format_percentage(value: Decimal) -> String {
    match value.checked_mul(Decimal::ONE_HUNDRED) {
        Some(pct) => format!("{:.2}%", round(pct, 2)),
        // Too large to scale: shift the whole part by two digits
        None => format!("{}00.00%", round(value, 0)),
    }
}

/// Group the integer part the Indian way: the last three digits form one
/// group, the remaining digits are grouped in pairs from the right.
pub fn format_indian_number(amount: Decimal, decimals: u32) -> String {
    let rounded = round(amount, decimals);
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let digits = format!("{:.*}", decimals as usize, rounded.abs());

    match digits.split_once('.') {
        Some((integer, fraction)) => format!("{sign}{}.{fraction}", group_indian(integer)),
        None => format!("{sign}{}", group_indian(&digits)),
    }
}

fn group_indian(integer: &str) -> String {
    if integer.len() <= 3 {
        return integer.to_string();
    }

    let (head, last_three) = integer.split_at(integer.len() - 3);
    let mut groups = Vec::new();
    let mut remaining = head;
    while remaining.len() > 2 {
        let (rest, pair) = remaining.split_at(remaining.len() - 2);
        groups.push(pair);
        remaining = rest;
    }
    if !remaining.is_empty() {
        groups.push(remaining);
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}

/// Half away from zero, with negative zero normalised away.
fn round(value: Decimal, decimals: u32) -> Decimal {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn currency_zero() {
        assert_eq!(format_currency(Decimal::ZERO), "₹ 0.00");
        assert_eq!(format_currency(dec!(0.00)), "₹ 0.00");
    }

    #[test]
    fn currency_indian_grouping() {
        assert_eq!(format_currency(dec!(1234567.5)), "₹ 12,34,567.50");
        assert_eq!(format_currency(dec!(100000)), "₹ 1,00,000.00");
        assert_eq!(format_currency(dec!(105000)), "₹ 1,05,000.00");
        assert_eq!(format_currency(dec!(123456789)), "₹ 12,34,56,789.00");
    }

    #[test]
    fn currency_small_amounts() {
        assert_eq!(format_currency(dec!(5)), "₹ 5.00");
        assert_eq!(format_currency(dec!(999.999)), "₹ 1,000.00");
        assert_eq!(format_currency(dec!(12.345)), "₹ 12.35");
    }

    #[test]
    fn currency_negative_keeps_grouping() {
        assert_eq!(format_currency(dec!(-12345)), "₹ -12,345.00");
        assert_eq!(format_currency(dec!(-123456)), "₹ -1,23,456.00");
    }

    #[test]
    fn indian_number_without_decimals() {
        assert_eq!(format_indian_number(dec!(2500000), 0), "25,00,000");
        assert_eq!(format_indian_number(dec!(-50000.4), 0), "-50,000");
        assert_eq!(format_indian_number(dec!(999), 0), "999");
    }

    #[test]
    fn percentage_two_decimals() {
        assert_eq!(format_percentage(dec!(0.1523)), "15.23%");
        assert_eq!(format_percentage(dec!(0)), "0.00%");
        assert_eq!(format_percentage(dec!(1)), "100.00%");
        assert_eq!(format_percentage(dec!(-0.05)), "-5.00%");
        assert_eq!(format_percentage(dec!(0.123456)), "12.35%");
    }

    #[test]
    fn percentage_beyond_decimal_range() {
        let huge = Decimal::from_scientific("1e27").unwrap();
        assert_eq!(format_percentage(huge), format!("1{}00.00%", "0".repeat(27)));
        assert_eq!(format_percentage(-huge), format!("-1{}00.00%", "0".repeat(27)));
    }

    #[test]
    fn percentage_tiny_negative_is_not_negative_zero() {
        assert_eq!(format_percentage(dec!(-0.00001)), "0.00%");
    }
}
