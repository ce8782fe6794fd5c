//! Presentation helpers for rupee amounts

use bigdecimal::num_bigint::Sign;
use bigdecimal::{BigDecimal, RoundingMode};

/// Round to at most 2 decimal places (half up) for display
pub fn round_for_display(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// Format an amount with Indian digit grouping and at most 2 fraction digits.
///
/// ```rust
/// use billing_core::format::format_inr;
/// use bigdecimal::BigDecimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_inr(&BigDecimal::from(1234567)), "12,34,567");
/// assert_eq!(format_inr(&BigDecimal::from_str("778.50").unwrap()), "778.5");
/// ```
pub fn format_inr(amount: &BigDecimal) -> String {
    let (paise, _) = round_for_display(amount).as_bigint_and_exponent();
    let negative = paise.sign() == Sign::Minus;

    // Digits of the absolute amount in paise, at least "0.00"
    let digits = format!("{:0>3}", paise.magnitude().to_string());
    let (integer, fraction) = digits.split_at(digits.len() - 2);
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = group_indian(integer);
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format an amount with the rupee sign, e.g. `₹10,207`
pub fn format_rupees(amount: &BigDecimal) -> String {
    format!("₹{}", format_inr(amount))
}

/// Group digits as 3 then 2s from the right: 1234567 -> 12,34,567
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}

/// Capitalise the first letter of every word
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
