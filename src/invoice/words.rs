//! Amount-in-words rendering in the Indian numbering system
//!
//! An amount is split into crore, lakh, thousand, hundred and tens-and-units
//! segments (2-2-2-1-2 digits of the zero-padded 9 digit form) and each
//! non-zero segment is spelled out followed by its label.

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive, Zero};

use super::{InvoiceError, InvoiceResult};

/// Largest amount that can be spelled out (one less than ten crore)
pub const MAX_WORDS_AMOUNT: u64 = 999_999_999;

const ONES: [&str; 20] = [
    "",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Labelled segments from most to least significant, as (divisor, modulus, label)
const SEGMENTS: [(u64, u64, &str); 4] = [
    (10_000_000, 100, "crore"),
    (100_000, 100, "lakh"),
    (1_000, 100, "thousand"),
    (100, 10, "hundred"),
];

/// Spell out a value in 0..=99. Zero yields no words.
fn two_digit_words(value: u64, out: &mut Vec<&'static str>) {
    match value {
        0 => {}
        1..=19 => out.push(ONES[value as usize]),
        _ => {
            out.push(TENS[(value / 10) as usize]);
            if value % 10 != 0 {
                out.push(ONES[(value % 10) as usize]);
            }
        }
    }
}

/// Convert a whole rupee amount into lower-case English words.
///
/// `0` renders as the empty string; amounts above [`MAX_WORDS_AMOUNT`] are
/// rejected instead of being truncated.
///
/// ```rust
/// use billing_core::to_words;
///
/// assert_eq!(to_words(10207).unwrap(), "ten thousand two hundred and seven");
/// assert_eq!(to_words(2_00_00_000).unwrap(), "two crore");
/// ```
pub fn to_words(amount: u64) -> InvoiceResult<String> {
    if amount > MAX_WORDS_AMOUNT {
        return Err(InvoiceError::AmountOutOfRange {
            amount: amount.to_string(),
            max: MAX_WORDS_AMOUNT,
        });
    }

    let mut words: Vec<&'static str> = Vec::new();

    for (divisor, modulus, label) in SEGMENTS {
        let segment = (amount / divisor) % modulus;
        if segment != 0 {
            two_digit_words(segment, &mut words);
            words.push(label);
        }
    }

    let units = amount % 100;
    if units != 0 {
        if !words.is_empty() {
            words.push("and");
        }
        two_digit_words(units, &mut words);
    }

    Ok(words.join(" "))
}

/// Round a monetary amount to whole rupees, half away from zero
pub fn round_to_rupees(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(0, RoundingMode::HalfUp)
}

/// Render a grand total as the printed words line, e.g. `"one hundred rupees only"`.
///
/// The total is rounded to whole rupees first. A zero total is written out as
/// `"zero rupees only"` so the printed invoice never carries a blank line.
pub fn amount_in_words(total: &BigDecimal) -> InvoiceResult<String> {
    let rounded = round_to_rupees(total);

    if rounded < BigDecimal::zero() {
        return Err(InvoiceError::Validation(format!(
            "Cannot spell out a negative amount: {}",
            total
        )));
    }

    let rupees = rounded
        .to_u64()
        .filter(|value| *value <= MAX_WORDS_AMOUNT)
        .ok_or_else(|| InvoiceError::AmountOutOfRange {
            amount: rounded.to_string(),
            max: MAX_WORDS_AMOUNT,
        })?;

    if rupees == 0 {
        return Ok("zero rupees only".to_string());
    }

    Ok(format!("{} rupees only", to_words(rupees)?))
}
