//! Print grand totals in Indian-numbering words

use billing_core::format::{capitalize_words, format_rupees};
use billing_core::{amount_in_words, to_words, InvoiceError, MAX_WORDS_AMOUNT};
use bigdecimal::BigDecimal;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), InvoiceError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let amounts = ["0", "7", "115", "1062", "10207", "99999.50", "1234567", "999999999"];

    for raw in amounts {
        let amount = match BigDecimal::from_str(raw) {
            Ok(amount) => amount,
            Err(err) => {
                eprintln!("skipping {}: {}", raw, err);
                continue;
            }
        };
        println!(
            "{:>16}  {}",
            format_rupees(&amount),
            capitalize_words(&amount_in_words(&amount)?)
        );
    }

    match to_words(MAX_WORDS_AMOUNT + 1) {
        Ok(words) => println!("unexpected: {}", words),
        Err(err) => println!("\n{}", err),
    }

    Ok(())
}
