//! Amount presentation pipeline: sanitize a raw value to a numeric, format
//! it at fixed precision, then place the currency symbol.

use renewcast_models::config::{CurrencyConfig, SymbolPosition};
use rust_decimal::{Decimal, RoundingStrategy};

/// Reduce a raw amount string to a `Decimal`.
///
/// Raw values use canonical decimal form (`.` as the decimal point);
/// currency symbols, grouping commas, and whitespace are dropped.
/// Unparseable input collapses to zero.
pub fn sanitize_amount(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().unwrap_or(Decimal::ZERO)
}

/// Format an amount at the configured precision with grouping, e.g.
/// `1234567.891` to `1,234,567.89`.
///
/// Rounds half-away-from-zero, the way prices are conventionally rounded.
pub fn format_amount(amount: Decimal, config: &CurrencyConfig) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(config.decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(config.decimals);
    let text = rounded.to_string();

    let (number, fraction) = match text.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (text.as_str(), None),
    };
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };

    let grouped = group_thousands(digits, &config.thousands_separator);
    match fraction {
        Some(frac) => format!("{sign}{grouped}{}{frac}", config.decimal_separator),
        None => format!("{sign}{grouped}"),
    }
}

/// Place the currency symbol around an already-formatted amount. A leading
/// minus sign stays in front of a prefixed symbol: `-$10.00`, not `$-10.00`.
pub fn currency_filter(amount: &str, config: &CurrencyConfig) -> String {
    match config.position {
        SymbolPosition::Before => match amount.strip_prefix('-') {
            Some(rest) => format!("-{}{rest}", config.symbol),
            None => format!("{}{amount}", config.symbol),
        },
        SymbolPosition::After => format!("{amount}{}", config.symbol),
    }
}

/// The full pipeline: raw string to display-ready currency string.
pub fn display_amount(raw: &str, config: &CurrencyConfig) -> String {
    currency_filter(&format_amount(sanitize_amount(raw), config), config)
}

fn group_thousands(digits: &str, separator: &str) -> String {
    if separator.is_empty() {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
