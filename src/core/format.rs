use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Round half-up (kaufmännisch) to the given number of decimal places.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Format a decimal with exactly two fraction digits and no separators.
///
/// This is the wire form used in exports and payment-slip payloads.
pub fn format_fixed2(value: Decimal) -> String {
    let rounded = round_half_up(value, 2);
    format!("{rounded:.2}")
}

/// Format an amount for display the Swiss way: apostrophe as thousands
/// separator, two fraction digits (e.g. `1'500.75`).
pub fn format_swiss_amount(value: Decimal) -> String {
    let fixed = format_fixed2(value);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('\'');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac_part}")
}

/// Round a cash amount to the nearest five centimes.
///
/// Swiss cash payments settle on 0.05 steps; electronic amounts keep
/// the exact centime value.
pub fn round_to_five_centimes(value: Decimal) -> Decimal {
    round_half_up(value * dec!(20), 0) / dec!(20)
}
