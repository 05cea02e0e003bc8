//! Decimal-aware rendering of raw on-chain token amounts.
//!
//! Ledgers report balances and credits as arbitrary-precision integers in
//! the token's smallest unit, plus a per-asset decimal count. Both directions
//! of the conversion here work on decimal digit strings — never through a
//! float — so amounts beyond 2^53 render exactly.

use num_bigint::{BigInt, Sign};

use crate::error::{ConsoleError, Result};

/// Render a raw integer amount as a canonical decimal string.
///
/// `decimals` shifts the decimal point left (positive) or right (negative).
/// `max_significant_digits` truncates (never rounds) the fractional part so
/// the whole string keeps at most that many significant digits; 0 means no
/// cap. Leading fractional zeros of a sub-1 amount do not count against the
/// cap.
///
/// The output has no leading zeros in the integer part (a bare "0" aside),
/// no trailing fractional zeros, and a "." only when a fractional part
/// remains. Negative amounts are a usage error.
pub fn display_with_decimals(
    value: &BigInt,
    decimals: i32,
    max_significant_digits: usize,
) -> Result<String> {
    if value.sign() == Sign::Minus {
        return Err(ConsoleError::InvalidArgument(format!(
            "negative amount: {value}"
        )));
    }

    let digits = value.magnitude().to_str_radix(10);
    if decimals == 0 {
        return Ok(digits);
    }

    // Split the digit string at the shifted decimal point. Padding with
    // zeros on either side keeps this exact for shifts larger than the
    // digit count.
    let (mut int_part, mut frac_part) = if decimals > 0 {
        let shift = decimals as usize;
        if shift >= digits.len() {
            let mut frac = "0".repeat(shift - digits.len());
            frac.push_str(&digits);
            (String::new(), frac)
        } else {
            let split = digits.len() - shift;
            (digits[..split].to_string(), digits[split..].to_string())
        }
    } else {
        let mut int = digits;
        int.push_str(&"0".repeat(decimals.unsigned_abs() as usize));
        (int, String::new())
    };

    int_part = int_part.trim_start_matches('0').to_string();

    if max_significant_digits > 0 {
        let frac_budget = max_significant_digits.saturating_sub(int_part.len());
        // When the integer part is zero, fractional leading zeros only
        // position the value and are not significant.
        let significant_len = if int_part.is_empty() {
            frac_part.trim_start_matches('0').len()
        } else {
            frac_part.len()
        };
        if significant_len > frac_budget {
            let keep = frac_part.len() - significant_len + frac_budget;
            frac_part.truncate(keep);
        }
    }

    let frac_part = frac_part.trim_end_matches('0');
    let mut out = if int_part.is_empty() {
        "0".to_string()
    } else {
        int_part
    };
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Ok(out)
}

/// Parse a human-entered decimal amount into raw integer units.
///
/// Inverse of [`display_with_decimals`] for non-negative shifts: the text may
/// carry at most `decimals` fractional digits and must be a plain non-negative
/// decimal number. Used when the operator types a balance in whole tokens.
pub fn scale_to_units(text: &str, decimals: u32) -> Result<BigInt> {
    let text = text.trim();
    if text.starts_with('-') {
        return Err(ConsoleError::InvalidArgument(format!(
            "negative amount: {text}"
        )));
    }
    let (int_text, frac_text) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text, ""),
    };
    if int_text.is_empty() && frac_text.is_empty() {
        return Err(ConsoleError::InvalidArgument("empty amount".to_string()));
    }
    if !int_text.bytes().all(|b| b.is_ascii_digit())
        || !frac_text.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ConsoleError::InvalidArgument(format!(
            "malformed amount: {text}"
        )));
    }
    if frac_text.len() > decimals as usize {
        return Err(ConsoleError::InvalidArgument(format!(
            "at most {decimals} fractional digits allowed: {text}"
        )));
    }

    let mut raw = String::with_capacity(int_text.len() + decimals as usize);
    raw.push_str(int_text);
    raw.push_str(frac_text);
    raw.push_str(&"0".repeat(decimals as usize - frac_text.len()));
    if raw.is_empty() {
        raw.push('0');
    }

    BigInt::parse_bytes(raw.as_bytes(), 10)
        .ok_or_else(|| ConsoleError::InvalidArgument(format!("malformed amount: {text}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: i64, decimals: i32, max_sig: usize) -> String {
        display_with_decimals(&BigInt::from(value), decimals, max_sig).unwrap()
    }

    #[test]
    fn zero_shift_returns_digits_unchanged() {
        assert_eq!(fmt(12345, 0, 0), "12345");
        assert_eq!(fmt(0, 0, 0), "0");
    }

    #[test]
    fn positive_shift_places_point() {
        assert_eq!(fmt(12345, 2, 0), "123.45");
        assert_eq!(fmt(5, 3, 0), "0.005");
        assert_eq!(fmt(1, 1, 0), "0.1");
    }

    #[test]
    fn trailing_fractional_zeros_stripped() {
        assert_eq!(fmt(100, 2, 0), "1");
        assert_eq!(fmt(1050, 2, 0), "10.5");
    }

    #[test]
    fn negative_shift_multiplies() {
        assert_eq!(fmt(123, -2, 0), "12300");
        assert_eq!(fmt(1, -6, 0), "1000000");
    }

    #[test]
    fn zero_renders_zero_for_any_shift() {
        assert_eq!(fmt(0, 6, 0), "0");
        assert_eq!(fmt(0, -6, 0), "0");
        assert_eq!(fmt(0, 120, 0), "0");
    }

    #[test]
    fn significant_digit_cap_truncates_fraction() {
        // Integer part "1234" eats 4 of the 5 significant digits, leaving
        // one for the fraction; "567" truncates (not rounds) to "5".
        assert_eq!(fmt(1234567, 3, 5), "1234.5");
        // Budget exhausted by the integer part entirely.
        assert_eq!(fmt(1234567, 3, 4), "1234");
        assert_eq!(fmt(1234567, 3, 2), "1234");
    }

    #[test]
    fn cap_ignores_leading_fractional_zeros_below_one() {
        // "0.005" holds one significant digit; positioning zeros are free.
        assert_eq!(fmt(5, 3, 1), "0.005");
        assert_eq!(fmt(5432, 7, 2), "0.00054");
    }

    #[test]
    fn cap_of_zero_is_lossless() {
        assert_eq!(fmt(987654321, 4, 0), "98765.4321");
    }

    #[test]
    fn negative_value_is_invalid() {
        let err = display_with_decimals(&BigInt::from(-1), 2, 0).unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidArgument(_)));
    }

    #[test]
    fn magnitudes_beyond_float_precision_stay_exact() {
        // 2^128; a round-trip through f64 would corrupt the low digits.
        let v: BigInt = "340282366920938463463374607431768211456".parse().unwrap();
        assert_eq!(
            display_with_decimals(&v, 18, 0).unwrap(),
            "340282366920.938463463374607431768211456"
        );
        assert_eq!(
            display_with_decimals(&v, 0, 0).unwrap(),
            "340282366920938463463374607431768211456"
        );
    }

    #[test]
    fn shifts_larger_than_digit_count() {
        assert_eq!(fmt(7, 40, 0), format!("0.{}7", "0".repeat(39)));
        assert_eq!(fmt(7, -40, 0), format!("7{}", "0".repeat(40)));
    }

    #[test]
    fn shifting_value_and_decimals_together_is_invariant() {
        // Scaling the magnitude by 10^k while adding k to the shift lands
        // on the same digit sequence.
        let v = BigInt::from(123_456_789);
        let scaled = &v * BigInt::from(1000);
        for d in [-4i32, 0, 3, 12] {
            assert_eq!(
                display_with_decimals(&v, d, 0).unwrap(),
                display_with_decimals(&scaled, d + 3, 0).unwrap(),
                "d={d}"
            );
        }
    }

    #[test]
    fn roundtrip_recovers_raw_units() {
        for (value, decimals) in [(12345i64, 2u32), (100, 2), (5, 3), (0, 6), (987654321, 8)] {
            let v = BigInt::from(value);
            let shown = display_with_decimals(&v, decimals as i32, 0).unwrap();
            assert_eq!(scale_to_units(&shown, decimals).unwrap(), v, "{shown}");
        }
    }

    #[test]
    fn scale_accepts_plain_decimals() {
        assert_eq!(scale_to_units("1.25", 6).unwrap(), BigInt::from(1_250_000));
        assert_eq!(scale_to_units("0.000005", 6).unwrap(), BigInt::from(5));
        assert_eq!(scale_to_units("42", 0).unwrap(), BigInt::from(42));
        assert_eq!(scale_to_units(".5", 1).unwrap(), BigInt::from(5));
    }

    #[test]
    fn scale_rejects_bad_input() {
        assert!(scale_to_units("", 6).is_err());
        assert!(scale_to_units("-1", 6).is_err());
        assert!(scale_to_units("1.2.3", 6).is_err());
        assert!(scale_to_units("1e6", 6).is_err());
        assert!(scale_to_units("0.1234567", 6).is_err());
        assert!(scale_to_units(".", 6).is_err());
    }
}
