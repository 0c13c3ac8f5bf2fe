//! Token amount parsing and formatting
//!
//! Amounts are typed in whole-token units ("123.45") and sent to the chain in
//! the token's smallest unit (123.45 * 10^decimals). Conversion is done on the
//! digit strings so no precision is ever lost to floating point.

use crate::error::AirdropError;
use num_bigint::BigUint;
use serde::Serialize;

/// Parse a human-entered decimal amount into smallest units
///
/// # Arguments
/// * `text` - Decimal text, e.g. "1.5"
/// * `decimals` - Token decimals, `None` while token metadata is loading
pub fn parse_amount(text: &str, decimals: Option<u8>) -> Result<BigUint, AirdropError> {
    let decimals = decimals.ok_or_else(|| {
        AirdropError::InvalidAmountFormat("token decimals not loaded".to_string())
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Err(AirdropError::InvalidAmountFormat("empty amount".to_string()));
    }

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) || (whole.is_empty() && fraction.is_empty()) {
        return Err(AirdropError::InvalidAmountFormat(format!(
            "'{}' is not a decimal number",
            text
        )));
    }

    // trailing zeros do not change the value
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(AirdropError::InvalidAmountFormat(format!(
            "'{}' has more than {} decimal places",
            text, decimals
        )));
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.push_str(&"0".repeat(decimals as usize - fraction.len()));

    if digits.is_empty() {
        return Ok(BigUint::default());
    }
    BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| AirdropError::InvalidAmountFormat(format!("'{}' is out of range", text)))
}

/// Render smallest units as decimal text, without trailing fractional zeros
pub fn format_amount(value: &BigUint, decimals: u8) -> String {
    let digits = value.to_str_radix(10);
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// A rejected entry of an amount list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountIssue {
    /// Position in the list
    pub index: usize,
    /// Entry text as typed
    pub text: String,
    /// Why it was rejected
    pub reason: String,
}

/// Result of parsing a whole amount list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AmountBatch {
    /// Parsed value per position, `None` where parsing failed
    pub amounts: Vec<Option<BigUint>>,
    /// Exact sum of the entries that parsed
    pub total: BigUint,
    /// Every rejected entry
    pub issues: Vec<AmountIssue>,
}

impl AmountBatch {
    /// True when every entry parsed
    pub fn all_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Parsed amounts, only when the whole batch is valid
    pub fn valid_amounts(&self) -> Option<Vec<BigUint>> {
        self.amounts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Parse every entry of an amount list
///
/// Parsing never stops at the first bad entry: the running total and the
/// aggregate validity both reflect the whole list.
pub fn parse_amount_list<S: AsRef<str>>(texts: &[S], decimals: Option<u8>) -> AmountBatch {
    let mut batch = AmountBatch::default();
    for (index, text) in texts.iter().enumerate() {
        match parse_amount(text.as_ref(), decimals) {
            Ok(amount) => {
                batch.total += &amount;
                batch.amounts.push(Some(amount));
            }
            Err(err) => {
                batch.issues.push(AmountIssue {
                    index,
                    text: text.as_ref().to_string(),
                    reason: err.to_string(),
                });
                batch.amounts.push(None);
            }
        }
    }
    batch
}

/// Approximate whole-token total for display
///
/// Each entry contributes the float read from its leading numeric prefix
/// (`"1abc"` counts as 1); entries without one count as zero. It can differ
/// from the exact total and must not feed any validation.
pub fn approximate_total<S: AsRef<str>>(texts: &[S]) -> f64 {
    texts
        .iter()
        .filter_map(|text| leading_float(text.as_ref()))
        .filter(|value| value.is_finite())
        .sum()
}

/// Longest `[+-]digits[.digits][e[+-]digits]` prefix, as a float
fn leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn units(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 10).unwrap()
    }

    #[rstest]
    #[case("0", 0, "0")]
    #[case("0", 18, "0")]
    #[case("1", 6, "1000000")]
    #[case("1.5", 6, "1500000")]
    #[case("1.123456", 6, "1123456")]
    #[case(".5", 2, "50")]
    #[case("5.", 2, "500")]
    #[case("007", 0, "7")]
    #[case(" 2.50 ", 1, "25")]
    #[case("10", 18, "10000000000000000000")]
    fn test_parse_amount(#[case] text: &str, #[case] decimals: u8, #[case] expected: &str) {
        assert_eq!(parse_amount(text, Some(decimals)).unwrap(), units(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("abc")]
    #[case("-1")]
    #[case("+1")]
    #[case("1e5")]
    #[case(".")]
    #[case("1.2.3")]
    #[case("1,5")]
    #[case("1.1234567")]
    fn test_parse_amount_invalid(#[case] text: &str) {
        assert!(matches!(
            parse_amount(text, Some(6)),
            Err(AirdropError::InvalidAmountFormat(_))
        ));
    }

    #[test]
    fn test_parse_amount_without_decimals() {
        assert!(matches!(
            parse_amount("1", None),
            Err(AirdropError::InvalidAmountFormat(_))
        ));
    }

    #[test]
    fn test_fraction_on_zero_decimal_token() {
        assert!(parse_amount("1.5", Some(0)).is_err());
        assert_eq!(parse_amount("1.0", Some(0)).unwrap(), units("1"));
    }

    #[test]
    fn test_parse_beyond_u128() {
        let amount = parse_amount("123456789012345678901234567890.123456789", Some(18)).unwrap();
        assert_eq!(
            amount,
            units("123456789012345678901234567890123456789000000000")
        );
    }

    #[rstest]
    #[case("0", 6, "0")]
    #[case("1500000", 6, "1.5")]
    #[case("1", 6, "0.000001")]
    #[case("1000000", 6, "1")]
    #[case("42", 0, "42")]
    #[case("30000000000000000000", 18, "30")]
    fn test_format_amount(#[case] value: &str, #[case] decimals: u8, #[case] expected: &str) {
        assert_eq!(format_amount(&units(value), decimals), expected);
    }

    #[test]
    fn test_format_then_parse_returns_same_units() {
        let values = [
            "0",
            "1",
            "9",
            "10",
            "999999",
            "1000001",
            "123456789012345678901234567890",
            "115792089237316195423570985008687907853269984665640564039457584007913129639935",
        ];
        for decimals in [0u8, 1, 6, 8, 18, 30] {
            for value in values {
                let n = units(value);
                let text = format_amount(&n, decimals);
                assert_eq!(parse_amount(&text, Some(decimals)).unwrap(), n, "{text}");
            }
        }
    }

    #[test]
    fn test_amount_list_keeps_going_after_failure() {
        let batch = parse_amount_list(&["10", "oops", "20", "-3"], Some(2));
        assert!(!batch.all_valid());
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.total, units("3000"));
        assert_eq!(
            batch.issues.iter().map(|i| i.index).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(batch.valid_amounts(), None);
    }

    #[test]
    fn test_amount_list_valid() {
        let batch = parse_amount_list(&["10", "20"], Some(18));
        assert!(batch.all_valid());
        assert_eq!(
            batch.valid_amounts().unwrap(),
            vec![units("10000000000000000000"), units("20000000000000000000")]
        );
    }

    #[test]
    fn test_amount_list_empty_is_valid() {
        let batch = parse_amount_list::<&str>(&[], Some(18));
        assert!(batch.all_valid());
        assert!(batch.is_empty());
        assert_eq!(batch.total, BigUint::default());
    }

    #[test]
    fn test_approximate_total_is_cosmetic() {
        assert_eq!(approximate_total(&["1.5", "2", "abc"]), 3.5);
        assert_eq!(approximate_total(&["1abc", "2.5.1", ".5x", "-1"]), 3.0);
        assert_eq!(approximate_total(&["1e3", "2e", "e5", "."]), 1002.0);
        // exact total of 0.1 + 0.2 is 0.3, the float view is not
        assert_ne!(approximate_total(&["0.1", "0.2"]), 0.3);
        let exact = parse_amount_list(&["0.1", "0.2"], Some(1)).total;
        assert_eq!(exact, units("3"));
    }
}
