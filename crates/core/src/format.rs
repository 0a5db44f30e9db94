//! Display formatting for explorer values.
//!
//! Every helper here is total: malformed input degrades to a fallback
//! display value instead of an error, so one bad field never blocks a
//! notification.

use chrono::{DateTime, Utc};

/// Shown in place of a missing address or timestamp.
pub const PLACEHOLDER: &str = "—";

/// Wei per ether.
const WEI_PER_ETHER: f64 = 1e18;

/// Significant digits used for token amounts.
const SIGNIFICANT_DIGITS: i32 = 6;

/// Shorten an address to `0xabcd...1234` form (lowercased).
pub fn short_address(address: &str) -> String {
    if address.is_empty() {
        return PLACEHOLDER.to_string();
    }
    let lower: Vec<char> = address.to_lowercase().chars().collect();
    let head: String = lower.iter().take(6).collect();
    let tail: String = lower[lower.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Parse an integer string the way explorers emit them.
///
/// Values may exceed any native integer (uint256), so the digits are
/// validated and then read as the nearest `f64`.
fn parse_integer(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix(|c| c == '-' || c == '+')
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Convert a wei amount to ether. Malformed input yields `0.0`.
pub fn wei_to_ether(wei: &str) -> f64 {
    parse_integer(wei)
        .map(|v| v / WEI_PER_ETHER)
        .unwrap_or(0.0)
}

/// Scale a raw token amount by its decimals.
///
/// An empty decimals field means zero decimals. Malformed input or
/// negative decimals yield `0.0`.
pub fn scaled_amount(value: &str, decimals: &str) -> f64 {
    let decimals = decimals.trim();
    let decimals = if decimals.is_empty() {
        0
    } else {
        match decimals.parse::<i32>() {
            Ok(d) => d,
            Err(_) => return 0.0,
        }
    };
    if decimals < 0 {
        return 0.0;
    }
    match parse_integer(value) {
        Some(v) => v / 10f64.powi(decimals),
        None => 0.0,
    }
}

/// Format an ether value with six fixed decimals.
pub fn format_ether(value: f64) -> String {
    format!("{:.6}", value)
}

/// Format a token amount with six significant digits.
///
/// Trailing zeros are dropped and very large or very small magnitudes
/// switch to exponent notation (`1.5e+07`, `1e-05`).
pub fn format_token_amount(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // Exponent after rounding to the target precision, so 999999.5 counts as 1e6.
    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Format epoch seconds as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(epoch_seconds: &str) -> String {
    epoch_seconds
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Escape text for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0xAbCdEf0123456789aBcDeF0123456789AbCdEf01"),
            "0xabcd...ef01"
        );
    }

    #[test]
    fn test_short_address_empty() {
        assert_eq!(short_address(""), "—");
    }

    #[test]
    fn test_short_address_shorter_than_window() {
        assert_eq!(short_address("0xAB"), "0xab...0xab");
    }

    #[test]
    fn test_wei_to_ether() {
        assert_eq!(wei_to_ether("1000000000000000000"), 1.0);
        assert_eq!(wei_to_ether("0"), 0.0);
        // Larger than u64
        assert_eq!(wei_to_ether("10000000000000000000000"), 10_000.0);
    }

    #[test]
    fn test_wei_to_ether_malformed() {
        assert_eq!(wei_to_ether(""), 0.0);
        assert_eq!(wei_to_ether("0x10"), 0.0);
        assert_eq!(wei_to_ether("1.5"), 0.0);
        assert_eq!(wei_to_ether("inf"), 0.0);
        assert_eq!(wei_to_ether("-"), 0.0);
    }

    #[test]
    fn test_wei_to_ether_beyond_i128() {
        // 1e40 wei
        let wei = format!("1{}", "0".repeat(40));
        let ether = wei_to_ether(&wei);
        assert!((ether / 1e22 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_amount() {
        assert_eq!(scaled_amount("1234500", "6"), 1.2345);
        assert_eq!(scaled_amount("42", ""), 42.0);
        assert_eq!(scaled_amount("42", "0"), 42.0);
    }

    #[test]
    fn test_scaled_amount_malformed() {
        assert_eq!(scaled_amount("abc", "6"), 0.0);
        assert_eq!(scaled_amount("100", "six"), 0.0);
        assert_eq!(scaled_amount("100", "-2"), 0.0);
        assert_eq!(scaled_amount("NaN", "0"), 0.0);
    }

    #[test]
    fn test_scaled_amount_uint256_max() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(format_token_amount(scaled_amount(max, "18")), "1.15792e+59");
        assert_eq!(format_token_amount(scaled_amount(&format!("1{}", "0".repeat(39)), "18")), "1e+21");
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(1.5), "1.500000");
        assert_eq!(format_ether(0.0), "0.000000");
        assert_eq!(format_ether(0.0000001), "0.000000");
    }

    #[test]
    fn test_format_token_amount_plain() {
        assert_eq!(format_token_amount(0.0), "0");
        assert_eq!(format_token_amount(2.5), "2.5");
        assert_eq!(format_token_amount(100.0), "100");
        assert_eq!(format_token_amount(1234.5678), "1234.57");
        assert_eq!(format_token_amount(0.0001), "0.0001");
        assert_eq!(format_token_amount(123456.0), "123456");
    }

    #[test]
    fn test_format_token_amount_exponent() {
        assert_eq!(format_token_amount(15_000_000.0), "1.5e+07");
        assert_eq!(format_token_amount(1234567.0), "1.23457e+06");
        assert_eq!(format_token_amount(0.00001), "1e-05");
        assert_eq!(format_token_amount(999_999.7), "1e+06");
    }

    #[test]
    fn test_format_token_amount_negative() {
        assert_eq!(format_token_amount(-2.5), "-2.5");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("0"), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp("1700000000"), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_format_timestamp_malformed() {
        assert_eq!(format_timestamp(""), "—");
        assert_eq!(format_timestamp("yesterday"), "—");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("A&B <script>"), "A&amp;B &lt;script&gt;");
        assert_eq!(escape_html("USDC"), "USDC");
    }
}
