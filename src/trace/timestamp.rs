//! Normalize simulator timestamp tokens such as `+1.5e+05ns`.
//!
//! The simulator prints times as an optional sign, a mantissa, an optional
//! exponent and a unit suffix. Normalization strips the sign and unit, scales
//! `mantissa * 10^exponent` and converts the result into nanoseconds, the
//! simulator's native resolution.
//!
//! ```text
//! +150000ns     -> 150000.0
//! +1.5e5ns      -> 150000.0
//! +1e+09ns      -> 1000000000.0
//! 2.5ms         -> 2500000.0
//! 150000        -> 150000.0   (already canonical)
//! ```

use super::error::TraceError;

const NANOS_PER_SECOND: f64 = 1e9;

/// Unit suffixes the simulator emits, with their size in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Femtoseconds,
    Picoseconds,
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Parse a unit suffix. Returns `None` for unknown suffixes.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let unit = match suffix {
            "fs" => TimeUnit::Femtoseconds,
            "ps" => TimeUnit::Picoseconds,
            "ns" => TimeUnit::Nanoseconds,
            "us" => TimeUnit::Microseconds,
            "ms" => TimeUnit::Milliseconds,
            "s" => TimeUnit::Seconds,
            "min" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            "d" => TimeUnit::Days,
            _ => return None,
        };
        Some(unit)
    }

    pub fn nanos(self) -> f64 {
        match self {
            TimeUnit::Femtoseconds => 1e-6,
            TimeUnit::Picoseconds => 1e-3,
            TimeUnit::Nanoseconds => 1.0,
            TimeUnit::Microseconds => 1e3,
            TimeUnit::Milliseconds => 1e6,
            TimeUnit::Seconds => NANOS_PER_SECOND,
            TimeUnit::Minutes => 60.0 * NANOS_PER_SECOND,
            TimeUnit::Hours => 3600.0 * NANOS_PER_SECOND,
            TimeUnit::Days => 86400.0 * NANOS_PER_SECOND,
        }
    }
}

/// Normalize a timestamp token into nanoseconds.
///
/// # Parameters
///
/// * `token` - Raw token, e.g. `+1.5e5ns`
///
/// # Returns
///
/// The finite value in nanoseconds, or `MalformedTimestamp` if the token does
/// not match `[+-]?<mantissa>(e<exponent>)?<unit>?` or overflows.
pub fn normalize_timestamp(token: &str) -> Result<f64, TraceError> {
    let (number, unit) = strip_markers(token)?;
    let value = scale_exponent(token, number)? * unit.nanos();

    if !value.is_finite() {
        return Err(TraceError::timestamp(token, "value is not finite"));
    }
    Ok(value)
}

/// Convert a normalized nanosecond value into seconds.
pub fn nanos_to_seconds(nanos: f64) -> f64 {
    nanos / NANOS_PER_SECOND
}

/// Stage one: drop the leading `+` and the unit suffix.
fn strip_markers(token: &str) -> Result<(&str, TimeUnit), TraceError> {
    let trimmed = token.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let suffix_start = unsigned
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(unsigned.len());
    let (number, suffix) = unsigned.split_at(suffix_start);

    let unit = if suffix.is_empty() {
        TimeUnit::Nanoseconds
    } else {
        TimeUnit::from_suffix(suffix).ok_or_else(|| TraceError::timestamp(token, "unknown unit suffix"))?
    };

    if number.is_empty() {
        return Err(TraceError::timestamp(token, "missing mantissa"));
    }
    Ok((number, unit))
}

/// Stage two: reconcile mantissa and exponent into one decimal value.
fn scale_exponent(token: &str, number: &str) -> Result<f64, TraceError> {
    let (mantissa, exponent) = match number.split_once(|c: char| c == 'e' || c == 'E') {
        Some((m, e)) => (m, Some(e)),
        None => (number, None),
    };

    if !is_decimal(mantissa) {
        return Err(TraceError::timestamp(token, "mantissa is not a decimal number"));
    }
    let exponent: i32 = match exponent {
        Some(e) => e.parse().map_err(|_| TraceError::timestamp(token, "exponent is not an integer"))?,
        None => 0,
    };

    // Let the float parser do the scaling so the result is correctly rounded.
    format!("{mantissa}e{exponent}")
        .parse()
        .map_err(|_| TraceError::timestamp(token, "mantissa is not a decimal number"))
}

/// Optional `-`, digits with at most one `.`, and at least one digit.
fn is_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_nanoseconds() {
        assert_eq!(normalize_timestamp("+150000ns").unwrap(), 150000.0);
    }

    #[test]
    fn test_exponent_is_applied_not_dropped() {
        // Keeping only the mantissa would yield 1.5 here.
        assert_eq!(normalize_timestamp("+1.5e5ns").unwrap(), 150000.0);
        assert_eq!(normalize_timestamp("+1e+09ns").unwrap(), 1e9);
        assert_eq!(normalize_timestamp("+2.5E3ns").unwrap(), 2500.0);
        assert_eq!(normalize_timestamp("+2.00002e+09ns").unwrap(), 2000020000.0);
    }

    #[test]
    fn test_zero_with_huge_exponent() {
        assert_eq!(normalize_timestamp("+0e400ns").unwrap(), 0.0);
    }

    #[test]
    fn test_negative_exponent() {
        let v = normalize_timestamp("+1.5e-3ns").unwrap();
        assert!((v - 0.0015).abs() < 1e-12);
    }

    #[test]
    fn test_idempotent_on_canonical_values() {
        for raw in ["150000", "0", "42.5"] {
            let once = normalize_timestamp(raw).unwrap();
            let twice = normalize_timestamp(&once.to_string()).unwrap();
            assert_eq!(once, twice);
            assert_eq!(once, raw.parse::<f64>().unwrap());
        }
    }

    #[test]
    fn test_unit_scaling() {
        assert_eq!(normalize_timestamp("+2s").unwrap(), 2e9);
        assert_eq!(normalize_timestamp("3ms").unwrap(), 3e6);
        assert_eq!(normalize_timestamp("+4us").unwrap(), 4000.0);
        assert_eq!(nanos_to_seconds(normalize_timestamp("+1.5e9ns").unwrap()), 1.5);
    }

    #[test]
    fn test_negative_sign_is_kept() {
        assert_eq!(normalize_timestamp("-5ns").unwrap(), -5.0);
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(normalize_timestamp(" +10ns ").unwrap(), 10.0);
    }

    #[test]
    fn test_malformed_tokens() {
        for bad in ["", "+", "ns", "+abcns", "+1.5e5xs", "+1.5eXns", "+1..5ns", "++1ns", "+1e400ns", "inf", "+1.5e"] {
            assert!(
                matches!(normalize_timestamp(bad), Err(TraceError::MalformedTimestamp { .. })),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
