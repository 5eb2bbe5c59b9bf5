//! Numeric literals in the C `strtoull(s, NULL, 0)` / `strtol(s, NULL, 0)` dialect.
//!
//! Parsing never fails: trailing garbage is ignored, an empty digit sequence
//! yields 0 and out-of-range values saturate.

/// Parses an unsigned literal (decimal, `0x` hexadecimal or `0` octal).
///
/// A leading `-` negates the value modulo 2^64. On overflow the result is
/// [`u64::MAX`], whatever the sign.
///
/// # Examples
///
/// ```
/// use pageread_core::util::parse_c_ulong;
///
/// assert_eq!(parse_c_ulong("0x1000"), 4096);
/// assert_eq!(parse_c_ulong("010"), 8);
/// assert_eq!(parse_c_ulong("42abc"), 42);
/// assert_eq!(parse_c_ulong("nope"), 0);
/// ```
pub fn parse_c_ulong(s: &str) -> u64 {
    let literal = Literal::scan(s);
    match literal.magnitude {
        None => u64::MAX,
        Some(m) if literal.negative => m.wrapping_neg(),
        Some(m) => m,
    }
}

/// Parses a signed literal (decimal, `0x` hexadecimal or `0` octal).
///
/// Values outside of `i64` saturate to [`i64::MAX`] or [`i64::MIN`].
///
/// # Examples
///
/// ```
/// use pageread_core::util::parse_c_long;
///
/// assert_eq!(parse_c_long("-0x10"), -16);
/// assert_eq!(parse_c_long("99999999999999999999"), i64::MAX);
/// ```
pub fn parse_c_long(s: &str) -> i64 {
    let literal = Literal::scan(s);
    let limit = if literal.negative {
        i64::MIN.unsigned_abs()
    } else {
        i64::MAX as u64
    };
    match literal.magnitude {
        Some(m) if m <= limit => {
            if literal.negative {
                (m as i64).wrapping_neg()
            } else {
                m as i64
            }
        }
        _ if literal.negative => i64::MIN,
        _ => i64::MAX,
    }
}

struct Literal {
    negative: bool,
    /// `None` if the digits overflowed `u64`
    magnitude: Option<u64>,
}

impl Literal {
    fn scan(s: &str) -> Self {
        // C isspace() also accepts vertical tab
        let s = s.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
        let (negative, s) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (radix, digits) = split_radix(s);
        let mut magnitude = Some(0u64);
        for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
            magnitude = magnitude
                .and_then(|m| m.checked_mul(radix as u64))
                .and_then(|m| m.checked_add(digit as u64));
        }
        Literal {
            negative,
            magnitude,
        }
    }
}

fn split_radix(s: &str) -> (u32, &str) {
    let bytes = s.as_bytes();
    match bytes {
        [b'0', b'x' | b'X', next, ..] if next.is_ascii_hexdigit() => (16, &s[2..]),
        [b'0', ..] => (8, s),
        _ => (10, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radix_prefixes() {
        assert_eq!(parse_c_ulong("4096"), 4096);
        assert_eq!(parse_c_ulong("0x1000"), 0x1000);
        assert_eq!(parse_c_ulong("0XfFfF"), 0xffff);
        assert_eq!(parse_c_ulong("010000"), 0o10000);
        assert_eq!(parse_c_ulong("0"), 0);
    }

    #[test]
    fn test_partial_input() {
        assert_eq!(parse_c_ulong("  \t0x2000zz"), 0x2000);
        // "0x" without hex digits is the octal literal 0
        assert_eq!(parse_c_ulong("0xg"), 0);
        // 8 and 9 end an octal literal
        assert_eq!(parse_c_ulong("0789"), 7);
        assert_eq!(parse_c_ulong(""), 0);
        assert_eq!(parse_c_ulong("+12"), 12);
        assert_eq!(parse_c_long("abc"), 0);
    }

    #[test]
    fn test_unsigned_negation_and_overflow() {
        assert_eq!(parse_c_ulong("-1"), u64::MAX);
        assert_eq!(parse_c_ulong("-0x1000"), 0u64.wrapping_sub(0x1000));
        assert_eq!(parse_c_ulong("0x10000000000000000"), u64::MAX);
        assert_eq!(parse_c_ulong("-0x10000000000000000"), u64::MAX);
        assert_eq!(parse_c_ulong("18446744073709551615"), u64::MAX);
    }

    #[test]
    fn test_signed_saturation() {
        assert_eq!(parse_c_long("-5"), -5);
        assert_eq!(parse_c_long("9223372036854775807"), i64::MAX);
        assert_eq!(parse_c_long("9223372036854775808"), i64::MAX);
        assert_eq!(parse_c_long("-9223372036854775808"), i64::MIN);
        assert_eq!(parse_c_long("-9223372036854775809"), i64::MIN);
        assert_eq!(parse_c_long("0x7fffffffffffffff"), i64::MAX);
    }
}
