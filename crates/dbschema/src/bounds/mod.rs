//! Value bounds for MySQL-family column types.
//!
//! Catalogs describe a column's type but not the values it can hold. This
//! module derives those facts from the normalized type:
//!
//! - fixed-width integers map to literal range constants
//! - exact decimals get textual boundaries built digit by digit, so
//!   `decimal(65,30)` is exact without going through floating point
//! - temporal types get the engine's documented range, with a fractional
//!   seconds suffix when the column has one
//! - integer display widths are read from the full column type
//!
//! Everything here is pure and stateless.

use std::sync::LazyLock;

use regex::Regex;

/// Leading `name(N` of a full column type, e.g. `int(11) unsigned`.
static DISPLAY_WIDTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\((\d+)").expect("valid display width pattern"));

/// Integer types that carry a display width.
const DISPLAY_WIDTH_TYPES: &[&str] = &["tinyint", "smallint", "mediumint", "int", "bigint"];

/// The inputs that determine a column's value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsKey<'a> {
    /// Lowercase data type, e.g. "int" or "decimal".
    pub data_type: &'a str,
    pub unsigned: bool,
    /// Numeric precision, or fractional seconds digits for temporal types.
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl<'a> BoundsKey<'a> {
    pub fn new(data_type: &'a str, unsigned: bool) -> Self {
        Self {
            data_type,
            unsigned,
            precision: None,
            scale: None,
        }
    }

    pub fn with_precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_scale(mut self, scale: Option<u32>) -> Self {
        self.scale = scale;
        self
    }

    /// Smallest representable value, or `None` when the type has no known
    /// lower bound.
    pub fn minimum_value(&self) -> Option<String> {
        if self.unsigned {
            return match self.data_type {
                "tinyint" | "smallint" | "mediumint" | "int" | "bigint" => Some("0".to_string()),
                "decimal" => Some(generate_decimal_bound(
                    self.precision.unwrap_or(0),
                    self.scale.unwrap_or(0),
                    '0',
                )),
                _ => None,
            };
        }

        match self.data_type {
            "tinyint" => Some("-128".to_string()),
            "smallint" => Some("-32768".to_string()),
            "mediumint" => Some("-8388608".to_string()),
            "int" => Some("-2147483648".to_string()),
            "bigint" => Some("-9223372036854775808".to_string()),
            "decimal" => Some(format!(
                "-{}",
                generate_decimal_bound(self.precision.unwrap_or(0), self.scale.unwrap_or(0), '9')
            )),
            "date" => Some("1000-01-01".to_string()),
            "datetime" => Some(with_fraction("1000-01-01 00:00:00", self.precision, '0')),
            "timestamp" => Some(with_fraction("1970-01-01 00:00:01", self.precision, '0')),
            _ => None,
        }
    }

    /// Largest representable value, or `None` when the type has no known
    /// upper bound.
    pub fn maximum_value(&self) -> Option<String> {
        if self.unsigned {
            return match self.data_type {
                "tinyint" => Some("255".to_string()),
                "smallint" => Some("65535".to_string()),
                "mediumint" => Some("16777215".to_string()),
                "int" => Some("4294967295".to_string()),
                "bigint" => Some("18446744073709551615".to_string()),
                "decimal" => Some(generate_decimal_bound(
                    self.precision.unwrap_or(0),
                    self.scale.unwrap_or(0),
                    '9',
                )),
                _ => None,
            };
        }

        match self.data_type {
            "tinyint" => Some("127".to_string()),
            "smallint" => Some("32767".to_string()),
            "mediumint" => Some("8388607".to_string()),
            "int" => Some("2147483647".to_string()),
            "bigint" => Some("9223372036854775807".to_string()),
            "decimal" => Some(generate_decimal_bound(
                self.precision.unwrap_or(0),
                self.scale.unwrap_or(0),
                '9',
            )),
            "date" => Some("9999-12-31".to_string()),
            "datetime" => Some(with_fraction("9999-12-31 23:59:59", self.precision, '9')),
            "timestamp" => Some(with_fraction("2038-01-19 03:14:07", self.precision, '9')),
            _ => None,
        }
    }
}

/// Build a decimal boundary string from repeated digits.
///
/// The integer part is `precision - scale` copies of `digit`, followed by `.`
/// and `scale` copies when the scale is non-zero. A `'0'` digit collapses the
/// integer part to a single `0`.
///
/// ```ignore
/// assert_eq!(generate_decimal_bound(5, 2, '9'), "999.99");
/// assert_eq!(generate_decimal_bound(5, 0, '0'), "0");
/// assert_eq!(generate_decimal_bound(5, 2, '0'), "0.00");
/// ```
pub fn generate_decimal_bound(precision: u32, scale: u32, digit: char) -> String {
    let mut decimal = if digit == '0' {
        "0".to_string()
    } else {
        repeat_digit(digit, precision.saturating_sub(scale))
    };

    if scale > 0 {
        decimal.push('.');
        decimal.push_str(&repeat_digit(digit, scale));
    }

    decimal
}

/// Display width of an integer column, read from its full type string.
///
/// Returns `None` for non-integer types, for types without a parenthesized
/// width (MySQL 8.0.19+ drops it), and for a zero width.
pub fn display_width(data_type: &str, column_type: &str) -> Option<u32> {
    if !DISPLAY_WIDTH_TYPES.contains(&data_type) {
        return None;
    }

    DISPLAY_WIDTH_PATTERN
        .captures(column_type)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|width| *width > 0)
}

fn with_fraction(base: &str, precision: Option<u32>, digit: char) -> String {
    match precision {
        Some(digits) if digits > 0 => format!("{}.{}", base, repeat_digit(digit, digits)),
        _ => base.to_string(),
    }
}

fn repeat_digit(digit: char, count: u32) -> String {
    std::iter::repeat(digit).take(count as usize).collect()
}
