//! Normalization of `INFORMATION_SCHEMA.COLUMNS` rows.
//!
//! MySQL reports most column facts in dedicated catalog columns, but some only
//! appear inside the full `COLUMN_TYPE` string (`int(10) unsigned zerofill`,
//! `enum('a','b')`). This module turns a raw row into a [`Column`].

use crate::bounds::{display_width, BoundsKey};
use crate::core::schema::Column;
use crate::core::traits::CatalogRow;
use crate::error::Result;

/// Build a normalized column from one catalog row.
///
/// The row uses the aliases selected by the column query: `name`,
/// `defaultValue`, `nullable`, `dataType`, `maximumLength`, `characterSet`,
/// `collation`, `type`, `numericPrecision`, `numericScale`,
/// `datetimePrecision`, `extra`, `comment`.
pub fn normalize_column(row: &CatalogRow) -> Result<Column> {
    let name = row.require_str("name", "INFORMATION_SCHEMA.COLUMNS")?;
    let data_type = row
        .require_str("dataType", "INFORMATION_SCHEMA.COLUMNS")?
        .to_lowercase();
    let column_type = row.str_or_empty("type");
    let extra = row.str_or_empty("extra");

    // Fractional seconds digits win when present; otherwise numeric precision.
    let precision = row
        .opt_i64("datetimePrecision")
        .filter(|p| *p > 0)
        .or_else(|| row.opt_i64("numericPrecision"))
        .and_then(|p| u32::try_from(p).ok());
    let scale = row
        .opt_i64("numericScale")
        .and_then(|s| u32::try_from(s).ok());

    let unsigned = column_type.contains("unsigned");
    let zerofill = column_type.contains("zerofill");

    let options = match data_type.as_str() {
        "enum" | "set" => Some(parse_enum_options(&column_type)),
        _ => None,
    };

    let bounds = BoundsKey::new(&data_type, unsigned)
        .with_precision(precision)
        .with_scale(scale);
    let minimum_value = bounds.minimum_value();
    let maximum_value = bounds.maximum_value();

    Ok(Column {
        display_width: display_width(&data_type, &column_type),
        name,
        unsigned,
        zerofill,
        nullable: row.opt_str("nullable").as_deref() == Some("YES"),
        default_value: row.opt_str("defaultValue"),
        options,
        auto_increment: extra.contains("auto_increment"),
        maximum_length: row
            .opt_i64("maximumLength")
            .and_then(|l| u64::try_from(l).ok()),
        minimum_value,
        maximum_value,
        precision,
        scale,
        character_set: row.opt_str("characterSet"),
        collation: row.opt_str("collation"),
        comment: row.opt_str("comment").filter(|c| !c.is_empty()),
        data_type,
    })
}

/// Extract the permitted values from an `enum(...)` or `set(...)` type.
///
/// Values are single-quoted and comma-separated; a quote inside a value is
/// written twice (`'it''s'`) and comes back as one.
///
/// ```ignore
/// assert_eq!(parse_enum_options("enum('a','b','c')"), vec!["a", "b", "c"]);
/// assert_eq!(parse_enum_options("set('it''s','x')"), vec!["it's", "x"]);
/// ```
pub fn parse_enum_options(column_type: &str) -> Vec<String> {
    let Some(open) = column_type.find('(') else {
        return Vec::new();
    };

    let mut options = Vec::new();
    let mut chars = column_type[open + 1..].chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                let mut value = String::new();
                while let Some(c) = chars.next() {
                    if c == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            value.push('\'');
                        } else {
                            break;
                        }
                    } else {
                        value.push(c);
                    }
                }
                options.push(value);
            }
            ')' => break,
            _ => {}
        }
    }

    options
}
