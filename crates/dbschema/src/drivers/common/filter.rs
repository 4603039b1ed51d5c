//! Optional name-list filters for catalog queries.
//!
//! Every catalog query can be narrowed to a list of names. The filter has
//! three states with distinct meanings:
//!
//! | filter          | SQL condition          | rows matched |
//! |-----------------|------------------------|--------------|
//! | `None`          | `(1=1)`                | all          |
//! | `Some(&[])`     | `(0=1)`                | none         |
//! | `Some(names)`   | `col IN (?, ?, ...)`   | those names  |
//!
//! Names are always bound as parameters, never spliced into the query.

/// Render a filter condition for `column`, appending bound values to `params`.
pub fn sql_in(params: &mut Vec<String>, column: &str, values: Option<&[String]>) -> String {
    match values {
        None => "(1=1)".to_string(),
        Some([]) => "(0=1)".to_string(),
        Some(values) => {
            params.extend(values.iter().cloned());
            let placeholders = vec!["?"; values.len()].join(",");
            format!("{} IN ({})", column, placeholders)
        }
    }
}

/// In-memory equivalent of [`sql_in`], for catalogs read without a WHERE clause.
pub fn name_matches(values: Option<&[String]>, name: &str) -> bool {
    match values {
        None => true,
        Some(values) => values.iter().any(|v| v == name),
    }
}
