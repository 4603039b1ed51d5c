//! Utilities shared by the catalog drivers.
//!
//! - [`filter`]: optional name-list filters for catalog queries

pub mod filter;

pub use filter::{name_matches, sql_in};
