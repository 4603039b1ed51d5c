//! Server version parsing and feature detection.
//!
//! `INFORMATION_SCHEMA.COLUMNS.DATETIME_PRECISION` only exists from MySQL
//! 5.6.4 on. Older servers reject a query that names it, so the column is
//! only selected when the server reports a new enough version.

use serde::{Deserialize, Serialize};

/// How a server version is compared against a feature's minimum version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionComparison {
    /// Each of major, minor and release must independently be `>=` the
    /// required component. This is the long-standing behavior: 8.0.32 is
    /// *not* considered at least 5.6.4 because `0 < 6`.
    #[default]
    Componentwise,

    /// Ordinary version ordering: (major, minor, release) compared as a tuple.
    Lexicographic,
}

/// A `major.minor.release` server version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
    pub release: u32,
}

impl ServerVersion {
    pub const fn new(major: u32, minor: u32, release: u32) -> Self {
        Self {
            major,
            minor,
            release,
        }
    }

    /// Parse a version string such as `8.0.32`, `5.7.44-log` or
    /// `10.11.6-MariaDB-0+deb12u1`.
    ///
    /// The string is split on `.` for major and minor; the third part is split
    /// on `-` to drop the release label. Missing or non-numeric components
    /// read as zero.
    pub fn parse(version: &str) -> Self {
        let mut parts = version.trim().split('.');
        let major = leading_number(parts.next());
        let minor = leading_number(parts.next());
        let release = leading_number(parts.next().and_then(|p| p.split('-').next()));

        Self::new(major, minor, release)
    }

    /// Whether this version satisfies `required` under `comparison`.
    pub fn is_at_least(&self, required: ServerVersion, comparison: VersionComparison) -> bool {
        match comparison {
            VersionComparison::Componentwise => {
                self.major >= required.major
                    && self.minor >= required.minor
                    && self.release >= required.release
            }
            VersionComparison::Lexicographic => {
                (self.major, self.minor, self.release)
                    >= (required.major, required.minor, required.release)
            }
        }
    }
}

impl std::fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.release)
    }
}

fn leading_number(part: Option<&str>) -> u32 {
    let part = part.unwrap_or("");
    let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPORAL_PRECISION: ServerVersion = ServerVersion::new(5, 6, 4);

    #[test]
    fn test_parse_plain_version() {
        assert_eq!(ServerVersion::parse("5.6.4"), ServerVersion::new(5, 6, 4));
        assert_eq!(ServerVersion::parse("8.0.32"), ServerVersion::new(8, 0, 32));
    }

    #[test]
    fn test_parse_strips_release_label() {
        assert_eq!(ServerVersion::parse("5.7.44-log"), ServerVersion::new(5, 7, 44));
        assert_eq!(
            ServerVersion::parse("10.11.6-MariaDB-0+deb12u1"),
            ServerVersion::new(10, 11, 6)
        );
        assert_eq!(
            ServerVersion::parse("8.0.36-0ubuntu0.22.04.1"),
            ServerVersion::new(8, 0, 36)
        );
    }

    #[test]
    fn test_parse_incomplete_version() {
        assert_eq!(ServerVersion::parse("8"), ServerVersion::new(8, 0, 0));
        assert_eq!(ServerVersion::parse(""), ServerVersion::new(0, 0, 0));
    }

    #[test]
    fn test_componentwise_comparison() {
        let cmp = VersionComparison::Componentwise;
        assert!(ServerVersion::new(5, 6, 4).is_at_least(TEMPORAL_PRECISION, cmp));
        assert!(ServerVersion::new(5, 7, 44).is_at_least(TEMPORAL_PRECISION, cmp));
        assert!(!ServerVersion::new(5, 5, 62).is_at_least(TEMPORAL_PRECISION, cmp));
        assert!(!ServerVersion::new(5, 6, 3).is_at_least(TEMPORAL_PRECISION, cmp));
        // Newer major line with a low minor fails the minor component.
        assert!(!ServerVersion::new(8, 0, 32).is_at_least(TEMPORAL_PRECISION, cmp));
        // Higher minor with a low release fails the release component.
        assert!(!ServerVersion::new(5, 7, 1).is_at_least(TEMPORAL_PRECISION, cmp));
    }

    #[test]
    fn test_lexicographic_comparison() {
        let cmp = VersionComparison::Lexicographic;
        assert!(ServerVersion::new(5, 6, 4).is_at_least(TEMPORAL_PRECISION, cmp));
        assert!(ServerVersion::new(8, 0, 32).is_at_least(TEMPORAL_PRECISION, cmp));
        assert!(ServerVersion::new(5, 7, 1).is_at_least(TEMPORAL_PRECISION, cmp));
        assert!(!ServerVersion::new(5, 6, 3).is_at_least(TEMPORAL_PRECISION, cmp));
        assert!(!ServerVersion::new(5, 5, 62).is_at_least(TEMPORAL_PRECISION, cmp));
    }

    #[test]
    fn test_version_comparison_from_yaml() {
        let cmp: VersionComparison = serde_yaml::from_str("lexicographic").unwrap();
        assert_eq!(cmp, VersionComparison::Lexicographic);
        assert_eq!(VersionComparison::default(), VersionComparison::Componentwise);
    }
}
