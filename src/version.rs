// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Jira release versions.
//!
//! Jira versions are plain dotted numbers, e.g., "8.13.5". Only the numeric
//! components matter for deciding which defaults and template fragments
//! apply, so missing components are treated as zero ("8" equals "8.0.0").

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Dotted Jira release version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Construct new version.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new(8, 13, 5)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let data = data.trim();
        if data.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut parts = [0u32; 3];
        let mut components = data.split('.');
        for slot in parts.iter_mut() {
            match components.next() {
                Some(component) => {
                    *slot = component.parse().map_err(|_| VersionError::Malformed {
                        version: data.to_string(),
                    })?;
                }
                None => break,
            }
        }

        // INVARIANT: At most three components.
        if components.next().is_some() {
            return Err(VersionError::Malformed {
                version: data.to_string(),
            });
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl Display for Version {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = String::deserialize(deserializer)?;
        data.parse().map_err(serde::de::Error::custom)
    }
}

/// Version parsing error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// Version string is blank.
    #[error("version cannot be empty")]
    Empty,

    /// Version string is not made of up to three numeric components.
    #[error("malformed version {version:?}, expected something like \"8.13.5\"")]
    Malformed { version: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use simple_test_case::test_case;

    #[test_case("8.13.5", Version::new(8, 13, 5); "full")]
    #[test_case("8.1", Version::new(8, 1, 0); "missing patch")]
    #[test_case("9", Version::new(9, 0, 0); "major only")]
    #[test_case(" 7.2.0 ", Version::new(7, 2, 0); "padded")]
    #[test]
    fn parse_version(input: &str, expect: Version) {
        let result: Version = input.parse().unwrap();
        pretty_assertions::assert_eq!(result, expect);
    }

    #[test_case(""; "empty")]
    #[test_case("8.x.1"; "not numeric")]
    #[test_case("8.13.5.1"; "too many components")]
    #[test]
    fn reject_bad_version(input: &str) {
        assert!(input.parse::<Version>().is_err());
    }

    #[test]
    fn version_ordering() {
        assert!(Version::new(8, 1, 0) < Version::new(8, 13, 5));
        assert!(Version::new(7, 13, 0) < Version::new(8, 0, 0));
        assert_eq!(Version::new(8, 16, 0).to_string(), "8.16.0");
    }
}
