//! Version types for exported artifacts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Semantic version, serialized as `major.minor.patch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    /// Incompatible changes
    pub major: u64,
    /// Backwards-compatible additions
    pub minor: u64,
    /// Fixes
    pub patch: u64,
}

impl Version {
    /// Create a new version
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse from string
    ///
    /// # Errors
    ///
    /// Returns error if format is invalid
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let parts: Vec<&str> = s.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(VersionError::InvalidFormat(s.to_string()));
        };

        let component = |part: &str| {
            part.parse::<u64>()
                .map_err(|_| VersionError::InvalidComponent(part.to_string()))
        };

        Ok(Self {
            major: component(major)?,
            minor: component(minor)?,
            patch: component(patch)?,
        })
    }

    /// Whether artifacts written under `other` can be read under `self`
    #[must_use]
    pub const fn is_compatible_with(&self, other: &Version) -> bool {
        self.major == other.major && self.minor >= other.minor
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Version-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Invalid format
    #[error("Invalid version format: {0}")]
    InvalidFormat(String),
    /// Invalid component
    #[error("Invalid version component: {0}")]
    InvalidComponent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v: Version = "1.2.3".parse().unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_version_parse_errors() {
        assert_eq!(
            Version::parse("1.2"),
            Err(VersionError::InvalidFormat("1.2".to_string()))
        );
        assert_eq!(
            Version::parse("1.x.0"),
            Err(VersionError::InvalidComponent("x".to_string()))
        );
    }

    #[test]
    fn test_version_serializes_as_text() {
        let json = serde_json::to_string(&Version::new(1, 0, 2)).unwrap();
        assert_eq!(json, r#""1.0.2""#);
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Version::new(1, 0, 2));
        assert!(serde_json::from_str::<Version>(r#""one""#).is_err());
    }

    #[test]
    fn test_version_compatibility() {
        let reader = Version::new(1, 2, 0);
        assert!(reader.is_compatible_with(&Version::new(1, 1, 9)));
        assert!(!reader.is_compatible_with(&Version::new(1, 3, 0)));
        assert!(!reader.is_compatible_with(&Version::new(2, 0, 0)));
    }
}
