// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain Name Value Objects with DNS Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Domain name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainNameError {
    #[error("Domain name is empty")]
    Empty,

    #[error("Domain name exceeds maximum length of 253 characters: {0}")]
    TooLong(usize),

    #[error("Label exceeds maximum length of 63 characters: {0}")]
    LabelTooLong(String),

    #[error("Empty label in domain name: {0}")]
    EmptyLabel(String),

    #[error("Invalid character in domain name: {0}")]
    InvalidCharacter(char),

    #[error("Label cannot start or end with hyphen: {0}")]
    InvalidLabelFormat(String),

    #[error("Top-level label cannot be all numeric: {0}")]
    NumericTld(String),

    #[error("Wildcard is only allowed as the whole leftmost label: {0}")]
    MisplacedWildcard(String),
}

/// Fully qualified domain name value object
///
/// RFC 1123 hostname rules, stored in canonical form: lowercase and without
/// the trailing root dot.
///
/// - Total length ≤ 253 characters
/// - Each label 1..=63 characters of `[a-z0-9-]`
/// - Labels cannot start or end with hyphens
/// - The top-level label cannot be all numeric
///
/// # Examples
///
/// ```rust
/// use site_topology::domain::DomainName;
///
/// let apex = DomainName::new("Example.COM.").unwrap();
/// assert_eq!(apex.as_str(), "example.com");
///
/// let www = apex.subdomain("www").unwrap();
/// assert_eq!(www.as_str(), "www.example.com");
///
/// assert!(DomainName::new("").is_err());
/// assert!(DomainName::new("-invalid.com").is_err());
/// assert!(DomainName::new("*.example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Maximum total length (RFC 1123)
    pub const MAX_LENGTH: usize = 253;

    /// Maximum length for a single label (RFC 1123)
    pub const MAX_LABEL_LENGTH: usize = 63;

    /// Create a new domain name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, DomainNameError> {
        let name = name.into();
        let trimmed = name.trim();
        let canonical = trimmed
            .strip_suffix('.')
            .unwrap_or(trimmed)
            .to_ascii_lowercase();

        if canonical.is_empty() {
            return Err(DomainNameError::Empty);
        }

        if canonical.len() > Self::MAX_LENGTH {
            return Err(DomainNameError::TooLong(canonical.len()));
        }

        for label in canonical.split('.') {
            if label.contains('*') {
                return Err(DomainNameError::MisplacedWildcard(canonical.clone()));
            }
            Self::validate_label(label, &canonical)?;
        }

        if let Some(tld) = canonical.rsplit('.').next() {
            if tld.chars().all(|c| c.is_ascii_digit()) {
                return Err(DomainNameError::NumericTld(tld.to_string()));
            }
        }

        Ok(Self(canonical))
    }

    /// Validate a single DNS label
    pub(crate) fn validate_label(label: &str, whole: &str) -> Result<(), DomainNameError> {
        if label.is_empty() {
            return Err(DomainNameError::EmptyLabel(whole.to_string()));
        }

        if label.len() > Self::MAX_LABEL_LENGTH {
            return Err(DomainNameError::LabelTooLong(label.to_string()));
        }

        if let Some(ch) = label
            .chars()
            .find(|ch| !ch.is_ascii_alphanumeric() && *ch != '-')
        {
            return Err(DomainNameError::InvalidCharacter(ch));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(DomainNameError::InvalidLabelFormat(label.to_string()));
        }

        Ok(())
    }

    /// Get the domain name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute form with the trailing root dot, as DNS zones spell record names
    pub fn to_absolute(&self) -> String {
        format!("{}.", self.0)
    }

    /// Everything after the leftmost label
    pub fn parent(&self) -> Option<DomainName> {
        self.0
            .split_once('.')
            .map(|(_, parent)| DomainName(parent.to_string()))
    }

    /// Whether the name has more than one label
    pub fn is_fqdn(&self) -> bool {
        self.0.contains('.')
    }

    /// Prepend a single label: `www` + `example.com` → `www.example.com`
    pub fn subdomain(&self, label: &str) -> Result<DomainName, DomainNameError> {
        let label = label.trim().to_ascii_lowercase();
        if label.contains('.') || label.contains('*') {
            return Err(DomainNameError::InvalidLabelFormat(label));
        }
        Self::new(format!("{}.{}", label, self.0))
    }

    /// `*.<self>`
    pub fn wildcard(&self) -> NamePattern {
        NamePattern::Wildcard(self.clone())
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DomainName {
    type Err = DomainNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DomainName {
    type Error = DomainNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DomainName {
    type Error = DomainNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DomainName> for String {
    fn from(name: DomainName) -> Self {
        name.0
    }
}

/// A name a certificate can be issued for
///
/// A wildcard matches exactly one additional label: `*.example.com` covers
/// `www.example.com` but neither `example.com` nor `a.b.example.com`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NamePattern {
    Exact(DomainName),
    Wildcard(DomainName),
}

impl NamePattern {
    /// Parse `example.com` or `*.example.com`
    pub fn parse(pattern: &str) -> Result<Self, DomainNameError> {
        match pattern.trim().strip_prefix("*.") {
            Some(parent) => Ok(Self::Wildcard(DomainName::new(parent)?)),
            None => Ok(Self::Exact(DomainName::new(pattern)?)),
        }
    }

    /// Whether a certificate carrying this name is valid for `name`
    pub fn covers(&self, name: &DomainName) -> bool {
        match self {
            Self::Exact(exact) => exact == name,
            Self::Wildcard(parent) => name.parent().as_ref() == Some(parent),
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => write!(f, "{}", name),
            Self::Wildcard(parent) => write!(f, "*.{}", parent),
        }
    }
}

impl From<DomainName> for NamePattern {
    fn from(name: DomainName) -> Self {
        Self::Exact(name)
    }
}

impl TryFrom<String> for NamePattern {
    type Error = DomainNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NamePattern> for String {
    fn from(pattern: NamePattern) -> Self {
        pattern.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_valid_domain_names() {
        assert!(DomainName::new("example.com").is_ok());
        assert!(DomainName::new("www.example.com").is_ok());
        assert!(DomainName::new("api-server.prod.us-east-1.example.com").is_ok());
        assert!(DomainName::new("localhost").is_ok());
        assert!(DomainName::new("a.b").is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "whitespace")]
    #[test_case("-invalid.com" ; "leading hyphen")]
    #[test_case("invalid-.com" ; "trailing hyphen")]
    #[test_case("invalid..com" ; "empty label")]
    #[test_case("under_score.com" ; "underscore")]
    #[test_case("example.123" ; "numeric tld")]
    #[test_case("*.example.com" ; "wildcard")]
    #[test_case("www.*.com" ; "inner wildcard")]
    fn test_invalid_domain_names(input: &str) {
        assert!(DomainName::new(input).is_err());
    }

    #[test]
    fn test_length_limits() {
        let long_label = "a".repeat(64);
        assert!(DomainName::new(format!("{}.com", long_label)).is_err());

        let max_label = "a".repeat(63);
        assert!(DomainName::new(format!("{}.com", max_label)).is_ok());

        let long_name = format!("{}.{}.com", "a".repeat(125), "b".repeat(125));
        assert_eq!(
            DomainName::new(long_name),
            Err(DomainNameError::TooLong(255))
        );
    }

    #[test]
    fn test_canonical_form() {
        let name = DomainName::new("WWW.Example.COM.").unwrap();
        assert_eq!(name.as_str(), "www.example.com");
        assert_eq!(name.to_absolute(), "www.example.com.");
        assert_eq!(name.parent().unwrap().as_str(), "example.com");
        assert!(name.is_fqdn());
    }

    #[test]
    fn test_subdomain() {
        let apex = DomainName::new("example.com").unwrap();
        assert_eq!(apex.subdomain("S3").unwrap().as_str(), "s3.example.com");
        assert!(apex.subdomain("a.b").is_err());
        assert!(apex.subdomain("").is_err());
        assert!(apex.subdomain("-x").is_err());
    }

    #[test]
    fn test_wildcard_coverage() {
        let apex = DomainName::new("example.com").unwrap();
        let wildcard = apex.wildcard();

        assert_eq!(wildcard.to_string(), "*.example.com");
        assert!(wildcard.covers(&DomainName::new("www.example.com").unwrap()));
        assert!(!wildcard.covers(&apex));
        assert!(!wildcard.covers(&DomainName::new("a.b.example.com").unwrap()));
        assert!(NamePattern::from(apex.clone()).covers(&apex));
    }

    #[test]
    fn test_pattern_parse() {
        assert_eq!(
            NamePattern::parse("*.Example.com").unwrap(),
            DomainName::new("example.com").unwrap().wildcard()
        );
        assert!(matches!(
            NamePattern::parse("example.com").unwrap(),
            NamePattern::Exact(_)
        ));
        assert!(NamePattern::parse("*.*.example.com").is_err());
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let json = serde_json::to_string(&DomainName::new("example.com").unwrap()).unwrap();
        assert_eq!(json, "\"example.com\"");
        assert!(serde_json::from_str::<DomainName>("\"-bad.com\"").is_err());
    }
}
