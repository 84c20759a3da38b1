// Copyright (c) 2025 - Cowboy AI, Inc.
//! Site topology configuration
//!
//! Everything that varies between deployments of the topology is injected
//! here; nothing is read from process-wide state during synthesis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::DomainName;
use crate::errors::{SynthesisError, SynthesisResult};

/// Label of the optional `www` alias
pub const WWW_LABEL: &str = "www";

/// Whether viewers may use plain HTTP
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    /// HTTP and HTTPS both served
    #[default]
    #[serde(alias = "ALLOW_ALL")]
    AllowAll,
    /// HTTP answered with a redirect to HTTPS
    #[serde(alias = "REDIRECT_TO_HTTPS")]
    RedirectToHttps,
    /// HTTP refused
    #[serde(alias = "HTTPS_ONLY")]
    HttpsOnly,
}

impl ViewerProtocolPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllowAll => "allow-all",
            Self::RedirectToHttps => "redirect-to-https",
            Self::HttpsOnly => "https-only",
        }
    }
}

impl fmt::Display for ViewerProtocolPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewerProtocolPolicy {
    type Err = SynthesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "allow-all" => Ok(Self::AllowAll),
            "redirect-to-https" => Ok(Self::RedirectToHttps),
            "https-only" => Ok(Self::HttpsOnly),
            other => Err(SynthesisError::Configuration(format!(
                "unknown viewer protocol policy: {other}"
            ))),
        }
    }
}

/// Raw site configuration, as read from a file or the environment
///
/// Field names are camelCase on the wire: `domainName`, `includeWwwAlias`,
/// `viewerProtocolPolicy`, `bucketDirectAliasLabel`, `bucketName`,
/// `hostedZoneId`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteConfig {
    /// Apex registered domain (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    /// Also serve `www.<domain>`
    #[serde(default)]
    pub include_www_alias: bool,

    #[serde(default)]
    pub viewer_protocol_policy: ViewerProtocolPolicy,

    /// Adds `<label>.<domain>` as a CNAME to the bucket website endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_direct_alias_label: Option<String>,

    /// Pin the bucket name instead of letting the provisioner generate one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,

    /// Default for the hosted zone parameter; the orchestrator still verifies it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_zone_id: Option<String>,
}

impl SiteConfig {
    /// Create a configuration for `domain_name` with every option off
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            domain_name: Some(domain_name.into()),
            ..Self::default()
        }
    }

    pub fn with_www_alias(mut self, include: bool) -> Self {
        self.include_www_alias = include;
        self
    }

    pub fn with_viewer_protocol_policy(mut self, policy: ViewerProtocolPolicy) -> Self {
        self.viewer_protocol_policy = policy;
        self
    }

    pub fn with_bucket_direct_alias(mut self, label: impl Into<String>) -> Self {
        self.bucket_direct_alias_label = Some(label.into());
        self
    }

    pub fn with_bucket_name(mut self, name: impl Into<String>) -> Self {
        self.bucket_name = Some(name.into());
        self
    }

    pub fn with_hosted_zone_id(mut self, id: impl Into<String>) -> Self {
        self.hosted_zone_id = Some(id.into());
        self
    }

    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> SynthesisResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SynthesisError::Configuration(format!("invalid config file: {e}")))
    }

    /// Load configuration from `SITE_*` environment variables
    ///
    /// - `SITE_DOMAIN_NAME`
    /// - `SITE_INCLUDE_WWW` (`true`/`false`/`1`/`0`/`yes`/`no`)
    /// - `SITE_VIEWER_PROTOCOL_POLICY`
    /// - `SITE_BUCKET_DIRECT_ALIAS`
    /// - `SITE_BUCKET_NAME`
    /// - `SITE_HOSTED_ZONE_ID`
    pub fn from_env() -> SynthesisResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SynthesisResult<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let include_www_alias = match get("SITE_INCLUDE_WWW") {
            Some(value) => parse_bool("SITE_INCLUDE_WWW", &value)?,
            None => false,
        };

        let viewer_protocol_policy = match get("SITE_VIEWER_PROTOCOL_POLICY") {
            Some(value) => value.parse()?,
            None => ViewerProtocolPolicy::default(),
        };

        Ok(Self {
            domain_name: get("SITE_DOMAIN_NAME"),
            include_www_alias,
            viewer_protocol_policy,
            bucket_direct_alias_label: get("SITE_BUCKET_DIRECT_ALIAS"),
            bucket_name: get("SITE_BUCKET_NAME"),
            hosted_zone_id: get("SITE_HOSTED_ZONE_ID"),
        })
    }

    /// Check the configuration and resolve every name it implies
    ///
    /// Runs before anything is declared, so a bad configuration never
    /// produces a partial document.
    pub fn resolve(&self) -> SynthesisResult<ResolvedSite> {
        let raw_domain = self
            .domain_name
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| SynthesisError::Configuration("domainName is required".to_string()))?;

        let apex = DomainName::new(raw_domain)?;
        if !apex.is_fqdn() {
            return Err(SynthesisError::Configuration(format!(
                "domainName must be a registered domain, got {apex}"
            )));
        }

        let www = if self.include_www_alias {
            Some(apex.subdomain(WWW_LABEL)?)
        } else {
            None
        };

        let bucket_direct_alias = match &self.bucket_direct_alias_label {
            Some(label) => {
                let alias = apex.subdomain(label).map_err(|e| {
                    SynthesisError::Configuration(format!(
                        "bucketDirectAliasLabel {label:?} is not a DNS label: {e}"
                    ))
                })?;
                if www.as_ref() == Some(&alias) {
                    return Err(SynthesisError::Configuration(format!(
                        "bucketDirectAliasLabel {label:?} collides with the www alias record"
                    )));
                }
                Some(alias)
            }
            None => None,
        };

        if let Some(name) = &self.bucket_name {
            validate_bucket_name(name)?;
        }

        let hosted_zone_id = match self.hosted_zone_id.as_deref().map(str::trim) {
            Some(id) if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) => {
                return Err(SynthesisError::Configuration(format!(
                    "hostedZoneId {id:?} is not a zone id"
                )));
            }
            Some(id) => Some(id.to_string()),
            None => None,
        };

        Ok(ResolvedSite {
            apex,
            www,
            viewer_protocol_policy: self.viewer_protocol_policy,
            bucket_direct_alias,
            bucket_name: self.bucket_name.clone(),
            hosted_zone_id,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> SynthesisResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(SynthesisError::Configuration(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}

/// Bucket naming rules: 3..=63 chars of `[a-z0-9.-]`, alphanumeric at both ends
fn validate_bucket_name(name: &str) -> SynthesisResult<()> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    let valid_ends = name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name.ends_with(|c: char| c.is_ascii_alphanumeric());

    if !(3..=63).contains(&name.len()) || !valid_chars || !valid_ends || name.contains("..") {
        return Err(SynthesisError::Configuration(format!(
            "bucketName {name:?} is not a valid bucket name"
        )));
    }
    Ok(())
}

/// Validated configuration with every derived name computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSite {
    pub apex: DomainName,
    pub www: Option<DomainName>,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub bucket_direct_alias: Option<DomainName>,
    pub bucket_name: Option<String>,
    pub hosted_zone_id: Option<String>,
}

impl ResolvedSite {
    /// Names the distribution serves, `www` first when enabled
    pub fn served_names(&self) -> Vec<DomainName> {
        self.www
            .iter()
            .cloned()
            .chain(std::iter::once(self.apex.clone()))
            .collect()
    }

    /// Whether the bucket-direct CNAME can resolve to this bucket's content:
    /// the bucket must be named exactly after the alias hostname
    pub fn bucket_alias_matches_name(&self) -> bool {
        match (&self.bucket_direct_alias, &self.bucket_name) {
            (Some(alias), Some(name)) => alias.as_str() == name,
            _ => false,
        }
    }
}
