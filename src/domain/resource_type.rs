// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provider Resource Type Taxonomy
//!
//! The closed set of provider resource types a site topology declares,
//! with their canonical type names as the orchestrator spells them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// Object storage bucket holding site assets
    #[serde(rename = "AWS::S3::Bucket")]
    Bucket,
    /// Access policy attached to a bucket
    #[serde(rename = "AWS::S3::BucketPolicy")]
    BucketPolicy,
    /// Managed TLS certificate
    #[serde(rename = "AWS::CertificateManager::Certificate")]
    Certificate,
    /// Content-delivery network distribution
    #[serde(rename = "AWS::CloudFront::Distribution")]
    Distribution,
    /// DNS record inside a hosted zone
    #[serde(rename = "AWS::Route53::RecordSet")]
    RecordSet,
}

impl ResourceType {
    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bucket => "Storage Bucket",
            Self::BucketPolicy => "Bucket Policy",
            Self::Certificate => "TLS Certificate",
            Self::Distribution => "CDN Distribution",
            Self::RecordSet => "DNS Record",
        }
    }

    /// Whether a DNS alias record may point at this resource
    pub fn is_alias_target(&self) -> bool {
        matches!(self, Self::Distribution)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_provider_names() {
        let names: Vec<String> = [
            ResourceType::Bucket,
            ResourceType::BucketPolicy,
            ResourceType::Certificate,
            ResourceType::Distribution,
            ResourceType::RecordSet,
        ]
        .iter()
        .map(|t| serde_json::to_string(t).unwrap())
        .collect();
        assert_eq!(
            names,
            vec![
                "\"AWS::S3::Bucket\"",
                "\"AWS::S3::BucketPolicy\"",
                "\"AWS::CertificateManager::Certificate\"",
                "\"AWS::CloudFront::Distribution\"",
                "\"AWS::Route53::RecordSet\"",
            ]
        );
        assert_eq!(
            serde_json::from_str::<ResourceType>("\"AWS::Route53::RecordSet\"").unwrap(),
            ResourceType::RecordSet
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ResourceType::Distribution.to_string(), "CDN Distribution");
        assert_eq!(ResourceType::RecordSet.to_string(), "DNS Record");
    }

    #[test]
    fn test_alias_targets() {
        assert!(ResourceType::Distribution.is_alias_target());
        assert!(!ResourceType::Bucket.is_alias_target());
        assert!(!ResourceType::RecordSet.is_alias_target());
    }
}
