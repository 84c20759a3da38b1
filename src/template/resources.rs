// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed resource declarations
//!
//! One properties struct per provider resource type. Field names follow the
//! provider schema so serde emits them verbatim.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

use super::intrinsic::{Expr, LogicalId};
use crate::config::ViewerProtocolPolicy;
use crate::domain::{DomainName, NamePattern, ResourceType};

// ============================================================================
// Storage
// ============================================================================

/// Canned ACL applied to the bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessControl {
    BucketOwnerFullControl,
}

/// Public access block settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicAccessBlock {
    pub block_public_acls: bool,
    pub block_public_policy: bool,
    pub ignore_public_acls: bool,
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlock {
    /// Block ACL-based public access only; bucket policies stay usable
    pub fn block_acls() -> Self {
        Self {
            block_public_acls: true,
            block_public_policy: false,
            ignore_public_acls: true,
            restrict_public_buckets: false,
        }
    }

    /// Whether a public bucket policy can take effect under this block
    pub fn permits_public_policy(&self) -> bool {
        !self.block_public_policy && !self.restrict_public_buckets
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OwnershipControls {
    pub rules: Vec<OwnershipRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OwnershipRule {
    pub object_ownership: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebsiteConfiguration {
    pub index_document: String,
}

/// Object storage bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    pub access_control: AccessControl,
    pub ownership_controls: OwnershipControls,
    pub public_access_block_configuration: PublicAccessBlock,
    pub website_configuration: WebsiteConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    #[serde(rename = "AWS")]
    pub aws: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: String,
    pub principal: Principal,
    pub action: String,
    pub resource: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

/// Bucket policy carrying the public-read grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketPolicyProperties {
    pub bucket: Expr,
    pub policy_document: PolicyDocument,
}

impl BucketPolicyProperties {
    /// Anyone may read any object of `bucket`
    pub fn public_read(bucket: &LogicalId) -> Self {
        Self {
            bucket: Expr::reference(bucket),
            policy_document: PolicyDocument {
                version: "2012-10-17".to_string(),
                statement: vec![PolicyStatement {
                    effect: "Allow".to_string(),
                    principal: Principal {
                        aws: "*".to_string(),
                    },
                    action: "s3:GetObject".to_string(),
                    resource: Expr::Join(vec![
                        Expr::get_att(bucket, "Arn"),
                        Expr::literal("/*"),
                    ]),
                }],
            },
        }
    }
}

// ============================================================================
// Certificate
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationMethod {
    Dns,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainValidationOption {
    pub domain_name: NamePattern,
    pub hosted_zone_id: Expr,
}

/// Managed TLS certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateProperties {
    pub domain_name: NamePattern,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subject_alternative_names: Vec<NamePattern>,
    pub validation_method: ValidationMethod,
    pub domain_validation_options: Vec<DomainValidationOption>,
}

impl CertificateProperties {
    /// Primary name followed by the SANs
    pub fn covered_names(&self) -> Vec<&NamePattern> {
        std::iter::once(&self.domain_name)
            .chain(self.subject_alternative_names.iter())
            .collect()
    }

    /// Whether any covered name is valid for `name`
    pub fn covers(&self, name: &DomainName) -> bool {
        self.covered_names().iter().any(|pattern| pattern.covers(name))
    }
}

// ============================================================================
// Distribution
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomOriginConfig {
    #[serde(rename = "OriginProtocolPolicy")]
    pub origin_protocol_policy: String,
    #[serde(rename = "HTTPPort")]
    pub http_port: u16,
    #[serde(rename = "HTTPSPort")]
    pub https_port: u16,
    #[serde(rename = "OriginSSLProtocols")]
    pub origin_ssl_protocols: Vec<String>,
}

impl CustomOriginConfig {
    /// Bucket website endpoints only speak plain HTTP
    pub fn website_endpoint() -> Self {
        Self {
            origin_protocol_policy: "http-only".to_string(),
            http_port: 80,
            https_port: 443,
            origin_ssl_protocols: vec!["TLSv1.2".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Origin {
    pub id: String,
    pub domain_name: Expr,
    pub custom_origin_config: CustomOriginConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CacheBehavior {
    pub target_origin_id: String,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub cache_policy_id: String,
    pub compress: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewerCertificate {
    pub acm_certificate_arn: Expr,
    pub ssl_support_method: String,
    pub minimum_protocol_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionConfig {
    pub aliases: Vec<DomainName>,
    pub default_root_object: String,
    pub default_cache_behavior: CacheBehavior,
    pub enabled: bool,
    pub http_version: String,
    #[serde(rename = "IPV6Enabled")]
    pub ipv6_enabled: bool,
    pub origins: Vec<Origin>,
    pub viewer_certificate: ViewerCertificate,
}

/// Content-delivery network distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionProperties {
    pub distribution_config: DistributionConfig,
}

// ============================================================================
// DNS
// ============================================================================

/// Record types a site topology declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Cname,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::Cname => write!(f, "CNAME"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasTarget {
    #[serde(rename = "DNSName")]
    pub dns_name: Expr,
    #[serde(rename = "HostedZoneId")]
    pub hosted_zone_id: String,
}

/// Record in the site's hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordSetProperties {
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    /// Absolute zone name; the orchestrator resolves it by exact match
    pub hosted_zone_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_records: Vec<Expr>,
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

impl RecordSetProperties {
    /// Alias A-record pointing at a resource's generated hostname
    pub fn alias(
        name: &DomainName,
        zone: &DomainName,
        dns_name: Expr,
        alias_zone: &str,
    ) -> Self {
        Self {
            name: name.to_absolute(),
            record_type: RecordType::A,
            hosted_zone_name: zone.to_absolute(),
            alias_target: Some(AliasTarget {
                dns_name,
                hosted_zone_id: alias_zone.to_string(),
            }),
            resource_records: Vec::new(),
            ttl: None,
        }
    }

    /// Plain CNAME with a TTL in seconds
    pub fn cname(name: &DomainName, zone: &DomainName, target: Expr, ttl_secs: u32) -> Self {
        Self {
            name: name.to_absolute(),
            record_type: RecordType::Cname,
            hosted_zone_name: zone.to_absolute(),
            alias_target: None,
            resource_records: vec![target],
            ttl: Some(ttl_secs.to_string()),
        }
    }
}

// ============================================================================
// Declaration
// ============================================================================

/// Properties of any declared resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResourceProperties {
    Bucket(BucketProperties),
    BucketPolicy(BucketPolicyProperties),
    Certificate(CertificateProperties),
    Distribution(DistributionProperties),
    RecordSet(RecordSetProperties),
}

impl ResourceProperties {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Bucket(_) => ResourceType::Bucket,
            Self::BucketPolicy(_) => ResourceType::BucketPolicy,
            Self::Certificate(_) => ResourceType::Certificate,
            Self::Distribution(_) => ResourceType::Distribution,
            Self::RecordSet(_) => ResourceType::RecordSet,
        }
    }

    /// Every expression embedded in the properties
    fn expressions(&self) -> Vec<&Expr> {
        match self {
            Self::Bucket(_) => Vec::new(),
            Self::BucketPolicy(policy) => std::iter::once(&policy.bucket)
                .chain(policy.policy_document.statement.iter().map(|s| &s.resource))
                .collect(),
            Self::Certificate(cert) => cert
                .domain_validation_options
                .iter()
                .map(|option| &option.hosted_zone_id)
                .collect(),
            Self::Distribution(dist) => {
                let config = &dist.distribution_config;
                config
                    .origins
                    .iter()
                    .map(|origin| &origin.domain_name)
                    .chain(std::iter::once(&config.viewer_certificate.acm_certificate_arn))
                    .collect()
            }
            Self::RecordSet(record) => record
                .alias_target
                .iter()
                .map(|alias| &alias.dns_name)
                .chain(record.resource_records.iter())
                .collect(),
        }
    }

    /// Logical ids the properties read from, deduplicated and sorted
    pub fn references(&self) -> BTreeSet<LogicalId> {
        self.expressions()
            .into_iter()
            .flat_map(Expr::references)
            .cloned()
            .collect()
    }
}

/// A resource as handed to the orchestrator: type, properties and the
/// explicit set of resources it must be created after
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDeclaration {
    pub logical_id: LogicalId,
    pub properties: ResourceProperties,
    pub depends_on: BTreeSet<LogicalId>,
}

impl ResourceDeclaration {
    pub fn new(logical_id: LogicalId, properties: ResourceProperties) -> Self {
        Self {
            logical_id,
            properties,
            depends_on: BTreeSet::new(),
        }
    }

    /// Add an ordering edge that no property reference implies
    pub fn depends_on(mut self, other: &LogicalId) -> Self {
        self.depends_on.insert(other.clone());
        self
    }

    pub fn resource_type(&self) -> ResourceType {
        self.properties.resource_type()
    }
}

impl Serialize for ResourceDeclaration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.depends_on.is_empty() { 2 } else { 3 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("Type", &self.resource_type())?;
        map.serialize_entry("Properties", &self.properties)?;
        if !self.depends_on.is_empty() {
            map.serialize_entry("DependsOn", &self.depends_on)?;
        }
        map.end()
    }
}
