// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Topology Invariants
//!
//! Structural rules a desired-state document must satisfy before an
//! orchestrator would accept it. All functions are pure and deterministic.
//!
//! # Invariant Categories
//!
//! 1. **Identity**: logical ids and export names are unique and well formed
//! 2. **Storage**: a public-read grant is not blocked by its bucket's access block
//! 3. **Coverage**: every served domain name is covered by its certificate
//! 4. **Zone**: `(name, type)` pairs are unique, a CNAME owns its name, and
//!    alias targets are aliasable
//! 5. **Ordering**: the dependency graph is acyclic and closed
//!
//! `synthesize` does not run these checks; conditions the orchestrator owns
//! are reported by the orchestrator. [`audit_document`] exists for callers
//! and tests that want the same answer before submitting.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{DomainName, ResourceType};
use crate::template::{
    BucketPolicyProperties, DesiredStateDocument, Expr, RecordType, ResourceProperties,
};

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error with context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Logical id is empty or contains non-alphanumerics
    #[error("Invalid logical id: {0:?}")]
    InvalidLogicalId(String),

    /// Two declarations share a logical id
    #[error("Duplicate logical id: {0}")]
    DuplicateLogicalId(String),

    /// Two outputs share an export name
    #[error("Duplicate export name: {0}")]
    DuplicateExport(String),

    /// Served domain name outside the certificate's name set
    #[error("Domain name {name} is not covered by certificate {certificate}")]
    UncoveredDomainName { name: String, certificate: String },

    /// Distribution's certificate reference does not name a certificate
    #[error("Distribution {distribution} does not reference a declared certificate")]
    MissingCertificate { distribution: String },

    /// Bucket policy grant the bucket's public access block would reject
    #[error("Public-read grant {policy} is blocked by the public access block of {bucket}")]
    PublicGrantBlocked { policy: String, bucket: String },

    /// Bucket policy attached to something that is not a declared bucket
    #[error("Bucket policy {policy} does not reference a declared bucket")]
    MissingBucket { policy: String },

    /// Same name and type declared twice in the zone
    #[error("Duplicate {record_type} record for {name}")]
    DuplicateRecord { name: String, record_type: String },

    /// CNAME sharing its name with another record
    #[error("CNAME record for {name} cannot coexist with other records at that name")]
    CnameConflict { name: String },

    /// Alias record pointing at something that cannot be aliased
    #[error("Alias record {record} targets non-aliasable {target}")]
    InvalidAliasTarget { record: String, target: String },

    /// Reference to an undeclared resource or parameter
    #[error("{from} references undeclared {to}")]
    DanglingReference { from: String, to: String },

    /// Dependency graph has a cycle through the listed resources
    #[error("Dependency cycle among: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),
}

/// Validate a template logical id
///
/// # Rules
/// - Non-empty
/// - ASCII alphanumerics only
pub fn validate_logical_id(id: &str) -> ValidationResult {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidLogicalId(id.to_string()));
    }
    Ok(())
}

/// Validate every served name is covered by one of the certificate names
pub fn validate_certificate_coverage(
    certificate: &str,
    covers: impl Fn(&DomainName) -> bool,
    served: &[DomainName],
) -> ValidationResult {
    match served.iter().find(|name| !covers(name)) {
        Some(name) => Err(ValidationError::UncoveredDomainName {
            name: name.to_string(),
            certificate: certificate.to_string(),
        }),
        None => Ok(()),
    }
}

/// Validate zone records
///
/// # Rules
/// - `(name, type)` pairs are unique
/// - A CNAME is the only record at its name
///
/// Names compare case-insensitively, with or without the root dot.
pub fn validate_unique_records<'a>(
    records: impl IntoIterator<Item = (&'a str, RecordType)>,
) -> ValidationResult {
    let mut seen: BTreeMap<String, BTreeSet<RecordType>> = BTreeMap::new();
    for (name, record_type) in records {
        let types = seen
            .entry(name.trim_end_matches('.').to_ascii_lowercase())
            .or_default();
        if !types.insert(record_type) {
            return Err(ValidationError::DuplicateRecord {
                name: name.to_string(),
                record_type: record_type.to_string(),
            });
        }
        if types.len() > 1 && types.contains(&RecordType::Cname) {
            return Err(ValidationError::CnameConflict {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Validate export names are unique within the document
pub fn validate_unique_exports<'a>(exports: impl IntoIterator<Item = &'a str>) -> ValidationResult {
    let mut seen = BTreeSet::new();
    for export in exports {
        if !seen.insert(export) {
            return Err(ValidationError::DuplicateExport(export.to_string()));
        }
    }
    Ok(())
}

/// Validate a public-read bucket policy can take effect on its bucket
pub fn validate_public_grant(
    document: &DesiredStateDocument,
    policy_id: &str,
    policy: &BucketPolicyProperties,
) -> ValidationResult {
    let bucket = match &policy.bucket {
        Expr::Ref(bucket_id) => document.resource(bucket_id).and_then(|r| match &r.properties {
            ResourceProperties::Bucket(bucket) => Some((bucket_id, bucket)),
            _ => None,
        }),
        _ => None,
    };
    let Some((bucket_id, bucket)) = bucket else {
        return Err(ValidationError::MissingBucket {
            policy: policy_id.to_string(),
        });
    };
    if !bucket.public_access_block_configuration.permits_public_policy() {
        return Err(ValidationError::PublicGrantBlocked {
            policy: policy_id.to_string(),
            bucket: bucket_id.to_string(),
        });
    }
    Ok(())
}

/// Validate an alias record points at an aliasable resource type
pub fn validate_alias_target(record: &str, target: ResourceType) -> ValidationResult {
    if !target.is_alias_target() {
        return Err(ValidationError::InvalidAliasTarget {
            record: record.to_string(),
            target: target.display_name().to_string(),
        });
    }
    Ok(())
}

/// Run every structural check against an assembled document
///
/// # Rules
/// - Each bucket policy's grant is permitted by its bucket's access block
/// - Each distribution references a declared certificate covering all its aliases
/// - Record `(name, type)` pairs are unique and CNAMEs own their names
/// - Alias records only target distributions
/// - Export names are unique
/// - The dependency graph is closed and acyclic
pub fn audit_document(document: &DesiredStateDocument) -> ValidationResult {
    for (id, resource) in document.resources() {
        if let ResourceProperties::BucketPolicy(policy) = &resource.properties {
            validate_public_grant(document, id.as_str(), policy)?;
        }
    }

    for (id, resource) in document.resources() {
        let ResourceProperties::Distribution(dist) = &resource.properties else {
            continue;
        };
        let config = &dist.distribution_config;
        let certificate = match &config.viewer_certificate.acm_certificate_arn {
            Expr::Ref(cert_id) => document.resource(cert_id).and_then(|r| match &r.properties {
                ResourceProperties::Certificate(cert) => Some((cert_id, cert)),
                _ => None,
            }),
            _ => None,
        };
        let Some((cert_id, cert)) = certificate else {
            return Err(ValidationError::MissingCertificate {
                distribution: id.to_string(),
            });
        };
        validate_certificate_coverage(cert_id.as_str(), |name| cert.covers(name), &config.aliases)?;
    }

    let records: Vec<_> = document.record_sets().collect();
    validate_unique_records(
        records
            .iter()
            .map(|(_, record)| (record.name.as_str(), record.record_type)),
    )?;

    for (id, record) in &records {
        let Some(alias) = &record.alias_target else {
            continue;
        };
        for target in alias.dns_name.references() {
            let target_type = document
                .resource(target)
                .map(|r| r.resource_type())
                .ok_or_else(|| ValidationError::DanglingReference {
                    from: id.to_string(),
                    to: target.to_string(),
                })?;
            validate_alias_target(id.as_str(), target_type)?;
        }
    }

    validate_unique_exports(document.outputs().values().map(|o| o.export_name.as_str()))?;

    document.dependency_graph()?.topological_order()?;
    Ok(())
}
