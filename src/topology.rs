// Copyright (c) 2025 - Cowboy AI, Inc.
//! Site Topology Declaration
//!
//! Assembles the static-site topology into a desired-state document:
//!
//! ```text
//! SiteBucket ──► SiteBucketPolicy
//!     │
//!     ├──────► SiteDistribution ──► ApexAliasRecord / WwwAliasRecord
//!     │            ▲
//!     │        SiteCertificate ◄── HostedZoneId
//!     │
//!     └──► BucketDirectCnameRecord (optional)
//! ```
//!
//! Records bind to the zone by its absolute name, so the orchestrator fails
//! the apply when no zone matches the apex exactly.
//!
//! Synthesis is pure data assembly: no I/O, no lookups, and the same
//! configuration always yields the same document.

use tracing::{debug, info, warn};

use crate::config::{ResolvedSite, SiteConfig};
use crate::domain::{DomainName, NamePattern};
use crate::errors::SynthesisResult;
use crate::template::{
    AccessControl, BucketPolicyProperties, BucketProperties, CacheBehavior,
    CertificateProperties, CustomOriginConfig, DesiredStateDocument, DistributionConfig,
    DistributionProperties, DomainValidationOption, Expr, LogicalId, Origin, OutputValue,
    OwnershipControls, OwnershipRule, Parameter, PublicAccessBlock, RecordSetProperties,
    ResourceDeclaration, ResourceProperties, ValidationMethod, ViewerCertificate,
    WebsiteConfiguration,
};

/// Index document served for the site root and by the bucket website
pub const INDEX_DOCUMENT: &str = "index.html";

/// Fixed hosted zone every CDN distribution alias resolves through
pub const DISTRIBUTION_ALIAS_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// Provider-managed "caching optimized" cache policy
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

/// TTL of the bucket-direct CNAME, in seconds
pub const CNAME_TTL_SECS: u32 = 1800;

pub const BUCKET_ID: &str = "SiteBucket";
pub const BUCKET_POLICY_ID: &str = "SiteBucketPolicy";
pub const HOSTED_ZONE_PARAMETER_ID: &str = "HostedZoneId";
pub const CERTIFICATE_ID: &str = "SiteCertificate";
pub const DISTRIBUTION_ID: &str = "SiteDistribution";
pub const APEX_RECORD_ID: &str = "ApexAliasRecord";
pub const WWW_RECORD_ID: &str = "WwwAliasRecord";
pub const BUCKET_CNAME_RECORD_ID: &str = "BucketDirectCnameRecord";

const ORIGIN_ID: &str = "SiteBucketWebsiteOrigin";

/// The static-site topology for one configuration
#[derive(Debug, Clone)]
pub struct SiteTopology {
    site: ResolvedSite,
}

impl SiteTopology {
    /// Validate the configuration; fails before anything is declared
    pub fn new(config: &SiteConfig) -> SynthesisResult<Self> {
        Ok(Self {
            site: config.resolve()?,
        })
    }

    /// Assemble the desired-state document
    pub fn synthesize(&self) -> SynthesisResult<DesiredStateDocument> {
        let site = &self.site;
        info!(
            domain = %site.apex,
            www = site.www.is_some(),
            policy = %site.viewer_protocol_policy,
            "Synthesizing site topology"
        );

        let mut doc = DesiredStateDocument::new(format!("Static site hosting for {}", site.apex));

        let zone = self.declare_hosted_zone(&mut doc)?;
        let bucket = self.declare_bucket(&mut doc)?;
        let certificate = self.declare_certificate(&mut doc, &zone)?;
        let distribution = self.declare_distribution(&mut doc, &bucket, &certificate)?;
        self.declare_alias_records(&mut doc, &distribution)?;
        self.declare_bucket_direct_alias(&mut doc, &bucket)?;
        self.declare_outputs(&mut doc, &bucket, &distribution)?;

        info!(
            resources = doc.resources().len(),
            outputs = doc.outputs().len(),
            "Site topology synthesized"
        );
        Ok(doc)
    }

    /// Zone id for certificate validation, which only accepts an id; the
    /// orchestrator verifies it names an existing zone
    fn declare_hosted_zone(&self, doc: &mut DesiredStateDocument) -> SynthesisResult<LogicalId> {
        let id = LogicalId::new(HOSTED_ZONE_PARAMETER_ID)?;
        doc.add_parameter(
            id.clone(),
            Parameter {
                parameter_type: "AWS::Route53::HostedZone::Id".to_string(),
                description: format!("Existing hosted zone for {}", self.site.apex),
                default: self.site.hosted_zone_id.clone(),
            },
        )?;
        debug!(zone = %self.site.apex, "Hosted zone referenced");
        Ok(id)
    }

    fn declare_bucket(&self, doc: &mut DesiredStateDocument) -> SynthesisResult<LogicalId> {
        let id = LogicalId::new(BUCKET_ID)?;
        doc.add_resource(ResourceDeclaration::new(
            id.clone(),
            ResourceProperties::Bucket(BucketProperties {
                bucket_name: self.site.bucket_name.clone(),
                access_control: AccessControl::BucketOwnerFullControl,
                ownership_controls: OwnershipControls {
                    rules: vec![OwnershipRule {
                        object_ownership: "BucketOwnerPreferred".to_string(),
                    }],
                },
                public_access_block_configuration: PublicAccessBlock::block_acls(),
                website_configuration: WebsiteConfiguration {
                    index_document: INDEX_DOCUMENT.to_string(),
                },
            }),
        ))?;

        let policy_id = LogicalId::new(BUCKET_POLICY_ID)?;
        doc.add_resource(ResourceDeclaration::new(
            policy_id,
            ResourceProperties::BucketPolicy(BucketPolicyProperties::public_read(&id)),
        ))?;
        debug!(bucket = %id, "Bucket declared with public-read grant");
        Ok(id)
    }

    fn declare_certificate(
        &self,
        doc: &mut DesiredStateDocument,
        zone: &LogicalId,
    ) -> SynthesisResult<LogicalId> {
        let id = LogicalId::new(CERTIFICATE_ID)?;
        let primary = self.site.apex.wildcard();
        let apex = NamePattern::Exact(self.site.apex.clone());

        let validation = [&primary, &apex]
            .into_iter()
            .map(|name| DomainValidationOption {
                domain_name: name.clone(),
                hosted_zone_id: Expr::reference(zone),
            })
            .collect();

        doc.add_resource(ResourceDeclaration::new(
            id.clone(),
            ResourceProperties::Certificate(CertificateProperties {
                domain_name: primary,
                subject_alternative_names: vec![apex],
                validation_method: ValidationMethod::Dns,
                domain_validation_options: validation,
            }),
        ))?;
        debug!(certificate = %id, "Certificate declared");
        Ok(id)
    }

    fn declare_distribution(
        &self,
        doc: &mut DesiredStateDocument,
        bucket: &LogicalId,
        certificate: &LogicalId,
    ) -> SynthesisResult<LogicalId> {
        let id = LogicalId::new(DISTRIBUTION_ID)?;
        let aliases = self.site.served_names();

        doc.add_resource(ResourceDeclaration::new(
            id.clone(),
            ResourceProperties::Distribution(DistributionProperties {
                distribution_config: DistributionConfig {
                    aliases: aliases.clone(),
                    default_root_object: INDEX_DOCUMENT.to_string(),
                    default_cache_behavior: CacheBehavior {
                        target_origin_id: ORIGIN_ID.to_string(),
                        viewer_protocol_policy: self.site.viewer_protocol_policy,
                        cache_policy_id: CACHING_OPTIMIZED_POLICY_ID.to_string(),
                        compress: true,
                    },
                    enabled: true,
                    http_version: "http2".to_string(),
                    ipv6_enabled: true,
                    origins: vec![Origin {
                        id: ORIGIN_ID.to_string(),
                        domain_name: bucket_website_host(bucket),
                        custom_origin_config: CustomOriginConfig::website_endpoint(),
                    }],
                    viewer_certificate: ViewerCertificate {
                        acm_certificate_arn: Expr::reference(certificate),
                        ssl_support_method: "sni-only".to_string(),
                        minimum_protocol_version: "TLSv1.2_2021".to_string(),
                    },
                },
            }),
        ))?;
        debug!(distribution = %id, aliases = ?aliases, "Distribution declared");
        Ok(id)
    }

    fn declare_alias_records(
        &self,
        doc: &mut DesiredStateDocument,
        distribution: &LogicalId,
    ) -> SynthesisResult<()> {
        let records = self
            .site
            .www
            .iter()
            .map(|www| (WWW_RECORD_ID, www))
            .chain(std::iter::once((APEX_RECORD_ID, &self.site.apex)));

        for (record_id, name) in records {
            doc.add_resource(ResourceDeclaration::new(
                LogicalId::new(record_id)?,
                ResourceProperties::RecordSet(RecordSetProperties::alias(
                    name,
                    &self.site.apex,
                    Expr::get_att(distribution, "DomainName"),
                    DISTRIBUTION_ALIAS_ZONE_ID,
                )),
            ))?;
            debug!(record = record_id, name = %name, "Alias record declared");
        }
        Ok(())
    }

    /// Optional CNAME straight to the bucket website endpoint, bypassing the CDN
    ///
    /// The endpoint only answers for `<label>.<domain>` when the bucket is
    /// named exactly that. Nothing forces the name, so a mismatch is flagged
    /// rather than corrected.
    fn declare_bucket_direct_alias(
        &self,
        doc: &mut DesiredStateDocument,
        bucket: &LogicalId,
    ) -> SynthesisResult<()> {
        let Some(alias) = &self.site.bucket_direct_alias else {
            return Ok(());
        };

        doc.add_resource(ResourceDeclaration::new(
            LogicalId::new(BUCKET_CNAME_RECORD_ID)?,
            ResourceProperties::RecordSet(RecordSetProperties::cname(
                alias,
                &self.site.apex,
                bucket_website_host(bucket),
                CNAME_TTL_SECS,
            )),
        ))?;
        debug!(name = %alias, "Bucket-direct CNAME declared");

        if !self.site.bucket_alias_matches_name() {
            let warning = naming_coincidence_warning(alias, self.site.bucket_name.as_deref());
            warn!("{}", warning);
            doc.add_warning(warning);
        }
        Ok(())
    }

    fn declare_outputs(
        &self,
        doc: &mut DesiredStateDocument,
        bucket: &LogicalId,
        distribution: &LogicalId,
    ) -> SynthesisResult<()> {
        doc.add_output(OutputValue::new(
            "cloudfront-url",
            Expr::get_att(distribution, "DomainName"),
            "cloudfront website-url",
            "cloudfrontURL",
        ))?;
        doc.add_output(OutputValue::new(
            "website-url",
            Expr::literal(self.site.apex.as_str()),
            "custom url",
            "websiteUrl",
        ))?;
        doc.add_output(OutputValue::new(
            "bucket-website-url",
            bucket_website_host(bucket),
            "bucket website-url",
            "bucketwebsiteUrl",
        ))?;
        Ok(())
    }
}

/// Hostname of the bucket's static-website endpoint
fn bucket_website_host(bucket: &LogicalId) -> Expr {
    Expr::host_of(Expr::get_att(bucket, "WebsiteURL"))
}

fn naming_coincidence_warning(alias: &DomainName, bucket_name: Option<&str>) -> String {
    let bucket = match bucket_name {
        Some(name) => format!("the bucket is named {name:?}"),
        None => "the bucket name is generated".to_string(),
    };
    format!(
        "{alias} points at the bucket website endpoint, but {bucket}; \
         the endpoint only serves requests for a bucket named {:?}",
        alias.as_str()
    )
}

/// Validate `config` and synthesize its desired-state document
///
/// # Examples
///
/// ```rust
/// use site_topology::{synthesize, SiteConfig};
/// use site_topology::domain::ResourceType;
///
/// let doc = synthesize(&SiteConfig::new("example.com")).unwrap();
/// assert_eq!(doc.count_of(ResourceType::Distribution), 1);
/// assert_eq!(doc.outputs().len(), 3);
///
/// assert!(synthesize(&SiteConfig::default()).is_err());
/// ```
pub fn synthesize(config: &SiteConfig) -> SynthesisResult<DesiredStateDocument> {
    SiteTopology::new(config)?.synthesize()
}
