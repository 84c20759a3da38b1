// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scenario Tests
//!
//! End-to-end synthesis of the documented topology variants:
//! - apex only
//! - apex plus `www`
//! - bucket-direct CNAME
//! - missing domain

mod fixtures;

use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use site_topology::domain::invariants::audit_document;
use site_topology::domain::ResourceType;
use site_topology::template::{RecordType, ResourceProperties};
use site_topology::{synthesize, DesiredStateDocument, SiteConfig, SynthesisError};

use fixtures::*;

/// `Fn::Select`/`Fn::Split` over the bucket's website URL
fn bucket_website_host() -> Value {
    let url = json!({ "Fn::GetAtt": ["SiteBucket", "WebsiteURL"] });
    json!({ "Fn::Select": [2, { "Fn::Split": ["/", url] }] })
}

fn record_names(doc: &DesiredStateDocument, record_type: RecordType) -> Vec<String> {
    doc.record_sets()
        .filter(|(_, record)| record.record_type == record_type)
        .map(|(_, record)| record.name.clone())
        .collect()
}

#[test]
fn test_apex_only_topology() -> Result<()> {
    let doc = synthesize(&apex_only())?;

    assert_eq!(doc.count_of(ResourceType::Bucket), 1);
    assert_eq!(doc.count_of(ResourceType::BucketPolicy), 1);
    assert_eq!(doc.count_of(ResourceType::Certificate), 1);
    assert_eq!(doc.count_of(ResourceType::Distribution), 1);
    assert_eq!(doc.count_of(ResourceType::RecordSet), 1);
    assert_eq!(doc.outputs().len(), 3);

    let (_, cert) = doc.certificates().next().expect("certificate declared");
    assert_eq!(cert.domain_name.to_string(), "*.example.com");
    assert_eq!(
        cert.subject_alternative_names
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec!["example.com"]
    );

    let (_, dist) = doc.distributions().next().expect("distribution declared");
    let aliases: Vec<&str> = dist
        .distribution_config
        .aliases
        .iter()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(aliases, vec![DOMAIN]);

    assert_eq!(record_names(&doc, RecordType::A), vec!["example.com."]);
    assert!(record_names(&doc, RecordType::Cname).is_empty());

    audit_document(&doc)?;
    Ok(())
}

#[test]
fn test_www_topology() -> Result<()> {
    let doc = synthesize(&with_www())?;

    let (dist_id, dist) = doc.distributions().next().expect("distribution declared");
    let aliases: Vec<&str> = dist
        .distribution_config
        .aliases
        .iter()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(aliases, vec![WWW_DOMAIN, DOMAIN]);

    let mut names = record_names(&doc, RecordType::A);
    names.sort();
    assert_eq!(names, vec!["example.com.", "www.example.com."]);

    // Both alias records resolve through the same distribution
    for (_, record) in doc.record_sets() {
        let alias = record.alias_target.as_ref().expect("alias record");
        let targets: Vec<&str> = alias
            .dns_name
            .references()
            .into_iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(targets, vec![dist_id.as_str()]);
    }

    audit_document(&doc)?;
    Ok(())
}

#[test]
fn test_bucket_direct_alias_topology() -> Result<()> {
    let without = synthesize(&with_www())?;
    let doc = synthesize(&with_www().with_bucket_direct_alias(BUCKET_ALIAS_LABEL))?;

    assert_eq!(
        doc.count_of(ResourceType::RecordSet),
        without.count_of(ResourceType::RecordSet) + 1
    );
    assert_eq!(record_names(&doc, RecordType::Cname), vec!["s3.example.com."]);

    let value = doc.to_value()?;
    let cname = &value["Resources"]["BucketDirectCnameRecord"];
    assert_eq!(cname["Properties"]["ResourceRecords"], json!([bucket_website_host()]));
    assert_eq!(cname["Properties"]["HostedZoneName"], "example.com.");
    assert_eq!(cname["DependsOn"], json!(["SiteBucket"]));
    assert_eq!(
        value["Outputs"]["bucketwebsiteurl"]["Value"],
        cname["Properties"]["ResourceRecords"][0]
    );

    // Bucket name is left to the provisioner, so the CNAME is flagged
    assert_eq!(doc.warnings().len(), 1);
    assert!(value["Metadata"]["Warnings"][0]
        .as_str()
        .unwrap_or_default()
        .contains(BUCKET_ALIAS_DOMAIN));

    audit_document(&doc)?;
    Ok(())
}

#[test]
fn test_missing_domain_fails_before_declaring() {
    let result = synthesize(&SiteConfig::default());
    assert_eq!(
        result,
        Err(SynthesisError::Configuration("domainName is required".to_string()))
    );
}

#[test]
fn test_config_file_matches_builder() -> Result<()> {
    let from_file = synthesize(&SiteConfig::from_json(FULL_CONFIG_JSON)?)?;
    let from_builder = synthesize(&full())?;
    assert_eq!(from_file.to_json_pretty()?, from_builder.to_json_pretty()?);
    Ok(())
}

#[test]
fn test_outputs_exports() -> Result<()> {
    let value = synthesize(&apex_only())?.to_value()?;
    assert_eq!(
        value["Outputs"],
        json!({
            "bucketwebsiteurl": {
                "Description": "bucket website-url",
                "Value": bucket_website_host(),
                "Export": { "Name": "bucketwebsiteUrl" }
            },
            "cloudfronturl": {
                "Description": "cloudfront website-url",
                "Value": { "Fn::GetAtt": ["SiteDistribution", "DomainName"] },
                "Export": { "Name": "cloudfrontURL" }
            },
            "websiteurl": {
                "Description": "custom url",
                "Value": "example.com",
                "Export": { "Name": "websiteUrl" }
            }
        })
    );
    Ok(())
}

#[test]
fn test_every_resource_kind_present_in_full_topology() -> Result<()> {
    let doc = synthesize(&full())?;
    let kinds: Vec<ResourceType> = doc
        .resources()
        .values()
        .map(|r| r.resource_type())
        .collect();

    for expected in [
        ResourceType::Bucket,
        ResourceType::BucketPolicy,
        ResourceType::Certificate,
        ResourceType::Distribution,
        ResourceType::RecordSet,
    ] {
        assert!(kinds.contains(&expected), "missing {expected}");
    }

    let bucket_policies = doc
        .resources()
        .values()
        .filter(|r| matches!(r.properties, ResourceProperties::BucketPolicy(_)))
        .count();
    assert_eq!(bucket_policies, 1);
    Ok(())
}
