// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for site-topology
//!
//! Deterministic configurations for the scenarios every test suite shares.

#![allow(dead_code)]

use site_topology::{SiteConfig, ViewerProtocolPolicy};

pub const DOMAIN: &str = "example.com";
pub const WWW_DOMAIN: &str = "www.example.com";
pub const BUCKET_ALIAS_LABEL: &str = "s3";
pub const BUCKET_ALIAS_DOMAIN: &str = "s3.example.com";

/// Apex only
pub fn apex_only() -> SiteConfig {
    SiteConfig::new(DOMAIN)
}

/// Apex plus `www`
pub fn with_www() -> SiteConfig {
    SiteConfig::new(DOMAIN).with_www_alias(true)
}

/// Apex plus `www`, HTTPS redirect and the bucket-direct CNAME
pub fn full() -> SiteConfig {
    SiteConfig::new(DOMAIN)
        .with_www_alias(true)
        .with_viewer_protocol_policy(ViewerProtocolPolicy::RedirectToHttps)
        .with_bucket_direct_alias(BUCKET_ALIAS_LABEL)
}

/// Same as [`full`] as a JSON config file
pub const FULL_CONFIG_JSON: &str = r#"{
    "domainName": "example.com",
    "includeWwwAlias": true,
    "viewerProtocolPolicy": "REDIRECT_TO_HTTPS",
    "bucketDirectAliasLabel": "s3"
}"#;
