// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Topology Synthesis

use proptest::prelude::*;
use std::collections::BTreeSet;

use site_topology::domain::invariants::audit_document;
use site_topology::domain::{DomainName, ResourceType};
use site_topology::template::RecordType;
use site_topology::{synthesize, SiteConfig, SynthesisError, ViewerProtocolPolicy};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// A DNS label: alphanumeric ends, hyphens only inside
fn label() -> impl Strategy<Value = String> {
    "[a-z0-9]([a-z0-9-]{0,10}[a-z0-9])?"
}

/// Apex domains of two or three labels with an alphabetic TLD
fn apex_domain() -> impl Strategy<Value = String> {
    (prop::collection::vec(label(), 1..3), "[a-z]{2,6}")
        .prop_map(|(labels, tld)| format!("{}.{}", labels.join("."), tld))
}

fn viewer_policy() -> impl Strategy<Value = ViewerProtocolPolicy> {
    prop_oneof![
        Just(ViewerProtocolPolicy::AllowAll),
        Just(ViewerProtocolPolicy::RedirectToHttps),
        Just(ViewerProtocolPolicy::HttpsOnly),
    ]
}

/// Valid configurations; the bucket alias label never collides with `www`
fn site_config() -> impl Strategy<Value = SiteConfig> {
    (
        apex_domain(),
        any::<bool>(),
        viewer_policy(),
        prop::option::of(label().prop_filter("www is reserved", |l| l != "www")),
    )
        .prop_map(|(domain, www, policy, alias)| {
            let config = SiteConfig::new(domain)
                .with_www_alias(www)
                .with_viewer_protocol_policy(policy);
            match alias {
                Some(label) => config.with_bucket_direct_alias(label),
                None => config,
            }
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: synthesis is pure
    ///
    /// The same configuration always serializes to the same bytes.
    #[test]
    fn prop_synthesis_is_deterministic(config in site_config()) {
        let first = synthesize(&config).unwrap().to_json_pretty().unwrap();
        let second = synthesize(&config).unwrap().to_json_pretty().unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: served names are {apex} or {www.apex, apex}, all covered by
    /// the certificate
    #[test]
    fn prop_distribution_names_are_covered(config in site_config()) {
        let doc = synthesize(&config).unwrap();
        let apex = DomainName::new(config.domain_name.clone().unwrap()).unwrap();
        let allowed: BTreeSet<DomainName> =
            [apex.clone(), apex.subdomain("www").unwrap()].into_iter().collect();

        let (_, cert) = doc.certificates().next().unwrap();
        for (_, dist) in doc.distributions() {
            let aliases = &dist.distribution_config.aliases;
            prop_assert!(aliases.contains(&apex));
            prop_assert_eq!(aliases.len(), if config.include_www_alias { 2 } else { 1 });
            for name in aliases {
                prop_assert!(allowed.contains(name));
                prop_assert!(cert.covers(name));
            }
        }
    }

    /// Property: one alias A-record per served name, `(name, type)` unique
    #[test]
    fn prop_one_alias_record_per_served_name(config in site_config()) {
        let doc = synthesize(&config).unwrap();
        let (_, dist) = doc.distributions().next().unwrap();

        let a_records: Vec<String> = doc
            .record_sets()
            .filter(|(_, r)| r.record_type == RecordType::A)
            .map(|(_, r)| r.name.clone())
            .collect();
        let served: BTreeSet<String> = dist
            .distribution_config
            .aliases
            .iter()
            .map(|name| name.to_absolute())
            .collect();

        prop_assert_eq!(a_records.len(), served.len());
        prop_assert_eq!(a_records.into_iter().collect::<BTreeSet<_>>(), served);

        let pairs: BTreeSet<(String, RecordType)> = doc
            .record_sets()
            .map(|(_, r)| (r.name.clone(), r.record_type))
            .collect();
        prop_assert_eq!(pairs.len(), doc.count_of(ResourceType::RecordSet));
    }

    /// Property: a CNAME exists exactly when the alias label is set
    #[test]
    fn prop_cname_follows_label(config in site_config()) {
        let doc = synthesize(&config).unwrap();
        let cnames: Vec<String> = doc
            .record_sets()
            .filter(|(_, r)| r.record_type == RecordType::Cname)
            .map(|(_, r)| r.name.clone())
            .collect();

        match &config.bucket_direct_alias_label {
            Some(label) => {
                prop_assert_eq!(
                    cnames,
                    vec![format!("{}.{}.", label, config.domain_name.clone().unwrap())]
                );
            }
            None => prop_assert!(cnames.is_empty()),
        }
    }

    /// Property: export names are unique and the document passes its audit
    #[test]
    fn prop_exports_unique_and_audit_passes(config in site_config()) {
        let doc = synthesize(&config).unwrap();
        let exports: BTreeSet<&str> = doc
            .outputs()
            .values()
            .map(|o| o.export_name.as_str())
            .collect();
        prop_assert_eq!(exports.len(), doc.outputs().len());
        prop_assert!(audit_document(&doc).is_ok());
    }

    /// Property: a blank domain never yields a document
    #[test]
    fn prop_blank_domain_rejected(blank in "[ \t]{0,4}", www in any::<bool>()) {
        let result = synthesize(&SiteConfig::new(blank).with_www_alias(www));
        prop_assert!(matches!(result, Err(SynthesisError::Configuration(_))));
    }
}
