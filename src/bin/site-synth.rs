// Copyright (c) 2025 - Cowboy AI, Inc.
//! Site Topology Synthesizer
//!
//! Synthesizes the static-site topology and prints the desired-state
//! document to stdout. Submitting it (diff, apply, destroy) is left to the
//! orchestrator.
//!
//! Run with:
//!   cargo run --bin site-synth -- site.json
//!   SITE_DOMAIN_NAME=example.com SITE_INCLUDE_WWW=true cargo run --bin site-synth
//!
//! Without a file argument the configuration is read from `SITE_*`
//! environment variables (see `SiteConfig::from_env`).

use anyhow::{Context, Result};
use site_topology::domain::invariants::audit_document;
use site_topology::{synthesize, SiteConfig};
use tracing::{debug, info};

/// Load configuration from the file named on the command line, or the environment
fn load_config() -> Result<SiteConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!("📋 Loading configuration from {}", path);
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path))?;
            SiteConfig::from_json(&raw).context("Failed to parse config file")
        }
        None => {
            info!("📋 Loading configuration from environment");
            SiteConfig::from_env().context("Failed to read SITE_* environment")
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the document
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = load_config()?;
    debug!(?config, "Configuration loaded");

    let document = synthesize(&config).context("Failed to synthesize site topology")?;
    audit_document(&document).context("Synthesized document failed its audit")?;

    let order: Vec<String> = document
        .resources_in_apply_order()
        .context("Synthesized document has no valid apply order")?
        .into_iter()
        .map(|resource| resource.logical_id.to_string())
        .collect();
    debug!(order = ?order, "Apply order");

    for warning in document.warnings() {
        info!("⚠️ {}", warning);
    }

    println!("{}", document.to_json_pretty()?);
    info!("✅ Document written ({} resources)", document.resources().len());
    Ok(())
}
