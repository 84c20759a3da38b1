//! Static website hosting topology
//!
//! Declares an object-storage bucket holding site assets, a CDN distribution
//! fronting it, a TLS certificate for the custom domain and the DNS records
//! binding the domain to the distribution, then synthesizes the whole thing
//! into a desired-state document for an external orchestrator.
//!
//! ```rust
//! use site_topology::{synthesize, SiteConfig, ViewerProtocolPolicy};
//!
//! let config = SiteConfig::new("example.com")
//!     .with_www_alias(true)
//!     .with_viewer_protocol_policy(ViewerProtocolPolicy::RedirectToHttps);
//!
//! let document = synthesize(&config).unwrap();
//! println!("{}", document.to_json_pretty().unwrap());
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod graph;
pub mod template;
pub mod topology;

// Re-export commonly used types
pub use config::{ResolvedSite, SiteConfig, ViewerProtocolPolicy};
pub use errors::{SynthesisError, SynthesisResult};
pub use graph::DependencyGraph;
pub use template::{DesiredStateDocument, OutputValue};
pub use topology::{synthesize, SiteTopology};
