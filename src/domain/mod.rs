// Copyright (c) 2025 - Cowboy AI, Inc.
//! Site Topology Domain Models
//!
//! Value objects with validation invariants shared by configuration,
//! template assembly and document audits.
//!
//! # Value Objects with Invariants
//!
//! - [`DomainName`] - DNS-validated domain names (RFC 1123), canonical lowercase
//! - [`NamePattern`] - exact or single-label wildcard certificate names
//! - [`ResourceType`] - provider resource type taxonomy
//!
//! # Invariants
//!
//! - [`invariants`] - pure checks over an assembled document

pub mod domain_name;
pub mod invariants;
pub mod resource_type;

pub use domain_name::{DomainName, DomainNameError, NamePattern};
pub use invariants::{ValidationError, ValidationResult};
pub use resource_type::ResourceType;
