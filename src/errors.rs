// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for topology synthesis

use thiserror::Error;

use crate::domain::{DomainNameError, ValidationError};

/// Errors that can occur while synthesizing a site topology
///
/// Only pre-flight failures live here. Hosted zone resolution, certificate
/// validation and record conflicts are reported by the orchestrator at apply
/// time and never reach this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// Required configuration missing or malformed, including bad domain names
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Assembled document violates a structural invariant
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for synthesis operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;

impl From<DomainNameError> for SynthesisError {
    fn from(err: DomainNameError) -> Self {
        SynthesisError::Configuration(format!("invalid domain name: {}", err))
    }
}

impl From<serde_json::Error> for SynthesisError {
    fn from(err: serde_json::Error) -> Self {
        SynthesisError::Serialization(err.to_string())
    }
}
