// Copyright (c) 2025 - Cowboy AI, Inc.
//! Logical identifiers and intrinsic value expressions
//!
//! Values the orchestrator only knows at apply time (generated hostnames,
//! ARNs, the hosted zone id) are carried as expressions over logical ids.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;

use crate::domain::invariants::{validate_logical_id, ValidationError};

/// Template-unique identifier of a resource, parameter or output
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    /// Create a logical id; only ASCII alphanumerics are allowed
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_logical_id(&id)?;
        Ok(Self(id))
    }

    /// Derive a logical id from a free-form name by dropping everything
    /// that is not alphanumeric: `cloudfront-url` → `cloudfronturl`
    pub fn sanitized(name: &str) -> Result<Self, ValidationError> {
        Self::new(
            name.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value resolved by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Plain string
    Literal(String),
    /// Reference to a resource's primary id or a parameter's value
    Ref(LogicalId),
    /// Generated attribute of a resource
    GetAtt { target: LogicalId, attribute: String },
    /// Host part of a URL-valued expression (`http://host/` → `host`)
    HostOf(Box<Expr>),
    /// Concatenation
    Join(Vec<Expr>),
}

impl Expr {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn reference(target: &LogicalId) -> Self {
        Self::Ref(target.clone())
    }

    pub fn get_att(target: &LogicalId, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            target: target.clone(),
            attribute: attribute.into(),
        }
    }

    pub fn host_of(url: Expr) -> Self {
        Self::HostOf(Box::new(url))
    }

    /// Logical ids this expression reads from, in order of appearance
    pub fn references(&self) -> Vec<&LogicalId> {
        match self {
            Self::Literal(_) => Vec::new(),
            Self::Ref(target) | Self::GetAtt { target, .. } => vec![target],
            Self::HostOf(inner) => inner.references(),
            Self::Join(parts) => parts.iter().flat_map(Expr::references).collect(),
        }
    }

    /// Orchestrator-native JSON form
    pub fn to_value(&self) -> Value {
        match self {
            Self::Literal(value) => Value::String(value.clone()),
            Self::Ref(target) => json!({ "Ref": target.as_str() }),
            Self::GetAtt { target, attribute } => {
                json!({ "Fn::GetAtt": [target.as_str(), attribute] })
            }
            Self::HostOf(url) => {
                json!({ "Fn::Select": [2, { "Fn::Split": ["/", url.to_value()] }] })
            }
            Self::Join(parts) => {
                let parts: Vec<Value> = parts.iter().map(Expr::to_value).collect();
                json!({ "Fn::Join": ["", parts] })
            }
        }
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
