// Copyright (c) 2025 - Cowboy AI, Inc.
//! Desired-State Document
//!
//! The synthesized output: parameters, resource declarations with explicit
//! dependency edges, and exported outputs, serialized in the orchestrator's
//! native template schema.
//!
//! Every map is ordered by key, so serializing the same document twice
//! yields byte-identical text.

pub mod intrinsic;
pub mod resources;

pub use intrinsic::{Expr, LogicalId};
pub use resources::{
    AccessControl, AliasTarget, BucketPolicyProperties, BucketProperties, CacheBehavior,
    CertificateProperties, CustomOriginConfig, DistributionConfig, DistributionProperties,
    DomainValidationOption, Origin, OwnershipControls, OwnershipRule, PublicAccessBlock,
    RecordSetProperties, RecordType, ResourceDeclaration, ResourceProperties, ValidationMethod,
    ViewerCertificate, WebsiteConfiguration,
};

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::invariants::ValidationError;
use crate::domain::ResourceType;
use crate::errors::SynthesisResult;
use crate::graph::DependencyGraph;

/// Template schema version understood by the orchestrator
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Input resolved by the orchestrator at apply time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub parameter_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    pub name: String,
}

/// Named, exported value computed from the topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputValue {
    /// Human name the output was declared under (`cloudfront-url`)
    #[serde(skip)]
    pub name: String,
    /// Export identifier for cross-declaration reference (`cloudfrontURL`)
    #[serde(skip)]
    pub export_name: String,
    pub description: String,
    pub value: Expr,
    pub export: Export,
}

impl OutputValue {
    pub fn new(
        name: impl Into<String>,
        value: Expr,
        description: impl Into<String>,
        export_name: impl Into<String>,
    ) -> Self {
        let export_name = export_name.into();
        Self {
            name: name.into(),
            export: Export {
                name: export_name.clone(),
            },
            export_name,
            description: description.into(),
            value,
        }
    }
}

/// Free-form notes for whoever reads the template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Metadata {
    fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Declarative description of the target infrastructure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesiredStateDocument {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Metadata", skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
    #[serde(rename = "Parameters", skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<LogicalId, Parameter>,
    #[serde(rename = "Resources")]
    resources: BTreeMap<LogicalId, ResourceDeclaration>,
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<LogicalId, OutputValue>,
}

impl DesiredStateDocument {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            format_version: TEMPLATE_FORMAT_VERSION.to_string(),
            description: description.into(),
            metadata: Metadata::default(),
            parameters: BTreeMap::new(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    fn ensure_unused(&self, id: &LogicalId) -> Result<(), ValidationError> {
        if self.parameters.contains_key(id)
            || self.resources.contains_key(id)
            || self.outputs.contains_key(id)
        {
            return Err(ValidationError::DuplicateLogicalId(id.to_string()));
        }
        Ok(())
    }

    fn is_declared(&self, id: &LogicalId) -> bool {
        self.parameters.contains_key(id) || self.resources.contains_key(id)
    }

    pub fn add_parameter(
        &mut self,
        id: LogicalId,
        parameter: Parameter,
    ) -> Result<(), ValidationError> {
        self.ensure_unused(&id)?;
        self.parameters.insert(id, parameter);
        Ok(())
    }

    /// Declare a resource
    ///
    /// Every resource its properties read from becomes an explicit
    /// `DependsOn` edge. Referenced ids must already be declared, so
    /// declarations are added leaves first.
    pub fn add_resource(
        &mut self,
        mut declaration: ResourceDeclaration,
    ) -> Result<(), ValidationError> {
        self.ensure_unused(&declaration.logical_id)?;

        for reference in declaration.properties.references() {
            if !self.is_declared(&reference) {
                return Err(ValidationError::DanglingReference {
                    from: declaration.logical_id.to_string(),
                    to: reference.to_string(),
                });
            }
            if self.resources.contains_key(&reference) {
                declaration.depends_on.insert(reference);
            }
        }

        if let Some(missing) = declaration
            .depends_on
            .iter()
            .find(|dep| !self.resources.contains_key(*dep))
        {
            return Err(ValidationError::DanglingReference {
                from: declaration.logical_id.to_string(),
                to: missing.to_string(),
            });
        }

        self.resources
            .insert(declaration.logical_id.clone(), declaration);
        Ok(())
    }

    /// Declare an output; export names must be unique
    pub fn add_output(&mut self, output: OutputValue) -> Result<(), ValidationError> {
        let id = LogicalId::sanitized(&output.name)?;
        self.ensure_unused(&id)?;
        if self
            .outputs
            .values()
            .any(|existing| existing.export_name == output.export_name)
        {
            return Err(ValidationError::DuplicateExport(output.export_name));
        }
        for reference in output.value.references() {
            if !self.is_declared(reference) {
                return Err(ValidationError::DanglingReference {
                    from: id.to_string(),
                    to: reference.to_string(),
                });
            }
        }
        self.outputs.insert(id, output);
        Ok(())
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.metadata.warnings.push(warning.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.metadata.warnings
    }

    pub fn resources(&self) -> &BTreeMap<LogicalId, ResourceDeclaration> {
        &self.resources
    }

    pub fn resource(&self, id: &LogicalId) -> Option<&ResourceDeclaration> {
        self.resources.get(id)
    }

    pub fn outputs(&self) -> &BTreeMap<LogicalId, OutputValue> {
        &self.outputs
    }

    /// Output by its declared name (`website-url`)
    pub fn output(&self, name: &str) -> Option<&OutputValue> {
        self.outputs.values().find(|output| output.name == name)
    }

    pub fn resources_of_type(
        &self,
        resource_type: ResourceType,
    ) -> impl Iterator<Item = &ResourceDeclaration> {
        self.resources
            .values()
            .filter(move |resource| resource.resource_type() == resource_type)
    }

    pub fn count_of(&self, resource_type: ResourceType) -> usize {
        self.resources_of_type(resource_type).count()
    }

    pub fn certificates(&self) -> impl Iterator<Item = (&LogicalId, &CertificateProperties)> {
        self.resources.iter().filter_map(|(id, r)| match &r.properties {
            ResourceProperties::Certificate(cert) => Some((id, cert)),
            _ => None,
        })
    }

    pub fn distributions(&self) -> impl Iterator<Item = (&LogicalId, &DistributionProperties)> {
        self.resources.iter().filter_map(|(id, r)| match &r.properties {
            ResourceProperties::Distribution(dist) => Some((id, dist)),
            _ => None,
        })
    }

    pub fn record_sets(&self) -> impl Iterator<Item = (&LogicalId, &RecordSetProperties)> {
        self.resources.iter().filter_map(|(id, r)| match &r.properties {
            ResourceProperties::RecordSet(record) => Some((id, record)),
            _ => None,
        })
    }

    /// Graph of the declared `DependsOn` edges
    pub fn dependency_graph(&self) -> Result<DependencyGraph, ValidationError> {
        let mut graph = DependencyGraph::new();
        for (id, resource) in &self.resources {
            graph.add_node(id);
            for dependency in &resource.depends_on {
                graph.add_edge(id, dependency);
            }
        }
        graph.topological_order()?;
        Ok(graph)
    }

    /// Resources in the order the orchestrator may create them
    pub fn resources_in_apply_order(&self) -> Result<Vec<&ResourceDeclaration>, ValidationError> {
        let order = self.dependency_graph()?.topological_order()?;
        Ok(order
            .iter()
            .filter_map(|id| self.resources.get(id))
            .collect())
    }

    pub fn to_json(&self) -> SynthesisResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> SynthesisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_value(&self) -> SynthesisResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
