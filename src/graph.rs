// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource dependency graph
//!
//! Edges point from a resource to the resources it must be created after.
//! The orchestrator walks this graph itself; the crate only needs to prove
//! it is closed and acyclic and to report a deterministic apply order.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::invariants::ValidationError;
use crate::template::LogicalId;

/// Directed acyclic dependency graph over logical ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    dependencies: BTreeMap<LogicalId, BTreeSet<LogicalId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node without edges (idempotent)
    pub fn add_node(&mut self, id: &LogicalId) {
        self.dependencies.entry(id.clone()).or_default();
    }

    /// `dependent` must be created after `dependency`
    pub fn add_edge(&mut self, dependent: &LogicalId, dependency: &LogicalId) {
        self.dependencies
            .entry(dependent.clone())
            .or_default()
            .insert(dependency.clone());
    }

    /// Nodes that directly depend on `id`
    pub fn dependents_of(&self, id: &LogicalId) -> Vec<&LogicalId> {
        self.dependencies
            .iter()
            .filter(|(_, deps)| deps.contains(id))
            .map(|(node, _)| node)
            .collect()
    }

    /// Leaves-first order; ties broken by logical id so the result is stable
    ///
    /// Fails on an edge to an unregistered node or on a cycle.
    pub fn topological_order(&self) -> Result<Vec<LogicalId>, ValidationError> {
        for (node, deps) in &self.dependencies {
            if let Some(missing) = deps.iter().find(|dep| !self.dependencies.contains_key(*dep)) {
                return Err(ValidationError::DanglingReference {
                    from: node.to_string(),
                    to: missing.to_string(),
                });
            }
        }

        let mut remaining: BTreeMap<&LogicalId, usize> = self
            .dependencies
            .iter()
            .map(|(node, deps)| (node, deps.len()))
            .collect();
        let mut ready: BTreeSet<&LogicalId> = remaining
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(node, _)| *node)
            .collect();
        let mut order = Vec::with_capacity(self.dependencies.len());

        while let Some(node) = ready.pop_first() {
            remaining.remove(node);
            order.push(node.clone());
            for dependent in self.dependents_of(node) {
                if let Some(count) = remaining.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if !remaining.is_empty() {
            return Err(ValidationError::DependencyCycle(
                remaining.keys().map(|id| id.to_string()).collect(),
            ));
        }

        Ok(order)
    }
}
