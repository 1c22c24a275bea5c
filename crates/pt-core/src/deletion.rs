//! Foreign-key-safe deletion ordering
//!
//! Tables are cleared children first: a table may only be deleted from once
//! every table referencing it has been emptied. The order is computed with
//! Kahn's algorithm over a child -> parent graph restricted to the working set.

use crate::error::{CoreError, CoreResult};
use crate::table_name::TableName;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// `child` holds a foreign key referencing `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub parent: TableName,
    pub child: TableName,
}

impl DependencyEdge {
    /// Create an edge from parent and child table names
    pub fn new(parent: impl Into<TableName>, child: impl Into<TableName>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

/// A column-level foreign key: `child_columns` of `child` reference
/// `parent_columns` of `parent`, pairwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub child: TableName,
    pub child_columns: Vec<String>,
    pub parent: TableName,
    pub parent_columns: Vec<String>,
}

impl ForeignKey {
    /// Table-level edge of this key
    pub fn edge(&self) -> DependencyEdge {
        DependencyEdge::new(self.parent.clone(), self.child.clone())
    }

    /// `(child column, parent column)` pairs; empty when the sides do not line up
    pub fn column_pairs(&self) -> Vec<(&str, &str)> {
        if self.child_columns.len() != self.parent_columns.len() {
            return Vec::new();
        }
        self.child_columns
            .iter()
            .zip(&self.parent_columns)
            .map(|(child, parent)| (child.as_str(), parent.as_str()))
            .collect()
    }
}

/// Tables in an order that is safe for row deletion (children before parents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionPlan {
    order: Vec<TableName>,
}

impl DeletionPlan {
    /// Tables in deletion order
    pub fn tables(&self) -> &[TableName] {
        &self.order
    }

    /// Number of tables in the plan
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the plan has no tables
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of a table in the plan (case-insensitive)
    pub fn position(&self, table: &str) -> Option<usize> {
        let key = TableName::new(table).key();
        self.order.iter().position(|t| t.key() == key)
    }

    /// Consume the plan and return the ordered names
    pub fn into_inner(self) -> Vec<TableName> {
        self.order
    }
}

/// Dependency graph over the working table set.
///
/// Edges point from a child table to the parent it references, so a node's
/// in-degree is the number of in-set children that must be cleared first.
#[derive(Debug)]
pub struct DeletionGraph {
    graph: DiGraph<TableName, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl DeletionGraph {
    /// Build the graph for `tables`, keeping only edges whose endpoints are
    /// both in the set. Duplicate table names collapse to the first spelling.
    pub fn build(tables: &[TableName], edges: &[DependencyEdge]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for table in tables {
            node_map
                .entry(table.key())
                .or_insert_with(|| graph.add_node(table.clone()));
        }

        for edge in edges {
            let child = node_map.get(&edge.child.key());
            let parent = node_map.get(&edge.parent.key());
            match (child, parent) {
                (Some(&child), Some(&parent)) => {
                    graph.update_edge(child, parent, ());
                }
                _ => log::debug!(
                    "Ignoring foreign key {} -> {}: endpoint outside the working set",
                    edge.child,
                    edge.parent
                ),
            }
        }

        Self { graph, node_map }
    }

    /// Compute the deletion order, failing if the restricted graph has a cycle.
    pub fn deletion_order(&self) -> CoreResult<DeletionPlan> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .count()
            })
            .collect();

        let mut queue: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx.index()] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(idx) = queue.pop_front() {
            order.push(self.graph[idx].clone());
            for parent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                let degree = &mut in_degree[parent.index()];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(parent);
                }
            }
        }

        if order.len() < self.graph.node_count() {
            let mut unplaced: Vec<String> = self
                .graph
                .node_indices()
                .filter(|idx| in_degree[idx.index()] > 0)
                .map(|idx| self.graph[idx].to_string())
                .collect();
            unplaced.sort();
            return Err(CoreError::CyclicDependency { tables: unplaced });
        }

        Ok(DeletionPlan { order })
    }
}

/// Compute a children-before-parents deletion order for `tables`.
///
/// Fails with [`CoreError::CyclicDependency`] listing the tables that could
/// not be placed. Foreign keys to tables outside the set are not considered.
pub fn compute_deletion_order(
    tables: &[TableName],
    edges: &[DependencyEdge],
) -> CoreResult<DeletionPlan> {
    let plan = DeletionGraph::build(tables, edges).deletion_order()?;
    log::debug!(
        "Deletion order: {}",
        plan.tables()
            .iter()
            .map(TableName::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(plan)
}

#[cfg(test)]
#[path = "deletion_test.rs"]
mod tests;
