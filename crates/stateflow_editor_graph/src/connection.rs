// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the flowchart.

use crate::node::NodeName;
use crate::render::LineId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered pair of node names identifying a directed edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    /// Source node
    pub from: NodeName,
    /// Destination node
    pub to: NodeName,
}

impl EdgeKey {
    /// Create an edge key
    pub fn new(from: impl Into<NodeName>, to: impl Into<NodeName>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// The key of the opposite-direction edge
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    /// Whether this key would describe a self-loop
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }

    /// Check if this edge involves a specific node
    pub fn involves(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Source node
    pub from: NodeName,
    /// Destination node
    pub to: NodeName,
    /// Perpendicular displacement, nonzero only while the reverse edge exists
    pub offset: f32,
    /// Handle of the line widget held by the render container
    pub line: LineId,
}

impl Connection {
    /// Create a new connection
    pub fn new(from: NodeName, to: NodeName, offset: f32, line: LineId) -> Self {
        Self {
            from,
            to,
            offset,
            line,
        }
    }

    /// Key of this connection
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }

    /// Replace every reference to `old` with `new`. Returns true if anything changed.
    pub(crate) fn rename_node(&mut self, old: &str, new: &NodeName) -> bool {
        let mut changed = false;
        if self.from == old {
            self.from = new.clone();
            changed = true;
        }
        if self.to == old {
            self.to = new.clone();
            changed = true;
        }
        changed
    }
}
