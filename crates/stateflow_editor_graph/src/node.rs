// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node identity and the node provider seam.

use egui::{Pos2, Rect, Vec2};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique name of a flowchart node (a state, or an entry/exit point)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeName(String);

impl NodeName {
    /// Create a node name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for NodeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&NodeName> for NodeName {
    fn from(name: &NodeName) -> Self {
        name.clone()
    }
}

impl PartialEq<str> for NodeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Resolves node names to their bounding rectangles.
///
/// Implemented by the host scene graph. The connection graph calls this for
/// every geometry recompute and treats `None` as an unknown node.
pub trait NodeProvider {
    /// Bounding rectangle of the named node, in canvas space
    fn node_rect(&self, name: &str) -> Option<Rect>;
}

impl<T: NodeProvider + ?Sized> NodeProvider for &T {
    fn node_rect(&self, name: &str) -> Option<Rect> {
        (**self).node_rect(name)
    }
}

/// In-memory node provider, for headless hosts and tests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeTable {
    nodes: IndexMap<NodeName, NodeBounds>,
}

/// Position and size of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeBounds {
    /// Top-left corner
    pub position: [f32; 2],
    /// Width and height
    pub size: [f32; 2],
}

impl NodeBounds {
    /// Bounds from a position and a size
    pub fn new(position: [f32; 2], size: [f32; 2]) -> Self {
        Self { position, size }
    }

    /// Canvas-space rectangle
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.position[0], self.position[1]),
            Vec2::new(self.size[0], self.size[1]),
        )
    }
}

impl NodeTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a node
    pub fn insert(&mut self, name: impl Into<NodeName>, bounds: NodeBounds) {
        self.nodes.insert(name.into(), bounds);
    }

    /// Builder-style insert
    pub fn with_node(mut self, name: impl Into<NodeName>, position: [f32; 2], size: [f32; 2]) -> Self {
        self.insert(name, NodeBounds::new(position, size));
        self
    }

    /// Move a node. Returns false if it is unknown.
    pub fn move_to(&mut self, name: &str, position: [f32; 2]) -> bool {
        match self.nodes.get_mut(&NodeName::from(name)) {
            Some(bounds) => {
                bounds.position = position;
                true
            }
            None => false,
        }
    }

    /// Resize a node. Returns false if it is unknown.
    pub fn resize(&mut self, name: &str, size: [f32; 2]) -> bool {
        match self.nodes.get_mut(&NodeName::from(name)) {
            Some(bounds) => {
                bounds.size = size;
                true
            }
            None => false,
        }
    }

    /// Rename a node in place, keeping its table position.
    ///
    /// Fails if `old` is unknown or `new` is already taken.
    pub fn rename(&mut self, old: &str, new: impl Into<NodeName>) -> bool {
        let new = new.into();
        if self.nodes.contains_key(&new) {
            return false;
        }
        let Some(index) = self.nodes.get_index_of(&NodeName::from(old)) else {
            return false;
        };
        let Some((_, bounds)) = self.nodes.shift_remove_index(index) else {
            return false;
        };
        let (last, _) = self.nodes.insert_full(new, bounds);
        self.nodes.move_index(last, index);
        true
    }

    /// Remove a node
    pub fn remove(&mut self, name: &str) -> Option<NodeBounds> {
        self.nodes.shift_remove(&NodeName::from(name))
    }

    /// Bounds of a node
    pub fn bounds(&self, name: &str) -> Option<&NodeBounds> {
        self.nodes.get(&NodeName::from(name))
    }

    /// Iterate nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&NodeName, &NodeBounds)> {
        self.nodes.iter()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeProvider for NodeTable {
    fn node_rect(&self, name: &str) -> Option<Rect> {
        self.bounds(name).map(NodeBounds::rect)
    }
}
