// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection graph: directed edges between named nodes, kept in step with
//! their line widgets.

use crate::config::FlowchartConfig;
use crate::connection::{Connection, EdgeKey};
use crate::geometry::{self, LineTransform};
use crate::node::{NodeName, NodeProvider};
use crate::render::{LineId, LineWidget, RenderContainer, RenderError};
use egui::{Pos2, Rect};
use indexmap::IndexMap;

/// In-progress connection from a node to a free point
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDrag {
    /// Source node
    pub from: NodeName,
    /// Current pointer position (canvas space)
    pub current_pos: Pos2,
}

/// Directed connection graph over named nodes.
///
/// Owns every [`Connection`]; the matching line widgets live in the render
/// container `R` from connect until disconnect or clear. Node bounds come
/// from the injected provider `P`.
pub struct ConnectionGraph<P, R> {
    provider: P,
    layer: R,
    config: FlowchartConfig,
    connections: IndexMap<EdgeKey, Connection>,
}

impl<P: NodeProvider, R: RenderContainer> ConnectionGraph<P, R> {
    /// Create an empty graph
    pub fn new(provider: P, layer: R, config: FlowchartConfig) -> Self {
        Self {
            provider,
            layer,
            config,
            connections: IndexMap::new(),
        }
    }

    /// Node provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Node provider, for moving or renaming nodes. Call
    /// [`refresh_node`](Self::refresh_node) afterwards.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Render container
    pub fn layer(&self) -> &R {
        &self.layer
    }

    /// Render container, mutably
    pub fn layer_mut(&mut self) -> &mut R {
        &mut self.layer
    }

    /// Current settings
    pub fn config(&self) -> &FlowchartConfig {
        &self.config
    }

    /// Connect two nodes with the default zero offset
    pub fn connect(
        &mut self,
        from: impl Into<NodeName>,
        to: impl Into<NodeName>,
    ) -> Result<Option<LineId>, GraphError> {
        self.connect_with_offset(from, to, 0.0)
    }

    /// Connect two nodes.
    ///
    /// Returns `Ok(None)` without touching anything for a self-edge or an
    /// existing edge. Fails before any mutation if either node is unknown.
    pub fn connect_with_offset(
        &mut self,
        from: impl Into<NodeName>,
        to: impl Into<NodeName>,
        offset: f32,
    ) -> Result<Option<LineId>, GraphError> {
        let key = EdgeKey::new(from, to);
        if key.is_loop() || self.connections.contains_key(&key) {
            tracing::trace!(edge = %key, "connect ignored");
            return Ok(None);
        }
        self.node_rect(&key.from)?;
        self.node_rect(&key.to)?;

        let line = LineId::new();
        self.layer.attach(LineWidget::new(line))?;
        self.connections.insert(
            key.clone(),
            Connection::new(key.from.clone(), key.to.clone(), offset, line),
        );
        tracing::debug!(edge = %key, "connected");

        let reverse = key.reversed();
        if self.connections.contains_key(&reverse) {
            let spacing = self.config.interconnection_spacing;
            self.set_offset(&key, spacing);
            self.set_offset(&reverse, spacing);
            self.redraw(&reverse)?;
        }
        self.redraw(&key)?;
        Ok(Some(line))
    }

    /// Remove an edge.
    ///
    /// Returns the detached line widget for the caller to dispose of, or
    /// `None` if there was no such edge. A surviving reverse edge gets its
    /// offset reset to zero.
    pub fn disconnect(&mut self, from: &str, to: &str) -> Option<LineWidget> {
        let key = EdgeKey::new(from, to);
        let connection = self.connections.shift_remove(&key)?;
        let line = self.layer.detach(connection.line);
        if line.is_none() {
            tracing::warn!(edge = %key, "disconnected edge had no attached line");
        }
        tracing::debug!(edge = %key, "disconnected");

        let reverse = key.reversed();
        if self.connections.contains_key(&reverse) {
            self.set_offset(&reverse, 0.0);
            if let Err(err) = self.redraw(&reverse) {
                tracing::warn!(edge = %reverse, "failed to redraw after disconnect: {err}");
            }
        }
        line
    }

    /// Rewrite every reference to `old` as `new`, as source and destination
    /// in the same pass. Offsets, line handles and edge order are kept.
    ///
    /// Returns the number of rewritten edges; zero when `old` has no edges.
    pub fn rename(&mut self, old: &str, new: impl Into<NodeName>) -> Result<usize, GraphError> {
        let new = new.into();
        if new == old {
            return Ok(0);
        }

        let mut touched = 0;
        for key in self.connections.keys().filter(|key| key.involves(old)) {
            touched += 1;
            let renamed = rename_key(key, old, &new);
            if renamed.is_loop() || self.connections.contains_key(&renamed) {
                return Err(GraphError::RenameConflict {
                    old: NodeName::from(old),
                    new,
                    edge: key.clone(),
                });
            }
        }
        if touched == 0 {
            return Ok(0);
        }

        let connections = std::mem::take(&mut self.connections);
        self.connections = connections
            .into_iter()
            .map(|(key, mut connection)| {
                if connection.rename_node(old, &new) {
                    (connection.key(), connection)
                } else {
                    (key, connection)
                }
            })
            .collect();
        tracing::debug!(old, new = %new, edges = touched, "renamed node");
        Ok(touched)
    }

    /// Remove every edge, releasing each line widget exactly once.
    ///
    /// Returns the number of released lines.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        for (key, connection) in self.connections.drain(..) {
            match self.layer.detach(connection.line) {
                Some(line) => {
                    self.layer.release(line);
                    released += 1;
                }
                None => tracing::warn!(edge = %key, "cleared edge had no attached line"),
            }
        }
        if released > 0 {
            tracing::debug!(lines = released, "cleared connection graph");
        }
        released
    }

    /// Disconnect every edge touching a node and return the detached widgets
    pub fn remove_node(&mut self, name: &str) -> Vec<LineWidget> {
        let keys: Vec<EdgeKey> = self
            .connections
            .keys()
            .filter(|key| key.involves(name))
            .cloned()
            .collect();
        keys.iter()
            .filter_map(|key| self.disconnect(key.from.as_str(), key.to.as_str()))
            .collect()
    }

    /// All edges in insertion order
    pub fn list_edges(&self) -> Vec<EdgeKey> {
        self.connections.keys().cloned().collect()
    }

    /// Look up a single edge
    pub fn edge(&self, from: &str, to: &str) -> Option<&Connection> {
        self.connections.get(&EdgeKey::new(from, to))
    }

    /// Whether an edge exists
    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.edge(from, to).is_some()
    }

    /// All connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Outgoing edges of a node
    pub fn edges_from<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.values().filter(move |c| c.from == name)
    }

    /// Incoming edges of a node
    pub fn edges_to<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.values().filter(move |c| c.to == name)
    }

    /// Edges touching a node in either direction
    pub fn edges_for_node<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.values().filter(move |c| c.involves_node(name))
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether the graph has no edges
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Recompute geometry of every edge touching a node, after it moved or resized
    pub fn refresh_node(&mut self, name: &str) -> Result<(), GraphError> {
        let keys: Vec<EdgeKey> = self
            .connections
            .keys()
            .filter(|key| key.involves(name))
            .cloned()
            .collect();
        for key in &keys {
            self.redraw(key)?;
        }
        Ok(())
    }

    /// Recompute geometry of every edge
    pub fn refresh_all(&mut self) -> Result<(), GraphError> {
        let keys = self.list_edges();
        for key in &keys {
            self.redraw(key)?;
        }
        Ok(())
    }

    /// Replace the settings, re-applying spacing to every reciprocal pair
    pub fn set_config(&mut self, config: FlowchartConfig) -> Result<(), GraphError> {
        self.config = config;
        let spacing = self.config.interconnection_spacing;
        let reciprocal: Vec<EdgeKey> = self
            .connections
            .keys()
            .filter(|key| self.connections.contains_key(&key.reversed()))
            .cloned()
            .collect();
        for key in &reciprocal {
            self.set_offset(key, spacing);
        }
        self.refresh_all()
    }

    /// Geometry for a connection being dragged out of `drag.from`
    pub fn preview_drag(&self, drag: &ConnectionDrag) -> Result<LineTransform, GraphError> {
        let from = self.node_rect(&drag.from)?;
        Ok(geometry::line_between(
            from.center(),
            drag.current_pos,
            0.0,
            &[from],
            &self.config.geometry(),
        ))
    }

    fn node_rect(&self, name: &NodeName) -> Result<Rect, GraphError> {
        self.provider
            .node_rect(name.as_str())
            .ok_or_else(|| GraphError::NodeNotFound(name.clone()))
    }

    fn set_offset(&mut self, key: &EdgeKey, offset: f32) {
        if let Some(connection) = self.connections.get_mut(key) {
            connection.offset = offset;
        }
    }

    fn redraw(&mut self, key: &EdgeKey) -> Result<(), GraphError> {
        let Some(connection) = self.connections.get(key) else {
            return Ok(());
        };
        let from = self.node_rect(&connection.from)?;
        let to = self.node_rect(&connection.to)?;
        let transform = geometry::line_between(
            from.center(),
            to.center(),
            connection.offset,
            &[from, to],
            &self.config.geometry(),
        );
        let line = self
            .layer
            .line_mut(connection.line)
            .ok_or(GraphError::LineMissing(connection.line))?;
        line.apply(transform)?;
        self.layer.request_redraw();
        Ok(())
    }
}

fn rename_key(key: &EdgeKey, old: &str, new: &NodeName) -> EdgeKey {
    let swap = |name: &NodeName| {
        if name == old {
            new.clone()
        } else {
            name.clone()
        }
    };
    EdgeKey {
        from: swap(&key.from),
        to: swap(&key.to),
    }
}

/// Error from a graph operation
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node provider does not know the node
    #[error("Node not found: {0}")]
    NodeNotFound(NodeName),

    /// Rename would merge edges or create a self-loop
    #[error("Cannot rename {old} to {new}: edge {edge} would collide")]
    RenameConflict {
        /// Current name
        old: NodeName,
        /// Requested name
        new: NodeName,
        /// First edge that would collide
        edge: EdgeKey,
    },

    /// Render container lost a line it should own
    #[error("Line missing from container: {0:?}")]
    LineMissing(LineId),

    /// Render container rejected an operation
    #[error(transparent)]
    Render(#[from] RenderError),
}
