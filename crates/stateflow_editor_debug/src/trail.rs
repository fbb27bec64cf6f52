// SPDX-License-Identifier: MIT OR Apache-2.0
//! Recently taken transitions, for highlighting arrows while debugging.

use crate::feed::DebugFrame;
use stateflow_editor_graph::{ConnectionGraph, EdgeKey, LineId, NodeName, NodeProvider, RenderContainer};
use std::collections::{HashSet, VecDeque};

/// Default number of transitions kept highlighted
pub const DEFAULT_TRAIL_LENGTH: usize = 4;

/// The current state and the last transitions the state machine took
#[derive(Debug, Clone)]
pub struct TransitionTrail {
    current_state: Option<NodeName>,
    history: VecDeque<EdgeKey>,
    capacity: usize,
}

impl TransitionTrail {
    /// Create a trail keeping up to `capacity` transitions
    pub fn new(capacity: usize) -> Self {
        Self {
            current_state: None,
            history: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a frame. Transitions without a drawn edge are ignored.
    ///
    /// Returns true if the latest transition changed.
    pub fn observe<P, R>(&mut self, frame: &DebugFrame, graph: &ConnectionGraph<P, R>) -> bool
    where
        P: NodeProvider,
        R: RenderContainer,
    {
        if let Some(state) = &frame.state {
            self.current_state = Some(NodeName::from(state.as_str()));
        }
        let Some(transition) = &frame.transition else {
            return false;
        };
        if !graph.contains(&transition.from, &transition.to) {
            tracing::debug!(
                tick = frame.tick,
                "transition {} -> {} has no arrow in the flowchart",
                transition.from,
                transition.to
            );
            return false;
        }

        let key = EdgeKey::new(transition.from.as_str(), transition.to.as_str());
        self.history.retain(|edge| *edge != key);
        self.history.push_front(key);
        self.history.truncate(self.capacity);
        true
    }

    /// Current state, if the game reported one
    pub fn current_state(&self) -> Option<&NodeName> {
        self.current_state.as_ref()
    }

    /// Most recent transition
    pub fn last(&self) -> Option<&EdgeKey> {
        self.history.front()
    }

    /// Transitions, most recent first
    pub fn history(&self) -> impl Iterator<Item = &EdgeKey> {
        self.history.iter()
    }

    /// Lines to highlight; edges removed from the graph since are skipped
    pub fn highlighted_lines<P, R>(&self, graph: &ConnectionGraph<P, R>) -> HashSet<LineId>
    where
        P: NodeProvider,
        R: RenderContainer,
    {
        self.history
            .iter()
            .filter_map(|edge| graph.edge(edge.from.as_str(), edge.to.as_str()))
            .map(|connection| connection.line)
            .collect()
    }

    /// Follow a node rename in the connection graph
    pub fn rename_node(&mut self, old: &str, new: &str) {
        let new = NodeName::from(new);
        for edge in &mut self.history {
            if edge.from == old {
                edge.from = new.clone();
            }
            if edge.to == old {
                edge.to = new.clone();
            }
        }
        if self.current_state.as_ref().is_some_and(|state| *state == old) {
            self.current_state = Some(new);
        }
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.current_state = None;
        self.history.clear();
    }
}

impl Default for TransitionTrail {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_LENGTH)
    }
}
