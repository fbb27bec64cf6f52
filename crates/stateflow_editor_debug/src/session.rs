// SPDX-License-Identifier: MIT OR Apache-2.0
//! A debugging session: routes debug frames to the label board and the
//! transition trail.

use crate::board::ConditionBoard;
use crate::feed::{DebugError, DebugFrame};
use crate::trail::TransitionTrail;
use stateflow_editor_graph::{ConnectionGraph, NodeProvider, RenderContainer};

/// Live debug state for one flowchart
#[derive(Default)]
pub struct DebugSession {
    /// Condition labels
    pub board: ConditionBoard,
    /// Recent transitions
    pub trail: TransitionTrail,
    last_tick: Option<u64>,
}

impl DebugSession {
    /// Create a session around an existing label board
    pub fn new(board: ConditionBoard) -> Self {
        Self {
            board,
            trail: TransitionTrail::default(),
            last_tick: None,
        }
    }

    /// Decode and apply a JSON frame
    pub fn handle_message<P, R>(
        &mut self,
        payload: &str,
        graph: &ConnectionGraph<P, R>,
    ) -> Result<bool, DebugError>
    where
        P: NodeProvider,
        R: RenderContainer,
    {
        let frame = DebugFrame::from_json(payload)?;
        Ok(self.apply_frame(&frame, graph))
    }

    /// Apply a frame. Frames older than the last one seen are dropped.
    ///
    /// Returns true if any label tint or the highlighted transition changed.
    pub fn apply_frame<P, R>(&mut self, frame: &DebugFrame, graph: &ConnectionGraph<P, R>) -> bool
    where
        P: NodeProvider,
        R: RenderContainer,
    {
        if self.last_tick.is_some_and(|last| frame.tick < last) {
            tracing::debug!(tick = frame.tick, "dropping stale debug frame");
            return false;
        }
        self.last_tick = Some(frame.tick);

        let tints = self.board.apply_frame(frame);
        let moved = self.trail.observe(frame, graph);
        tints > 0 || moved
    }

    /// Last applied tick
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    /// End the session: tints back to unknown, trail cleared
    pub fn stop(&mut self) {
        self.board.reset_tints();
        self.trail.clear();
        self.last_tick = None;
        tracing::info!("Debug session stopped");
    }
}
