// SPDX-License-Identifier: MIT OR Apache-2.0
//! Debug frames sent by a running game, one per tick.

use crate::param::ParamValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A transition the state machine took
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// State left
    pub from: String,
    /// State entered
    pub to: String,
}

/// Snapshot of the running state machine for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugFrame {
    /// Monotonic tick counter
    pub tick: u64,
    /// Current state
    pub state: Option<String>,
    /// Transition taken during this tick
    pub transition: Option<TransitionEvent>,
    /// Runtime parameter values by condition name
    pub parameters: IndexMap<String, ParamValue>,
}

impl DebugFrame {
    /// Decode a frame from its JSON payload
    pub fn from_json(payload: &str) -> Result<Self, DebugError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Encode as JSON
    pub fn to_json(&self) -> Result<String, DebugError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Runtime value of a parameter
    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }
}

/// Error handling debug data
#[derive(Debug, thiserror::Error)]
pub enum DebugError {
    /// Payload is not a valid frame
    #[error("Failed to decode debug frame: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_frame() {
        let frame = DebugFrame::from_json(
            r#"{
                "tick": 42,
                "state": "Run",
                "transition": { "from": "Idle", "to": "Run" },
                "parameters": { "speed": 4.5, "grounded": true }
            }"#,
        )
        .unwrap();
        assert_eq!(frame.tick, 42);
        assert_eq!(frame.state.as_deref(), Some("Run"));
        assert_eq!(frame.transition.as_ref().unwrap().from, "Idle");
        assert_eq!(frame.parameter("speed"), Some(&ParamValue::Float(4.5)));
        assert_eq!(frame.parameter("missing"), None);
    }

    #[test]
    fn test_sparse_frame() {
        let frame = DebugFrame::from_json(r#"{"tick": 1}"#).unwrap();
        assert!(frame.state.is_none());
        assert!(frame.parameters.is_empty());
    }

    #[test]
    fn test_bad_payload() {
        assert!(matches!(DebugFrame::from_json("{tick"), Err(DebugError::Decode(_))));
    }
}
