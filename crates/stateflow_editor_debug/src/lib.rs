// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live debug overlay for `StateFlow` Editor.
//!
//! While a game runs, it reports one [`DebugFrame`] per tick. This crate
//! turns those frames into:
//! - Pass/fail tints on transition condition labels
//! - Highlights on the transitions the state machine just took
//!
//! Nothing here mutates the connection graph; hosts subscribe a
//! [`ConditionObserver`] to receive label changes.

pub mod param;
pub mod condition;
pub mod feed;
pub mod board;
pub mod trail;
pub mod session;

pub use param::ParamValue;
pub use condition::{Comparison, Condition, LabelTint};
pub use feed::{DebugError, DebugFrame, TransitionEvent};
pub use board::{ConditionBoard, ConditionLabel, ConditionObserver, LabelId, SubscriptionId};
pub use trail::TransitionTrail;
pub use session::DebugSession;
