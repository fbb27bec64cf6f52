// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flowchart graph core for `StateFlow` Editor.
//!
//! This crate keeps a state machine flowchart and its arrows consistent:
//! - Directed connections between named nodes
//! - Offset bookkeeping for reciprocal arrows
//! - Line clipping against node rectangles
//! - One line widget per connection, attached and released in step
//!
//! ## Architecture
//!
//! [`ConnectionGraph`] owns the connections. Node bounds come from an
//! injected [`NodeProvider`] and line widgets live in a [`RenderContainer`],
//! so the core runs headless with [`NodeTable`] and [`LineLayer`] and inside
//! an egui host through [`ui::FlowchartPainter`].

pub mod node;
pub mod connection;
pub mod geometry;
pub mod render;
pub mod graph;
pub mod config;
pub mod ui;

pub use node::{NodeBounds, NodeName, NodeProvider, NodeTable};
pub use connection::{Connection, EdgeKey};
pub use geometry::{GeometryParams, LineTransform, Segment};
pub use render::{LineId, LineLayer, LineState, LineWidget, RenderContainer, RenderError};
pub use graph::{ConnectionDrag, ConnectionGraph, GraphError};
pub use config::{ConfigError, FlowchartConfig};
