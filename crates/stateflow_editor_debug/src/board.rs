// SPDX-License-Identifier: MIT OR Apache-2.0
//! Condition labels attached to transitions, with explicit observers.
//!
//! The board never touches the connection graph. Hosts subscribe an
//! observer to learn when a label's text or tint changes and update their
//! widgets from it.

use crate::condition::{Condition, LabelTint};
use crate::feed::DebugFrame;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stateflow_editor_graph::{EdgeKey, NodeName};
use uuid::Uuid;

/// Unique identifier for a condition label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelId(pub Uuid);

impl LabelId {
    /// Create a new random label ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LabelId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`ConditionBoard::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub Uuid);

/// Receives label changes
pub trait ConditionObserver {
    /// Label text changed (label added, condition edited or renamed)
    fn text_changed(&mut self, _label: LabelId, _text: &str) {}

    /// Debug tint changed
    fn tint_changed(&mut self, _label: LabelId, _tint: LabelTint) {}

    /// Label moved to another transition (a node of its edge was renamed)
    fn edge_changed(&mut self, _label: LabelId, _edge: &EdgeKey) {}

    /// Label removed
    fn label_removed(&mut self, _label: LabelId) {}
}

/// A condition label on a transition arrow
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionLabel {
    /// Label ID
    pub id: LabelId,
    /// Transition the label sits on
    pub edge: EdgeKey,
    /// The condition
    pub condition: Condition,
    /// Current debug tint
    pub tint: LabelTint,
}

enum Change {
    Text(LabelId, String),
    Tint(LabelId, LabelTint),
    Edge(LabelId, EdgeKey),
    Removed(LabelId),
}

/// All condition labels of a flowchart
#[derive(Default)]
pub struct ConditionBoard {
    labels: IndexMap<LabelId, ConditionLabel>,
    observers: IndexMap<SubscriptionId, Box<dyn ConditionObserver>>,
}

impl ConditionBoard {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn subscribe(&mut self, observer: Box<dyn ConditionObserver>) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        self.observers.insert(id, observer);
        id
    }

    /// Drop an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.shift_remove(&id).is_some()
    }

    /// Number of observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Add a label to a transition
    pub fn add_label(&mut self, edge: EdgeKey, condition: Condition) -> LabelId {
        let id = LabelId::new();
        let text = condition.display_text();
        self.labels.insert(
            id,
            ConditionLabel {
                id,
                edge,
                condition,
                tint: LabelTint::Unknown,
            },
        );
        self.notify(vec![Change::Text(id, text)]);
        id
    }

    /// Remove a label
    pub fn remove_label(&mut self, id: LabelId) -> Option<ConditionLabel> {
        let label = self.labels.shift_remove(&id)?;
        self.notify(vec![Change::Removed(id)]);
        Some(label)
    }

    /// Remove every label of a transition, e.g. after it was disconnected
    pub fn remove_edge(&mut self, edge: &EdgeKey) -> usize {
        let ids: Vec<LabelId> = self.labels_for_edge(edge).map(|label| label.id).collect();
        for id in &ids {
            self.labels.shift_remove(id);
        }
        let count = ids.len();
        self.notify(ids.into_iter().map(Change::Removed).collect());
        count
    }

    /// Replace a label's condition. The tint resets until the next frame.
    pub fn update_condition(&mut self, id: LabelId, condition: Condition) -> bool {
        let Some(label) = self.labels.get_mut(&id) else {
            return false;
        };
        let mut changes = Vec::new();
        if label.condition.display_text() != condition.display_text() {
            changes.push(Change::Text(id, condition.display_text()));
        }
        if label.tint != LabelTint::Unknown {
            label.tint = LabelTint::Unknown;
            changes.push(Change::Tint(id, LabelTint::Unknown));
        }
        label.condition = condition;
        self.notify(changes);
        true
    }

    /// Rename a condition on every label that uses it
    pub fn rename_condition(&mut self, old: &str, new: &str) -> usize {
        let mut changes = Vec::new();
        for label in self.labels.values_mut().filter(|label| label.condition.name == old) {
            label.condition.name = new.to_string();
            changes.push(Change::Text(label.id, label.condition.display_text()));
        }
        let count = changes.len();
        self.notify(changes);
        count
    }

    /// Follow a node rename in the connection graph.
    ///
    /// Observers get an edge change for every rebound label.
    pub fn rename_node(&mut self, old: &str, new: &str) -> usize {
        let new = NodeName::from(new);
        let mut changes = Vec::new();
        for label in self.labels.values_mut().filter(|label| label.edge.involves(old)) {
            if label.edge.from == old {
                label.edge.from = new.clone();
            }
            if label.edge.to == old {
                label.edge.to = new.clone();
            }
            changes.push(Change::Edge(label.id, label.edge.clone()));
        }
        let count = changes.len();
        self.notify(changes);
        count
    }

    /// Recolor every label from a debug frame.
    ///
    /// Labels whose condition has no value in the frame turn `Unknown`.
    /// Returns the number of labels whose tint changed.
    pub fn apply_frame(&mut self, frame: &DebugFrame) -> usize {
        let mut changes = Vec::new();
        for label in self.labels.values_mut() {
            let outcome = frame
                .parameter(&label.condition.name)
                .and_then(|value| label.condition.evaluate(value));
            let tint = LabelTint::from_outcome(outcome);
            if tint != label.tint {
                label.tint = tint;
                changes.push(Change::Tint(label.id, tint));
            }
        }
        let count = changes.len();
        if count > 0 {
            tracing::trace!(tick = frame.tick, labels = count, "condition tints changed");
        }
        self.notify(changes);
        count
    }

    /// Set every tint back to `Unknown`, e.g. when the game stops
    pub fn reset_tints(&mut self) {
        let mut changes = Vec::new();
        for label in self.labels.values_mut().filter(|label| label.tint != LabelTint::Unknown) {
            label.tint = LabelTint::Unknown;
            changes.push(Change::Tint(label.id, LabelTint::Unknown));
        }
        self.notify(changes);
    }

    /// Look up a label
    pub fn label(&self, id: LabelId) -> Option<&ConditionLabel> {
        self.labels.get(&id)
    }

    /// All labels
    pub fn labels(&self) -> impl Iterator<Item = &ConditionLabel> {
        self.labels.values()
    }

    /// Labels of one transition
    pub fn labels_for_edge<'a>(&'a self, edge: &'a EdgeKey) -> impl Iterator<Item = &'a ConditionLabel> + 'a {
        self.labels.values().filter(move |label| &label.edge == edge)
    }

    fn notify(&mut self, changes: Vec<Change>) {
        for change in &changes {
            for observer in self.observers.values_mut() {
                match change {
                    Change::Text(id, text) => observer.text_changed(*id, text),
                    Change::Tint(id, tint) => observer.tint_changed(*id, *tint),
                    Change::Edge(id, edge) => observer.edge_changed(*id, edge),
                    Change::Removed(id) => observer.label_removed(*id),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Comparison;
    use crate::param::ParamValue;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Text(LabelId, String),
        Tint(LabelId, LabelTint),
        Edge(LabelId, EdgeKey),
        Removed(LabelId),
    }

    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl ConditionObserver for Recorder {
        fn text_changed(&mut self, label: LabelId, text: &str) {
            self.0.borrow_mut().push(Event::Text(label, text.to_string()));
        }

        fn tint_changed(&mut self, label: LabelId, tint: LabelTint) {
            self.0.borrow_mut().push(Event::Tint(label, tint));
        }

        fn edge_changed(&mut self, label: LabelId, edge: &EdgeKey) {
            self.0.borrow_mut().push(Event::Edge(label, edge.clone()));
        }

        fn label_removed(&mut self, label: LabelId) {
            self.0.borrow_mut().push(Event::Removed(label));
        }
    }

    fn board_with_recorder() -> (ConditionBoard, Rc<RefCell<Vec<Event>>>, SubscriptionId) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut board = ConditionBoard::new();
        let subscription = board.subscribe(Box::new(Recorder(events.clone())));
        (board, events, subscription)
    }

    fn frame(parameters: &[(&str, ParamValue)]) -> DebugFrame {
        DebugFrame {
            parameters: parameters
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            ..DebugFrame::default()
        }
    }

    #[test]
    fn test_tint_changes_notified_once() {
        let (mut board, events, _) = board_with_recorder();
        let id = board.add_label(
            EdgeKey::new("Idle", "Run"),
            Condition::new("speed", Comparison::Greater, 3_i64),
        );
        assert_eq!(events.borrow().as_slice(), [Event::Text(id, "speed > 3".to_string())]);
        events.borrow_mut().clear();

        assert_eq!(board.apply_frame(&frame(&[("speed", ParamValue::Float(4.0))])), 1);
        assert_eq!(board.apply_frame(&frame(&[("speed", ParamValue::Float(5.0))])), 0);
        assert_eq!(board.apply_frame(&frame(&[("speed", ParamValue::Int(1))])), 1);
        assert_eq!(
            events.borrow().as_slice(),
            [Event::Tint(id, LabelTint::Pass), Event::Tint(id, LabelTint::Fail)]
        );
        assert_eq!(board.label(id).unwrap().tint, LabelTint::Fail);
    }

    #[test]
    fn test_missing_parameter_is_unknown() {
        let (mut board, _, _) = board_with_recorder();
        let id = board.add_label(
            EdgeKey::new("Idle", "Run"),
            Condition::new("grounded", Comparison::Equal, true),
        );
        board.apply_frame(&frame(&[("grounded", ParamValue::Bool(true))]));
        assert_eq!(board.label(id).unwrap().tint, LabelTint::Pass);

        board.apply_frame(&frame(&[]));
        assert_eq!(board.label(id).unwrap().tint, LabelTint::Unknown);
    }

    #[test]
    fn test_unsubscribed_observer_receives_nothing() {
        let (mut board, events, subscription) = board_with_recorder();
        assert!(board.unsubscribe(subscription));
        assert!(!board.unsubscribe(subscription));
        assert_eq!(board.observer_count(), 0);

        board.add_label(
            EdgeKey::new("Idle", "Run"),
            Condition::new("speed", Comparison::Less, 1_i64),
        );
        board.apply_frame(&frame(&[("speed", ParamValue::Int(0))]));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_rename_condition_updates_text() {
        let (mut board, events, _) = board_with_recorder();
        let id = board.add_label(
            EdgeKey::new("Idle", "Run"),
            Condition::new("speed", Comparison::Greater, 3_i64),
        );
        events.borrow_mut().clear();

        assert_eq!(board.rename_condition("speed", "velocity"), 1);
        assert_eq!(board.rename_condition("missing", "other"), 0);
        assert_eq!(
            events.borrow().as_slice(),
            [Event::Text(id, "velocity > 3".to_string())]
        );
    }

    #[test]
    fn test_update_condition_resets_tint() {
        let (mut board, events, _) = board_with_recorder();
        let id = board.add_label(
            EdgeKey::new("Idle", "Run"),
            Condition::new("speed", Comparison::Greater, 3_i64),
        );
        board.apply_frame(&frame(&[("speed", ParamValue::Int(5))]));
        events.borrow_mut().clear();

        assert!(board.update_condition(id, Condition::new("speed", Comparison::Greater, 10_i64)));
        assert_eq!(
            events.borrow().as_slice(),
            [
                Event::Text(id, "speed > 10".to_string()),
                Event::Tint(id, LabelTint::Unknown),
            ]
        );
        assert!(!board.update_condition(LabelId::new(), Condition::new("x", Comparison::Equal, 1_i64)));
    }

    #[test]
    fn test_node_rename_and_edge_removal() {
        let (mut board, events, _) = board_with_recorder();
        let edge = EdgeKey::new("Idle", "Run");
        let first = board.add_label(edge.clone(), Condition::new("speed", Comparison::Greater, 3_i64));
        board.add_label(edge, Condition::new("grounded", Comparison::Equal, true));
        let jump = board.add_label(EdgeKey::new("Run", "Jump"), Condition::new("jump", Comparison::Equal, true));
        events.borrow_mut().clear();

        assert_eq!(board.rename_node("Run", "Sprint"), 3);
        let renamed = EdgeKey::new("Idle", "Sprint");
        assert_eq!(board.labels_for_edge(&renamed).count(), 2);
        {
            let events = events.borrow();
            assert_eq!(events.len(), 3);
            assert_eq!(events[0], Event::Edge(first, renamed.clone()));
            assert_eq!(events[2], Event::Edge(jump, EdgeKey::new("Sprint", "Jump")));
        }

        events.borrow_mut().clear();
        assert_eq!(board.rename_node("Missing", "Other"), 0);
        assert!(events.borrow().is_empty());

        events.borrow_mut().clear();
        assert_eq!(board.remove_edge(&renamed), 2);
        assert!(board.label(first).is_none());
        assert_eq!(board.labels().count(), 1);
        assert_eq!(events.borrow().len(), 2);
    }
}
