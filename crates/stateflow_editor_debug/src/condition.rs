// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transition conditions and their debug tint.

use crate::param::ParamValue;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Comparison operator of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
}

impl Comparison {
    /// Operator symbol used in label text
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }

    /// Whether an ordering satisfies this operator
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => ordering == Ordering::Equal,
            Self::NotEqual => ordering != Ordering::Equal,
            Self::Less => ordering == Ordering::Less,
            Self::LessOrEqual => ordering != Ordering::Greater,
            Self::Greater => ordering == Ordering::Greater,
            Self::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
}

/// A condition shown on a transition arrow, e.g. `speed > 3`.
///
/// `name` doubles as the key of the runtime parameter in debug frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Condition (and parameter) name
    pub name: String,
    /// Operator
    pub comparison: Comparison,
    /// Value the parameter is compared against
    pub value: ParamValue,
}

impl Condition {
    /// Create a condition
    pub fn new(name: impl Into<String>, comparison: Comparison, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            comparison,
            value: value.into(),
        }
    }

    /// Label text
    pub fn display_text(&self) -> String {
        format!("{} {} {}", self.name, self.comparison.symbol(), self.value)
    }

    /// Test a runtime value. `None` when the kinds cannot be compared.
    pub fn evaluate(&self, runtime: &ParamValue) -> Option<bool> {
        runtime
            .compare(&self.value)
            .map(|ordering| self.comparison.holds(ordering))
    }
}

/// Debug tint of a condition label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelTint {
    /// Condition currently holds
    Pass,
    /// Condition currently fails
    Fail,
    /// No runtime value, or not comparable
    #[default]
    Unknown,
}

impl LabelTint {
    /// Tint from an evaluation result
    pub fn from_outcome(outcome: Option<bool>) -> Self {
        match outcome {
            Some(true) => Self::Pass,
            Some(false) => Self::Fail,
            None => Self::Unknown,
        }
    }

    /// Label color
    pub fn color(self) -> Color32 {
        match self {
            Self::Pass => Color32::from_rgb(110, 210, 110),
            Self::Fail => Color32::from_rgb(220, 90, 90),
            Self::Unknown => Color32::from_gray(200),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text() {
        let condition = Condition::new("speed", Comparison::Greater, 3_i64);
        assert_eq!(condition.display_text(), "speed > 3");
        let condition = Condition::new("mode", Comparison::Equal, "run");
        assert_eq!(condition.display_text(), "mode == \"run\"");
    }

    #[test]
    fn test_evaluate() {
        let condition = Condition::new("speed", Comparison::GreaterOrEqual, 3_i64);
        assert_eq!(condition.evaluate(&ParamValue::Float(3.0)), Some(true));
        assert_eq!(condition.evaluate(&ParamValue::Int(2)), Some(false));
        assert_eq!(condition.evaluate(&ParamValue::Bool(true)), None);

        let grounded = Condition::new("grounded", Comparison::NotEqual, false);
        assert_eq!(grounded.evaluate(&ParamValue::Bool(true)), Some(true));
    }

    #[test]
    fn test_tint_from_outcome() {
        assert_eq!(LabelTint::from_outcome(Some(true)), LabelTint::Pass);
        assert_eq!(LabelTint::from_outcome(Some(false)), LabelTint::Fail);
        assert_eq!(LabelTint::from_outcome(None), LabelTint::Unknown);
        assert_ne!(LabelTint::Pass.color(), LabelTint::Fail.color());
    }
}
