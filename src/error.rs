//! Contract violations raised while turning declarations into constraints

use thiserror::Error;

/// Programmer errors at a declaration site
///
/// None of these are recoverable: a pass that hits one must abort before
/// touching the host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    /// The left side of a relationship has no item to constrain
    #[error("subject {anchor} anchor has no owning item")]
    UnownedSubject { anchor: &'static str },

    /// A constrain-to-parent relationship was built for an orphan
    #[error("item {item} has no parent to constrain against")]
    MissingParent { item: String },

    /// The two sides refer to incompatible anchor kinds
    #[error("cannot relate a {left} anchor to a {right} anchor")]
    MismatchedAnchors {
        left: &'static str,
        right: &'static str,
    },

    /// Only dimensions may be related to a bare constant
    #[error("{anchor} anchor cannot be related to a constant")]
    ConstantReference { anchor: &'static str },

    /// Only dimensions may carry a multiplier
    #[error("{anchor} anchor cannot be scaled (multiplier {multiplier})")]
    ScaledPosition {
        anchor: &'static str,
        multiplier: f64,
    },

    /// Bounds position through insets, never through an offset
    #[error("bounds anchor cannot carry an offset ({offset}), use insets")]
    OffsetBounds { offset: f64 },

    /// Subject multiplier of zero leaves nothing to solve for
    #[error("subject multiplier must be non-zero")]
    ZeroMultiplier,
}

impl ContractViolation {
    pub fn unowned_subject(anchor: &'static str) -> Self {
        Self::UnownedSubject { anchor }
    }

    pub fn missing_parent(item: impl Into<String>) -> Self {
        Self::MissingParent { item: item.into() }
    }

    pub fn mismatched(left: &'static str, right: &'static str) -> Self {
        Self::MismatchedAnchors { left, right }
    }
}
