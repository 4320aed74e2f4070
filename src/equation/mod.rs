//! Symbolic model of declared layout relationships
//!
//! Expressions and equations are plain values created fresh on every
//! declaration pass and discarded once normalized.

pub mod anchor;
pub mod expression;
pub mod relationship;

pub use anchor::{
    AnchorKind, Attribute, DimensionAttribute, Edge, EdgeInsets, Edges, HorizontalAttribute,
    Priority, Relation, VerticalAttribute,
};
pub use expression::Expression;
pub use relationship::{Equation, Operand};
