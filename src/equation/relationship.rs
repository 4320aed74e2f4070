//! Declared relationships between two expressions

use std::fmt;

use crate::error::ContractViolation;
use crate::host::LayoutHost;

use super::anchor::{Priority, Relation};
use super::expression::Expression;

/// Right-hand side of a relationship
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<I> {
    Expression(Expression<I>),
    Constant(f64),
}

impl<I> From<Expression<I>> for Operand<I> {
    fn from(expr: Expression<I>) -> Self {
        Operand::Expression(expr)
    }
}

impl<I> From<f64> for Operand<I> {
    fn from(value: f64) -> Self {
        Operand::Constant(value)
    }
}

/// One declared relationship, as produced by a declaration pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equation<I> {
    pub left: Expression<I>,
    pub relation: Relation,
    pub right: Operand<I>,
    pub priority: Priority,
    pub active: bool,
}

impl<I: Copy> Equation<I> {
    pub fn new(left: Expression<I>, relation: Relation, right: impl Into<Operand<I>>) -> Self {
        Self {
            left,
            relation,
            right: right.into(),
            priority: Priority::REQUIRED,
            active: true,
        }
    }

    pub fn equal(left: Expression<I>, right: impl Into<Operand<I>>) -> Self {
        Self::new(left, Relation::Equal, right)
    }

    pub fn less_or_equal(left: Expression<I>, right: impl Into<Operand<I>>) -> Self {
        Self::new(left, Relation::LessOrEqual, right)
    }

    pub fn greater_or_equal(left: Expression<I>, right: impl Into<Operand<I>>) -> Self {
        Self::new(left, Relation::GreaterOrEqual, right)
    }

    /// Relate `expression` to the same anchor on its owner's parent
    ///
    /// The parent is looked up once, at construction time.
    pub fn to_parent<H>(
        host: &H,
        expression: Expression<I>,
        relation: Relation,
    ) -> Result<Self, ContractViolation>
    where
        H: LayoutHost<Item = I>,
        I: fmt::Debug,
    {
        let owner = expression
            .owner()
            .ok_or_else(|| ContractViolation::unowned_subject(expression.kind().name()))?;
        let parent = host
            .parent(owner)
            .ok_or_else(|| ContractViolation::missing_parent(format!("{:?}", owner)))?;
        let right = Expression::new(parent, expression.kind());
        Ok(Self::new(expression, relation, right))
    }

    pub fn with_priority(self, priority: impl Into<Priority>) -> Self {
        Self {
            priority: priority.into(),
            ..self
        }
    }

    /// Copy of this relationship with the active flag replaced
    pub fn with_active(self, active: bool) -> Self {
        Self { active, ..self }
    }
}
