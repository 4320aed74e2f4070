//! Constraint solver integration for the reference host
//!
//! This module provides a wrapper around the kasuari Cassowary constraint solver,
//! translating primitive constraints into the solver's format and extracting
//! view frames from its solution.

use std::collections::HashMap;

use kasuari::{
    Solver as KasuariSolver, Strength, Variable as KasuariVariable, WeightedRelation::*,
};
use thiserror::Error;

use crate::equation::{Attribute, Priority, Relation};
use crate::primitive::PrimitiveConstraint;

use super::tree::ViewId;

// ============================================================================
// Variables
// ============================================================================

/// Base properties each view contributes to the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutProperty {
    X,
    Y,
    Width,
    Height,
}

/// A variable in the constraint system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutVariable {
    pub view: ViewId,
    pub property: LayoutProperty,
}

impl LayoutVariable {
    pub fn new(view: ViewId, property: LayoutProperty) -> Self {
        Self { view, property }
    }
}

/// A resolved view rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Frames keyed by view
pub type Frames = HashMap<ViewId, Frame>;

// ============================================================================
// SolverError
// ============================================================================

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Unsatisfiable constraints: {reason}")]
    Unsatisfiable {
        conflicting: Vec<String>,
        reason: String,
    },

    #[error("Unknown view: {0:?}")]
    UnknownView(ViewId),

    #[error("Internal solver error: {0}")]
    Internal(String),
}

// ============================================================================
// ConstraintSolver
// ============================================================================

/// Wrapper around kasuari solver
pub struct ConstraintSolver {
    solver: KasuariSolver,
    /// Maps our variables to kasuari variables
    variables: HashMap<LayoutVariable, KasuariVariable>,
    /// Descriptions of accepted constraints, for error reporting
    sources: Vec<String>,
}

impl ConstraintSolver {
    pub fn new() -> Self {
        Self {
            solver: KasuariSolver::new(),
            variables: HashMap::new(),
            sources: Vec::new(),
        }
    }

    fn get_or_create_var(&mut self, view: ViewId, property: LayoutProperty) -> KasuariVariable {
        *self
            .variables
            .entry(LayoutVariable::new(view, property))
            .or_insert_with(KasuariVariable::new)
    }

    /// Create a kasuari expression for a view attribute
    ///
    /// Far edges and centers are derived from the base properties; baselines
    /// sit on the top and bottom edges.
    fn get_expression(&mut self, view: ViewId, attribute: Attribute) -> kasuari::Expression {
        let x = self.get_or_create_var(view, LayoutProperty::X);
        let y = self.get_or_create_var(view, LayoutProperty::Y);
        let width = self.get_or_create_var(view, LayoutProperty::Width);
        let height = self.get_or_create_var(view, LayoutProperty::Height);
        match attribute {
            Attribute::Left | Attribute::Leading => x.into(),
            Attribute::Right | Attribute::Trailing => x + width,
            Attribute::Top | Attribute::FirstBaseline => y.into(),
            Attribute::Bottom | Attribute::LastBaseline => y + height,
            Attribute::Width => width.into(),
            Attribute::Height => height.into(),
            Attribute::CenterX => x + width * 0.5,
            Attribute::CenterY => y + height * 0.5,
        }
    }
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Bucket a priority into one of kasuari's strengths
pub fn strength(priority: Priority) -> Strength {
    let value = priority.value();
    if priority.is_required() {
        Strength::REQUIRED
    } else if value >= Priority::DEFAULT_HIGH.value() {
        Strength::STRONG
    } else if value >= Priority::DEFAULT_LOW.value() {
        Strength::MEDIUM
    } else {
        Strength::WEAK
    }
}

impl ConstraintSolver {
    /// Convert a kasuari error to a SolverError with context
    fn convert_kasuari_error(&self, e: kasuari::AddConstraintError, desc: &str) -> SolverError {
        match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => {
                let mut conflicting = vec![desc.to_string()];
                conflicting.extend(self.sources.iter().cloned());
                SolverError::Unsatisfiable {
                    conflicting,
                    reason: format!("Cannot satisfy {}: conflicts with existing constraints", desc),
                }
            }
            kasuari::AddConstraintError::DuplicateConstraint => {
                SolverError::Internal(format!("Duplicate constraint: {}", desc))
            }
            kasuari::AddConstraintError::InternalSolverError(msg) => {
                SolverError::Internal(format!("Internal solver error for {}: {}", desc, msg))
            }
        }
    }

    /// Add an active primitive constraint to the solver
    pub fn add_constraint(&mut self, c: &PrimitiveConstraint<ViewId>) -> Result<(), SolverError> {
        let subject = self.get_expression(c.subject.item, c.subject.attribute);
        let strength = strength(c.priority);
        let desc = c.to_string();

        let constraint = match c.reference {
            Some(reference) => {
                let rhs = self.get_expression(reference.item, reference.attribute) * c.multiplier
                    + c.constant;
                match c.relation {
                    Relation::Equal => subject | EQ(strength) | rhs,
                    Relation::LessOrEqual => subject | LE(strength) | rhs,
                    Relation::GreaterOrEqual => subject | GE(strength) | rhs,
                }
            }
            None => match c.relation {
                Relation::Equal => subject | EQ(strength) | c.constant,
                Relation::LessOrEqual => subject | LE(strength) | c.constant,
                Relation::GreaterOrEqual => subject | GE(strength) | c.constant,
            },
        };

        self.solver
            .add_constraint(constraint)
            .map_err(|e| self.convert_kasuari_error(e, &desc))?;
        self.sources.push(desc);
        Ok(())
    }

    /// Fix a view's frame with required constraints
    pub fn pin(&mut self, view: ViewId, frame: Frame) -> Result<(), SolverError> {
        let pins = [
            (LayoutProperty::X, frame.x),
            (LayoutProperty::Y, frame.y),
            (LayoutProperty::Width, frame.width),
            (LayoutProperty::Height, frame.height),
        ];
        for (property, value) in pins {
            let var = self.get_or_create_var(view, property);
            let desc = format!("{:?}.{:?} = {}", view, property, value);
            self.solver
                .add_constraint(var | EQ(Strength::REQUIRED) | value)
                .map_err(|e| self.convert_kasuari_error(e, &desc))?;
            self.sources.push(desc);
        }
        Ok(())
    }
}

// ============================================================================
// Solution
// ============================================================================

/// Solution from the constraint solver
pub struct Solution {
    pub values: HashMap<LayoutVariable, f64>,
}

impl Solution {
    /// Get value for a variable
    pub fn get(&self, var: &LayoutVariable) -> Option<f64> {
        self.values.get(var).copied()
    }

    /// Frame of a view; variables the solver never moved stay at zero
    pub fn frame(&self, view: ViewId) -> Frame {
        let value = |property| {
            self.get(&LayoutVariable::new(view, property))
                .unwrap_or(0.0)
        };
        Frame::new(
            value(LayoutProperty::X),
            value(LayoutProperty::Y),
            value(LayoutProperty::Width),
            value(LayoutProperty::Height),
        )
    }
}

impl ConstraintSolver {
    /// Solve the constraint system
    pub fn solve(&mut self) -> Result<Solution, SolverError> {
        let changes = self.solver.fetch_changes();

        let mut values = HashMap::new();
        for (kvar, value) in changes {
            for (our_var, &k) in &self.variables {
                if k == *kvar {
                    values.insert(*our_var, *value);
                    break;
                }
            }
        }

        Ok(Solution { values })
    }
}
