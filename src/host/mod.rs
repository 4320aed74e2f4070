//! The view-hierarchy collaborator
//!
//! The core never touches a toolkit directly. Everything it needs from the
//! hierarchy and from solver constraint objects goes through [`LayoutHost`].
//! [`ViewTree`] is an in-memory implementation that resolves geometry with
//! the kasuari solver.

pub mod solver;
pub mod tree;

use std::fmt;
use std::hash::Hash;

use crate::equation::Priority;
use crate::primitive::PrimitiveConstraint;
use crate::reconcile::Scope;

pub use solver::{ConstraintSolver, Frame, Frames, SolverError};
pub use tree::{ConstraintId, ViewId, ViewTree};

/// Access to items and constraint objects of a host hierarchy
///
/// Hosts are single-threaded: a declaration pass borrows the host mutably
/// for its whole duration. Driving the same root from several threads is the
/// caller's problem and is not guarded here.
pub trait LayoutHost {
    /// Item handle compared by identity
    type Item: Copy + Eq + Hash + fmt::Debug;
    /// Handle to a solver constraint object
    type Constraint: Copy + Eq + fmt::Debug;

    fn parent(&self, item: Self::Item) -> Option<Self::Item>;

    /// Constraints currently installed anywhere in the subtree of `root`
    fn installed_constraints(&self, root: Self::Item) -> Vec<Self::Constraint>;

    /// Opt `item` in or out of constraint-based layout
    fn set_uses_constraints(&mut self, item: Self::Item, enabled: bool);

    /// Detach the scope stored on `root`, if any
    fn take_scope(&mut self, root: Self::Item) -> Option<Scope<Self::Item, Self::Constraint>>;

    /// Attach `scope` to `root`, replacing any previous one
    fn store_scope(&mut self, root: Self::Item, scope: Scope<Self::Item, Self::Constraint>);

    /// Whether a scope stored on any item currently holds `constraint`
    fn is_scoped(&self, constraint: Self::Constraint) -> bool;

    /// Create an inactive constraint object
    ///
    /// Subject, reference, relation, multiplier, constant and priority are
    /// taken from `declared`; its active flag is ignored.
    fn create_constraint(&mut self, declared: &PrimitiveConstraint<Self::Item>) -> Self::Constraint;

    /// Current state of a constraint object, `None` once it is gone
    fn constraint(&self, constraint: Self::Constraint) -> Option<PrimitiveConstraint<Self::Item>>;

    fn identifier(&self, constraint: Self::Constraint) -> Option<String>;

    fn set_identifier(&mut self, constraint: Self::Constraint, identifier: &str);

    fn set_constant(&mut self, constraint: Self::Constraint, constant: f64);

    fn set_priority(&mut self, constraint: Self::Constraint, priority: Priority);

    fn set_active(&mut self, constraint: Self::Constraint, active: bool);

    /// Drop a constraint object nobody references any more
    fn discard_constraint(&mut self, constraint: Self::Constraint);
}
