//! Layout Reconcile - declarative constraint materialization
//!
//! This library turns declared layout relationships ("top of A equals top
//! of B plus 4") into the primitive equations a linear constraint solver
//! accepts, and reconciles each new declaration pass against the constraint
//! objects the previous pass left on the same root. Re-running a pass
//! mutates existing objects in place instead of rebuilding the graph.
//!
//! The crate never computes geometry itself; it talks to the hierarchy
//! through [`LayoutHost`]. [`ViewTree`] is an in-memory host that resolves
//! frames with the kasuari solver.
//!
//! # Example
//!
//! ```rust
//! use layout_reconcile::{Equation, Expression, ReconcileConfig, Reconciler, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let root = tree.insert("root");
//! let label = tree.insert_child(root, "label");
//!
//! let reconciler = Reconciler::new(ReconcileConfig::default());
//! let pass = |offset: f64| {
//!     vec![
//!         Equation::equal(Expression::top(label), Expression::top(root).offset(offset)),
//!         Equation::equal(Expression::height(label), 20.0),
//!     ]
//! };
//!
//! let first = reconciler.apply(&mut tree, root, &pass(8.0)).unwrap();
//! assert_eq!(first.created, 2);
//!
//! let second = reconciler.apply(&mut tree, root, &pass(12.0)).unwrap();
//! assert_eq!(second.created, 0);
//! assert_eq!(second.updated, 1);
//! ```

pub mod config;
pub mod equation;
pub mod error;
pub mod host;
pub mod normalize;
pub mod primitive;
pub mod reconcile;

pub use config::{ConfigError, ReconcileConfig};
pub use equation::{
    AnchorKind, Attribute, DimensionAttribute, Edge, EdgeInsets, Edges, Equation, Expression,
    HorizontalAttribute, Operand, Priority, Relation, VerticalAttribute,
};
pub use error::ContractViolation;
pub use host::{ConstraintId, Frame, Frames, LayoutHost, SolverError, ViewId, ViewTree};
pub use normalize::{normalize, normalize_all};
pub use primitive::{AttributeRef, PrimitiveConstraint, ReuseIdentity};
pub use reconcile::{ReconcileReport, Reconciler, Scope};

/// Normalize and reconcile one declaration pass with default configuration
///
/// # Example
///
/// ```rust
/// use layout_reconcile::{declare, Equation, Expression, ViewTree};
///
/// let mut tree = ViewTree::new();
/// let root = tree.insert("root");
/// let child = tree.insert_child(root, "child");
///
/// let report = declare(
///     &mut tree,
///     root,
///     &[Equation::equal(Expression::width(child), Expression::width(root).scaled(0.5))],
/// )
/// .unwrap();
/// assert_eq!(report.created, 1);
/// assert!(tree.uses_constraints(child));
/// assert!(!tree.uses_constraints(root));
/// ```
pub fn declare<H: LayoutHost>(
    host: &mut H,
    root: H::Item,
    equations: &[Equation<H::Item>],
) -> Result<ReconcileReport, ContractViolation> {
    Reconciler::default().apply(host, root, equations)
}
