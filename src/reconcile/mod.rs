//! Reconciliation of declared constraints against materialized ones
//!
//! Each declaration pass produces a fresh list of primitive constraints. The
//! reconciler matches them by [`ReuseIdentity`] against the constraints the
//! previous pass left in the root's [`Scope`]:
//!
//! - a match is updated in place, writing only the fields that differ
//! - an unmatched active declaration creates, tags and activates an object
//! - an unmatched inactive declaration creates nothing
//! - entries not reconfirmed are stale and get deactivated; when enough go
//!   stale at once they are evicted and released to the host
//!
//! Within one pass declarations are processed in order, so when two collapse
//! to the same identity the later one wins.

pub mod scope;

use log::{debug, trace, warn};

use crate::config::ReconcileConfig;
use crate::equation::Equation;
use crate::error::ContractViolation;
use crate::host::LayoutHost;
use crate::normalize::normalize_all;
use crate::primitive::{PrimitiveConstraint, ReuseIdentity};

pub use scope::Scope;

/// What a single pass did to the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// New constraint objects created and activated
    pub created: usize,
    /// Reused objects that received at least one field write
    pub updated: usize,
    /// Reused objects left untouched
    pub unchanged: usize,
    /// Inactive declarations with no existing object
    pub skipped: usize,
    /// Stale objects switched off
    pub deactivated: usize,
    /// Stale objects removed from the scope
    pub evicted: usize,
}

impl ReconcileReport {
    /// True when the pass performed no mutation on the host
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.deactivated == 0 && self.evicted == 0
    }
}

/// Drives declaration passes against a [`LayoutHost`]
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Normalize `equations` and reconcile them against the scope of `root`
    ///
    /// Normalization runs to completion first, so a contract violation
    /// leaves the host untouched.
    pub fn apply<H: LayoutHost>(
        &self,
        host: &mut H,
        root: H::Item,
        equations: &[Equation<H::Item>],
    ) -> Result<ReconcileReport, ContractViolation> {
        let constraints = normalize_all(equations)?;
        let mut scope = self.find_or_create_scope(host, root);
        let report = self.reconcile(host, &mut scope, &constraints);
        host.store_scope(root, scope);
        Ok(report)
    }

    /// Create and activate constraints that no scope will ever manage
    ///
    /// The objects are not tagged and belong to the host from here on.
    pub fn activate<H: LayoutHost>(
        &self,
        host: &mut H,
        equations: &[Equation<H::Item>],
    ) -> Result<Vec<H::Constraint>, ContractViolation> {
        let constraints = normalize_all(equations)?;
        let mut created = Vec::with_capacity(constraints.len());
        for declared in constraints.iter().filter(|c| c.active) {
            host.set_uses_constraints(declared.subject.item, true);
            if let Some(reference) = declared.reference {
                host.set_uses_constraints(reference.item, true);
            }
            let constraint = host.create_constraint(declared);
            host.set_active(constraint, true);
            created.push(constraint);
        }
        Ok(created)
    }

    /// Detach the scope stored on `root`, building one if there is none
    ///
    /// A new scope adopts every constraint installed under `root` that
    /// carries the configured identifier and is not held by a scope stored
    /// elsewhere, such as one on a nested root. The returned scope is detached
    /// from the host; hand it back with [`LayoutHost::store_scope`] or the
    /// next lookup will build another one.
    pub fn find_or_create_scope<H: LayoutHost>(
        &self,
        host: &mut H,
        root: H::Item,
    ) -> Scope<H::Item, H::Constraint> {
        if let Some(scope) = host.take_scope(root) {
            return scope;
        }

        let mut scope = Scope::new(root);
        for constraint in host.installed_constraints(root) {
            if host.identifier(constraint).as_deref() != Some(self.config.identifier.as_str()) {
                continue;
            }
            if host.is_scoped(constraint) {
                continue;
            }
            if let Some(state) = host.constraint(constraint) {
                scope.entries.entry(state.identity()).or_insert(constraint);
            }
        }
        debug!(
            "created scope for {:?}, adopted {} managed constraints",
            root,
            scope.len()
        );
        scope
    }

    /// Bring the host in line with `constraints`, mutating `scope` in place
    pub fn reconcile<H: LayoutHost>(
        &self,
        host: &mut H,
        scope: &mut Scope<H::Item, H::Constraint>,
        constraints: &[PrimitiveConstraint<H::Item>],
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut unclaimed = scope.entries.clone();

        for declared in constraints {
            let identity = declared.identity();
            if let Some(existing) = scope.get(&identity) {
                unclaimed.remove(&identity);
                match host.constraint(existing) {
                    Some(current) => {
                        if update_in_place(host, existing, &current, declared) {
                            report.updated += 1;
                        } else {
                            report.unchanged += 1;
                        }
                        continue;
                    }
                    None => {
                        warn!("{:?} vanished from the host, recreating {}", existing, declared);
                        scope.entries.remove(&identity);
                    }
                }
            }

            if declared.active {
                let constraint = self.create(host, scope.root(), declared);
                scope.entries.insert(identity, constraint);
                report.created += 1;
            } else {
                report.skipped += 1;
            }
        }

        self.retire_stale(host, scope, unclaimed.into_iter().collect(), &mut report);

        debug!(
            "reconciled {:?}: {} declared, {:?}",
            scope.root(),
            constraints.len(),
            report
        );
        report
    }

    fn create<H: LayoutHost>(
        &self,
        host: &mut H,
        root: H::Item,
        declared: &PrimitiveConstraint<H::Item>,
    ) -> H::Constraint {
        // The root's own layout mode belongs to the caller
        if declared.subject.item != root {
            host.set_uses_constraints(declared.subject.item, true);
        }
        if let Some(reference) = declared.reference {
            if reference.item != root {
                host.set_uses_constraints(reference.item, true);
            }
        }

        let constraint = host.create_constraint(declared);
        host.set_identifier(constraint, &self.config.identifier);
        host.set_active(constraint, true);
        debug!("created {:?}: {}", constraint, declared);
        constraint
    }

    fn retire_stale<H: LayoutHost>(
        &self,
        host: &mut H,
        scope: &mut Scope<H::Item, H::Constraint>,
        stale: Vec<(ReuseIdentity<H::Item>, H::Constraint)>,
        report: &mut ReconcileReport,
    ) {
        let mut live = Vec::with_capacity(stale.len());
        for (identity, constraint) in stale {
            match host.constraint(constraint) {
                Some(state) => {
                    if state.active {
                        host.set_active(constraint, false);
                        report.deactivated += 1;
                    }
                    live.push((identity, constraint));
                }
                None => {
                    scope.entries.remove(&identity);
                }
            }
        }

        if live.len() < self.config.stale_eviction_threshold {
            return;
        }
        for (identity, constraint) in live {
            scope.entries.remove(&identity);
            host.discard_constraint(constraint);
            report.evicted += 1;
        }
        debug!("evicted {} stale constraints from {:?}", report.evicted, scope.root());
    }
}

/// Write each mutable field only when it differs; returns whether anything changed
fn update_in_place<H: LayoutHost>(
    host: &mut H,
    constraint: H::Constraint,
    current: &PrimitiveConstraint<H::Item>,
    declared: &PrimitiveConstraint<H::Item>,
) -> bool {
    let mut wrote = false;
    if current.constant != declared.constant {
        trace!("{:?} constant {} -> {}", constraint, current.constant, declared.constant);
        host.set_constant(constraint, declared.constant);
        wrote = true;
    }
    if current.priority != declared.priority {
        trace!("{:?} priority {:?} -> {:?}", constraint, current.priority, declared.priority);
        host.set_priority(constraint, declared.priority);
        wrote = true;
    }
    if current.active != declared.active {
        trace!("{:?} active {} -> {}", constraint, current.active, declared.active);
        host.set_active(constraint, declared.active);
        wrote = true;
    }
    wrote
}
