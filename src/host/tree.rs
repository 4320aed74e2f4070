//! In-memory view hierarchy implementing [`LayoutHost`]

use std::collections::{HashSet, VecDeque};

use log::warn;
use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::equation::Priority;
use crate::primitive::PrimitiveConstraint;
use crate::reconcile::Scope;

use super::solver::{ConstraintSolver, Frame, Frames, SolverError};
use super::LayoutHost;

new_key_type! {
    /// Handle to a view in a [`ViewTree`]
    pub struct ViewId;
    /// Handle to a constraint object owned by a [`ViewTree`]
    pub struct ConstraintId;
}

/// Empty slice constant for returning when a view has no children.
const EMPTY_CHILDREN: &[ViewId] = &[];

#[derive(Debug)]
struct ViewData {
    name: String,
    /// Views start out positioned by their frame; constraints switch this on
    uses_constraints: bool,
    scope: Option<Scope<ViewId, ConstraintId>>,
}

#[derive(Debug)]
struct ConstraintData {
    state: PrimitiveConstraint<ViewId>,
    identifier: Option<String>,
}

/// A view hierarchy backed by slotmap arenas
///
/// Views and constraint objects live in separate arenas. Removing a view
/// removes its subtree, the scopes attached to it, and every constraint that
/// touches a removed view.
pub struct ViewTree {
    views: SlotMap<ViewId, ViewData>,
    children: SecondaryMap<ViewId, Vec<ViewId>>,
    parent: SecondaryMap<ViewId, ViewId>,
    constraints: SlotMap<ConstraintId, ConstraintData>,
    /// Constraints held by a scope currently stored on some view
    scoped: HashSet<ConstraintId>,
    writes: usize,
}

impl ViewTree {
    pub fn new() -> Self {
        Self {
            views: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            constraints: SlotMap::with_key(),
            scoped: HashSet::new(),
            writes: 0,
        }
    }

    /// Insert a view with no parent
    pub fn insert(&mut self, name: impl Into<String>) -> ViewId {
        let id = self.views.insert(ViewData {
            name: name.into(),
            uses_constraints: false,
            scope: None,
        });
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a view as the last child of `parent`
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: ViewId, name: impl Into<String>) -> ViewId {
        debug_assert!(self.views.contains_key(parent), "parent view does not exist");
        let id = self.insert(name);
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        id
    }

    /// Remove a view and its whole subtree
    ///
    /// Scopes attached to removed views are dropped together with every
    /// constraint they held, and so is any other constraint that references
    /// a removed view. Returns `false` if the view did not exist.
    pub fn remove(&mut self, id: ViewId) -> bool {
        if !self.views.contains_key(id) {
            return false;
        }

        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        let mut removed = HashSet::new();
        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            if let Some(data) = self.views.remove(current) {
                if let Some(scope) = data.scope {
                    for constraint in scope.constraints() {
                        self.scoped.remove(&constraint);
                        self.constraints.remove(constraint);
                    }
                }
            }
            removed.insert(current);
        }

        self.constraints.retain(|_, c| {
            let subject_gone = removed.contains(&c.state.subject.item);
            let reference_gone = c
                .state
                .reference
                .is_some_and(|r| removed.contains(&r.item));
            !(subject_gone || reference_gone)
        });
        let constraints = &self.constraints;
        self.scoped.retain(|&c| constraints.contains_key(c));
        true
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    pub fn name(&self, id: ViewId) -> Option<&str> {
        self.views.get(id).map(|v| v.name.as_str())
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.children
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Whether the view is laid out by constraints rather than its frame
    pub fn uses_constraints(&self, id: ViewId) -> bool {
        self.views.get(id).is_some_and(|v| v.uses_constraints)
    }

    /// The scope currently attached to `root`
    pub fn scope(&self, root: ViewId) -> Option<&Scope<ViewId, ConstraintId>> {
        self.views.get(root).and_then(|v| v.scope.as_ref())
    }

    /// Number of constraint objects alive in the tree, active or not
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn active_constraints(
        &self,
    ) -> impl Iterator<Item = (ConstraintId, &PrimitiveConstraint<ViewId>)> + '_ {
        self.constraints
            .iter()
            .filter(|(_, c)| c.state.active)
            .map(|(id, c)| (id, &c.state))
    }

    /// Field writes performed on existing constraint objects so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// `root` and all its descendants
    pub fn subtree(&self, root: ViewId) -> Vec<ViewId> {
        let mut out = Vec::new();
        if !self.views.contains_key(root) {
            return out;
        }
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            out.push(current);
            queue.extend(self.children(current).iter().copied());
        }
        out
    }

    /// Resolve the active constraints under `root` into frames
    ///
    /// `root` is pinned to `frame`; every other view in its subtree gets the
    /// frame the solver settles on.
    pub fn solve(&self, root: ViewId, frame: Frame) -> Result<Frames, SolverError> {
        if !self.views.contains_key(root) {
            return Err(SolverError::UnknownView(root));
        }

        let mut solver = ConstraintSolver::new();
        solver.pin(root, frame)?;
        for id in self.installed_constraints(root) {
            if let Some(c) = self.constraints.get(id).filter(|c| c.state.active) {
                solver.add_constraint(&c.state)?;
            }
        }

        let solution = solver.solve()?;
        Ok(self
            .subtree(root)
            .into_iter()
            .map(|view| (view, solution.frame(view)))
            .collect())
    }

    fn data_mut(&mut self, id: ConstraintId) -> Option<&mut ConstraintData> {
        let data = self.constraints.get_mut(id);
        if data.is_none() {
            warn!("write to discarded constraint {:?} ignored", id);
        }
        data
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutHost for ViewTree {
    type Item = ViewId;
    type Constraint = ConstraintId;

    fn parent(&self, item: ViewId) -> Option<ViewId> {
        self.parent.get(item).copied()
    }

    fn installed_constraints(&self, root: ViewId) -> Vec<ConstraintId> {
        let subtree: HashSet<ViewId> = self.subtree(root).into_iter().collect();
        self.constraints
            .iter()
            .filter(|(_, c)| {
                subtree.contains(&c.state.subject.item)
                    || c.state.reference.is_some_and(|r| subtree.contains(&r.item))
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn set_uses_constraints(&mut self, item: ViewId, enabled: bool) {
        if let Some(view) = self.views.get_mut(item) {
            view.uses_constraints = enabled;
        }
    }

    fn take_scope(&mut self, root: ViewId) -> Option<Scope<ViewId, ConstraintId>> {
        let scope = self.views.get_mut(root).and_then(|v| v.scope.take())?;
        for constraint in scope.constraints() {
            self.scoped.remove(&constraint);
        }
        Some(scope)
    }

    fn store_scope(&mut self, root: ViewId, scope: Scope<ViewId, ConstraintId>) {
        match self.views.get_mut(root) {
            Some(view) => {
                if let Some(previous) = view.scope.take() {
                    for constraint in previous.constraints() {
                        self.scoped.remove(&constraint);
                    }
                }
                self.scoped.extend(scope.constraints());
                view.scope = Some(scope);
            }
            None => {
                // Root went away mid-pass; nothing may outlive it
                for constraint in scope.constraints() {
                    self.constraints.remove(constraint);
                }
            }
        }
    }

    fn create_constraint(&mut self, declared: &PrimitiveConstraint<ViewId>) -> ConstraintId {
        let state = PrimitiveConstraint {
            active: false,
            ..*declared
        };
        self.constraints.insert(ConstraintData {
            state,
            identifier: None,
        })
    }

    fn constraint(&self, constraint: ConstraintId) -> Option<PrimitiveConstraint<ViewId>> {
        self.constraints.get(constraint).map(|c| c.state)
    }

    fn identifier(&self, constraint: ConstraintId) -> Option<String> {
        self.constraints
            .get(constraint)
            .and_then(|c| c.identifier.clone())
    }

    fn set_identifier(&mut self, constraint: ConstraintId, identifier: &str) {
        if let Some(data) = self.data_mut(constraint) {
            data.identifier = Some(identifier.to_string());
            self.writes += 1;
        }
    }

    fn set_constant(&mut self, constraint: ConstraintId, constant: f64) {
        if let Some(data) = self.data_mut(constraint) {
            data.state.constant = constant;
            self.writes += 1;
        }
    }

    fn set_priority(&mut self, constraint: ConstraintId, priority: Priority) {
        if let Some(data) = self.data_mut(constraint) {
            data.state.priority = priority;
            self.writes += 1;
        }
    }

    fn set_active(&mut self, constraint: ConstraintId, active: bool) {
        if let Some(data) = self.data_mut(constraint) {
            data.state.active = active;
            self.writes += 1;
        }
    }

    fn is_scoped(&self, constraint: ConstraintId) -> bool {
        self.scoped.contains(&constraint)
    }

    fn discard_constraint(&mut self, constraint: ConstraintId) {
        self.scoped.remove(&constraint);
        self.constraints.remove(constraint);
    }
}
