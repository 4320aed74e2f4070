//! Per-root index of materialized constraints

use std::collections::HashMap;
use std::hash::Hash;

use crate::primitive::ReuseIdentity;

/// Side table attached to the root of a declaration pass
///
/// Maps each reuse identity to the live host constraint realizing it. A
/// scope exclusively owns the constraints it indexes; the host stores it on
/// the root so that both go away together.
#[derive(Debug, Clone)]
pub struct Scope<I, C> {
    root: I,
    pub(crate) entries: HashMap<ReuseIdentity<I>, C>,
}

impl<I, C> Scope<I, C>
where
    I: Copy + Eq + Hash,
    C: Copy,
{
    pub fn new(root: I) -> Self {
        Self {
            root,
            entries: HashMap::new(),
        }
    }

    pub fn root(&self) -> I {
        self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identity: &ReuseIdentity<I>) -> Option<C> {
        self.entries.get(identity).copied()
    }

    pub fn contains(&self, identity: &ReuseIdentity<I>) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ReuseIdentity<I>, C)> + '_ {
        self.entries.iter().map(|(identity, c)| (identity, *c))
    }

    /// Every constraint held by this scope, live or deactivated
    pub fn constraints(&self) -> impl Iterator<Item = C> + '_ {
        self.entries.values().copied()
    }
}
