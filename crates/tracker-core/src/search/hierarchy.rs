//! Type hierarchy resolution
//!
//! Expands the types named in a query into the set of types whose work items
//! should match: each named type plus every transitive descendant.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::query::TypeFilterSet;
use crate::models::WorkItemTypeId;

/// Read-only view of the type forest
pub trait TypeCatalog {
    /// Direct children of `id`; empty for leaves and unknown types
    fn children(&self, id: &WorkItemTypeId) -> Vec<WorkItemTypeId>;

    /// Whether `id` names a known type
    fn exists(&self, id: &WorkItemTypeId) -> bool;
}

/// In-memory snapshot of the type forest
///
/// Nodes are stored as a parent table plus a derived `id -> children` index,
/// so traversal is index lookups only.
#[derive(Debug, Clone, Default)]
pub struct TypeForest {
    parents: HashMap<WorkItemTypeId, Option<WorkItemTypeId>>,
    children: HashMap<WorkItemTypeId, Vec<WorkItemTypeId>>,
}

impl TypeForest {
    /// Build a forest from `(id, parent)` pairs
    pub fn from_edges(
        edges: impl IntoIterator<Item = (WorkItemTypeId, Option<WorkItemTypeId>)>,
    ) -> Self {
        let mut forest = Self::default();
        for (id, parent) in edges {
            forest.parents.insert(id, parent);
        }
        forest.rebuild_index();
        forest
    }

    fn rebuild_index(&mut self) {
        self.children.clear();
        for (id, parent) in &self.parents {
            if let Some(parent) = parent {
                self.children.entry(*parent).or_default().push(*id);
            }
        }
        for ids in self.children.values_mut() {
            ids.sort_unstable();
        }
    }

    /// Parent of `id`, `None` for roots and unknown types
    pub fn parent(&self, id: &WorkItemTypeId) -> Option<WorkItemTypeId> {
        self.parents.get(id).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl TypeCatalog for TypeForest {
    fn children(&self, id: &WorkItemTypeId) -> Vec<WorkItemTypeId> {
        self.children.get(id).cloned().unwrap_or_default()
    }

    fn exists(&self, id: &WorkItemTypeId) -> bool {
        self.parents.contains_key(id)
    }
}

/// The type-membership predicate applied at execution time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeClosure {
    /// No type filter was requested; every type matches
    Unrestricted,
    /// Only work items whose type is in the set match (an empty set matches nothing)
    RestrictedTo(BTreeSet<WorkItemTypeId>),
}

impl TypeClosure {
    /// Whether a work item of type `id` passes the predicate
    pub fn admits(&self, id: &WorkItemTypeId) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::RestrictedTo(ids) => ids.contains(id),
        }
    }

    /// The member set, or `None` when unrestricted
    pub const fn members(&self) -> Option<&BTreeSet<WorkItemTypeId>> {
        match self {
            Self::Unrestricted => None,
            Self::RestrictedTo(ids) => Some(ids),
        }
    }

    /// Re-express a restricted closure as filters (for repeated resolution)
    pub fn to_filters(&self) -> TypeFilterSet {
        self.members()
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Resolve requested types into their descendant closure
///
/// An empty filter set resolves to [`TypeClosure::Unrestricted`]. Identifiers
/// the catalog does not know are kept as members; no work item can carry
/// them, so they contribute no matches.
pub fn resolve(catalog: &impl TypeCatalog, filters: &TypeFilterSet) -> TypeClosure {
    if filters.is_empty() {
        return TypeClosure::Unrestricted;
    }

    let mut visited: HashSet<WorkItemTypeId> = HashSet::new();
    let mut queue: VecDeque<WorkItemTypeId> = VecDeque::new();

    for id in filters {
        if !catalog.exists(id) {
            tracing::debug!(%id, "Type filter names an unknown type");
        }
        if visited.insert(*id) {
            queue.push_back(*id);
        }
    }

    while let Some(id) = queue.pop_front() {
        for child in catalog.children(&id) {
            if visited.insert(child) {
                queue.push_back(child);
            }
        }
    }

    TypeClosure::RestrictedTo(visited.into_iter().collect())
}
