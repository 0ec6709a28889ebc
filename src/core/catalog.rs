// Museum - core/catalog.rs
//
// Immutable, sorted snapshots of catalog entries.
//
// A catalog is built once per discovery pass and never mutated. Publishing a
// new pass means swapping in a new snapshot; anyone still holding the old one
// keeps a valid, unchanged view.

use crate::core::model::{Container, DiscoveredExhibit, Entry, UnitId};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Sorted, immutable sequence of entries.
pub struct Catalog<C: Container> {
    entries: Arc<[Entry<C>]>,
}

impl<C: Container> Catalog<C> {
    pub fn empty() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
        }
    }

    /// Build a snapshot from discovered exhibits.
    ///
    /// Entries are ordered by `sort_key`; ties keep discovery order.
    pub fn build(discovered: Vec<DiscoveredExhibit<C>>) -> Self {
        let mut entries: Vec<Entry<C>> = discovered
            .into_iter()
            .map(|d| Entry::new(d.unit, d.metadata))
            .collect();
        entries.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        Self {
            entries: Arc::from(entries),
        }
    }

    /// Build the successor of `old` from a fresh discovery pass.
    ///
    /// `old` is left untouched.
    pub fn replace(old: &Catalog<C>, discovered: Vec<DiscoveredExhibit<C>>) -> Self {
        let new = Self::build(discovered);

        let old_ids: HashSet<&UnitId> = old.iter().map(|e| e.unit().id()).collect();
        let new_ids: HashSet<&UnitId> = new.iter().map(|e| e.unit().id()).collect();
        let added = new_ids.difference(&old_ids).count();
        let removed = old_ids.difference(&new_ids).count();
        tracing::debug!(
            previous = old.len(),
            entries = new.len(),
            added,
            removed,
            "Catalog replaced"
        );

        new
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry<C>> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry<C>> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Entry<C>] {
        &self.entries
    }

    /// True when both handles refer to the same snapshot.
    pub fn ptr_eq(&self, other: &Catalog<C>) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl<C: Container> Clone for Catalog<C> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<C: Container> Default for Catalog<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: Container> fmt::Debug for Catalog<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<'a, C: Container> IntoIterator for &'a Catalog<C> {
    type Item = &'a Entry<C>;
    type IntoIter = std::slice::Iter<'a, Entry<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
