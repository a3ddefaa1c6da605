//! Catalog snapshot comparison for the release-tag gate.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::catalog::Catalog;

/// Languages added and removed between two catalog snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl CatalogDiff {
    /// A version tag bump is warranted iff exactly one language was added
    /// and none were removed.
    pub fn warrants_release_tag(&self) -> bool {
        self.removed.is_empty() && self.added.len() == 1
    }
}

/// Pure key-set difference over two catalogs.
pub fn diff(old: &Catalog, new: &Catalog) -> CatalogDiff {
    let old_names: BTreeSet<String> = old.names().map(str::to_string).collect();
    let new_names: BTreeSet<String> = new.names().map(str::to_string).collect();
    CatalogDiff {
        added: new_names.difference(&old_names).cloned().collect(),
        removed: old_names.difference(&new_names).cloned().collect(),
    }
}
