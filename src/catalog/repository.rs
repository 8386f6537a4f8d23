//! Holds one or more catalog snapshots for lookup by key.
//!
//! The repository lets callers resolve technology metadata using the catalog
//! key a form session was pinned to, keeping snapshot selection explicit even
//! when multiple catalog generations are loaded.

use crate::catalog::identity::{CatalogKey, CategoryId, TechnologyName};
use crate::catalog::index::TechnologyIndex;
use crate::catalog::model::Technology;
use std::collections::BTreeMap;

#[derive(Default)]
/// In-memory store for catalog snapshots keyed by `CatalogKey`.
pub struct CatalogRepository {
    catalogs: BTreeMap<CatalogKey, TechnologyIndex>,
}

impl CatalogRepository {
    /// Register a snapshot for later lookup.
    pub fn register(&mut self, index: TechnologyIndex) {
        self.catalogs.insert(index.key().clone(), index);
    }

    /// Fetch a snapshot by key, if present.
    pub fn get(&self, key: &CatalogKey) -> Option<&TechnologyIndex> {
        self.catalogs.get(key)
    }

    /// Resolve a technology record inside a registered snapshot.
    pub fn find_technology(
        &self,
        key: &CatalogKey,
        category: &CategoryId,
        name: &TechnologyName,
    ) -> Option<&Technology> {
        self.get(key)?.technology(category, name)
    }
}
