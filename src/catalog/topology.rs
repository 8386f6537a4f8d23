//! Category topology derived from the catalog's `categories` section.
//!
//! The topology answers two questions the resolver needs when no selection
//! constrains a subcategory yet: which top-level domain owns a subcategory,
//! and what its full ordered option list is. Subcategory keys must be unique
//! across domains because the mapping is single-valued.

use crate::catalog::identity::{CategoryId, DomainCategory, TechnologyName};
use crate::catalog::model::TechnologyCatalog;
use anyhow::{Result, bail};
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
/// Subcategory-to-domain mapping plus each subcategory's full option list.
pub struct CategoryTopology {
    parent_of: BTreeMap<CategoryId, DomainCategory>,
    options: BTreeMap<CategoryId, Vec<TechnologyName>>,
}

impl CategoryTopology {
    /// Derive the topology from a parsed catalog.
    ///
    /// Rejects blank keys and subcategories claimed by two domains so the
    /// parent lookup stays unambiguous.
    pub fn from_catalog(catalog: &TechnologyCatalog) -> Result<Self> {
        let mut parent_of = BTreeMap::new();
        let mut options = BTreeMap::new();

        for (domain_name, group) in &catalog.categories {
            if domain_name.trim().is_empty() {
                bail!("catalog contains a domain with an empty name");
            }
            let domain = DomainCategory::from_str(domain_name);
            for (subcategory, list) in &group.subcategories {
                if subcategory.0.trim().is_empty() {
                    bail!("domain '{domain_name}' contains a subcategory with an empty key");
                }
                if let Some(previous) = parent_of.get(subcategory) {
                    bail!(
                        "subcategory '{}' appears under both '{}' and '{domain_name}'",
                        subcategory.0,
                        DomainCategory::as_str(previous),
                    );
                }
                parent_of.insert(subcategory.clone(), domain.clone());
                options.insert(subcategory.clone(), list.clone());
            }
        }

        Ok(Self { parent_of, options })
    }

    /// The top-level domain containing `subcategory`, if registered.
    pub fn parent_of(&self, subcategory: &CategoryId) -> Option<&DomainCategory> {
        self.parent_of.get(subcategory)
    }

    /// Full ordered option list for `subcategory`, if registered.
    pub fn options_for(&self, subcategory: &CategoryId) -> Option<&[TechnologyName]> {
        self.options.get(subcategory).map(Vec::as_slice)
    }

    /// Iterates subcategory keys in stable order.
    pub fn subcategories(&self) -> impl Iterator<Item = &CategoryId> {
        self.parent_of.keys()
    }
}
