//! Deserializable representation of `schema/tech_catalog.json`.
//!
//! The types mirror the catalog schema so the resolver and tests can reason
//! about technology metadata without ad-hoc JSON handling. Use
//! `TechnologyIndex` for validation and lookup; use these structs when the
//! full catalog surface is required (domain descriptions, raw option lists).

use crate::catalog::identity::{CatalogKey, CategoryId, TechnologyName};
use anyhow::Result;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
/// Full technology catalog as stored on disk.
pub struct TechnologyCatalog {
    pub schema_version: CatalogKey,
    #[serde(default)]
    pub description: Option<String>,
    /// Category topology source: top-level domain name to its subcategories.
    pub categories: BTreeMap<String, CategoryGroup>,
    /// Compatibility graph: subcategory to the technology records under it.
    #[serde(default)]
    pub technologies: BTreeMap<CategoryId, Vec<Technology>>,
}

#[derive(Clone, Debug, Deserialize)]
/// One top-level domain: its subcategories and their ordered option lists.
pub struct CategoryGroup {
    #[serde(default)]
    pub description: Option<String>,
    pub subcategories: BTreeMap<CategoryId, Vec<TechnologyName>>,
}

#[derive(Clone, Debug, Deserialize)]
/// One technology record in the compatibility graph.
pub struct Technology {
    pub name: TechnologyName,
    #[serde(default)]
    pub description: Option<String>,
    /// Source languages the technology supports. Only meaningful for
    /// frameworks; queried as a pseudo-compatibility axis.
    #[serde(default)]
    pub languages: Option<Vec<TechnologyName>>,
    #[serde(default, rename = "compatibleWith")]
    pub compatible_with: CompatibilityRule,
}

/// Compatibility data attached to a technology record.
///
/// Catalogs record this in two shapes: a legacy flat name list (applied to
/// any requested subcategory) and a per-subcategory map. Anything else reads
/// as `Unspecified`, which resolves to empty rather than failing the parse.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum CompatibilityRule {
    #[default]
    Unspecified,
    /// Legacy shorthand: names assumed compatible regardless of the
    /// subcategory being queried.
    Names(Vec<TechnologyName>),
    /// Names compatible per target subcategory.
    ByCategory(BTreeMap<CategoryId, Vec<TechnologyName>>),
}

impl<'de> Deserialize<'de> for CompatibilityRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

impl CompatibilityRule {
    /// Interpret a raw JSON value, tolerating malformed shapes.
    ///
    /// Non-string array entries and non-array map values are dropped instead
    /// of rejected; an unrecognized top-level shape reads as `Unspecified`.
    fn from_value(value: Value) -> Self {
        match value {
            Value::Array(entries) => CompatibilityRule::Names(collect_names(entries)),
            Value::Object(map) => {
                let mut by_category = BTreeMap::new();
                for (key, entry) in map {
                    if let Value::Array(entries) = entry {
                        by_category.insert(CategoryId(key), collect_names(entries));
                    }
                }
                CompatibilityRule::ByCategory(by_category)
            }
            _ => CompatibilityRule::Unspecified,
        }
    }
}

fn collect_names(entries: Vec<Value>) -> Vec<TechnologyName> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(TechnologyName(name)),
            _ => None,
        })
        .collect()
}

/// Read and parse a technology catalog from disk without additional validation.
pub fn load_catalog_from_path(path: &Path) -> Result<TechnologyCatalog> {
    let data = fs::read_to_string(path)?;
    let catalog: TechnologyCatalog = serde_json::from_str(&data)?;
    Ok(catalog)
}
