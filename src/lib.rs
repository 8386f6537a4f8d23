//! Shared library for the stackfit resolver.
//!
//! The crate exposes the technology catalog types, the compatibility
//! resolution functions, and the utilities used by the helper binaries.
//! Public functions here form the contract the binaries depend on: catalog
//! discovery, selection parsing, and the JSON helpers that mirror what the
//! form layer persists.

use anyhow::{Result, bail};
use serde_json::Value;
use std::{env, path::PathBuf};

pub mod catalog;
pub mod resolver;
pub mod validation;

pub(crate) mod schema_loader;

pub use catalog::{
    CatalogKey, CatalogRepository, CategoryGroup, CategoryId, CategoryTopology, CompatibilityRule,
    DomainCategory, Technology, TechnologyCatalog, TechnologyIndex, TechnologyName,
    load_catalog_from_path,
};
pub use resolver::{
    SelectionSet, compatible_technologies, filter_compatible, reverse_dependencies,
};
pub use validation::lint_catalog;

const SHIPPED_CATALOG: &str = "schema/tech_catalog.json";

/// Locate the catalog file to resolve against.
///
/// Honors `STACKFIT_CATALOG` when it points at a real file, then falls back
/// to the snapshot shipped with the crate. Callers can treat failure as fatal
/// because every query needs a graph to work from.
pub fn default_catalog_path() -> Result<PathBuf> {
    if let Ok(env_path) = env::var("STACKFIT_CATALOG") {
        if !env_path.trim().is_empty() {
            let path = PathBuf::from(env_path);
            if path.is_file() {
                return Ok(path);
            }
            bail!(
                "STACKFIT_CATALOG points at {}, which is not a file",
                path.display()
            );
        }
    }

    let shipped = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(SHIPPED_CATALOG);
    if shipped.is_file() {
        return Ok(shipped);
    }

    bail!("Unable to locate a technology catalog. Set STACKFIT_CATALOG to a catalog JSON file.")
}

/// Parse one `<subcategory>=<name>` selection argument.
pub fn parse_selection_pair(raw: &str) -> Result<(CategoryId, TechnologyName)> {
    let Some((category, name)) = raw.split_once('=') else {
        bail!("selection '{raw}' must use the form <subcategory>=<name>");
    };
    let category = category.trim();
    let name = name.trim();
    if category.is_empty() || name.is_empty() {
        bail!("selection '{raw}' must use the form <subcategory>=<name>");
    }
    Ok((
        CategoryId(category.to_string()),
        TechnologyName(name.to_string()),
    ))
}

/// Parse a selection map from the JSON shape the form layer persists: an
/// object mapping each subcategory to the single chosen name.
///
/// The parser mirrors the form contract: later duplicate keys cannot occur in
/// a JSON object, and any non-string value is a malformed document rather
/// than a resolvable selection.
pub fn selections_from_json(value: &Value) -> Result<SelectionSet> {
    let Value::Object(map) = value else {
        bail!("selections must be a JSON object of subcategory to chosen name");
    };

    let mut selections = SelectionSet::new();
    for (category, entry) in map {
        let Value::String(name) = entry else {
            bail!("selection '{category}' must name a single technology");
        };
        selections.select(
            CategoryId(category.clone()),
            TechnologyName(name.clone()),
        );
    }
    Ok(selections)
}
