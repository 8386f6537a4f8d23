//! Indexed view of a technology catalog instance.
//!
//! The index enforces the expected catalog schema version and provides fast
//! lookup by subcategory and name. Loading is intentionally strict about
//! duplicates and unknown schema versions so resolver sessions cannot
//! silently consume mismatched catalogs; query-time lookups never error
//! because absence is a valid "no compatible options" signal.

use crate::catalog::identity::{CatalogKey, CategoryId, TechnologyName};
use crate::catalog::model::{Technology, TechnologyCatalog, load_catalog_from_path};
use crate::catalog::topology::CategoryTopology;
use crate::schema_loader::{SchemaLoadOptions, load_json_schema};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// The crate currently ships a single catalog generation; reject unexpected
// versions rather than resolve against a graph with unknown semantics.
const DEFAULT_SCHEMA_VERSION: &str = "tech_catalog_v1";

#[derive(Debug)]
/// Technology catalog plus derived lookups: topology and per-category index.
pub struct TechnologyIndex {
    key: CatalogKey,
    catalog: TechnologyCatalog,
    topology: CategoryTopology,
    by_category: BTreeMap<CategoryId, BTreeMap<TechnologyName, Technology>>,
}

impl TechnologyIndex {
    /// Load and validate a catalog from disk.
    ///
    /// Validates the file against the catalog JSON Schema, checks the declared
    /// schema version against the allowed set, and builds deterministic
    /// BTreeMap lookups.
    pub fn load(path: &Path) -> Result<Self> {
        validate_against_schema(path)?;

        let catalog =
            load_catalog_from_path(path).with_context(|| format!("loading {}", path.display()))?;
        validate_schema_version(&catalog.schema_version.0)?;
        Self::from_catalog(catalog)
    }

    /// Index an already-parsed catalog without schema-file validation.
    ///
    /// Used by callers that fetch the catalog themselves and by tests that
    /// build fixture graphs in memory. Structural checks still apply.
    pub fn from_catalog(catalog: TechnologyCatalog) -> Result<Self> {
        if catalog.schema_version.0.trim().is_empty() {
            bail!("catalog schema_version must not be empty");
        }
        let topology = CategoryTopology::from_catalog(&catalog)?;
        let by_category = build_index(&catalog)?;
        Ok(Self {
            key: catalog.schema_version.clone(),
            catalog,
            topology,
            by_category,
        })
    }

    /// The catalog key declared in the loaded file.
    pub fn key(&self) -> &CatalogKey {
        &self.key
    }

    /// Access the underlying catalog (domains, descriptions, raw lists).
    pub fn catalog(&self) -> &TechnologyCatalog {
        &self.catalog
    }

    /// The derived subcategory-to-domain topology.
    pub fn topology(&self) -> &CategoryTopology {
        &self.topology
    }

    /// Resolve a technology record by subcategory and name.
    ///
    /// Returns `None` instead of erroring; at query time an unknown selection
    /// means "no compatible options", not a fault.
    pub fn technology(&self, category: &CategoryId, name: &TechnologyName) -> Option<&Technology> {
        self.by_category.get(category)?.get(name)
    }

    /// Technology records under a subcategory, in catalog order.
    ///
    /// Unknown subcategories yield an empty slice.
    pub fn technologies_in(&self, category: &CategoryId) -> &[Technology] {
        self.catalog
            .technologies
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }

    if !schema_version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        bail!(
            "schema_version must match ^[A-Za-z0-9_.-]+$, got {}",
            schema_version
        );
    }

    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }

    Ok(())
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([default_catalog_schema_version()])
}

fn default_catalog_schema_version() -> String {
    catalog_schema_version_from_disk().unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_string())
}

fn catalog_schema_version_from_disk() -> Option<String> {
    let path = canonical_catalog_schema_path();
    let file = File::open(path).ok()?;
    let value: Value = serde_json::from_reader(BufReader::new(file)).ok()?;
    value
        .pointer("/properties/schema_version/const")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn canonical_catalog_schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/tech_catalog.schema.json")
}

fn build_index(
    catalog: &TechnologyCatalog,
) -> Result<BTreeMap<CategoryId, BTreeMap<TechnologyName, Technology>>> {
    let mut index = BTreeMap::new();
    for (category, records) in &catalog.technologies {
        if category.0.trim().is_empty() {
            bail!("technologies section contains a subcategory with an empty key");
        }
        let entry: &mut BTreeMap<TechnologyName, Technology> =
            index.entry(category.clone()).or_default();
        for tech in records {
            if tech.name.0.trim().is_empty() {
                bail!("subcategory '{}' contains a technology with no name", category.0);
            }
            if entry.contains_key(&tech.name) {
                bail!(
                    "duplicate technology '{}' under subcategory '{}'",
                    tech.name.0,
                    category.0
                );
            }
            entry.insert(tech.name.clone(), tech.clone());
        }
    }
    Ok(index)
}

fn validate_against_schema(catalog_path: &Path) -> Result<()> {
    let catalog_file = File::open(catalog_path)
        .with_context(|| format!("opening catalog {}", catalog_path.display()))?;
    let catalog_value: Value = serde_json::from_reader(BufReader::new(catalog_file))
        .with_context(|| format!("parsing catalog {}", catalog_path.display()))?;

    let catalog_version = catalog_value
        .get("schema_version")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let schema_path = resolve_catalog_schema_path(catalog_path);
    let allowed = allowed_schema_versions();
    let schema = load_json_schema(
        &schema_path,
        SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            expected_version: Some(&catalog_version),
            patch_schema_version_const: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("loading catalog schema {}", schema_path.display()))?;

    if let Err(errors) = schema.compiled.validate(&catalog_value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "technology catalog {} failed schema validation:\n{}",
            catalog_path.display(),
            details
        );
    }
    Ok(())
}

fn resolve_catalog_schema_path(catalog_path: &Path) -> PathBuf {
    if let Some(base) = catalog_path.parent().and_then(|p| p.parent()) {
        let candidate = base.join("schema/tech_catalog.schema.json");
        if candidate.exists() {
            return candidate;
        }
    }

    canonical_catalog_schema_path()
}
