//! Shared JSON Schema loader for catalog validation.
//!
//! Callers hand over the schema path plus the version contract they expect;
//! the loader extracts the `schema_version` const, enforces the allowed set,
//! optionally patches the const to the caller's expected value, and compiles
//! a `jsonschema` validator from the resulting payload.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Result of loading and compiling a JSON Schema.
#[derive(Debug)]
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

/// Controls how schemas are loaded and normalized before compilation.
pub(crate) struct SchemaLoadOptions<'a> {
    /// Where to find the schema_version const inside the schema payload.
    pub schema_version_pointer: &'a str,
    /// Override schema_version when provided (used to align consts).
    pub expected_version: Option<&'a str>,
    /// Allowed schema_version values; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
    /// Patch the schema_version const in the schema payload to match
    /// `expected_version` before compiling.
    pub patch_schema_version_const: bool,
}

impl<'a> Default for SchemaLoadOptions<'a> {
    fn default() -> Self {
        Self {
            schema_version_pointer: "/properties/schema_version/const",
            expected_version: None,
            allowed_versions: None,
            patch_schema_version_const: false,
        }
    }
}

pub(crate) fn load_json_schema(
    path: &Path,
    options: SchemaLoadOptions,
) -> Result<SchemaLoadResult> {
    let file = File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
    let mut schema: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing schema {}", path.display()))?;

    let declared = schema
        .pointer(options.schema_version_pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow!(
                "schema {} has no string const at {}",
                path.display(),
                options.schema_version_pointer
            )
        })?;

    let effective = options
        .expected_version
        .map(str::to_string)
        .unwrap_or(declared);

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&effective) {
            bail!("schema_version '{effective}' not in allowed set {allowed:?}");
        }
    }

    if options.patch_schema_version_const {
        if let Some(slot) = schema.pointer_mut(options.schema_version_pointer) {
            *slot = Value::String(effective.clone());
        }
    }

    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling schema {}: {err}", path.display()))?;

    Ok(SchemaLoadResult {
        schema_version: effective,
        compiled,
    })
}
