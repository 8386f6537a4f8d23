use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub fn shipped_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/tech_catalog.json")
}

pub fn shipped_catalog_value() -> Value {
    let raw = fs::read_to_string(shipped_catalog_path()).expect("shipped catalog is readable");
    serde_json::from_str(&raw).expect("shipped catalog is valid JSON")
}

pub fn write_catalog(dir: &Path, value: &Value) -> PathBuf {
    let path = dir.join("catalog.json");
    fs::write(&path, serde_json::to_string_pretty(value).expect("serializable catalog"))
        .expect("catalog fixture is writable");
    path
}
