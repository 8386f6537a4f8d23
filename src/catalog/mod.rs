//! Technology catalog wiring.
//!
//! This module wraps the JSON catalog under `schema/tech_catalog.json` so the
//! resolver can work against a validated snapshot with consistent
//! identifiers. Types here mirror the schema fields; callers use
//! `TechnologyIndex` for fast lookups and `CatalogRepository` when multiple
//! catalog generations are registered.

pub mod identity;
pub mod index;
pub mod model;
pub mod repository;
pub mod topology;

pub use identity::{CatalogKey, CategoryId, DomainCategory, TechnologyName};
pub use index::TechnologyIndex;
pub use model::{CategoryGroup, CompatibilityRule, Technology, TechnologyCatalog};
pub use repository::CatalogRepository;
pub use topology::CategoryTopology;

pub use model::load_catalog_from_path;
