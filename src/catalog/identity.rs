use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Versioned key for a technology catalog (e.g., `tech_catalog_v1`).
///
/// Stored alongside resolver sessions so consumers can pin queries to the
/// catalog snapshot the session was started against.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogKey(pub String);

/// Technology name, unique within its subcategory (e.g., `React`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechnologyName(pub String);

/// Subcategory key used throughout the compatibility graph
/// (e.g., `frameworks`, `stateManagement`, `databases`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    /// Subcategory holding the pseudo-compatibility language axis.
    ///
    /// Framework records carry a `languages` list instead of a compatibility
    /// entry for this subcategory; the resolver special-cases it.
    pub const LANGUAGES: &'static str = "languages";
}

/// Top-level domain grouping mirrored from the catalog schema.
///
/// Known variants keep serialization consistent; `Other` preserves forward
/// compatibility with catalogs that introduce new domains.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DomainCategory {
    Frontend,
    Backend,
    Database,
    Authentication,
    Deployment,
    Storage,
    Hosting,
    Testing,
    Other(String),
}

impl Serialize for DomainCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DomainCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

impl DomainCategory {
    pub fn as_str(&self) -> &str {
        match self {
            DomainCategory::Frontend => "frontend",
            DomainCategory::Backend => "backend",
            DomainCategory::Database => "database",
            DomainCategory::Authentication => "authentication",
            DomainCategory::Deployment => "deployment",
            DomainCategory::Storage => "storage",
            DomainCategory::Hosting => "hosting",
            DomainCategory::Testing => "testing",
            DomainCategory::Other(value) => value.as_str(),
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "frontend" => DomainCategory::Frontend,
            "backend" => DomainCategory::Backend,
            "database" => DomainCategory::Database,
            "authentication" => DomainCategory::Authentication,
            "deployment" => DomainCategory::Deployment,
            "storage" => DomainCategory::Storage,
            "hosting" => DomainCategory::Hosting,
            "testing" => DomainCategory::Testing,
            other => DomainCategory::Other(other.to_string()),
        }
    }
}
