use super::{ProductId, ReleaseId, SourceId};
use serde::Serialize;

/// A product (e.g. "rhel", "openshift")
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub family: Option<String>,
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Fields of a product before the store assigns an id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewProduct {
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub family: Option<String>,
}

impl NewProduct {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            display_name: self.display_name,
            description: self.description,
            family: self.family,
        }
    }
}

/// A product release, unique per (product, version)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Release {
    pub id: ReleaseId,
    pub product_id: ProductId,
    pub version: String,
    /// Always `"{product}-{version}"`
    pub name: String,
    pub notes: Option<String>,
}

impl Release {
    /// The joined name of a release of `product_name` at `version`
    pub fn derive_name(product_name: &str, version: &str) -> String {
        format!("{}-{}", product_name, version)
    }
}

impl std::fmt::Display for Release {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A package shipped in a release, unique per (release, package_nvr)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePackage {
    #[serde(skip)]
    pub release_id: ReleaseId,
    pub package_nvr: String,
    /// True if the package is a source package
    pub is_source: bool,
}

/// An imported package build and its summarized license
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    pub nvr: String,
    pub sum_license: Option<String>,
    pub is_source: bool,
    pub source_id: Option<SourceId>,
}
