use super::{ComponentView, ContainerView};
use crate::compliance::domain::{Product, Release};
use serde::Serialize;

/// Scan findings attached to a release package
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ScanResult {
    pub sum_license: Option<String>,
    /// Source url, source packages only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub copyrights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleasePackageView {
    pub package_nvr: String,
    pub is_source: bool,
    /// `None` until the package has been imported
    pub scan_result: Option<ScanResult>,
}

/// Everything known about one release: its tree contents and package scans
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseReport {
    pub release: Release,
    pub product: Product,
    pub containers: Vec<ContainerView>,
    pub components: Vec<ComponentView>,
    pub packages: Vec<ReleasePackageView>,
}
