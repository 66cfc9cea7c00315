use crate::compliance::domain::Package;
use crate::shared::Result;

/// PackageRepository port for imported package builds
pub trait PackageRepository: Send + Sync {
    /// Inserts or replaces the package with the same NVR
    fn save_package(&self, package: Package) -> Result<Package>;

    fn find_package(&self, nvr: &str) -> Option<Package>;
}
