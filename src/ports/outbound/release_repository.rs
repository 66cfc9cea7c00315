use crate::compliance::domain::{
    NewProduct, Product, ProductId, Release, ReleaseId, ReleasePackage,
};
use crate::shared::Result;

/// ReleaseRepository port for products, releases and their package lists
///
/// Implementations enforce uniqueness of product names, of
/// (product, version) and of (release, package_nvr).
pub trait ReleaseRepository: Send + Sync {
    /// Creates a product
    ///
    /// # Errors
    /// `OpenlcsError::Constraint` if a product with the same name exists
    fn create_product(&self, product: NewProduct) -> Result<Product>;

    fn find_product(&self, name: &str) -> Option<Product>;

    fn get_product(&self, id: ProductId) -> Option<Product>;

    /// Update-or-create of the release of `product` at `version`.
    ///
    /// An existing release keeps its id; its notes are replaced.
    fn add_release(&self, product: ProductId, version: &str, notes: Option<String>)
        -> Result<Release>;

    fn get_release(&self, id: ReleaseId) -> Option<Release>;

    /// Looks a release up by its joined `"{product}-{version}"` name
    fn find_release(&self, name: &str) -> Option<Release>;

    /// Adds the NVRs not yet recorded for `release`, returning how many were new
    fn update_packages(&self, release: ReleaseId, nvrs: &[String], is_source: bool)
        -> Result<usize>;

    /// Packages of `release`, sorted by NVR
    fn release_packages(&self, release: ReleaseId) -> Vec<ReleasePackage>;

    /// Deletes `release` together with its package rows
    fn delete_release(&self, release: ReleaseId) -> Result<Release>;
}
