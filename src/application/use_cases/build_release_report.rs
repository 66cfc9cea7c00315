use crate::application::read_models::{
    ComponentView, ContainerView, ReleasePackageView, ReleaseReport, ScanResult,
};
use crate::compliance::domain::{
    Component, ComponentId, ComponentType, Entity, EntityRef, ProductTree, ReleasePackage,
};
use crate::compliance::policies::ProvidesDisambiguation;
use crate::compliance::services::{release_root, ProvidesResolver};
use crate::ports::outbound::{
    EntityResolver, PackageRepository, ReleaseRepository, SourceRepository,
};
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use std::collections::HashSet;

/// BuildReleaseReportUseCase - collects what a release ships and what its
/// packages were found to contain
///
/// # Type Parameters
/// * `R` - ReleaseRepository implementation
/// * `E` - EntityResolver implementation
/// * `PK` - PackageRepository implementation
/// * `S` - SourceRepository implementation
pub struct BuildReleaseReportUseCase<R, E, PK, S> {
    release_repository: R,
    entity_resolver: E,
    package_repository: PK,
    source_repository: S,
    provides_resolver: ProvidesResolver,
}

impl<R, E, PK, S> BuildReleaseReportUseCase<R, E, PK, S>
where
    R: ReleaseRepository,
    E: EntityResolver,
    PK: PackageRepository,
    S: SourceRepository,
{
    pub fn new(
        release_repository: R,
        entity_resolver: E,
        package_repository: PK,
        source_repository: S,
        disambiguation: ProvidesDisambiguation,
    ) -> Self {
        Self {
            release_repository,
            entity_resolver,
            package_repository,
            source_repository,
            provides_resolver: ProvidesResolver::new(disambiguation),
        }
    }

    /// Builds the report of the release named `release_name`
    ///
    /// # Errors
    /// - `UnknownRelease` if no release has that name
    /// - `NotFound` / `Constraint` unless the release has exactly one root
    ///   node in `product_tree`
    pub fn execute(&self, release_name: &str, product_tree: &ProductTree) -> Result<ReleaseReport> {
        let release = self
            .release_repository
            .find_release(release_name)
            .ok_or_else(|| OpenlcsError::UnknownRelease {
                name: release_name.to_string(),
            })?;
        let product = self
            .release_repository
            .get_product(release.product_id)
            .ok_or_else(|| OpenlcsError::not_found("Product", release.product_id))?;

        let root = release_root(product_tree, release.id)?;
        let below = product_tree.descendants(root.id())?;
        let shipped = self.components_below(below.iter().map(|node| node.entity()))?;

        let mut containers = Vec::new();
        let mut components = Vec::new();
        for component in &shipped {
            if component.component_type.is_container() {
                let provides = self
                    .provides_resolver
                    .in_release(component.id, release.id, product_tree)?;
                containers.push(ContainerView {
                    component: ComponentView::from(component),
                    provides: self.views_of(&provides)?,
                });
            } else if ComponentType::PACKAGE_TYPES.contains(&component.component_type) {
                components.push(ComponentView::from(component));
            }
        }

        let packages = self
            .release_repository
            .release_packages(release.id)
            .into_iter()
            .map(|package| self.package_view(package))
            .collect();

        tracing::debug!(
            release = %release,
            containers = containers.len(),
            components = components.len(),
            "built release report"
        );

        Ok(ReleaseReport {
            release,
            product,
            containers,
            components,
            packages,
        })
    }

    /// Distinct components behind `entities`, in the given order
    fn components_below(
        &self,
        entities: impl Iterator<Item = EntityRef>,
    ) -> Result<Vec<Component>> {
        let mut seen = HashSet::new();
        let mut components = Vec::new();
        for entity in entities {
            if let Some(id) = entity.as_component() {
                if seen.insert(id) {
                    components.push(self.component(id)?);
                }
            }
        }
        Ok(components)
    }

    fn component(&self, id: ComponentId) -> Result<Component> {
        match self.entity_resolver.resolve(EntityRef::Component(id))? {
            Entity::Component(component) => Ok(component),
            other => Err(OpenlcsError::validation(format!(
                "component:{} resolved to a {}",
                id,
                other.node_label()
            ))
            .into()),
        }
    }

    fn views_of(&self, ids: &[ComponentId]) -> Result<Vec<ComponentView>> {
        ids.iter()
            .map(|id| self.component(*id).map(|component| ComponentView::from(&component)))
            .collect()
    }

    fn package_view(&self, package: ReleasePackage) -> ReleasePackageView {
        let scan_result = self
            .package_repository
            .find_package(&package.package_nvr)
            .map(|imported| {
                let mut result = ScanResult {
                    sum_license: imported.sum_license.clone(),
                    ..ScanResult::default()
                };
                if imported.is_source {
                    if let Some(source) = imported
                        .source_id
                        .and_then(|id| self.source_repository.get_source(id))
                    {
                        result.url = source.url.clone();
                        result.licenses = self.source_repository.license_keys(source.id);
                        result.copyrights = self.source_repository.copyright_statements(source.id);
                    }
                }
                result
            });

        ReleasePackageView {
            package_nvr: package.package_nvr,
            is_source: package.is_source,
            scan_result,
        }
    }
}
