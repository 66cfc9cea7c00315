use crate::compliance::domain::{
    Component, ComponentDraft, ComponentId, ComponentKey, Entity, EntityRef, FileDetections,
    NewProduct, NewSource, NewTask, Package, Product, ProductId, Release, ReleaseId,
    ReleasePackage, Source, SourceId, SourceState, Task, TaskId,
};
use crate::ports::outbound::{
    ComponentRepository, EntityResolver, PackageRepository, ReleaseRepository, SourceRepository,
    TaskRepository,
};
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// MemoryStore - in-process implementation of every repository port
///
/// Unique constraints (product name, product+version, release+NVR, source
/// checksum) are enforced through the entry API of the index maps, so two
/// concurrent writers racing on the same key cannot both succeed.
///
/// Cloning is cheap and yields a handle onto the same store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    last_id: AtomicU64,
    products: DashMap<ProductId, Product>,
    product_names: DashMap<String, ProductId>,
    releases: DashMap<ReleaseId, Release>,
    release_versions: DashMap<(ProductId, String), ReleaseId>,
    release_names: DashMap<String, ReleaseId>,
    release_packages: DashMap<ReleaseId, BTreeMap<String, ReleasePackage>>,
    components: DashMap<ComponentId, Component>,
    component_keys: DashMap<ComponentKey, ComponentId>,
    sources: DashMap<SourceId, Source>,
    source_checksums: DashMap<String, SourceId>,
    detections: DashMap<SourceId, BTreeMap<String, FileDetections>>,
    packages: DashMap<String, Package>,
    tasks: DashMap<TaskId, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        self.inner.last_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn component_count(&self) -> usize {
        self.inner.components.len()
    }

    pub fn product_count(&self) -> usize {
        self.inner.products.len()
    }

    pub fn release_count(&self) -> usize {
        self.inner.releases.len()
    }
}

impl ReleaseRepository for MemoryStore {
    fn create_product(&self, product: NewProduct) -> Result<Product> {
        match self.inner.product_names.entry(product.name.clone()) {
            Entry::Occupied(_) => Err(OpenlcsError::constraint(
                "unique_product_name",
                format!("product '{}' already exists", product.name),
            )
            .into()),
            Entry::Vacant(slot) => {
                let product = product.into_product(ProductId::new(self.next_id()));
                slot.insert(product.id);
                self.inner.products.insert(product.id, product.clone());
                Ok(product)
            }
        }
    }

    fn find_product(&self, name: &str) -> Option<Product> {
        let id = *self.inner.product_names.get(name)?;
        self.get_product(id)
    }

    fn get_product(&self, id: ProductId) -> Option<Product> {
        self.inner.products.get(&id).map(|product| product.value().clone())
    }

    fn add_release(
        &self,
        product: ProductId,
        version: &str,
        notes: Option<String>,
    ) -> Result<Release> {
        let product = self
            .get_product(product)
            .ok_or_else(|| OpenlcsError::not_found("Product", product))?;

        match self
            .inner
            .release_versions
            .entry((product.id, version.to_string()))
        {
            Entry::Occupied(existing) => {
                let id = *existing.get();
                let mut release = self
                    .inner
                    .releases
                    .get_mut(&id)
                    .ok_or_else(|| OpenlcsError::not_found("Release", id))?;
                release.notes = notes;
                Ok(release.value().clone())
            }
            Entry::Vacant(slot) => {
                let name = Release::derive_name(&product.name, version);
                let id = match self.inner.release_names.entry(name.clone()) {
                    Entry::Occupied(_) => {
                        return Err(OpenlcsError::constraint(
                            "unique_release_name",
                            format!("release '{}' already exists", name),
                        )
                        .into())
                    }
                    Entry::Vacant(name_slot) => {
                        let id = ReleaseId::new(self.next_id());
                        name_slot.insert(id);
                        id
                    }
                };
                slot.insert(id);

                let release = Release {
                    id,
                    product_id: product.id,
                    version: version.to_string(),
                    name,
                    notes,
                };
                self.inner.releases.insert(id, release.clone());
                Ok(release)
            }
        }
    }

    fn get_release(&self, id: ReleaseId) -> Option<Release> {
        self.inner.releases.get(&id).map(|release| release.value().clone())
    }

    fn find_release(&self, name: &str) -> Option<Release> {
        let id = *self.inner.release_names.get(name)?;
        self.get_release(id)
    }

    fn update_packages(
        &self,
        release: ReleaseId,
        nvrs: &[String],
        is_source: bool,
    ) -> Result<usize> {
        if !self.inner.releases.contains_key(&release) {
            return Err(OpenlcsError::not_found("Release", release).into());
        }

        let mut packages = self.inner.release_packages.entry(release).or_default();
        let mut added = 0;
        for nvr in nvrs {
            if let std::collections::btree_map::Entry::Vacant(slot) = packages.entry(nvr.clone()) {
                slot.insert(ReleasePackage {
                    release_id: release,
                    package_nvr: nvr.clone(),
                    is_source,
                });
                added += 1;
            }
        }
        Ok(added)
    }

    fn release_packages(&self, release: ReleaseId) -> Vec<ReleasePackage> {
        self.inner
            .release_packages
            .get(&release)
            .map(|packages| packages.values().cloned().collect())
            .unwrap_or_default()
    }

    fn delete_release(&self, release: ReleaseId) -> Result<Release> {
        let (_, removed) = self
            .inner
            .releases
            .remove(&release)
            .ok_or_else(|| OpenlcsError::not_found("Release", release))?;
        self.inner
            .release_versions
            .remove(&(removed.product_id, removed.version.clone()));
        self.inner.release_names.remove(&removed.name);
        self.inner.release_packages.remove(&release);
        Ok(removed)
    }
}

impl ComponentRepository for MemoryStore {
    fn upsert_component(&self, draft: ComponentDraft) -> Result<Component> {
        match self.inner.component_keys.entry(draft.natural_key()) {
            Entry::Occupied(existing) => {
                let id = *existing.get();
                let mut component = self
                    .inner
                    .components
                    .get_mut(&id)
                    .ok_or_else(|| OpenlcsError::not_found("Component", id))?;
                component.purl = draft.purl;
                component.summary_license = draft.summary_license;
                component.synced = draft.synced;
                Ok(component.value().clone())
            }
            Entry::Vacant(slot) => {
                let component = draft.into_component(ComponentId::new(self.next_id()));
                slot.insert(component.id);
                self.inner.components.insert(component.id, component.clone());
                Ok(component)
            }
        }
    }

    fn get_component(&self, id: ComponentId) -> Option<Component> {
        self.inner.components.get(&id).map(|component| component.value().clone())
    }

    fn find_by_coordinates(&self, draft: &ComponentDraft) -> Option<Component> {
        let wanted = draft.natural_key();
        self.inner
            .component_keys
            .iter()
            .filter(|entry| {
                let key = entry.key();
                key.component_type == wanted.component_type
                    && key.name == wanted.name
                    && key.version == wanted.version
                    && key.release == wanted.release
                    && key.arch == wanted.arch
            })
            .map(|entry| *entry.value())
            .min()
            .and_then(|id| self.get_component(id))
    }

    fn set_component_source(&self, id: ComponentId, source: SourceId) -> Result<()> {
        if !self.inner.sources.contains_key(&source) {
            return Err(OpenlcsError::not_found("Source", source).into());
        }
        let mut component = self
            .inner
            .components
            .get_mut(&id)
            .ok_or_else(|| OpenlcsError::not_found("Component", id))?;
        component.source = Some(source);
        Ok(())
    }

    fn components_of_source(&self, source: SourceId) -> Vec<ComponentId> {
        let mut ids: Vec<ComponentId> = self
            .inner
            .components
            .iter()
            .filter(|component| component.source == Some(source))
            .map(|component| component.id)
            .collect();
        ids.sort();
        ids
    }
}

impl SourceRepository for MemoryStore {
    fn create_source(&self, source: NewSource) -> Result<Source> {
        match self.inner.source_checksums.entry(source.checksum.clone()) {
            Entry::Occupied(_) => Err(OpenlcsError::constraint(
                "unique_source_checksum",
                format!("a source with checksum {} already exists", source.checksum),
            )
            .into()),
            Entry::Vacant(slot) => {
                let source = source.into_source(SourceId::new(self.next_id()));
                slot.insert(source.id);
                self.inner.sources.insert(source.id, source.clone());
                Ok(source)
            }
        }
    }

    fn get_source(&self, id: SourceId) -> Option<Source> {
        self.inner.sources.get(&id).map(|source| source.value().clone())
    }

    fn find_source(&self, checksum: &str) -> Option<Source> {
        let id = *self.inner.source_checksums.get(checksum)?;
        self.get_source(id)
    }

    fn set_source_state(&self, id: SourceId, state: SourceState) -> Result<()> {
        let mut source = self
            .inner
            .sources
            .get_mut(&id)
            .ok_or_else(|| OpenlcsError::not_found("Source", id))?;
        source.state = state;
        Ok(())
    }

    fn record_detections(&self, id: SourceId, detections: FileDetections) -> Result<()> {
        if !self.inner.sources.contains_key(&id) {
            return Err(OpenlcsError::not_found("Source", id).into());
        }
        self.inner
            .detections
            .entry(id)
            .or_default()
            .insert(detections.path.clone(), detections);
        Ok(())
    }

    fn license_keys(&self, id: SourceId) -> Vec<String> {
        self.distinct_detections(id, |file| &file.license_keys)
    }

    fn copyright_statements(&self, id: SourceId) -> Vec<String> {
        self.distinct_detections(id, |file| &file.copyright_statements)
    }
}

impl MemoryStore {
    fn distinct_detections(
        &self,
        id: SourceId,
        select: impl Fn(&FileDetections) -> &Vec<String>,
    ) -> Vec<String> {
        self.inner
            .detections
            .get(&id)
            .map(|files| {
                files
                    .values()
                    .flat_map(|file| select(file).iter().cloned())
                    .collect::<BTreeSet<String>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl PackageRepository for MemoryStore {
    fn save_package(&self, package: Package) -> Result<Package> {
        if let Some(source) = package.source_id {
            if !self.inner.sources.contains_key(&source) {
                return Err(OpenlcsError::not_found("Source", source).into());
            }
        }
        self.inner.packages.insert(package.nvr.clone(), package.clone());
        Ok(package)
    }

    fn find_package(&self, nvr: &str) -> Option<Package> {
        self.inner.packages.get(nvr).map(|package| package.value().clone())
    }
}

impl TaskRepository for MemoryStore {
    fn create_task(&self, task: NewTask) -> Result<Task> {
        let task = task.into_task(TaskId::new(self.next_id()));
        self.inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    fn get_task(&self, id: TaskId) -> Option<Task> {
        self.inner.tasks.get(&id).map(|task| task.value().clone())
    }

    fn tasks(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .inner
            .tasks
            .iter()
            .map(|task| task.value().clone())
            .collect();
        tasks.sort_by_key(|task| task.id);
        tasks
    }
}

impl EntityResolver for MemoryStore {
    fn resolve(&self, entity: EntityRef) -> Result<Entity> {
        let resolved = match entity {
            EntityRef::Product(id) => self.get_product(id).map(Entity::Product),
            EntityRef::Release(id) => self.get_release(id).map(Entity::Release),
            EntityRef::Component(id) => self.get_component(id).map(Entity::Component),
        };
        resolved.ok_or_else(|| OpenlcsError::not_found(&entity.kind().to_string(), entity).into())
    }
}
