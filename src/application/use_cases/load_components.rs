use crate::application::dto::{ComponentData, ComponentDocument};
use crate::compliance::domain::{
    Component, ComponentTree, ComponentType, EntityRef, NewProduct, NodeId, ProductTree, Tree,
    TreeKind,
};
use crate::ports::outbound::{
    ComponentDataReader, ComponentRepository, ProgressReporter, ReleaseRepository,
};
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use serde::Serialize;
use std::path::Path;

/// Counts of what a load created or touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Products created
    pub products: usize,
    /// Releases created or updated
    pub releases: usize,
    /// Components inserted or updated
    pub components: usize,
    /// Tree nodes created, across both trees
    pub nodes: usize,
}

impl LoadSummary {
    fn absorb(&mut self, other: LoadSummary) {
        self.products += other.products;
        self.releases += other.releases;
        self.components += other.components;
        self.nodes += other.nodes;
    }
}

/// LoadComponentsUseCase - builds the product and component trees from
/// component registry exports
///
/// Loading is idempotent: components are upserted by natural key and tree
/// nodes are get-or-create on (parent, entity), so loading the same document
/// twice creates nothing new.
pub struct LoadComponentsUseCase<CR, R, C, P> {
    reader: CR,
    release_repository: R,
    component_repository: C,
    progress_reporter: P,
}

impl<CR, R, C, P> LoadComponentsUseCase<CR, R, C, P>
where
    CR: ComponentDataReader,
    R: ReleaseRepository,
    C: ComponentRepository,
    P: ProgressReporter,
{
    pub fn new(
        reader: CR,
        release_repository: R,
        component_repository: C,
        progress_reporter: P,
    ) -> Self {
        Self {
            reader,
            release_repository,
            component_repository,
            progress_reporter,
        }
    }

    /// Reads every document at `path` and loads it
    pub fn execute(
        &self,
        path: &Path,
        product_tree: &mut ProductTree,
        component_tree: &mut ComponentTree,
    ) -> Result<LoadSummary> {
        self.progress_reporter
            .report(&format!("📖 Loading component data from: {}", path.display()));

        let documents = self.reader.read_documents(path)?;
        let mut summary = LoadSummary::default();
        for document in &documents {
            summary.absorb(self.load_document(document, product_tree, component_tree)?);
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Loaded {} component(s) into {} new tree node(s)",
            summary.components, summary.nodes
        ));
        Ok(summary)
    }

    /// Loads one document: a product version into the product tree, or a
    /// component list into the component tree
    pub fn load_document(
        &self,
        document: &ComponentDocument,
        product_tree: &mut ProductTree,
        component_tree: &mut ComponentTree,
    ) -> Result<LoadSummary> {
        if document.is_product_version() {
            self.load_product_version(document, product_tree)
        } else {
            self.load_component_list(document, component_tree)
        }
    }

    fn load_product_version(
        &self,
        document: &ComponentDocument,
        product_tree: &mut ProductTree,
    ) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();

        let product_version = document.name.as_deref().ok_or_else(|| {
            OpenlcsError::validation("Product version document has no 'name'")
        })?;
        let product_name = document
            .products
            .first()
            .map(|product| product.name.as_str())
            .ok_or_else(|| {
                OpenlcsError::validation(format!(
                    "Product version '{}' does not name its product",
                    product_version
                ))
            })?;

        let product = match self.release_repository.find_product(product_name) {
            Some(product) => product,
            None => {
                summary.products += 1;
                self.release_repository
                    .create_product(NewProduct::named(product_name))?
            }
        };

        let version = release_version(product_version);
        let release = self.release_repository.add_release(
            product.id,
            version,
            document.description.clone(),
        )?;
        summary.releases += 1;
        tracing::info!(release = %release, "loading product version");

        let release_node = self.attach(
            product_tree,
            None,
            EntityRef::Release(release.id),
            &release.name,
            &mut summary,
        )?;

        for data in &document.components {
            let component = self.upsert(data, &mut summary)?;
            let node = self.attach(
                product_tree,
                Some(release_node),
                EntityRef::Component(component.id),
                &component.name,
                &mut summary,
            )?;
            if component.component_type.is_container() {
                self.attach_provides(product_tree, node, data, &mut summary)?;
            }
        }

        Ok(summary)
    }

    fn load_component_list(
        &self,
        document: &ComponentDocument,
        component_tree: &mut ComponentTree,
    ) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();

        for data in &document.components {
            match &data.component_type {
                Some(ComponentType::ContainerImage) => {
                    let container = self.upsert(data, &mut summary)?;
                    let node = self.attach(
                        component_tree,
                        None,
                        EntityRef::Component(container.id),
                        &container.name,
                        &mut summary,
                    )?;
                    self.attach_provides(component_tree, node, data, &mut summary)?;
                }
                Some(ComponentType::RhelModule) => {
                    // TODO: modules nest components like containers do; load them as roots too
                    tracing::debug!(module = ?data.name, "skipping RHEL module");
                }
                _ => {
                    self.upsert(data, &mut summary)?;
                }
            }
        }

        Ok(summary)
    }

    fn attach_provides<K: TreeKind>(
        &self,
        tree: &mut Tree<K>,
        parent: NodeId<K>,
        container: &ComponentData,
        summary: &mut LoadSummary,
    ) -> Result<()> {
        for provided in &container.provides {
            let component = self.upsert(provided, summary)?;
            self.attach(
                tree,
                Some(parent),
                EntityRef::Component(component.id),
                &component.name,
                summary,
            )?;
        }
        Ok(())
    }

    /// Link-only records carry no uuid; they reuse the uuid of an earlier
    /// record with the same coordinates so reloading stays idempotent.
    fn upsert(&self, data: &ComponentData, summary: &mut LoadSummary) -> Result<Component> {
        let mut draft = data.to_draft()?;
        if !draft.synced {
            if let Some(existing) = self.component_repository.find_by_coordinates(&draft) {
                draft.uuid = existing.uuid;
            }
        }
        let component = self.component_repository.upsert_component(draft)?;
        summary.components += 1;
        Ok(component)
    }

    fn attach<K: TreeKind>(
        &self,
        tree: &mut Tree<K>,
        parent: Option<NodeId<K>>,
        entity: EntityRef,
        name: &str,
        summary: &mut LoadSummary,
    ) -> Result<NodeId<K>> {
        let (node, created) = tree.get_or_insert(parent, entity, name)?;
        if created {
            summary.nodes += 1;
        }
        Ok(node)
    }
}

/// `rhel-8.6.0` → `8.6.0`
fn release_version(product_version: &str) -> &str {
    product_version
        .rsplit('-')
        .next()
        .unwrap_or(product_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::persistence::MemoryStore;
    use crate::compliance::domain::ComponentId;
    use crate::compliance::policies::ProvidesDisambiguation;
    use crate::compliance::services::{ProvidesResolver, ProvidesScope};
    use serde_json::json;

    struct NoopReader;

    impl ComponentDataReader for NoopReader {
        fn read_documents(&self, _path: &Path) -> Result<Vec<ComponentDocument>> {
            Ok(Vec::new())
        }
    }

    struct MockProgressReporter;

    impl ProgressReporter for MockProgressReporter {
        fn report(&self, _message: &str) {}
        fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
        fn report_error(&self, _message: &str) {}
        fn report_completion(&self, _message: &str) {}
    }

    fn loader(
        store: &MemoryStore,
    ) -> LoadComponentsUseCase<NoopReader, MemoryStore, MemoryStore, MockProgressReporter> {
        LoadComponentsUseCase::new(
            NoopReader,
            store.clone(),
            store.clone(),
            MockProgressReporter,
        )
    }

    fn product_version_document() -> ComponentDocument {
        serde_json::from_value(json!({
            "ofuri": "o:redhat:openshift:4.12",
            "name": "openshift-4.12",
            "description": "OpenShift 4.12",
            "products": [{"name": "openshift"}],
            "components": [
                {
                    "uuid": "0b5a8e8e-6f3a-4c7e-9a55-4f6d1a0c1a01",
                    "type": "CONTAINER_IMAGE",
                    "name": "ose-cli",
                    "version": "v4.12.0",
                    "release": "1",
                    "arch": "noarch",
                    "provides": [
                        {
                            "uuid": "0b5a8e8e-6f3a-4c7e-9a55-4f6d1a0c1a02",
                            "type": "GOLANG",
                            "name": "github.com/spf13/cobra",
                            "version": "v1.6.0",
                            "release": "",
                            "arch": ""
                        },
                        {"link": "https://registry/api/v1/components?purl=pkg%253Arpm/redhat/bash%25405.1.8-6.el9%253Farch%253Dx86_64"}
                    ]
                },
                {
                    "uuid": "0b5a8e8e-6f3a-4c7e-9a55-4f6d1a0c1a03",
                    "type": "RPM",
                    "name": "openshift-clients",
                    "version": "4.12.0",
                    "release": "2.el8",
                    "arch": "x86_64",
                    "license": "ASL 2.0"
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_load_product_version_builds_release_tree() {
        let store = MemoryStore::new();
        let mut product_tree = ProductTree::new();
        let mut component_tree = ComponentTree::new();

        let summary = loader(&store)
            .load_document(&product_version_document(), &mut product_tree, &mut component_tree)
            .unwrap();

        assert_eq!(summary.products, 1);
        assert_eq!(summary.releases, 1);
        assert_eq!(summary.components, 4);
        assert_eq!(summary.nodes, 5);
        assert!(component_tree.is_empty());

        let release = store.find_release("openshift-4.12").unwrap();
        assert_eq!(release.version, "4.12");
        assert_eq!(release.notes.as_deref(), Some("OpenShift 4.12"));

        let roots = product_tree.roots();
        assert_eq!(roots.len(), 1);
        let names: Vec<&str> = product_tree
            .children(roots[0].id())
            .unwrap()
            .iter()
            .map(|node| node.name())
            .collect();
        assert_eq!(names, vec!["ose-cli", "openshift-clients"]);

        let container = store
            .upsert_component(product_version_document().components[0].to_draft().unwrap())
            .unwrap();
        let provides = ProvidesResolver::new(ProvidesDisambiguation::Strict)
            .resolve(
                container.id,
                ProvidesScope::Release(release.id),
                &product_tree,
                &component_tree,
            )
            .unwrap();
        assert_eq!(provides.len(), 2);
    }

    #[test]
    fn test_loading_twice_creates_nothing_new() {
        let store = MemoryStore::new();
        let mut product_tree = ProductTree::new();
        let mut component_tree = ComponentTree::new();
        let use_case = loader(&store);
        let document = product_version_document();

        use_case
            .load_document(&document, &mut product_tree, &mut component_tree)
            .unwrap();
        let components_before = store.component_count();

        let summary = use_case
            .load_document(&document, &mut product_tree, &mut component_tree)
            .unwrap();
        assert_eq!(summary.products, 0);
        assert_eq!(summary.nodes, 0);
        assert_eq!(product_tree.len(), 5);
        assert_eq!(store.component_count(), components_before);
    }

    #[test]
    fn test_load_component_list_builds_container_roots() {
        let store = MemoryStore::new();
        let mut product_tree = ProductTree::new();
        let mut component_tree = ComponentTree::new();
        let document: ComponentDocument = serde_json::from_value(json!({
            "components": [
                {
                    "type": "CONTAINER_IMAGE",
                    "name": "ubi9",
                    "version": "9.1",
                    "release": "1",
                    "arch": "noarch",
                    "provides": [
                        {"type": "RPM", "name": "glibc", "version": "2.34", "release": "1.el9", "arch": "x86_64"},
                        {"type": "RPM", "name": "bash", "version": "5.1", "release": "2.el9", "arch": "x86_64"}
                    ]
                },
                {"type": "RHEL_MODULE", "name": "nodejs", "version": "18"},
                {"type": "SRPM", "name": "zlib", "version": "1.2", "release": "3", "arch": "src"}
            ]
        }))
        .unwrap();

        let summary = loader(&store)
            .load_document(&document, &mut product_tree, &mut component_tree)
            .unwrap();

        assert_eq!(summary.components, 4);
        assert_eq!(summary.nodes, 3);
        assert!(product_tree.is_empty());
        assert_eq!(component_tree.roots().len(), 1);

        let root = component_tree.roots()[0].entity().as_component().unwrap();
        let provides = ProvidesResolver::new(ProvidesDisambiguation::default())
            .resolve(root, ProvidesScope::Canonical, &product_tree, &component_tree)
            .unwrap();
        let names: Vec<String> = provides
            .iter()
            .map(|id: &ComponentId| store.get_component(*id).unwrap().name)
            .collect();
        assert_eq!(names, vec!["glibc", "bash"]);
    }

    #[test]
    fn test_product_version_without_product() {
        let store = MemoryStore::new();
        let document: ComponentDocument = serde_json::from_value(json!({
            "ofuri": "o:redhat:rhel:9",
            "name": "rhel-9",
            "products": []
        }))
        .unwrap();
        let err = loader(&store)
            .load_document(&document, &mut ProductTree::new(), &mut ComponentTree::new())
            .unwrap_err();
        assert!(err.to_string().contains("does not name its product"));
    }

    #[test]
    fn test_release_version_takes_last_segment() {
        assert_eq!(release_version("rhel-8.6.0"), "8.6.0");
        assert_eq!(release_version("openshift-container-platform-4.12"), "4.12");
        assert_eq!(release_version("plain"), "plain");
    }
}
