/// Integration tests for the application layer
mod test_utilities;

use openlcs::application::dto::ComponentDocument;
use openlcs::ports::outbound::{ReleaseRepository, TaskRepository};
use openlcs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use test_utilities::mocks::*;

fn catalog_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/catalog")
        .join(file)
}

fn load(
    store: &MemoryStore,
    path: &Path,
    product_tree: &mut ProductTree,
    component_tree: &mut ComponentTree,
) {
    LoadComponentsUseCase::new(
        JsonComponentDataReader::new(),
        store.clone(),
        store.clone(),
        MockProgressReporter::new(),
    )
    .execute(path, product_tree, component_tree)
    .unwrap();
}

fn loaded_store() -> (MemoryStore, ProductTree, ComponentTree) {
    let store = MemoryStore::new();
    let mut product_tree = ProductTree::new();
    let mut component_tree = ComponentTree::new();
    load(
        &store,
        &catalog_path(""),
        &mut product_tree,
        &mut component_tree,
    );
    (store, product_tree, component_tree)
}

fn import_use_case(
    dispatcher: MockTaskDispatcher,
    store: &MemoryStore,
    settings: ImportSettings,
) -> SubmitImportUseCase<MockTaskDispatcher, MemoryStore, MemoryStore, MockProgressReporter> {
    SubmitImportUseCase::new(
        dispatcher,
        store.clone(),
        store.clone(),
        MockProgressReporter::new(),
        settings,
    )
}

#[test]
fn test_load_catalog_directory() {
    let (store, product_tree, component_tree) = loaded_store();

    let release = store.find_release("rhel-8.6.0").unwrap();
    assert_eq!(release.version, "8.6.0");
    assert_eq!(store.product_count(), 1);

    // release -> ubi8-minimal -> {bash, zlib}, release -> zlib (SRPM)
    assert_eq!(product_tree.len(), 5);
    // ubi8-minimal -> bash; the module is skipped, left-pad is not a container
    assert_eq!(component_tree.len(), 2);
    // ubi8-minimal, bash, zlib rpm, zlib srpm, left-pad
    assert_eq!(store.component_count(), 5);
}

#[test]
fn test_loading_twice_creates_nothing_new() {
    let (store, mut product_tree, mut component_tree) = loaded_store();
    load(
        &store,
        &catalog_path(""),
        &mut product_tree,
        &mut component_tree,
    );

    assert_eq!(product_tree.len(), 5);
    assert_eq!(component_tree.len(), 2);
    assert_eq!(store.component_count(), 5);
    assert_eq!(store.release_count(), 1);
}

#[test]
fn test_loader_with_in_memory_documents() {
    let document: ComponentDocument = serde_json::from_str(
        r#"{"components": [{"type": "CONTAINER_IMAGE", "name": "toolbox", "version": "1", "release": "1",
            "provides": [{"link": "pkg:rpm/redhat/vim@8.2-1.el9?arch=x86_64"}]}]}"#,
    )
    .unwrap();
    let store = MemoryStore::new();
    let mut product_tree = ProductTree::new();
    let mut component_tree = ComponentTree::new();

    let summary = LoadComponentsUseCase::new(
        MockComponentDataReader::new(vec![document]),
        store.clone(),
        store.clone(),
        MockProgressReporter::new(),
    )
    .execute(Path::new("ignored"), &mut product_tree, &mut component_tree)
    .unwrap();

    assert_eq!(summary.components, 2);
    assert_eq!(summary.nodes, 2);
    assert!(product_tree.is_empty());
}

#[test]
fn test_canonical_provides_of_loaded_container() {
    let (_store, product_tree, component_tree) = loaded_store();
    let container = component_tree.roots()[0].entity().as_component().unwrap();

    let provides = ProvidesResolver::new(ProvidesDisambiguation::default())
        .resolve(container, ProvidesScope::Canonical, &product_tree, &component_tree)
        .unwrap();
    assert_eq!(provides.len(), 1);
}

#[test]
fn test_release_report_from_catalog() {
    let (store, product_tree, _) = loaded_store();

    let report = BuildReleaseReportUseCase::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        ProvidesDisambiguation::Strict,
    )
    .execute("rhel-8.6.0", &product_tree)
    .unwrap();

    assert_eq!(report.product.name, "rhel");
    assert_eq!(report.containers.len(), 1);
    let container = &report.containers[0];
    assert_eq!(container.component.name, "ubi8-minimal");
    let provided: Vec<&str> = container.provides.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(provided, vec!["bash", "zlib"]);

    let components: Vec<(&str, &str)> = report
        .components
        .iter()
        .map(|c| (c.name.as_str(), c.component_type.as_str()))
        .collect();
    assert_eq!(
        components,
        vec![("bash", "RPM"), ("zlib", "RPM"), ("zlib", "SRPM")]
    );
    assert!(report.packages.is_empty());
}

#[test]
fn test_release_report_renders_in_both_formats() {
    let (store, product_tree, _) = loaded_store();
    let report = BuildReleaseReportUseCase::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        ProvidesDisambiguation::default(),
    )
    .execute("rhel-8.6.0", &product_tree)
    .unwrap();

    let json = JsonReportFormatter::new().format(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["containers"][0]["provides"][1]["name"], "zlib");

    let markdown = MarkdownReportFormatter::new().format(&report).unwrap();
    assert!(markdown.contains("# Release Report: rhel-8.6.0"));
    assert!(markdown.contains("### ubi8-minimal 8.6"));
}

#[test]
fn test_release_report_unknown_release() {
    let (store, product_tree, _) = loaded_store();
    let err = BuildReleaseReportUseCase::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        ProvidesDisambiguation::default(),
    )
    .execute("rhel-9.0.0", &product_tree)
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OpenlcsError>(),
        Some(OpenlcsError::UnknownRelease { name }) if name == "rhel-9.0.0"
    ));
}

#[tokio::test]
async fn test_submit_nvr_import_into_known_release() {
    let (store, _, _) = loaded_store();
    let dispatcher = MockTaskDispatcher::new();
    let use_case = import_use_case(dispatcher.clone(), &store, ImportSettings::default());

    let batch = NvrImportRequest::new(vec![
        "bash-4.4.20-3.el8".to_string(),
        "zlib-1.2.11-18.el8".to_string(),
    ])
    .with_product_release("rhel-8.6.0")
    .into_batch()
    .unwrap();
    let submission = use_case.execute(batch, Some(42)).await.unwrap();

    assert!(submission.is_complete());
    assert_eq!(submission.submitted.len(), 2);
    let first = &submission.submitted["bash-4.4.20-3.el8"].task_id;
    let second = &submission.submitted["zlib-1.2.11-18.el8"].task_id;
    assert_ne!(first, second);

    let dispatched = dispatcher.dispatched();
    assert_eq!(dispatched.len(), 2);
    for (task_flow, payload) in &dispatched {
        assert_eq!(task_flow, "flow.tasks.flow_default");
        assert_eq!(payload["product_release"], "rhel-8.6.0");
        assert_eq!(payload["license_scan"], true);
        assert_eq!(payload["owner_id"], 42);
    }

    let tasks = store.tasks();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|task| task.owner_id == Some(42)));
    assert!(tasks.iter().all(|task| !task.params.contains_key("owner_id")));

    let recorded = store.get_task(*first).unwrap();
    assert_eq!(recorded.params["package_nvr"], "bash-4.4.20-3.el8");
    assert!(recorded.meta_id.as_str().starts_with("celery-"));
}

#[tokio::test]
async fn test_submit_into_unknown_release_dispatches_nothing() {
    let (store, _, _) = loaded_store();
    let dispatcher = MockTaskDispatcher::new();
    let use_case = import_use_case(dispatcher.clone(), &store, ImportSettings::default());

    let batch = NvrImportRequest::new(vec!["a".to_string(), "b".to_string()])
        .with_product_release("nope")
        .into_batch()
        .unwrap();
    let err = use_case.execute(batch, None).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<OpenlcsError>(),
        Some(OpenlcsError::UnknownRelease { .. })
    ));
    assert_eq!(dispatcher.call_count(), 0);
    assert!(store.tasks().is_empty());
}

#[tokio::test]
async fn test_failure_policies() {
    let nvrs = vec!["a-1-1".to_string(), "b-1-1".to_string(), "c-1-1".to_string()];

    let store = MemoryStore::new();
    let dispatcher = MockTaskDispatcher::failing_for(&["a-1-1"]);
    let settings = ImportSettings {
        failure_policy: FailurePolicy::Continue,
        ..ImportSettings::default()
    };
    let submission = import_use_case(dispatcher.clone(), &store, settings)
        .execute(NvrImportRequest::new(nvrs.clone()).into_batch().unwrap(), None)
        .await
        .unwrap();
    assert_eq!(submission.submitted.len(), 2);
    assert!(submission.failed["a-1-1"].contains("broker refused a-1-1"));
    assert_eq!(store.tasks().len(), 2);

    let store = MemoryStore::new();
    let dispatcher = MockTaskDispatcher::failing_for(&["a-1-1"]);
    let settings = ImportSettings {
        failure_policy: FailurePolicy::Stop,
        ..ImportSettings::default()
    };
    let submission = import_use_case(dispatcher.clone(), &store, settings)
        .execute(NvrImportRequest::new(nvrs).into_batch().unwrap(), None)
        .await
        .unwrap();
    assert!(submission.submitted.is_empty());
    assert_eq!(submission.failed.len(), 1);
    assert_eq!(dispatcher.call_count(), 1);
    assert!(store.tasks().is_empty());
}

#[test]
fn test_source_archive_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("hello-1.0");
    fs::create_dir_all(src.join("docs")).unwrap();
    fs::write(src.join("README"), "Hello, world!\n").unwrap();
    fs::write(src.join("docs/usage.txt"), "Usage: hello [NAME]\n").unwrap();

    let archive = temp_dir.path().join("hello-1.0.tar.gz");
    pack(&archive, &src).unwrap();
    assert_eq!(detect_mime_type(&archive).as_deref(), Some("application/x-tar"));
    assert_eq!(checksum(&archive).unwrap().len(), 64);

    let work = temp_dir.path().join("work");
    reset_dir(&work).unwrap();
    extract(&archive, Some(&work)).unwrap();
    assert_eq!(
        fs::read_to_string(work.join("docs/usage.txt")).unwrap(),
        "Usage: hello [NAME]\n"
    );
}

#[test]
fn test_grouping_loaded_components() {
    let content = fs::read_to_string(catalog_path("rhel-8.6.0.json")).unwrap();
    let document: ComponentDocument = serde_json::from_str(&content).unwrap();
    let mut provides = document.components[0].provides.clone();
    provides.extend(document.components[1..].iter().cloned());
    let drafts: Vec<_> = provides.iter().map(|data| data.to_draft().unwrap()).collect();

    let groups = ComponentGrouping::group_components(&drafts, ComponentField::Type).unwrap();
    let keys: Vec<&str> = groups.iter().map(|group| group.key.as_str()).collect();
    assert_eq!(keys, vec!["RPM", "SRPM"]);
    assert_eq!(
        ComponentGrouping::nvr_list_for(&groups, "RPM").unwrap(),
        vec!["bash-4.4.20-3.el8", "zlib-1.2.11-18.el8"]
    );
}
