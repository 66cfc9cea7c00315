use crate::compliance::domain::{ComponentId, Source, SourceId, SourceState};
use crate::ports::outbound::{ComponentRepository, SourceRepository};
use serde::Serialize;

/// View representation of a source archive with its scan findings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceView {
    pub id: SourceId,
    pub name: String,
    pub url: Option<String>,
    pub checksum: String,
    pub state: SourceState,
    pub archive_type: Option<String>,
    pub scan_flag: Option<String>,
    /// Components built from this source
    pub component_set: Vec<ComponentId>,
    /// Distinct license keys detected in the source
    pub license_detections: Vec<String>,
    /// Distinct copyright statements detected in the source
    pub copyright_detections: Vec<String>,
}

impl SourceView {
    pub fn build<S, C>(source: Source, sources: &S, components: &C) -> Self
    where
        S: SourceRepository + ?Sized,
        C: ComponentRepository + ?Sized,
    {
        Self {
            component_set: components.components_of_source(source.id),
            license_detections: sources.license_keys(source.id),
            copyright_detections: sources.copyright_statements(source.id),
            id: source.id,
            name: source.name,
            url: source.url,
            checksum: source.checksum,
            state: source.state,
            archive_type: source.archive_type,
            scan_flag: source.scan_flag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::persistence::MemoryStore;
    use crate::compliance::domain::{ComponentDraft, ComponentType, FileDetections, NewSource};

    #[test]
    fn test_build_collects_components_and_detections() {
        let store = MemoryStore::new();
        let source = store
            .create_source(NewSource {
                checksum: "ef".repeat(32),
                name: "zlib-1.2.11-18.el8".to_string(),
                url: Some("https://zlib.net".to_string()),
                archive_type: Some("rpm".to_string()),
            })
            .unwrap();
        let component = store
            .upsert_component(
                ComponentDraft::new(ComponentType::Srpm, "zlib")
                    .unwrap()
                    .with_version("1.2.11")
                    .with_release("18.el8"),
            )
            .unwrap();
        store.set_component_source(component.id, source.id).unwrap();
        store
            .record_detections(
                source.id,
                FileDetections {
                    path: "zlib.h".to_string(),
                    license_keys: vec!["zlib".to_string()],
                    copyright_statements: vec!["(c) 1995-2017 Jean-loup Gailly".to_string()],
                },
            )
            .unwrap();
        store
            .set_source_state(source.id, SourceState::Scanned)
            .unwrap();
        let source = store.get_source(source.id).unwrap();

        let view = SourceView::build(source, &store, &store);
        assert_eq!(view.component_set, vec![component.id]);
        assert_eq!(view.license_detections, vec!["zlib"]);
        assert_eq!(view.copyright_detections.len(), 1);
        assert_eq!(view.state, SourceState::Scanned);
        assert_eq!(view.url.as_deref(), Some("https://zlib.net"));
    }

    #[test]
    fn test_build_without_findings() {
        let store = MemoryStore::new();
        let source = store
            .create_source(NewSource {
                checksum: "01".repeat(32),
                name: "empty".to_string(),
                url: None,
                archive_type: None,
            })
            .unwrap();

        let view = SourceView::build(source, &store, &store);
        assert!(view.component_set.is_empty());
        assert!(view.license_detections.is_empty());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "empty");
        assert!(json["url"].is_null());
    }
}
