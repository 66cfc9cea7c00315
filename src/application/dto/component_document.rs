use crate::compliance::domain::{
    parse_component_link, ComponentDraft, ComponentField, ComponentRecord, ComponentType,
};
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use serde::Deserialize;
use uuid::Uuid;

/// A component data document as exported by the component registry.
///
/// Product-version documents carry an `ofuri`, a `name` such as
/// `rhel-8.6.0`, the owning product under `products` and the release's
/// components. Component lists carry only `components`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentDocument {
    #[serde(default)]
    pub ofuri: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductData>,
    #[serde(default)]
    pub components: Vec<ComponentData>,
}

impl ComponentDocument {
    pub fn is_product_version(&self) -> bool {
        self.ofuri.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductData {
    pub name: String,
}

/// A component record from the registry.
///
/// Entries under `provides` may be abbreviated to just a `link`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentData {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(rename = "type", default)]
    pub component_type: Option<ComponentType>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub purl: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub provides: Vec<ComponentData>,
}

impl ComponentData {
    pub fn is_container(&self) -> bool {
        self.component_type
            .as_ref()
            .is_some_and(ComponentType::is_container)
    }

    /// Converts the record into a draft ready for upserting.
    ///
    /// Link-only entries are reconstructed from the link; records without a
    /// uuid get a fresh one.
    pub fn to_draft(&self) -> Result<ComponentDraft> {
        if self.name.is_none() {
            if let Some(link) = &self.link {
                return parse_component_link(link);
            }
        }

        let component_type = self.component_type.clone().ok_or_else(|| {
            anyhow::Error::from(OpenlcsError::KeyFieldMissing {
                field: ComponentField::Type.as_str().to_string(),
                record: self.describe(),
            })
        })?;
        let name = self.require(ComponentField::Name)?;

        let mut draft = ComponentDraft::new(component_type, name)?;
        if let Some(uuid) = self.uuid {
            draft.uuid = uuid;
        }
        draft.version = self.version.clone();
        draft.release = self.release.clone();
        draft.arch = self.arch.clone();
        draft.purl = self.purl.clone();
        draft.summary_license = self.license.clone();
        Ok(draft)
    }
}

impl ComponentRecord for ComponentData {
    fn field(&self, field: ComponentField) -> Option<&str> {
        match field {
            ComponentField::Type => self.component_type.as_ref().map(ComponentType::as_str),
            ComponentField::Name => self.name.as_deref(),
            ComponentField::Version => self.version.as_deref(),
            ComponentField::Release => self.release.as_deref(),
            ComponentField::Arch => self.arch.as_deref(),
        }
    }

    fn describe(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.link.clone())
            .or_else(|| self.uuid.map(|uuid| uuid.to_string()))
            .unwrap_or_else(|| "<unnamed component>".to_string())
    }
}
