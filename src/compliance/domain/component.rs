use super::{ComponentId, SourceId};
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ecosystem tag of a component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    ContainerImage,
    RhelModule,
    Rpm,
    Srpm,
    Golang,
    Npm,
    Pypi,
    Maven,
    /// Any other tag, kept verbatim (e.g. `gomod`, `yarn`)
    Other(String),
}

impl ComponentType {
    /// Component types listed next to containers in a release report
    pub const PACKAGE_TYPES: [ComponentType; 6] = [
        ComponentType::Rpm,
        ComponentType::Srpm,
        ComponentType::Golang,
        ComponentType::Npm,
        ComponentType::Pypi,
        ComponentType::Maven,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::ContainerImage => "CONTAINER_IMAGE",
            ComponentType::RhelModule => "RHEL_MODULE",
            ComponentType::Rpm => "RPM",
            ComponentType::Srpm => "SRPM",
            ComponentType::Golang => "GOLANG",
            ComponentType::Npm => "NPM",
            ComponentType::Pypi => "PYPI",
            ComponentType::Maven => "MAVEN",
            ComponentType::Other(tag) => tag,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, ComponentType::ContainerImage)
    }
}

impl From<&str> for ComponentType {
    fn from(tag: &str) -> Self {
        match tag {
            "CONTAINER_IMAGE" => ComponentType::ContainerImage,
            "RHEL_MODULE" => ComponentType::RhelModule,
            "RPM" => ComponentType::Rpm,
            "SRPM" => ComponentType::Srpm,
            "GOLANG" => ComponentType::Golang,
            "NPM" => ComponentType::Npm,
            "PYPI" => ComponentType::Pypi,
            "MAVEN" => ComponentType::Maven,
            other => ComponentType::Other(other.to_string()),
        }
    }
}

impl From<String> for ComponentType {
    fn from(tag: String) -> Self {
        ComponentType::from(tag.as_str())
    }
}

impl From<ComponentType> for String {
    fn from(component_type: ComponentType) -> Self {
        component_type.as_str().to_string()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attributes a component record can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentField {
    Type,
    Name,
    Version,
    Release,
    Arch,
}

impl ComponentField {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentField::Type => "type",
            ComponentField::Name => "name",
            ComponentField::Version => "version",
            ComponentField::Release => "release",
            ComponentField::Arch => "arch",
        }
    }
}

/// Read access to the keyed fields of a component-like record.
///
/// Implemented by stored [`Component`]s and by raw registry records, so that
/// grouping and NVR formatting work on both.
pub trait ComponentRecord {
    /// Value of `field`, `None` when the record does not carry it
    fn field(&self, field: ComponentField) -> Option<&str>;

    /// Short description used in error messages
    fn describe(&self) -> String {
        self.field(ComponentField::Name)
            .unwrap_or("<unnamed component>")
            .to_string()
    }

    fn require(&self, field: ComponentField) -> Result<&str> {
        self.field(field).ok_or_else(|| {
            OpenlcsError::KeyFieldMissing {
                field: field.as_str().to_string(),
                record: self.describe(),
            }
            .into()
        })
    }

    /// `name-version-release`; an empty release is kept as `name-version-`
    fn nvr(&self) -> Result<String> {
        Ok(format!(
            "{}-{}-{}",
            self.require(ComponentField::Name)?,
            self.require(ComponentField::Version)?,
            self.require(ComponentField::Release)?
        ))
    }
}

/// A resolved package or module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    pub id: ComponentId,
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub name: String,
    pub version: Option<String>,
    pub release: Option<String>,
    pub arch: Option<String>,
    pub purl: Option<String>,
    pub summary_license: Option<String>,
    pub source: Option<SourceId>,
    /// False when the record was reconstructed from a link rather than fetched
    pub synced: bool,
}

impl ComponentRecord for Component {
    fn field(&self, field: ComponentField) -> Option<&str> {
        match field {
            ComponentField::Type => Some(self.component_type.as_str()),
            ComponentField::Name => Some(&self.name),
            ComponentField::Version => self.version.as_deref(),
            ComponentField::Release => self.release.as_deref(),
            ComponentField::Arch => self.arch.as_deref(),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(version) = &self.version {
            write!(f, "-{}", version)?;
        }
        if let Some(release) = self.release.as_deref().filter(|r| !r.is_empty()) {
            write!(f, "-{}", release)?;
        }
        Ok(())
    }
}

/// Fields of a component before the store assigns an id.
///
/// Two drafts with the same natural key (uuid, type, name, version, release,
/// arch) describe the same component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDraft {
    pub uuid: Uuid,
    pub component_type: ComponentType,
    pub name: String,
    pub version: Option<String>,
    pub release: Option<String>,
    pub arch: Option<String>,
    pub purl: Option<String>,
    pub summary_license: Option<String>,
    pub synced: bool,
}

impl ComponentDraft {
    pub fn new(component_type: ComponentType, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(OpenlcsError::validation("Component name cannot be empty").into());
        }
        Ok(Self {
            uuid: Uuid::new_v4(),
            component_type,
            name,
            version: None,
            release: None,
            arch: None,
            purl: None,
            summary_license: None,
            synced: true,
        })
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = uuid;
        self
    }

    pub fn natural_key(&self) -> ComponentKey {
        ComponentKey {
            uuid: self.uuid,
            component_type: self.component_type.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            release: self.release.clone(),
            arch: self.arch.clone(),
        }
    }

    pub fn into_component(self, id: ComponentId) -> Component {
        Component {
            id,
            uuid: self.uuid,
            component_type: self.component_type,
            name: self.name,
            version: self.version,
            release: self.release,
            arch: self.arch,
            purl: self.purl,
            summary_license: self.summary_license,
            source: None,
            synced: self.synced,
        }
    }
}

impl ComponentRecord for ComponentDraft {
    fn field(&self, field: ComponentField) -> Option<&str> {
        match field {
            ComponentField::Type => Some(self.component_type.as_str()),
            ComponentField::Name => Some(&self.name),
            ComponentField::Version => self.version.as_deref(),
            ComponentField::Release => self.release.as_deref(),
            ComponentField::Arch => self.arch.as_deref(),
        }
    }
}

/// Natural key of a component
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    pub uuid: Uuid,
    pub component_type: ComponentType,
    pub name: String,
    pub version: Option<String>,
    pub release: Option<String>,
    pub arch: Option<String>,
}
