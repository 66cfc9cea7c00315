use crate::compliance::domain::TaskParams;
use crate::shared::error::OpenlcsError;
use crate::shared::Result;
use serde::Deserialize;
use serde_json::Value;

/// Name of the shared parameter naming the release the items belong to
pub const PRODUCT_RELEASE_PARAM: &str = "product_release";

/// One unit of import work: its key and the fields specific to it
#[derive(Debug, Clone, PartialEq)]
pub struct ImportItem {
    pub key: String,
    pub fields: TaskParams,
}

/// ImportBatch - Internal request DTO for the bulk import use case
///
/// Every item's dispatched payload is a copy of `shared` with the item's own
/// fields laid over it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    pub items: Vec<ImportItem>,
    pub shared: TaskParams,
}

impl ImportBatch {
    pub fn new(shared: TaskParams) -> Self {
        Self {
            items: Vec::new(),
            shared,
        }
    }

    /// Builds a batch with one item per key, each carrying `{key_field: key}`
    pub fn from_keys<I, S>(key_field: &str, keys: I, shared: TaskParams) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = keys
            .into_iter()
            .map(|key| {
                let key = key.into();
                let mut fields = TaskParams::new();
                fields.insert(key_field.to_string(), Value::String(key.clone()));
                ImportItem { key, fields }
            })
            .collect();
        Self { items, shared }
    }

    pub fn with_item(mut self, key: impl Into<String>, fields: TaskParams) -> Self {
        self.items.push(ImportItem {
            key: key.into(),
            fields,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The release named by a payload, if any.
///
/// A JSON `null` counts as absent.
pub fn product_release_of(params: &TaskParams) -> Option<&str> {
    match params.get(PRODUCT_RELEASE_PARAM) {
        Some(Value::String(name)) => Some(name.as_str()),
        _ => None,
    }
}

fn default_true() -> bool {
    true
}

/// NvrImportRequest - request to import packages by NVR
///
/// Scan flags default to true; `srpm_dir` and `product_release` are only
/// forwarded when given.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NvrImportRequest {
    pub package_nvrs: Vec<String>,
    #[serde(default = "default_true")]
    pub license_scan: bool,
    #[serde(default = "default_true")]
    pub copyright_scan: bool,
    #[serde(default)]
    pub srpm_dir: Option<String>,
    #[serde(default)]
    pub product_release: Option<String>,
}

impl NvrImportRequest {
    pub fn new(package_nvrs: Vec<String>) -> Self {
        Self {
            package_nvrs,
            license_scan: true,
            copyright_scan: true,
            srpm_dir: None,
            product_release: None,
        }
    }

    pub fn with_product_release(mut self, product_release: impl Into<String>) -> Self {
        self.product_release = Some(product_release.into());
        self
    }

    /// Expands the request into a batch keyed by NVR.
    ///
    /// # Errors
    /// `Validation` if no NVR is given or one of them is blank
    pub fn into_batch(self) -> Result<ImportBatch> {
        if self.package_nvrs.is_empty() {
            return Err(OpenlcsError::validation("At least one package NVR is required").into());
        }
        if let Some(blank) = self.package_nvrs.iter().position(|nvr| nvr.trim().is_empty()) {
            return Err(OpenlcsError::validation(format!(
                "Package NVR #{} is empty",
                blank + 1
            ))
            .into());
        }

        let mut shared = TaskParams::new();
        shared.insert("license_scan".to_string(), Value::Bool(self.license_scan));
        shared.insert("copyright_scan".to_string(), Value::Bool(self.copyright_scan));
        if let Some(srpm_dir) = self.srpm_dir {
            shared.insert("srpm_dir".to_string(), Value::String(srpm_dir));
        }
        if let Some(product_release) = self.product_release.filter(|name| !name.is_empty()) {
            shared.insert(
                PRODUCT_RELEASE_PARAM.to_string(),
                Value::String(product_release),
            );
        }

        Ok(ImportBatch::from_keys("package_nvr", self.package_nvrs, shared))
    }
}
