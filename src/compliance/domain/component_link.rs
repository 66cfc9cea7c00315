//! Reconstructs component records from registry `provides` links.
//!
//! Links embed a package URL, sometimes percent-encoded several times over:
//!
//! ```text
//! https://registry/api/v1/components?purl=pkg%3Arpm/redhat/bash%405.1.8-6.el9%3Farch%3Dsrc
//! https://registry/api/v1/components?purl=pkg%3Agolang/github.com/blang/semver%40v3.5.1
//! ```

use super::{ComponentDraft, ComponentType};
use crate::shared::error::OpenlcsError;
use crate::shared::Result;

/// Safety bound on nested percent-encoding
const MAX_DECODE_ROUNDS: usize = 8;

/// Percent-decodes `link` until it no longer contains escapes.
pub fn unquote_link(link: &str) -> String {
    let mut current = link.to_string();
    for _ in 0..MAX_DECODE_ROUNDS {
        if !current.contains('%') {
            break;
        }
        match urlencoding::decode(&current) {
            Ok(decoded) if decoded != current => current = decoded.into_owned(),
            _ => break,
        }
    }
    current
}

/// Parses a component draft out of a `provides` link.
///
/// RPM links (`pkg:<type>/redhat/<name>@<version>-<release>?arch=<arch>`) keep
/// release and arch; every other package URL yields `name@version` with an
/// empty release and arch. The draft gets a fresh uuid and is marked unsynced.
pub fn parse_component_link(link: &str) -> Result<ComponentDraft> {
    let unquoted = unquote_link(link);
    let purl = unquoted
        .find("pkg:")
        .map(|start| &unquoted[start + "pkg:".len()..])
        .ok_or_else(|| invalid_link(link, "no package URL found"))?;

    let (purl_type, rest) = purl
        .split_once('/')
        .ok_or_else(|| invalid_link(link, "package URL has no type"))?;
    let component_type = ComponentType::from(purl_type.to_uppercase());

    if let Some(draft) = parse_rpm(component_type.clone(), rest) {
        return draft;
    }

    let (name, version) = rest
        .rsplit_once('@')
        .ok_or_else(|| invalid_link(link, "package URL has no version"))?;
    let version = version.split(['?', '#']).next().unwrap_or(version);

    let mut draft = ComponentDraft::new(component_type, name)?
        .with_version(version)
        .with_release("")
        .with_arch("");
    draft.synced = false;
    Ok(draft)
}

fn parse_rpm(component_type: ComponentType, rest: &str) -> Option<Result<ComponentDraft>> {
    let coordinates = rest.strip_prefix("redhat/")?;
    let (head, arch) = coordinates.rsplit_once("?arch=")?;
    let (name, version_release) = head.rsplit_once('@')?;
    let (version, release) = version_release.rsplit_once('-')?;
    let arch = arch.split(['&', '#']).next().unwrap_or(arch);

    Some(ComponentDraft::new(component_type, name).map(|draft| {
        let mut draft = draft
            .with_version(version)
            .with_release(release)
            .with_arch(arch);
        draft.synced = false;
        draft
    }))
}

fn invalid_link(link: &str, reason: &str) -> anyhow::Error {
    OpenlcsError::validation(format!(
        "Failed to parse component data from component link {}: {}",
        link, reason
    ))
    .into()
}
