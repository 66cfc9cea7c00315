use crate::compliance::domain::{ComponentField, ComponentRecord};
use crate::shared::Result;

/// A run of consecutive records sharing one key value
#[derive(Debug, PartialEq)]
pub struct ComponentGroup<'a, R> {
    pub key: String,
    pub components: Vec<&'a R>,
}

/// ComponentGrouping - groups component records by a key field
///
/// Grouping is a single left-to-right pass, so only *consecutive* records with
/// equal keys end up in the same group. Callers wanting one group per distinct
/// key must sort by that key first; unsorted input yields several groups with
/// the same key.
pub struct ComponentGrouping;

impl ComponentGrouping {
    /// Partitions `records` into runs of equal `key`, preserving input order.
    ///
    /// # Errors
    /// `KeyFieldMissing` if any record does not carry `key`.
    pub fn group_components<R: ComponentRecord>(
        records: &[R],
        key: ComponentField,
    ) -> Result<Vec<ComponentGroup<'_, R>>> {
        let mut groups: Vec<ComponentGroup<'_, R>> = Vec::new();
        for record in records {
            let value = record.require(key)?;
            match groups.last_mut() {
                Some(group) if group.key == value => group.components.push(record),
                _ => groups.push(ComponentGroup {
                    key: value.to_string(),
                    components: vec![record],
                }),
            }
        }
        Ok(groups)
    }

    /// NVRs of every record in every group keyed by `component_type`.
    ///
    /// Returns an empty list when no group has that key.
    ///
    /// # Errors
    /// `KeyFieldMissing` if a matching record lacks name, version or release.
    pub fn nvr_list_for<R: ComponentRecord>(
        groups: &[ComponentGroup<'_, R>],
        component_type: &str,
    ) -> Result<Vec<String>> {
        groups
            .iter()
            .filter(|group| group.key == component_type)
            .flat_map(|group| group.components.iter())
            .map(|record| record.nvr())
            .collect()
    }
}
