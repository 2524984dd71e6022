//! Accumulated type assignments for one resolution pass.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::format::{format_field_name, format_type_name};

/// Field group identifier to the schema types it attaches to.
pub type ResolvedRules = BTreeMap<String, BTreeSet<String>>;

/// Set and unset lists built up while walking location rules.
///
/// Both lists are keyed by the formatted field group name and hold formatted
/// type names in insertion order. Duplicates are allowed; [`get_rules`]
/// applies set semantics.
///
/// [`get_rules`]: LocationRules::get_rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationRules {
    set: BTreeMap<String, Vec<String>>,
    unset: BTreeMap<String, Vec<String>>,
}

impl LocationRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `field_group` attaches to `type_name`.
    ///
    /// Names that format to an empty identifier are dropped.
    pub fn set_graphql_type(&mut self, field_group: &str, type_name: &str) {
        if let Some((key, type_name)) = identifiers(field_group, type_name) {
            trace!(field_group = %key, type_name = %type_name, "set type");
            self.set.entry(key).or_default().push(type_name);
        }
    }

    /// Record that `field_group` must not attach to `type_name`.
    pub fn unset_graphql_type(&mut self, field_group: &str, type_name: &str) {
        if let Some((key, type_name)) = identifiers(field_group, type_name) {
            trace!(field_group = %key, type_name = %type_name, "unset type");
            self.unset.entry(key).or_default().push(type_name);
        }
    }

    /// Types set for a group so far, in insertion order, before subtraction.
    pub fn set_types(&self, field_group: &str) -> &[String] {
        self.set
            .get(&format_field_name(field_group))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Types unset for a group so far, in insertion order.
    pub fn unset_types(&self, field_group: &str) -> &[String] {
        self.unset
            .get(&format_field_name(field_group))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Final mapping: set types minus unset types, per group.
    ///
    /// Groups left without any type are omitted.
    pub fn get_rules(&self) -> ResolvedRules {
        self.set
            .iter()
            .filter_map(|(group, types)| {
                let unset = self.unset.get(group);
                let remaining: BTreeSet<String> = types
                    .iter()
                    .filter(|t| !unset.is_some_and(|u| u.contains(t)))
                    .cloned()
                    .collect();
                (!remaining.is_empty()).then(|| (group.clone(), remaining))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }
}

fn identifiers(field_group: &str, type_name: &str) -> Option<(String, String)> {
    let key = format_field_name(field_group);
    let formatted = format_type_name(type_name);
    if key.is_empty() || formatted.is_empty() {
        debug!(field_group, type_name, "ignoring name with no identifier characters");
        return None;
    }
    Some((key, formatted))
}
