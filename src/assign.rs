//! Full attachment plan: explicit types plus resolved location rules.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::format::{format_field_name, format_type_name};
use crate::resolver::Resolver;
use crate::types::{AssignmentSource, FieldGroup};

/// Schema types one field group attaches to, and where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub source: AssignmentSource,
    pub types: BTreeSet<String>,
}

/// Attach every visible field group to its schema types.
///
/// Groups that declare `graphql_types` use them verbatim (formatted); all
/// others go through location rule resolution. Hidden groups and groups
/// that resolve to no type are left out.
///
/// Groups sharing an identifier merge, the same way [`LocationRules`] merges
/// them. The merged entry holds the union of all their types and is marked
/// [`AssignmentSource::Explicit`] once any explicit group contributes.
///
/// [`LocationRules`]: crate::rules::LocationRules
pub fn assign_types(
    field_groups: &[FieldGroup],
    resolver: &Resolver<'_>,
) -> BTreeMap<String, Assignment> {
    let mut plan: BTreeMap<String, Assignment> = resolver
        .resolve(field_groups)
        .get_rules()
        .into_iter()
        .map(|(group, types)| {
            (
                group,
                Assignment {
                    source: AssignmentSource::Location,
                    types,
                },
            )
        })
        .collect();

    for group in field_groups
        .iter()
        .filter(|g| g.show_in_graphql && g.has_explicit_types())
    {
        let types: BTreeSet<String> = group
            .graphql_types
            .iter()
            .map(|t| format_type_name(t))
            .filter(|t| !t.is_empty())
            .collect();
        if types.is_empty() {
            continue;
        }
        let key = format_field_name(group.name());
        if key.is_empty() {
            continue;
        }
        match plan.entry(key) {
            Entry::Occupied(mut entry) => {
                debug!(
                    field_group = %entry.key(),
                    "merging explicit types into resolved field group"
                );
                let existing = entry.get_mut();
                existing.source = AssignmentSource::Explicit;
                existing.types.extend(types);
            }
            Entry::Vacant(entry) => {
                entry.insert(Assignment {
                    source: AssignmentSource::Explicit,
                    types,
                });
            }
        }
    }

    plan
}
