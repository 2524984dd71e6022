//! Location rule resolution - turns field group location rules into schema types.
//!
//! A pass walks field groups, their OR-groups and each OR-group's conditions
//! in input order. Every condition is dispatched on its param to a policy
//! that sets or unsets type names on a fresh [`LocationRules`]. Malformed or
//! unresolvable conditions are skipped, never reported as errors.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::catalog::{
    ContentItemLookup, ContentType, FieldGroupProvider, SchemaTypeCatalog, TaxonomyType,
    TemplateCatalog, DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_TYPE,
};
use crate::format::format_type_name;
use crate::hooks::LocationRuleHook;
use crate::report::{DiagnosticCode, Report};
use crate::rules::LocationRules;
use crate::types::{Condition, FieldGroup, Operator, Param, WILDCARD};

/// Type assigned by params that only ever describe the primary content kind.
const POST_TYPE_NAME: &str = "Post";
const PAGE_TYPE_NAME: &str = "Page";
const USER_TYPE_NAME: &str = "User";

/// Params that may share an AND-group with `post_type` without vetoing it.
const POST_TYPE_COMPATIBLE_PARAMS: &[Param] = &[
    Param::PostStatus,
    Param::PostFormat,
    Param::PostCategory,
    Param::PostTaxonomy,
    Param::Post,
];

/// Returns true when a `post_type` condition must be skipped because a
/// sibling in its AND-group makes the target type ambiguous.
///
/// Only `post_type` conditions are ever vetoed. Siblings with the same param
/// or without a param are ignored.
pub fn vetoes<'c>(
    condition: &Condition,
    siblings: impl IntoIterator<Item = &'c Condition>,
) -> bool {
    condition.param == Some(Param::PostType) && conflicting_params(siblings).next().is_some()
}

fn conflicting_params<'c>(
    siblings: impl IntoIterator<Item = &'c Condition>,
) -> impl Iterator<Item = &'c Param> {
    siblings
        .into_iter()
        .filter_map(|s| s.param.as_ref())
        .filter(|p| **p != Param::PostType && !POST_TYPE_COMPATIBLE_PARAMS.contains(p))
}

/// Every condition of an AND-group except the one at `index`.
fn siblings(and_group: &[Condition], index: usize) -> impl Iterator<Item = &Condition> {
    and_group
        .iter()
        .enumerate()
        .filter(move |(i, _)| *i != index)
        .map(|(_, c)| c)
}

/// Resolves location rules against externally supplied catalogs.
///
/// The resolver holds only read-only collaborators; each call to
/// [`resolve`](Resolver::resolve) builds and returns its own accumulator.
pub struct Resolver<'a> {
    types: &'a dyn SchemaTypeCatalog,
    items: &'a dyn ContentItemLookup,
    templates: &'a dyn TemplateCatalog,
    hooks: Vec<Box<dyn LocationRuleHook + 'a>>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        types: &'a dyn SchemaTypeCatalog,
        items: &'a dyn ContentItemLookup,
        templates: &'a dyn TemplateCatalog,
    ) -> Self {
        Self {
            types,
            items,
            templates,
            hooks: Vec::new(),
        }
    }

    /// Build a resolver reading every table from one catalog.
    pub fn with_catalog<C>(catalog: &'a C) -> Self
    where
        C: SchemaTypeCatalog + ContentItemLookup + TemplateCatalog,
    {
        Self::new(catalog, catalog, catalog)
    }

    /// Register a hook for unrecognized params. Hooks run in registration order.
    pub fn hook(mut self, hook: impl LocationRuleHook + 'a) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Resolve the location rules of every field group.
    ///
    /// Groups with explicit types or hidden from the schema are skipped.
    pub fn resolve(&self, field_groups: &[FieldGroup]) -> LocationRules {
        self.resolve_with_report(field_groups).0
    }

    /// Resolve every field group a provider lists.
    pub fn resolve_from(&self, provider: &dyn FieldGroupProvider) -> LocationRules {
        self.resolve(&provider.field_groups())
    }

    /// Resolve and also explain every condition that had no effect.
    pub fn resolve_with_report(&self, field_groups: &[FieldGroup]) -> (LocationRules, Report) {
        let mut pass = Pass {
            resolver: self,
            tables: Tables::load(self),
            rules: LocationRules::new(),
            report: Report::default(),
        };

        for group in field_groups {
            pass.report.field_groups += 1;
            if group.has_explicit_types() || !group.show_in_graphql {
                debug!(field_group = group.name(), "skipping field group");
                pass.report.skipped_groups += 1;
                continue;
            }
            pass.field_group(group);
        }

        debug!(
            field_groups = pass.report.field_groups,
            conditions = pass.report.conditions,
            diagnostics = pass.report.diagnostics.len(),
            "location rules resolved"
        );

        (pass.rules, pass.report)
    }
}

/// Catalog snapshot taken once per pass.
struct Tables {
    content_types: Vec<ContentType>,
    taxonomies: Vec<TaxonomyType>,
    templates: BTreeMap<String, String>,
}

impl Tables {
    fn load(resolver: &Resolver<'_>) -> Self {
        let mut templates = resolver.templates.templates();
        templates
            .entry(DEFAULT_TEMPLATE.to_string())
            .or_insert_with(|| DEFAULT_TEMPLATE_TYPE.to_string());
        Self {
            content_types: resolver.types.content_types(),
            taxonomies: resolver.types.taxonomies(),
            templates,
        }
    }

    fn content_type(&self, value: &str) -> Option<&ContentType> {
        find_kind(&self.content_types, value, |t| (&t.kind, &t.type_name))
    }

    fn taxonomy(&self, value: &str) -> Option<&TaxonomyType> {
        find_kind(&self.taxonomies, value, |t| (&t.kind, &t.type_name))
    }
}

/// Match a value by kind first, then by formatted type name.
fn find_kind<'t, T>(
    entries: &'t [T],
    value: &str,
    names: impl Fn(&T) -> (&String, &String),
) -> Option<&'t T> {
    entries
        .iter()
        .find(|e| names(*e).0 == value)
        .or_else(|| {
            let wanted = format_type_name(value);
            entries
                .iter()
                .find(|e| format_type_name(names(*e).1) == wanted)
        })
}

/// Mutable state of one resolution pass.
struct Pass<'p, 'a> {
    resolver: &'p Resolver<'a>,
    tables: Tables,
    rules: LocationRules,
    report: Report,
}

/// Position of a condition, for diagnostics.
struct At<'g> {
    group: &'g str,
    or_index: usize,
    and_index: usize,
}

impl At<'_> {
    fn path(&self) -> String {
        format!("/location/{}/{}", self.or_index, self.and_index)
    }
}

impl Pass<'_, '_> {
    fn field_group(&mut self, group: &FieldGroup) {
        let name = group.name();
        for (or_index, and_group) in group.location.iter().enumerate() {
            for (and_index, condition) in and_group.iter().enumerate() {
                self.report.conditions += 1;
                let at = At {
                    group: name,
                    or_index,
                    and_index,
                };
                self.condition(&at, condition, and_group);
            }
        }
    }

    fn condition(&mut self, at: &At<'_>, condition: &Condition, and_group: &[Condition]) {
        let Some(param) = condition.param.as_ref() else {
            self.note(at, DiagnosticCode::MissingParam, "condition has no param".into());
            return;
        };
        let Some(value) = condition.value() else {
            self.note(
                at,
                DiagnosticCode::MissingValue,
                format!("{} condition has no value", param),
            );
            return;
        };
        if vetoes(condition, siblings(and_group, at.and_index)) {
            let others: BTreeSet<&str> = conflicting_params(siblings(and_group, at.and_index))
                .map(Param::as_str)
                .collect();
            self.note(
                at,
                DiagnosticCode::ConflictVeto,
                format!(
                    "post_type condition skipped: combined with {}",
                    others.into_iter().collect::<Vec<_>>().join(", ")
                ),
            );
            return;
        }
        if let Operator::Unsupported(op) = &condition.operator {
            self.note(
                at,
                DiagnosticCode::UnsupportedOperator,
                format!("operator \"{}\" only applies where the operator is ignored", op),
            );
        }
        self.dispatch(at, param, &condition.operator, value);
    }

    fn dispatch(&mut self, at: &At<'_>, param: &Param, operator: &Operator, value: &str) {
        match param {
            Param::PostType => self.post_type(at, operator, value),
            Param::PostTemplate | Param::PageTemplate => self.template(at, operator, value),
            Param::PostStatus => self.every_content_type(at.group),
            Param::PostFormat | Param::PostCategory | Param::PostTaxonomy => {
                self.rules.set_graphql_type(at.group, POST_TYPE_NAME)
            }
            Param::Post => self.single_item(at, operator, value),
            Param::PageType => self.page_type(at, value),
            Param::PageParent | Param::Page => {
                self.rules.set_graphql_type(at.group, PAGE_TYPE_NAME)
            }
            Param::CurrentUser | Param::CurrentUserRole => self.note(
                at,
                DiagnosticCode::UnresolvableParam,
                format!("{} cannot be mapped to a schema type", param),
            ),
            Param::UserForm | Param::UserRole => {
                self.rules.set_graphql_type(at.group, USER_TYPE_NAME)
            }
            Param::Taxonomy => self.taxonomy(at, operator, value),
            Param::Other(name) => self.other(at, name, operator, value),
        }
    }

    fn post_type(&mut self, at: &At<'_>, operator: &Operator, value: &str) {
        let names: Vec<String> = self
            .tables
            .content_types
            .iter()
            .map(|t| t.type_name.clone())
            .collect();
        let matched = self
            .tables
            .content_type(value)
            .map(|t| t.type_name.clone());
        self.kind_policy(at, "post type", operator, value, names, matched);
    }

    fn taxonomy(&mut self, at: &At<'_>, operator: &Operator, value: &str) {
        let names: Vec<String> = self
            .tables
            .taxonomies
            .iter()
            .map(|t| t.type_name.clone())
            .collect();
        let matched = self.tables.taxonomy(value).map(|t| t.type_name.clone());
        self.kind_policy(at, "taxonomy", operator, value, names, matched);
    }

    /// Shared policy of `post_type` and `taxonomy`.
    fn kind_policy(
        &mut self,
        at: &At<'_>,
        label: &str,
        operator: &Operator,
        value: &str,
        all: Vec<String>,
        matched: Option<String>,
    ) {
        match operator {
            Operator::Equals if value == WILDCARD => self.set_all(at.group, &all),
            Operator::Equals => match matched {
                Some(type_name) => self.rules.set_graphql_type(at.group, &type_name),
                None => self.unknown(at, label, value),
            },
            Operator::NotEquals if value == WILDCARD => self.note(
                at,
                DiagnosticCode::NegatedWildcard,
                format!("{} != {} matches nothing", label, WILDCARD),
            ),
            Operator::NotEquals => {
                self.set_all(at.group, &all);
                match matched {
                    Some(type_name) => self.rules.unset_graphql_type(at.group, &type_name),
                    None => self.unknown(at, label, value),
                }
            }
            Operator::Unsupported(_) => {}
        }
    }

    fn template(&mut self, at: &At<'_>, operator: &Operator, value: &str) {
        let matched = self.tables.templates.get(value).cloned();
        match operator {
            Operator::Equals => match matched {
                Some(type_name) => self.rules.set_graphql_type(at.group, &type_name),
                None => self.unknown(at, "template", value),
            },
            Operator::NotEquals => {
                let all: Vec<String> = self.tables.templates.values().cloned().collect();
                self.set_all(at.group, &all);
                match matched {
                    Some(type_name) => self.rules.unset_graphql_type(at.group, &type_name),
                    None => self.unknown(at, "template", value),
                }
            }
            Operator::Unsupported(_) => {}
        }
    }

    fn single_item(&mut self, at: &At<'_>, operator: &Operator, value: &str) {
        match operator {
            Operator::Equals => {
                let Some(kind) = self.resolver.items.content_kind(value) else {
                    self.unknown(at, "content item", value);
                    return;
                };
                let exposed = self
                    .tables
                    .content_types
                    .iter()
                    .find(|t| t.kind == kind)
                    .map(|t| t.type_name.clone());
                match exposed {
                    Some(type_name) => self.rules.set_graphql_type(at.group, &type_name),
                    None => self.note(
                        at,
                        DiagnosticCode::UnknownValue,
                        format!("content item {} is a {} which is not in the schema", value, kind),
                    ),
                }
            }
            Operator::NotEquals => self.every_content_type(at.group),
            Operator::Unsupported(_) => {}
        }
    }

    fn page_type(&mut self, at: &At<'_>, value: &str) {
        match value {
            "front_page" | "posts_page" => self.rules.set_graphql_type(at.group, PAGE_TYPE_NAME),
            "top_level" | "parent" | "child" => {
                let hierarchical: Vec<String> = self
                    .tables
                    .content_types
                    .iter()
                    .filter(|t| t.hierarchical)
                    .map(|t| t.type_name.clone())
                    .collect();
                self.set_all(at.group, &hierarchical);
            }
            other => self.unknown(at, "page type", other),
        }
    }

    fn other(&mut self, at: &At<'_>, param: &str, operator: &Operator, value: &str) {
        let resolver = self.resolver;
        let mut handled = false;
        for hook in &resolver.hooks {
            handled |= hook.on_unrecognized_param(at.group, param, operator, value, &mut self.rules);
        }
        if !handled {
            self.note(
                at,
                DiagnosticCode::UnhandledParam,
                format!("no policy or hook for param \"{}\"", param),
            );
        }
    }

    fn every_content_type(&mut self, group: &str) {
        for t in &self.tables.content_types {
            self.rules.set_graphql_type(group, &t.type_name);
        }
    }

    fn set_all(&mut self, group: &str, type_names: &[String]) {
        for type_name in type_names {
            self.rules.set_graphql_type(group, type_name);
        }
    }

    fn unknown(&mut self, at: &At<'_>, label: &str, value: &str) {
        self.note(
            at,
            DiagnosticCode::UnknownValue,
            format!("unknown {} \"{}\"", label, value),
        );
    }

    fn note(&mut self, at: &At<'_>, code: DiagnosticCode, message: String) {
        debug!(
            field_group = at.group,
            path = %at.path(),
            code = code.as_str(),
            "{}",
            message
        );
        self.report.push(code, at.group, at.path(), message);
    }
}
