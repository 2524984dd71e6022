//! Location Rule Resolver
//!
//! Computes which schema types each field group attaches to, from the
//! group's location rules.
//!
//! Location rules are an OR of AND-groups of `(param, operator, value)`
//! conditions, written for an editorial admin UI. This library maps them to
//! a deterministic set of schema type names per field group.
//!
//! # Example
//!
//! ```
//! use location_rules::{Condition, FieldGroup, Resolver, StaticCatalog};
//!
//! let catalog = StaticCatalog::new()
//!     .content_type("post", "Post", false)
//!     .content_type("page", "Page", true);
//!
//! let groups = vec![FieldGroup::new("Hero Banner")
//!     .rule_group([Condition::not_equals("post_type", "post")])];
//!
//! let rules = Resolver::with_catalog(&catalog).resolve(&groups).get_rules();
//!
//! // Every post type except "post"
//! assert_eq!(rules["heroBanner"].iter().collect::<Vec<_>>(), ["Page"]);
//! ```
//!
//! # Param Policies
//!
//! | Param | `==` | `!=` |
//! |-------|------|------|
//! | `post_type`, `taxonomy` | the matching type, or all for `"all"` | all except the value |
//! | `post_template`, `page_template` | the matching template | all templates except the value |
//! | `post` | the kind of that item | every content type |
//! | `post_status` | every content type | every content type |
//! | `post_format`, `post_category`, `post_taxonomy` | `Post` | `Post` |
//! | `page_type` | `Page`, or every hierarchical type | same |
//! | `page`, `page_parent` | `Page` | `Page` |
//! | `user_form`, `user_role` | `User` | `User` |
//! | `current_user`, `current_user_role` | nothing | nothing |
//! | anything else | registered hooks | registered hooks |
//!
//! A `post_type` condition is skipped entirely when its AND-group also holds a
//! param other than `post_status`, `post_format`, `post_category`,
//! `post_taxonomy` or `post`.

mod assign;
mod catalog;
mod error;
mod format;
mod hooks;
mod loader;
mod report;
mod resolver;
mod rules;
mod types;
mod validator;

pub use assign::{assign_types, Assignment};
pub use catalog::{
    ContentItemLookup, ContentType, FieldGroupProvider, SchemaTypeCatalog, StaticCatalog,
    TaxonomyType, TemplateCatalog, DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_TYPE,
};
pub use error::{LoadError, SchemaError, ValidateError};
pub use format::{format_field_name, format_type_name};
pub use hooks::{CoreObjectHook, LocationRuleHook};
pub use loader::{
    is_url, load_catalog, load_field_groups, load_json, load_json_auto, load_json_str,
    parse_catalog, parse_field_groups,
};
pub use report::{Diagnostic, DiagnosticCode, Report, Severity};
pub use resolver::{vetoes, Resolver};
pub use rules::{LocationRules, ResolvedRules};
pub use types::{AssignmentSource, Condition, FieldGroup, Operator, Param, RuleGroup, WILDCARD};
pub use validator::{validate_against_schema, validate_catalog, validate_field_groups};

#[cfg(feature = "remote")]
pub use loader::load_json_url;
