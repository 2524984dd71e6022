//! Field group descriptors and location rule conditions.
//!
//! Descriptors deserialize from the field-group export format. Parsing is
//! lenient: anything that cannot be interpreted is dropped or left empty so a
//! single malformed group never blocks a schema build.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Wildcard condition value matching every type of a category.
pub const WILDCARD: &str = "all";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Category tag of a location condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Param {
    PostType,
    PostTemplate,
    PageTemplate,
    PostStatus,
    PostFormat,
    PostCategory,
    PostTaxonomy,
    Post,
    PageType,
    PageParent,
    Page,
    CurrentUser,
    CurrentUserRole,
    UserForm,
    UserRole,
    Taxonomy,
    /// Any category the engine has no policy for.
    Other(String),
}

impl Param {
    pub fn parse(s: &str) -> Self {
        match s {
            "post_type" => Param::PostType,
            "post_template" => Param::PostTemplate,
            "page_template" => Param::PageTemplate,
            "post_status" => Param::PostStatus,
            "post_format" => Param::PostFormat,
            "post_category" => Param::PostCategory,
            "post_taxonomy" => Param::PostTaxonomy,
            "post" => Param::Post,
            "page_type" => Param::PageType,
            "page_parent" => Param::PageParent,
            "page" => Param::Page,
            "current_user" => Param::CurrentUser,
            "current_user_role" => Param::CurrentUserRole,
            "user_form" => Param::UserForm,
            "user_role" => Param::UserRole,
            "taxonomy" => Param::Taxonomy,
            other => Param::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Param::PostType => "post_type",
            Param::PostTemplate => "post_template",
            Param::PageTemplate => "page_template",
            Param::PostStatus => "post_status",
            Param::PostFormat => "post_format",
            Param::PostCategory => "post_category",
            Param::PostTaxonomy => "post_taxonomy",
            Param::Post => "post",
            Param::PageType => "page_type",
            Param::PageParent => "page_parent",
            Param::Page => "page",
            Param::CurrentUser => "current_user",
            Param::CurrentUserRole => "current_user_role",
            Param::UserForm => "user_form",
            Param::UserRole => "user_role",
            Param::Taxonomy => "taxonomy",
            Param::Other(s) => s,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a location condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    #[default]
    Equals,
    NotEquals,
    /// Any other token. Matches neither branch of operator-sensitive policies.
    Unsupported(String),
}

impl Operator {
    pub fn parse(s: &str) -> Self {
        match s {
            "==" => Operator::Equals,
            "!=" => Operator::NotEquals,
            other => Operator::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Unsupported(s) => s,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomic `(param, operator, value)` location test.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condition {
    pub param: Option<Param>,
    pub operator: Operator,
    pub value: Option<String>,
}

impl Condition {
    pub fn new(param: &str, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            param: Some(Param::parse(param)),
            operator,
            value: Some(value.into()),
        }
    }

    /// Shorthand for an `==` condition.
    pub fn equals(param: &str, value: impl Into<String>) -> Self {
        Self::new(param, Operator::Equals, value)
    }

    /// Shorthand for a `!=` condition.
    pub fn not_equals(param: &str, value: impl Into<String>) -> Self {
        Self::new(param, Operator::NotEquals, value)
    }

    /// Parse a condition object, ignoring anything unreadable.
    ///
    /// Returns `None` when `value` is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let param = map
            .get("param")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .map(Param::parse);
        let operator = map
            .get("operator")
            .and_then(Value::as_str)
            .map(Operator::parse)
            .unwrap_or_default();
        let value = map.get("value").and_then(scalar_to_string);
        Some(Self {
            param,
            operator,
            value,
        })
    }

    /// The condition value, if present and non-blank.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

/// Conditions AND-ed together.
pub type RuleGroup = Vec<Condition>;

/// A named collection of fields plus the location rules deciding where they apply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct FieldGroup {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub graphql_field_name: Option<String>,
    #[serde(default = "default_true", deserialize_with = "lenient_bool")]
    pub show_in_graphql: bool,
    /// Declared type names; when non-empty they replace location resolution.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub graphql_types: Vec<String>,
    /// OR-groups of AND-ed conditions.
    #[serde(default, deserialize_with = "lenient_location")]
    pub location: Vec<RuleGroup>,
}

impl FieldGroup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            show_in_graphql: true,
            ..Default::default()
        }
    }

    /// Add an OR-group of conditions.
    pub fn rule_group(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.location.push(conditions.into_iter().collect());
        self
    }

    pub fn graphql_field_name(mut self, name: impl Into<String>) -> Self {
        self.graphql_field_name = Some(name.into());
        self
    }

    pub fn graphql_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.graphql_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn show_in_graphql(mut self, show: bool) -> Self {
        self.show_in_graphql = show;
        self
    }

    /// Identifier of the group: the configured field name, else the title.
    pub fn name(&self) -> &str {
        match self.graphql_field_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.title,
        }
    }

    /// Whether the group declares its types instead of using location rules.
    pub fn has_explicit_types(&self) -> bool {
        self.graphql_types.iter().any(|t| !t.trim().is_empty())
    }
}

/// Where a field group's type assignment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentSource {
    Explicit,
    Location,
}

fn default_true() -> bool {
    true
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(s) => !matches!(s.trim(), "" | "0" | "false"),
        _ => true,
    })
}

fn lenient_string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .map(|items| items.iter().filter_map(scalar_to_string).collect())
        .unwrap_or_default())
}

fn lenient_location<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<RuleGroup>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Some(groups) = value.as_array() else {
        return Ok(Vec::new());
    };
    Ok(groups
        .iter()
        .filter_map(Value::as_array)
        .map(|conditions| conditions.iter().filter_map(Condition::from_value).collect())
        .collect())
}
