//! Integration tests for location rule resolution.

use std::collections::BTreeSet;

use location_rules::{
    format_type_name, Condition, CoreObjectHook, DiagnosticCode, FieldGroup, LocationRules,
    Operator, ResolvedRules, Resolver, StaticCatalog,
};

fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .content_type("post", "Post", false)
        .content_type("page", "Page", true)
        .taxonomy("category", "Category")
        .taxonomy("post_tag", "Tag")
        .template("template-wide.php", "WideTemplate")
        .template("template-landing.php", "LandingTemplate")
        .content_item("42", "page")
        .content_item("7", "post")
        .content_item("99", "revision")
}

fn resolve(groups: &[FieldGroup]) -> ResolvedRules {
    Resolver::with_catalog(&catalog()).resolve(groups).get_rules()
}

fn single(conditions: Vec<Condition>) -> ResolvedRules {
    resolve(&[FieldGroup::new("group").rule_group(conditions)])
}

fn types(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|t| t.to_string()).collect()
}

// === Post Type Policy ===

mod post_type {
    use super::*;

    #[test]
    fn wildcard_includes_every_type() {
        let rules = single(vec![Condition::equals("post_type", "all")]);
        assert_eq!(rules["group"], types(&["Post", "Page"]));
    }

    #[test]
    fn equals_matches_one_type() {
        let rules = single(vec![Condition::equals("post_type", "page")]);
        assert_eq!(rules["group"], types(&["Page"]));
    }

    #[test]
    fn equals_accepts_type_name() {
        let rules = single(vec![Condition::equals("post_type", "Post")]);
        assert_eq!(rules["group"], types(&["Post"]));
    }

    #[test]
    fn equals_unknown_is_noop() {
        let rules = single(vec![Condition::equals("post_type", "product")]);
        assert!(rules.get("group").is_none());
    }

    #[test]
    fn negation_is_complement() {
        let rules = single(vec![Condition::not_equals("post_type", "Post")]);
        assert_eq!(rules["group"], types(&["Page"]));

        let rules = single(vec![Condition::not_equals("post_type", "page")]);
        assert_eq!(rules["group"], types(&["Post"]));
    }

    #[test]
    fn negated_wildcard_is_noop() {
        let rules = single(vec![Condition::not_equals("post_type", "all")]);
        assert!(rules.is_empty());
    }

    #[test]
    fn negating_unknown_type_keeps_all() {
        let rules = single(vec![Condition::not_equals("post_type", "product")]);
        assert_eq!(rules["group"], types(&["Post", "Page"]));
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let empty = StaticCatalog::new();
        let groups = [FieldGroup::new("group").rule_group([Condition::equals("post_type", "all")])];
        assert!(Resolver::with_catalog(&empty)
            .resolve(&groups)
            .get_rules()
            .is_empty());
    }
}

// === AND-Group Conflict Guard ===

mod conflicts {
    use super::*;

    #[test]
    fn unlisted_sibling_vetoes_post_type() {
        let rules = single(vec![
            Condition::equals("post_type", "Post"),
            Condition::equals("current_user_role", "editor"),
        ]);
        assert!(rules.get("group").map_or(true, |t| t.is_empty()));
    }

    #[test]
    fn vetoed_post_type_does_not_block_sibling_policy() {
        let rules = single(vec![
            Condition::equals("post_type", "post"),
            Condition::equals("page_template", "template-wide.php"),
        ]);
        assert_eq!(rules["group"], types(&["WideTemplate"]));
    }

    #[test]
    fn allowed_sibling_keeps_post_type() {
        let rules = single(vec![
            Condition::equals("post_type", "Post"),
            Condition::equals("post_format", "aside"),
        ]);
        assert_eq!(rules["group"], types(&["Post"]));
    }

    #[test]
    fn post_status_sibling_is_additive() {
        let rules = single(vec![
            Condition::equals("post_type", "Post"),
            Condition::equals("post_status", "publish"),
        ]);
        // post_status independently exposes every content type
        assert_eq!(rules["group"], types(&["Post", "Page"]));
    }

    #[test]
    fn veto_is_scoped_to_its_and_group() {
        let groups = [FieldGroup::new("group")
            .rule_group([
                Condition::equals("post_type", "post"),
                Condition::equals("user_role", "admin"),
            ])
            .rule_group([Condition::equals("post_type", "page")])];
        assert_eq!(resolve(&groups)["group"], types(&["Page", "User"]));
    }

    #[test]
    fn taxonomy_is_never_vetoed() {
        let rules = single(vec![
            Condition::equals("taxonomy", "category"),
            Condition::equals("current_user", "logged_in"),
        ]);
        assert_eq!(rules["group"], types(&["Category"]));
    }
}

// === Template Policy ===

mod templates {
    use super::*;

    #[test]
    fn equals_known_template() {
        let rules = single(vec![Condition::equals("page_template", "template-wide.php")]);
        assert_eq!(rules["group"], types(&["WideTemplate"]));

        let rules = single(vec![Condition::equals("post_template", "default")]);
        assert_eq!(rules["group"], types(&["DefaultTemplate"]));
    }

    #[test]
    fn equals_unknown_template_is_noop() {
        let rules = single(vec![Condition::equals("page_template", "missing.php")]);
        assert!(rules.is_empty());
    }

    #[test]
    fn negation_is_every_other_template() {
        let rules = single(vec![Condition::not_equals(
            "page_template",
            "template-wide.php",
        )]);
        assert_eq!(
            rules["group"],
            types(&["DefaultTemplate", "LandingTemplate"])
        );
    }

    #[test]
    fn default_template_exists_without_catalog_entries() {
        let empty = StaticCatalog::new();
        let groups =
            [FieldGroup::new("group").rule_group([Condition::not_equals("page_template", "x")])];
        let rules = Resolver::with_catalog(&empty).resolve(&groups).get_rules();
        assert_eq!(rules["group"], types(&["DefaultTemplate"]));
    }
}

// === Single Item, Page Type and Fixed Policies ===

mod single_params {
    use super::*;

    #[test]
    fn item_resolves_to_its_kind() {
        let rules = single(vec![Condition::equals("post", "42")]);
        assert_eq!(rules["group"], types(&["Page"]));
    }

    #[test]
    fn missing_item_is_omitted() {
        let rules = single(vec![Condition::equals("post", "1000")]);
        assert!(!rules.contains_key("group"));
    }

    #[test]
    fn item_of_hidden_kind_is_noop() {
        let rules = single(vec![Condition::equals("post", "99")]);
        assert!(rules.is_empty());
    }

    #[test]
    fn negated_item_exposes_everywhere() {
        let rules = single(vec![Condition::not_equals("post", "42")]);
        assert_eq!(rules["group"], types(&["Post", "Page"]));
    }

    #[test]
    fn page_type_values() {
        let rules = single(vec![Condition::equals("page_type", "front_page")]);
        assert_eq!(rules["group"], types(&["Page"]));

        let rules = single(vec![Condition::not_equals("page_type", "posts_page")]);
        assert_eq!(rules["group"], types(&["Page"]));

        let rules = single(vec![Condition::equals("page_type", "child")]);
        assert_eq!(rules["group"], types(&["Page"]));

        let rules = single(vec![Condition::equals("page_type", "sideways")]);
        assert!(rules.is_empty());
    }

    #[test]
    fn page_type_hierarchy_uses_catalog() {
        let catalog = catalog().content_type("doc", "Doc", true);
        let groups = [FieldGroup::new("group").rule_group([Condition::equals("page_type", "top_level")])];
        let rules = Resolver::with_catalog(&catalog).resolve(&groups).get_rules();
        assert_eq!(rules["group"], types(&["Page", "Doc"]));
    }

    #[test]
    fn status_exposes_every_content_type() {
        let rules = single(vec![Condition::not_equals("post_status", "draft")]);
        assert_eq!(rules["group"], types(&["Post", "Page"]));
    }

    #[test]
    fn post_format_family_is_post() {
        for param in ["post_format", "post_category", "post_taxonomy"] {
            let rules = single(vec![Condition::not_equals(param, "anything")]);
            assert_eq!(rules["group"], types(&["Post"]), "{param}");
        }
    }

    #[test]
    fn page_params_are_page() {
        for param in ["page", "page_parent"] {
            let rules = single(vec![Condition::equals(param, "12")]);
            assert_eq!(rules["group"], types(&["Page"]), "{param}");
        }
    }

    #[test]
    fn user_params_are_user() {
        let rules = single(vec![Condition::equals("user_form", "register")]);
        assert_eq!(rules["group"], types(&["User"]));
        let rules = single(vec![Condition::not_equals("user_role", "subscriber")]);
        assert_eq!(rules["group"], types(&["User"]));
    }

    #[test]
    fn current_user_is_unresolvable() {
        let rules = single(vec![
            Condition::equals("current_user", "logged_in"),
            Condition::equals("current_user_role", "editor"),
        ]);
        assert!(rules.is_empty());
    }
}

// === Taxonomy Policy ===

mod taxonomy {
    use super::*;

    #[test]
    fn mirrors_post_type() {
        let rules = single(vec![Condition::equals("taxonomy", "all")]);
        assert_eq!(rules["group"], types(&["Category", "Tag"]));

        let rules = single(vec![Condition::equals("taxonomy", "post_tag")]);
        assert_eq!(rules["group"], types(&["Tag"]));

        let rules = single(vec![Condition::not_equals("taxonomy", "category")]);
        assert_eq!(rules["group"], types(&["Tag"]));

        let rules = single(vec![Condition::not_equals("taxonomy", "all")]);
        assert!(rules.is_empty());
    }
}

// === Driver ===

mod driver {
    use super::*;

    #[test]
    fn or_groups_union() {
        let groups = [FieldGroup::new("group")
            .rule_group([Condition::equals("post_type", "post")])
            .rule_group([Condition::equals("post_type", "page")])];
        assert_eq!(resolve(&groups)["group"], types(&["Post", "Page"]));
    }

    #[test]
    fn negation_in_one_or_group_removes_from_union() {
        // Unset subtraction is per field group, not per OR-group.
        let groups = [FieldGroup::new("group")
            .rule_group([Condition::equals("post_type", "post")])
            .rule_group([Condition::not_equals("post_type", "post")])];
        assert_eq!(resolve(&groups)["group"], types(&["Page"]));
    }

    #[test]
    fn explicit_types_bypass_engine() {
        let groups = [
            FieldGroup::new("Declared")
                .graphql_types(["Product"])
                .rule_group([Condition::equals("post_type", "all")]),
            FieldGroup::new("Located").rule_group([Condition::equals("post_type", "post")]),
        ];
        let rules = resolve(&groups);
        assert!(!rules.contains_key("declared"));
        assert!(rules.values().all(|t| !t.contains("Product")));
        assert_eq!(rules["located"], types(&["Post"]));
    }

    #[test]
    fn hidden_groups_are_skipped() {
        let groups = [FieldGroup::new("Hidden")
            .show_in_graphql(false)
            .rule_group([Condition::equals("post_type", "all")])];
        assert!(resolve(&groups).is_empty());
    }

    #[test]
    fn group_names_are_formatted() {
        let groups = [
            FieldGroup::new("Post Details").rule_group([Condition::equals("post_type", "post")]),
            FieldGroup::new("ignored title")
                .graphql_field_name("hero_banner")
                .rule_group([Condition::equals("post_type", "page")]),
        ];
        let rules = resolve(&groups);
        assert_eq!(rules["postDetails"], types(&["Post"]));
        assert_eq!(rules["heroBanner"], types(&["Page"]));
    }

    #[test]
    fn groups_sharing_a_name_merge() {
        let groups = [
            FieldGroup::new("Shared").rule_group([Condition::equals("post_type", "post")]),
            FieldGroup::new("shared").rule_group([Condition::equals("taxonomy", "category")]),
        ];
        assert_eq!(resolve(&groups)["shared"], types(&["Post", "Category"]));
    }

    #[test]
    fn names_without_identifier_characters_are_dropped() {
        let odd = StaticCatalog::new()
            .content_type("!!!", "", false)
            .template("wide.php", "**");
        let groups = [
            FieldGroup::new("g").rule_group([Condition::equals("post_type", "all")]),
            FieldGroup::new("h").rule_group([Condition::equals("post_template", "wide.php")]),
        ];
        assert!(Resolver::with_catalog(&odd)
            .resolve(&groups)
            .get_rules()
            .is_empty());

        let rules = resolve(&[
            FieldGroup::new("???").rule_group([Condition::equals("post_type", "post")])
        ]);
        assert!(rules.is_empty());
    }

    #[test]
    fn malformed_conditions_are_skipped() {
        let groups = [FieldGroup::new("group").rule_group([
            Condition::default(),
            Condition {
                value: Some(String::new()),
                ..Condition::equals("post_type", "")
            },
            Condition::equals("post_type", "post"),
        ])];
        assert_eq!(resolve(&groups)["group"], types(&["Post"]));
    }

    #[test]
    fn resolution_is_idempotent() {
        let groups = [FieldGroup::new("group")
            .rule_group([Condition::not_equals("post_type", "post")])
            .rule_group([Condition::equals("taxonomy", "all")])];
        let catalog = catalog();
        let resolver = Resolver::with_catalog(&catalog);
        assert_eq!(
            resolver.resolve(&groups).get_rules(),
            resolver.resolve(&groups).get_rules()
        );
    }

    #[test]
    fn type_names_agree_with_formatter() {
        let catalog = StaticCatalog::new().content_type("press_release", "press_release", false);
        let groups = [FieldGroup::new("g").rule_group([Condition::equals("post_type", "all")])];
        let rules = Resolver::with_catalog(&catalog).resolve(&groups).get_rules();
        assert_eq!(rules["g"], types(&[format_type_name("press_release").as_str()]));
    }

    #[test]
    fn provider_feeds_the_driver() {
        let groups = vec![FieldGroup::new("group").rule_group([Condition::equals("post", "7")])];
        let catalog = catalog();
        let rules = Resolver::with_catalog(&catalog).resolve_from(&groups);
        assert_eq!(rules.get_rules()["group"], types(&["Post"]));
    }
}

// === Extension Hooks ===

mod hooks {
    use super::*;

    #[test]
    fn unknown_param_without_hook_is_noop() {
        let rules = single(vec![Condition::equals("options_page", "site-settings")]);
        assert!(rules.is_empty());
    }

    #[test]
    fn closure_hook_can_set_and_unset() {
        let catalog = catalog();
        let resolver = Resolver::with_catalog(&catalog).hook(
            |group: &str, param: &str, op: &Operator, value: &str, rules: &mut LocationRules| {
                if param != "options_page" {
                    return false;
                }
                match op {
                    Operator::Equals => rules.set_graphql_type(group, value),
                    _ => rules.unset_graphql_type(group, value),
                }
                true
            },
        );
        let groups = [FieldGroup::new("group")
            .rule_group([Condition::equals("options_page", "site-settings")])
            .rule_group([Condition::equals("options_page", "footer")])
            .rule_group([Condition::not_equals("options_page", "footer")])];

        let rules = resolver.resolve(&groups).get_rules();
        assert_eq!(rules["group"], types(&["SiteSettings"]));
    }

    #[test]
    fn core_object_hook() {
        let catalog = catalog();
        let resolver = Resolver::with_catalog(&catalog).hook(CoreObjectHook);
        let groups = [FieldGroup::new("group")
            .rule_group([Condition::equals("attachment", "all")])
            .rule_group([Condition::equals("comment", "post")])
            .rule_group([Condition::equals("widget", "sidebar")])];

        let rules = resolver.resolve(&groups).get_rules();
        assert_eq!(rules["group"], types(&["MediaItem", "Comment"]));
    }

    #[test]
    fn every_hook_sees_the_condition() {
        let catalog = catalog();
        let resolver = Resolver::with_catalog(&catalog)
            .hook(CoreObjectHook)
            .hook(
                |group: &str, param: &str, _: &Operator, _: &str, rules: &mut LocationRules| {
                    if param == "nav_menu" {
                        rules.set_graphql_type(group, "MenuLocation");
                    }
                    false
                },
            );
        let groups = [FieldGroup::new("group").rule_group([Condition::equals("nav_menu", "3")])];
        let (rules, report) = resolver.resolve_with_report(&groups);
        assert_eq!(rules.get_rules()["group"], types(&["Menu", "MenuLocation"]));
        assert_eq!(report.with_code(DiagnosticCode::UnhandledParam).count(), 0);
    }
}

// === Diagnostics ===

mod report {
    use super::*;

    #[test]
    fn diagnostics_explain_dropped_conditions() {
        let groups = [FieldGroup::new("group")
            .rule_group([
                Condition::equals("post_type", "post"),
                Condition::equals("current_user_role", "editor"),
            ])
            .rule_group([Condition::equals("post_type", "product")])
            .rule_group([Condition::not_equals("taxonomy", "all")])
            .rule_group([Condition::equals("widget", "sidebar")])
            .rule_group([Condition::default()])];
        let catalog = catalog();
        let (rules, report) = Resolver::with_catalog(&catalog).resolve_with_report(&groups);

        assert!(rules.get_rules().is_empty());
        assert_eq!(report.field_groups, 1);
        assert_eq!(report.conditions, 6);

        let codes: Vec<DiagnosticCode> = report.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::ConflictVeto,
                DiagnosticCode::UnresolvableParam,
                DiagnosticCode::UnknownValue,
                DiagnosticCode::NegatedWildcard,
                DiagnosticCode::UnhandledParam,
                DiagnosticCode::MissingParam,
            ]
        );
        assert_eq!(report.diagnostics[0].path, "/location/0/0");
        assert!(report.diagnostics[0].message.contains("current_user_role"));
        assert_eq!(report.diagnostics[2].path, "/location/1/0");
        assert!(!report.is_ok());
    }

    #[test]
    fn unsupported_operator_still_applies_insensitive_policies() {
        let groups = [FieldGroup::new("group")
            .rule_group([Condition::new(
                "post_type",
                Operator::Unsupported("contains".into()),
                "post",
            )])
            .rule_group([Condition::new(
                "user_role",
                Operator::Unsupported("contains".into()),
                "admin",
            )])];
        let catalog = catalog();
        let (rules, report) = Resolver::with_catalog(&catalog).resolve_with_report(&groups);

        assert_eq!(rules.get_rules()["group"], types(&["User"]));
        assert_eq!(
            report
                .with_code(DiagnosticCode::UnsupportedOperator)
                .count(),
            2
        );
    }

    #[test]
    fn skipped_groups_are_counted() {
        let groups = [
            FieldGroup::new("a").graphql_types(["Post"]),
            FieldGroup::new("b").show_in_graphql(false),
            FieldGroup::new("c"),
        ];
        let catalog = catalog();
        let (_, report) = Resolver::with_catalog(&catalog).resolve_with_report(&groups);
        assert_eq!(report.field_groups, 3);
        assert_eq!(report.skipped_groups, 2);
        assert!(report.diagnostics.is_empty());
    }
}
