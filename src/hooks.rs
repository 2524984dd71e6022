//! Extension seam for condition categories the resolver has no policy for.

use crate::rules::LocationRules;
use crate::types::Operator;

/// Called for every condition whose param is not natively understood.
///
/// Implementations call [`LocationRules::set_graphql_type`] or
/// [`LocationRules::unset_graphql_type`] and return `true` when they handled
/// the param. Every registered hook sees every unrecognized condition.
pub trait LocationRuleHook {
    fn on_unrecognized_param(
        &self,
        field_group: &str,
        param: &str,
        operator: &Operator,
        value: &str,
        rules: &mut LocationRules,
    ) -> bool;
}

impl<F> LocationRuleHook for F
where
    F: Fn(&str, &str, &Operator, &str, &mut LocationRules) -> bool,
{
    fn on_unrecognized_param(
        &self,
        field_group: &str,
        param: &str,
        operator: &Operator,
        value: &str,
        rules: &mut LocationRules,
    ) -> bool {
        self(field_group, param, operator, value, rules)
    }
}

/// Maps the host's remaining core object params to their schema types.
///
/// Operator and value are ignored, as for other single-type params.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreObjectHook;

impl CoreObjectHook {
    fn type_for(param: &str) -> Option<&'static str> {
        match param {
            "attachment" => Some("MediaItem"),
            "comment" => Some("Comment"),
            "nav_menu" => Some("Menu"),
            "nav_menu_item" => Some("MenuItem"),
            _ => None,
        }
    }
}

impl LocationRuleHook for CoreObjectHook {
    fn on_unrecognized_param(
        &self,
        field_group: &str,
        param: &str,
        _operator: &Operator,
        _value: &str,
        rules: &mut LocationRules,
    ) -> bool {
        match Self::type_for(param) {
            Some(type_name) => {
                rules.set_graphql_type(field_group, type_name);
                true
            }
            None => false,
        }
    }
}
