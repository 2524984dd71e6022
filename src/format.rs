//! Canonical identifiers for field groups and schema types.
//!
//! Every name that ends up in the resolved rules passes through these
//! functions, so the engine and the schema registry agree on spelling.

/// Format a human-entered name as a field identifier (`camelCase`).
///
/// Runs of characters outside `[A-Za-z0-9 -]` collapse to one space, hyphens
/// become word breaks, words are capitalized and joined, and the leading
/// character is lowercased. Formatting is idempotent.
pub fn format_field_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == ' ' || c == '-' {
            cleaned.push(c);
            in_run = false;
        } else if !in_run {
            cleaned.push(' ');
            in_run = true;
        }
    }

    let cleaned = lowercase_first(&cleaned).replace('-', " ");

    let mut out = String::with_capacity(cleaned.len());
    let mut at_word_start = true;
    for c in cleaned.chars() {
        if c == ' ' {
            at_word_start = true;
            continue;
        }
        if at_word_start {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = false;
    }

    lowercase_first(&out)
}

/// Format a human-entered name as a type identifier (`PascalCase`).
pub fn format_type_name(name: &str) -> String {
    uppercase_first(&format_field_name(name))
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_name_from_title() {
        assert_eq!(format_field_name("My Field Group"), "myFieldGroup");
        assert_eq!(format_field_name("post details"), "postDetails");
    }

    #[test]
    fn field_name_handles_separators() {
        assert_eq!(format_field_name("my_field"), "myField");
        assert_eq!(format_field_name("hero-banner"), "heroBanner");
        assert_eq!(format_field_name("a__b--c"), "aBC");
        assert_eq!(format_field_name("Price ($)"), "price");
    }

    #[test]
    fn field_name_keeps_inner_case() {
        assert_eq!(format_field_name("myFieldGroup"), "myFieldGroup");
        assert_eq!(format_field_name("HTMLBlock"), "hTMLBlock");
    }

    #[test]
    fn type_name_capitalizes() {
        assert_eq!(format_type_name("post"), "Post");
        assert_eq!(format_type_name("nav_menu_item"), "NavMenuItem");
        assert_eq!(format_type_name("Template_FullWidth"), "TemplateFullWidth");
    }

    #[test]
    fn empty_in_empty_out() {
        assert_eq!(format_field_name(""), "");
        assert_eq!(format_type_name(""), "");
        assert_eq!(format_type_name("!!!"), "");
    }

    #[test]
    fn non_ascii_collapses_to_word_break() {
        assert_eq!(format_field_name("café menu"), "cafMenu");
        assert_eq!(format_type_name("über uns"), "BerUns");
    }

    #[test]
    fn formatting_is_idempotent() {
        let inputs = [
            "My Field Group",
            "hero-banner",
            "my_field",
            "  leading spaces",
            "Price ($)",
            "123 numbers first",
            "already camelCase",
            "HTMLBlock",
            "über uns",
            "",
        ];
        for input in inputs {
            let field = format_field_name(input);
            assert_eq!(format_field_name(&field), field, "field name for {input:?}");
            let ty = format_type_name(input);
            assert_eq!(format_type_name(&ty), ty, "type name for {input:?}");
        }
    }

    #[test]
    fn formatting_is_idempotent_for_every_short_mix() {
        const ALPHABET: [char; 8] = ['a', 'Z', '7', '-', '_', ' ', '$', 'é'];

        let mut inputs = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..4 {
            frontier = frontier
                .iter()
                .flat_map(|prefix| {
                    ALPHABET.iter().map(move |c| {
                        let mut next = prefix.clone();
                        next.push(*c);
                        next
                    })
                })
                .collect();
            inputs.extend(frontier.iter().cloned());
        }
        assert_eq!(inputs.len(), 1 + 8 + 64 + 512 + 4096);

        for input in &inputs {
            let field = format_field_name(input);
            assert_eq!(format_field_name(&field), field, "field name for {input:?}");
            let ty = format_type_name(input);
            assert_eq!(format_type_name(&ty), ty, "type name for {input:?}");
        }
    }
}
