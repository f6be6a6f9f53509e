use indexmap::IndexMap;

use super::model::{ClassRule, MaskDescriptor};

/// Parses a template into a descriptor. A backslash forces the next character
/// to be a permanent literal; escapes are dropped from the resulting template,
/// so positions refer to the parsed output. An empty template disables masking.
pub fn parse_mask(
    template: &str,
    fill_char: Option<char>,
    class_rules: IndexMap<char, ClassRule>,
) -> MaskDescriptor {
    let mut parsed = Vec::<char>::new();
    let mut permanents = Vec::<usize>::new();
    let mut prefix = String::new();
    let mut last_editable = None;

    let mut escaped = false;
    for ch in template.chars() {
        if !escaped && ch == '\\' {
            escaped = true;
            continue;
        }

        if escaped || !class_rules.contains_key(&ch) {
            permanents.push(parsed.len());
            // prefix grows only while the permanent run from 0 is unbroken
            if parsed.len() + 1 == permanents.len() {
                prefix.push(ch);
            }
        } else {
            last_editable = Some(parsed.len() + 1);
        }
        parsed.push(ch);
        escaped = false;
    }

    MaskDescriptor::from_parts(
        parsed,
        fill_char,
        class_rules,
        permanents,
        prefix,
        last_editable,
    )
}

#[cfg(test)]
mod tests {
    use super::parse_mask;
    use crate::mask::model::{ClassRule, MaskDescriptor};
    use regex::Regex;

    #[test]
    fn splits_editable_and_permanent_positions() {
        let mask = MaskDescriptor::new("99/99/9999");
        assert_eq!(mask.len(), 10);
        assert!(mask.is_permanent(2));
        assert!(mask.is_permanent(5));
        assert!(!mask.is_permanent(0));
        assert_eq!(mask.prefix(), "");
        assert_eq!(mask.last_editable_position(), Some(10));
    }

    #[test]
    fn prefix_is_the_leading_permanent_run() {
        let mask = MaskDescriptor::new("+1 (999) 999-9999");
        assert_eq!(mask.len(), 17);
        assert_eq!(mask.prefix(), "+1 (");
        assert_eq!(mask.prefix_len(), 4);
        assert!(mask.is_permanent(7));
        assert!(mask.is_permanent(12));
        assert_eq!(mask.last_editable_position(), Some(17));
    }

    #[test]
    fn backslash_escapes_a_class_symbol_into_a_literal() {
        let mask = MaskDescriptor::new("\\9 9");
        assert_eq!(mask.len(), 3);
        assert!(mask.is_permanent(0));
        assert!(mask.is_permanent(1));
        assert!(!mask.is_permanent(2));
        assert_eq!(mask.prefix(), "9 ");
        assert_eq!(mask.template_char(0), Some('9'));
    }

    #[test]
    fn trailing_backslash_is_dropped() {
        let mask = MaskDescriptor::new("99\\");
        assert_eq!(mask.len(), 2);
        assert_eq!(mask.last_editable_position(), Some(2));
    }

    #[test]
    fn escaped_backslash_is_a_literal_backslash() {
        let mask = MaskDescriptor::new("\\\\9");
        assert_eq!(mask.len(), 2);
        assert!(mask.is_permanent(0));
        assert_eq!(mask.template_char(0), Some('\\'));
        assert!(!mask.is_permanent(1));
    }

    #[test]
    fn empty_template_disables_masking() {
        let mask = MaskDescriptor::new("");
        assert!(mask.is_disabled());
        assert_eq!(mask.len(), 0);
        assert_eq!(mask.last_editable_position(), None);
    }

    #[test]
    fn fully_permanent_mask_has_no_editable_position() {
        let mask = MaskDescriptor::new("--");
        assert_eq!(mask.last_editable_position(), None);
        assert_eq!(mask.prefix(), "--");
    }

    #[test]
    fn custom_rules_replace_the_default_table() {
        let mut rules = ClassRule::defaults();
        rules.insert('H', ClassRule::Pattern(Regex::new("[0-9a-fA-F]").expect("pattern")));
        let mask = parse_mask("HH:HH", Some('_'), rules);
        assert!(!mask.is_permanent(0));
        assert!(mask.is_permanent(2));
        assert!(mask.is_allowed(0, 'f'));
        assert!(!mask.is_allowed(0, 'g'));
    }
}
