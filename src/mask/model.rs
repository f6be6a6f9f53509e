use indexmap::IndexMap;
use regex::Regex;

/// Character class accepted by an editable mask position.
#[derive(Debug, Clone)]
pub enum ClassRule {
    Digit,
    Letter,
    Alphanumeric,
    Pattern(Regex),
}

impl ClassRule {
    pub fn matches(&self, ch: char) -> bool {
        match self {
            Self::Digit => ch.is_ascii_digit(),
            Self::Letter => ch.is_ascii_alphabetic(),
            Self::Alphanumeric => ch.is_ascii_alphanumeric(),
            Self::Pattern(re) => {
                let mut buf = [0u8; 4];
                re.is_match(ch.encode_utf8(&mut buf))
            }
        }
    }

    /// Default symbol table: `9` digit, `a` latin letter, `*` alphanumeric.
    pub fn defaults() -> IndexMap<char, ClassRule> {
        let mut rules = IndexMap::new();
        rules.insert('9', Self::Digit);
        rules.insert('a', Self::Letter);
        rules.insert('*', Self::Alphanumeric);
        rules
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn length(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Result of reconciling one user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub value: String,
    pub entered_text: Option<String>,
    pub selection: Selection,
}

/// Parsed template. Immutable once built; positions are char indices.
#[derive(Debug, Clone)]
pub struct MaskDescriptor {
    template: Vec<char>,
    fill_char: Option<char>,
    class_rules: IndexMap<char, ClassRule>,
    permanent_positions: Vec<usize>,
    prefix: String,
    last_editable_position: Option<usize>,
}

impl MaskDescriptor {
    pub(super) fn from_parts(
        template: Vec<char>,
        fill_char: Option<char>,
        class_rules: IndexMap<char, ClassRule>,
        permanent_positions: Vec<usize>,
        prefix: String,
        last_editable_position: Option<usize>,
    ) -> Self {
        Self {
            template,
            fill_char,
            class_rules,
            permanent_positions,
            prefix,
            last_editable_position,
        }
    }

    /// Parses `template` with the default fill char `_` and default rules.
    pub fn new(template: &str) -> Self {
        super::parser::parse_mask(template, Some('_'), ClassRule::defaults())
    }

    /// Descriptor with no mask; every operation passes values through untouched.
    pub fn disabled() -> Self {
        Self::from_parts(
            Vec::new(),
            Some('_'),
            ClassRule::defaults(),
            Vec::new(),
            String::new(),
            None,
        )
    }

    pub fn is_disabled(&self) -> bool {
        self.template.is_empty()
    }

    pub fn len(&self) -> usize {
        self.template.len()
    }

    pub fn is_empty(&self) -> bool {
        self.template.is_empty()
    }

    pub fn template(&self) -> &[char] {
        self.template.as_slice()
    }

    pub fn template_char(&self, pos: usize) -> Option<char> {
        self.template.get(pos).copied()
    }

    pub fn fill_char(&self) -> Option<char> {
        self.fill_char
    }

    pub fn class_rules(&self) -> &IndexMap<char, ClassRule> {
        &self.class_rules
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix.chars().count()
    }

    /// One past the last editable position, `None` if nothing is editable.
    pub fn last_editable_position(&self) -> Option<usize> {
        self.last_editable_position
    }

    pub fn is_permanent(&self, pos: usize) -> bool {
        self.permanent_positions.binary_search(&pos).is_ok()
    }

    pub fn is_allowed(&self, pos: usize, ch: char) -> bool {
        if self.is_permanent(pos) {
            return self.template_char(pos) == Some(ch);
        }
        let Some(symbol) = self.template_char(pos) else {
            return false;
        };
        self.class_rules
            .get(&symbol)
            .is_some_and(|rule| rule.matches(ch))
    }
}
