use regex::Regex;

use crate::mask::{ClassRule, EditOutcome, MaskDescriptor, Selection, parse_mask};

pub fn selection_to_json(selection: &Selection) -> serde_json::Value {
    serde_json::json!({
        "start": selection.start,
        "end": selection.end,
    })
}

pub fn selection_from_json(json: &serde_json::Value) -> Option<Selection> {
    let start = json.get("start")?.as_u64()? as usize;
    let end = json.get("end")?.as_u64()? as usize;
    Some(Selection::new(start, end))
}

pub fn outcome_to_json(outcome: &EditOutcome) -> serde_json::Value {
    serde_json::json!({
        "value": outcome.value,
        "entered_text": outcome.entered_text,
        "selection": selection_to_json(&outcome.selection),
    })
}

/// Builds a descriptor from a JSON object with a `template` string, an
/// optional `fill_char` (absent means `_`, null or empty means variable-length
/// mode) and optional `rules` mapping symbols to regex character classes.
/// A rule that fails to compile drops its symbol, leaving those template
/// positions permanent.
pub fn descriptor_from_json(json: &serde_json::Value) -> Option<MaskDescriptor> {
    let template = json.get("template")?.as_str()?;

    let fill_char = match json.get("fill_char") {
        None => Some('_'),
        Some(value) => value.as_str().and_then(|text| text.chars().next()),
    };

    let mut rules = ClassRule::defaults();
    if let Some(overrides) = json.get("rules").and_then(|value| value.as_object()) {
        for (symbol, pattern) in overrides {
            let mut key_chars = symbol.chars();
            let Some(symbol) = key_chars.next() else {
                continue;
            };
            if key_chars.next().is_some() {
                continue;
            }
            match pattern.as_str().map(Regex::new) {
                Some(Ok(re)) => {
                    rules.insert(symbol, ClassRule::Pattern(re));
                }
                _ => {
                    rules.shift_remove(&symbol);
                }
            }
        }
    }

    Some(parse_mask(template, fill_char, rules))
}
