use super::format::{clear_range, format_value};
use super::insert::{insert_string, insertion_length};
use super::model::{EditOutcome, MaskDescriptor, Selection};

/// First editable position at or after `pos`.
pub fn next_editable_position(mask: &MaskDescriptor, pos: usize) -> Option<usize> {
    (pos..mask.len()).find(|idx| !mask.is_permanent(*idx))
}

/// First editable position at or before `pos`.
pub fn prev_editable_position(mask: &MaskDescriptor, pos: usize) -> Option<usize> {
    (0..=pos).rev().find(|idx| !mask.is_permanent(*idx))
}

/// Infers what the user just did from the before/after value+selection
/// snapshots, then recomputes a mask-conformant value and caret.
///
/// No event type is trusted: insertion is detected from the selections,
/// deletion from the length drop, and everything else is a caret-only move.
pub fn reconcile(
    mask: &MaskDescriptor,
    previous_value: &str,
    previous_selection: Selection,
    new_value: &str,
    new_selection: Selection,
) -> EditOutcome {
    if mask.is_disabled() {
        return EditOutcome {
            value: new_value.to_string(),
            entered_text: None,
            selection: new_selection,
        };
    }

    let prev_len = previous_value.chars().count();
    let new_chars: Vec<char> = new_value.chars().collect();

    let mut entered: Option<String> = None;
    let mut entered_len = 0usize;
    let mut removed_len = 0usize;
    let mut cursor = previous_selection.start.min(new_selection.start);

    if new_selection.end > previous_selection.start {
        let start = previous_selection.start.min(new_chars.len());
        let end = new_selection.end.min(new_chars.len());
        let entered_str: String = new_chars[start..end].iter().collect();
        entered_len = insertion_length(mask, &entered_str, cursor);
        // a replace that consumed nothing removed nothing either
        removed_len = if entered_len == 0 {
            0
        } else {
            previous_selection.length()
        };
        entered = Some(entered_str);
    } else if new_chars.len() < prev_len {
        removed_len = prev_len - new_chars.len();
    }

    let mut value = previous_value.to_string();

    if removed_len > 0 {
        if removed_len == 1 && previous_selection.is_collapsed() {
            // single backspace or forward delete: re-anchor onto an editable slot
            let delete_from_right = previous_selection.start == new_selection.start;
            cursor = if delete_from_right {
                next_editable_position(mask, new_selection.start).unwrap_or(new_selection.start)
            } else {
                prev_editable_position(mask, new_selection.start).unwrap_or(new_selection.start)
            };
        }
        value = clear_range(mask, &value, cursor, removed_len);
    }

    value = insert_string(mask, &value, entered.as_deref().unwrap_or(""), cursor);

    cursor += entered_len;
    let prefix_len = mask.prefix_len();
    if cursor >= mask.len() {
        cursor = mask.len();
    } else if cursor < prefix_len && entered_len == 0 {
        cursor = prefix_len;
    } else if cursor >= prefix_len
        && mask
            .last_editable_position()
            .is_some_and(|last| cursor < last)
        && entered_len > 0
    {
        // typing never parks the caret on a literal
        cursor = next_editable_position(mask, cursor).unwrap_or(cursor);
    }

    value = format_value(mask, &value);

    EditOutcome {
        value,
        entered_text: entered.filter(|text| !text.is_empty()),
        selection: Selection::caret(cursor),
    }
}

#[cfg(test)]
mod tests {
    use super::{next_editable_position, prev_editable_position, reconcile};
    use crate::mask::model::{ClassRule, MaskDescriptor, Selection};
    use crate::mask::parser::parse_mask;

    fn date() -> MaskDescriptor {
        MaskDescriptor::new("99/99/9999")
    }

    #[test]
    fn editable_position_scans_skip_literals() {
        let mask = date();
        assert_eq!(next_editable_position(&mask, 2), Some(3));
        assert_eq!(next_editable_position(&mask, 3), Some(3));
        assert_eq!(next_editable_position(&mask, 10), None);
        assert_eq!(prev_editable_position(&mask, 2), Some(1));
        assert_eq!(prev_editable_position(&mask, 9), Some(9));
        let fixed = MaskDescriptor::new("--");
        assert_eq!(next_editable_position(&fixed, 0), None);
        assert_eq!(prev_editable_position(&fixed, 1), None);
    }

    #[test]
    fn typing_into_an_empty_field() {
        let out = reconcile(
            &date(),
            "__/__/____",
            Selection::caret(0),
            "1__/__/____",
            Selection::caret(1),
        );
        assert_eq!(out.value, "1_/__/____");
        assert_eq!(out.entered_text.as_deref(), Some("1"));
        assert_eq!(out.selection, Selection::caret(1));
    }

    #[test]
    fn typing_before_a_literal_skips_over_it() {
        let out = reconcile(
            &date(),
            "12/__/____",
            Selection::caret(2),
            "123/__/____",
            Selection::caret(3),
        );
        assert_eq!(out.value, "12/3_/____");
        assert_eq!(out.selection, Selection::caret(4));
    }

    #[test]
    fn backspace_at_the_end_clears_the_last_editable_slot() {
        let out = reconcile(
            &date(),
            "12/34/5678",
            Selection::caret(10),
            "12/34/567",
            Selection::caret(9),
        );
        assert_eq!(out.value, "12/34/567_");
        assert_eq!(out.entered_text, None);
        assert_eq!(out.selection, Selection::caret(9));
    }

    #[test]
    fn backspacing_a_literal_clears_the_slot_before_it() {
        // caret after the slash; the deleted char is the slash itself
        let out = reconcile(
            &date(),
            "12/34/5678",
            Selection::caret(3),
            "1234/5678",
            Selection::caret(2),
        );
        assert_eq!(out.value, "1_/34/5678");
        assert_eq!(out.selection, Selection::caret(1));
    }

    #[test]
    fn forward_delete_on_a_literal_clears_the_slot_after_it() {
        let out = reconcile(
            &date(),
            "12/34/5678",
            Selection::caret(2),
            "1234/5678",
            Selection::caret(2),
        );
        assert_eq!(out.value, "12/_4/5678");
        assert_eq!(out.selection, Selection::caret(3));
    }

    #[test]
    fn selection_replaced_with_an_invalid_char_changes_nothing() {
        // nothing was consumed, so the selected range must survive
        let out = reconcile(
            &date(),
            "12/34/5678",
            Selection::new(0, 2),
            "x/34/5678",
            Selection::caret(1),
        );
        assert_eq!(out.value, "12/34/5678");
        assert_eq!(out.entered_text.as_deref(), Some("x"));
        assert_eq!(out.selection, Selection::caret(0));
    }

    #[test]
    fn selection_replaced_with_a_valid_char_clears_the_rest() {
        let out = reconcile(
            &date(),
            "12/34/5678",
            Selection::new(0, 5),
            "9/5678",
            Selection::caret(1),
        );
        assert_eq!(out.value, "9_/__/5678");
        assert_eq!(out.selection, Selection::caret(1));
    }

    #[test]
    fn paste_fills_across_literals_and_lands_at_the_end() {
        let mask = MaskDescriptor::new("+1 (999) 999-9999");
        let empty = "+1 (___) ___-____";
        let out = reconcile(
            &mask,
            empty,
            Selection::caret(0),
            "2025551234+1 (___) ___-____",
            Selection::caret(10),
        );
        assert_eq!(out.value, "+1 (202) 555-1234");
        assert_eq!(out.selection, Selection::caret(17));
    }

    #[test]
    fn caret_moves_into_the_prefix_snap_to_its_end() {
        let mask = MaskDescriptor::new("+1 (999) 999-9999");
        let value = "+1 (___) ___-____";
        let out = reconcile(&mask, value, Selection::caret(6), value, Selection::caret(1));
        assert_eq!(out.value, value);
        assert_eq!(out.entered_text, None);
        assert_eq!(out.selection, Selection::caret(4));
    }

    #[test]
    fn caret_clamps_to_the_mask_length() {
        let out = reconcile(
            &date(),
            "12/34/5678",
            Selection::caret(10),
            "12/34/56789",
            Selection::caret(11),
        );
        assert_eq!(out.value, "12/34/5678");
        assert_eq!(out.selection, Selection::caret(10));
    }

    #[test]
    fn variable_length_typing_pulls_in_the_literal() {
        let mask = parse_mask("99-99", None, ClassRule::defaults());
        let first = reconcile(&mask, "", Selection::caret(0), "1", Selection::caret(1));
        assert_eq!(first.value, "1");
        assert_eq!(first.selection, Selection::caret(1));

        let second = reconcile(&mask, "1", Selection::caret(1), "12", Selection::caret(2));
        assert_eq!(second.value, "12-");
        assert_eq!(second.selection, Selection::caret(3));
    }

    #[test]
    fn disabled_mask_returns_the_raw_edit() {
        let mask = MaskDescriptor::disabled();
        let out = reconcile(&mask, "abc", Selection::caret(3), "abcd", Selection::caret(4));
        assert_eq!(out.value, "abcd");
        assert_eq!(out.entered_text, None);
        assert_eq!(out.selection, Selection::caret(4));
    }
}
