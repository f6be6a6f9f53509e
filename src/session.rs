use unicode_width::UnicodeWidthChar;

use crate::mask::{
    EditOutcome, MaskDescriptor, Selection, filled_length, format_value, is_empty_value,
    is_filled_value, next_editable_position, reconcile,
};

/// Editing state for one masked field, owned by the text surface driving it.
///
/// The surface reports each edit as the raw post-edit content plus selection;
/// the session reconciles it against the committed state and hands back the
/// value and caret to write into the field. The masking functions themselves
/// stay stateless.
pub struct EditingSession {
    descriptor: MaskDescriptor,
    value: String,
    selection: Selection,
}

impl EditingSession {
    pub fn new(descriptor: MaskDescriptor, initial_value: &str, show_empty_mask: bool) -> Self {
        let value = if !descriptor.is_disabled() && (show_empty_mask || !initial_value.is_empty()) {
            format_value(&descriptor, initial_value)
        } else {
            initial_value.to_string()
        };
        Self {
            descriptor,
            value,
            selection: Selection::caret(0),
        }
    }

    pub fn descriptor(&self) -> &MaskDescriptor {
        &self.descriptor
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Reconciles one user edit against the committed state and commits the
    /// outcome. The surface writes the returned value and caret back.
    pub fn apply_edit(&mut self, new_raw_value: &str, new_selection: Selection) -> EditOutcome {
        let outcome = reconcile(
            &self.descriptor,
            &self.value,
            self.selection,
            new_raw_value,
            new_selection,
        );
        self.commit(&outcome);
        outcome
    }

    /// Applies pasted text over the committed selection. Used by surfaces that
    /// capture paste content directly instead of diffing the field.
    pub fn apply_paste(&mut self, pasted: &str) -> EditOutcome {
        let chars: Vec<char> = self.value.chars().collect();
        let start = self.selection.start.min(chars.len());
        let end = self.selection.end.clamp(start, chars.len());

        let mut raw: String = chars[..start].iter().collect();
        raw.push_str(pasted);
        raw.extend(&chars[end..]);

        let caret = start + pasted.chars().count();
        self.apply_edit(&raw, Selection::caret(caret))
    }

    /// Applies an atomic full-value replacement (browser autofill, password
    /// manager). The previous state is treated as an empty formatted field.
    pub fn apply_autofill(&mut self, new_raw_value: &str, new_selection: Selection) -> EditOutcome {
        self.value = format_value(&self.descriptor, "");
        self.selection = Selection::caret(0);
        self.apply_edit(new_raw_value, new_selection)
    }

    /// Heuristic for autofill: the old caret sat before the old end of the
    /// value, yet the new one jumped to the new end.
    pub fn looks_like_autofilled(&self, new_value: &str, new_selection: Selection) -> bool {
        self.selection.end < self.value.chars().count()
            && new_selection.end == new_value.chars().count()
    }

    /// State to show when the field gains focus: an empty field reveals the
    /// unfilled template, a partial one moves the caret to the end of input.
    pub fn focus_gained(&mut self) -> Option<EditOutcome> {
        if self.descriptor.is_disabled() {
            return None;
        }

        if self.value.is_empty() {
            let seeded = format_value(&self.descriptor, self.descriptor.prefix());
            let value = format_value(&self.descriptor, &seeded);
            let filled = filled_length(&self.descriptor, &value);
            let caret = next_editable_position(&self.descriptor, filled).unwrap_or(filled);
            let outcome = EditOutcome {
                value,
                entered_text: None,
                selection: Selection::caret(caret),
            };
            self.commit(&outcome);
            return Some(outcome);
        }

        if filled_length(&self.descriptor, &self.value) < self.descriptor.len() {
            let selection = self.caret_to_end();
            self.selection = selection;
            return Some(EditOutcome {
                value: self.value.clone(),
                entered_text: None,
                selection,
            });
        }

        None
    }

    /// Display value when the field loses focus: a value with no real input
    /// collapses back to an empty field unless the template stays visible.
    pub fn focus_lost(&mut self, show_empty_mask: bool) -> Option<String> {
        if self.descriptor.is_disabled()
            || show_empty_mask
            || !is_empty_value(&self.descriptor, &self.value)
        {
            return None;
        }
        self.value.clear();
        Some(String::new())
    }

    /// Swaps in a new descriptor, reformatting the committed value and pulling
    /// the caret back when it now sits past the entered content.
    pub fn set_descriptor(&mut self, descriptor: MaskDescriptor) -> Option<EditOutcome> {
        let template_changed = descriptor.template() != self.descriptor.template();
        self.descriptor = descriptor;

        if self.descriptor.is_disabled() || !template_changed {
            return None;
        }

        let value = format_value(&self.descriptor, &self.value);
        let mut caret = self.selection.start;
        let filled = filled_length(&self.descriptor, &value);
        if filled < caret {
            caret = if is_filled_value(&self.descriptor, &value) {
                filled
            } else {
                next_editable_position(&self.descriptor, filled).unwrap_or(filled)
            };
        }

        let outcome = EditOutcome {
            value,
            entered_text: None,
            selection: Selection::caret(caret),
        };
        self.commit(&outcome);
        Some(outcome)
    }

    pub fn caret_to_end(&self) -> Selection {
        let filled = filled_length(&self.descriptor, &self.value);
        let pos = next_editable_position(&self.descriptor, filled).unwrap_or(filled);
        Selection::caret(pos)
    }

    /// Display column of the caret, for surfaces that render in terminal cells.
    pub fn caret_col(&self) -> usize {
        self.value
            .chars()
            .take(self.selection.start)
            .map(|ch| ch.width().unwrap_or(0))
            .sum()
    }

    fn commit(&mut self, outcome: &EditOutcome) {
        self.value = outcome.value.clone();
        self.selection = outcome.selection;
    }
}
