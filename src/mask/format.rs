use super::insert::insert_string;
use super::model::MaskDescriptor;

/// True when the value carries no user input: every position is either a
/// permanent literal or holds something invalid for its slot (e.g. a fill char).
pub fn is_empty_value(mask: &MaskDescriptor, value: &str) -> bool {
    if mask.is_disabled() {
        return value.is_empty();
    }
    value
        .chars()
        .enumerate()
        .all(|(idx, ch)| mask.is_permanent(idx) || !mask.is_allowed(idx, ch))
}

/// Boundary between entered content and untouched/filler content.
pub fn filled_length(mask: &MaskDescriptor, value: &str) -> usize {
    if mask.is_disabled() {
        return value.chars().count();
    }
    let chars: Vec<char> = value.chars().collect();
    let prefix_len = mask.prefix_len();

    if mask.fill_char().is_none() {
        let mut len = chars.len();
        while len > prefix_len && mask.is_permanent(len - 1) {
            len -= 1;
        }
        return len;
    }

    let mut filled = prefix_len;
    for idx in (prefix_len..=chars.len()).rev() {
        let entered = !mask.is_permanent(idx)
            && chars
                .get(idx)
                .copied()
                .is_some_and(|ch| mask.is_allowed(idx, ch));
        if entered {
            filled = idx + 1;
            break;
        }
    }
    filled
}

pub fn is_filled_value(mask: &MaskDescriptor, value: &str) -> bool {
    if mask.is_disabled() {
        return false;
    }
    filled_length(mask, value) == mask.len()
}

/// Normalizes any candidate value against the mask. Partial or garbled input
/// self-corrects by overlaying it onto the empty template.
pub fn format_value(mask: &MaskDescriptor, value: &str) -> String {
    if mask.is_disabled() {
        return value.to_string();
    }

    let Some(fill) = mask.fill_char() else {
        let mut out = insert_string(mask, "", value, 0);
        if out.chars().count() < mask.prefix_len() {
            out = mask.prefix().to_string();
        }
        // literal suffixes appear as the value reaches them, not before
        let mut len = out.chars().count();
        while len < mask.len() && mask.is_permanent(len) {
            if let Some(ch) = mask.template_char(len) {
                out.push(ch);
            }
            len += 1;
        }
        return out;
    };

    if !value.is_empty() {
        let empty_value = format_value(mask, "");
        return insert_string(mask, &empty_value, value, 0);
    }

    let mut out = String::new();
    for (idx, ch) in mask.template().iter().enumerate() {
        if mask.is_permanent(idx) {
            out.push(*ch);
        } else {
            out.push(fill);
        }
    }
    out
}

/// Blanks out `[start, start + len)`. Permanent positions revert to their
/// literal in fill mode; in variable-length mode the range is spliced out and
/// the result reformatted.
pub fn clear_range(mask: &MaskDescriptor, value: &str, start: usize, len: usize) -> String {
    if mask.is_disabled() {
        return value.to_string();
    }
    let end = start + len;
    let chars: Vec<char> = value.chars().collect();

    let Some(fill) = mask.fill_char() else {
        // permanents past the range are dropped here; format_value restores them
        let clamped_start = start.max(mask.prefix_len());
        let mut out = String::new();
        for (idx, ch) in chars.iter().enumerate() {
            if idx >= clamped_start && idx < end {
                continue;
            }
            if idx >= end && mask.is_permanent(idx) {
                continue;
            }
            out.push(*ch);
        }
        return format_value(mask, &out);
    };

    chars
        .iter()
        .enumerate()
        .map(|(idx, ch)| {
            if idx < start || idx >= end {
                *ch
            } else if mask.is_permanent(idx) {
                mask.template_char(idx).unwrap_or(*ch)
            } else {
                fill
            }
        })
        .collect()
}
