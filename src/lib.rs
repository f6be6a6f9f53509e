pub mod json;
pub mod mask;
pub mod session;

pub use mask::{
    ClassRule, EditOutcome, MaskDescriptor, Selection, clear_range, filled_length, format_value,
    insert_string, insertion_length, is_empty_value, is_filled_value, next_editable_position,
    parse_mask, prev_editable_position, reconcile,
};
pub use session::EditingSession;
