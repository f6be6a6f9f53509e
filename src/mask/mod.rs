mod format;
mod insert;
mod model;
mod parser;
mod reconcile;

pub use format::{clear_range, filled_length, format_value, is_empty_value, is_filled_value};
pub use insert::{insert_string, insertion_length};
pub use model::{ClassRule, EditOutcome, MaskDescriptor, Selection};
pub use parser::parse_mask;
pub use reconcile::{next_editable_position, prev_editable_position, reconcile};
