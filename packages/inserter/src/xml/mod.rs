//! XML utilities.

mod utils;

pub use utils::{
    escape_text, find_by_path, find_child, find_children, get_attribute, get_tag_name, get_val,
    has_tag, is_on, raw_offset_for_char, source_text,
};
