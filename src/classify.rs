//! Event classification from metadata markers

use crate::types::data::MetaTable;

/// Read the classification marker `tag_name` from an event's metadata
///
/// Absence is a normal outcome and stays distinct from the `none` sentinel.
pub fn find_meta_value(meta: &MetaTable, tag_name: &str) -> Option<String> {
    meta.get(tag_name).cloned()
}
