//! Output file names for pruned scenes

use std::path::Path;

use crate::config::OUTPUT_NAME_SEPARATOR;

/// ASCII-alphanumeric tokens of `pattern`, concatenated
///
/// ```
/// use qto::scene::pattern_tokens;
///
/// assert_eq!(pattern_tokens("*[wW]all*"), "wWall");
/// assert_eq!(pattern_tokens("Door|Window 2"), "DoorWindow2");
/// ```
pub fn pattern_tokens(pattern: &str) -> String {
    pattern
        .split(|c: char| !c.is_ascii_alphanumeric())
        .collect()
}

/// Name of the pruned copy of `source` for `pattern`
///
/// Returns `None` if `source` has no file name.
pub fn output_file_name(pattern: &str, source: &Path) -> Option<String> {
    let base = source.file_name()?.to_string_lossy();
    Some(format!(
        "{}{}{}",
        pattern_tokens(pattern),
        OUTPUT_NAME_SEPARATOR,
        base
    ))
}
