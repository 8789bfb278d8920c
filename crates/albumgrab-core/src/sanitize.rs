//! Folder-name sanitization

/// Characters that are rejected in Windows file names.
pub const FORBIDDEN_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace every forbidden character with `_`.
///
/// Nothing else is touched: case, whitespace and length pass through unchanged.
pub fn sanitize_folder_name(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
