//! Name normalization shared by categories and locations.

use crate::error::CoreError;

/// Minimum length of a category or location name after trimming.
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum length of a category or location name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Trim surrounding whitespace and check the trimmed length.
///
/// The request DTOs check the raw length; padding such as `" a "` only
/// shows up as too short once trimmed.
pub fn normalize_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Name must not be empty".to_string()));
    }
    let len = trimmed.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Name must be between {MIN_NAME_LENGTH} and {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize a location name: trim, then title-case each word.
///
/// `"  living ROOM "` becomes `"Living Room"`. Word boundaries are any
/// character that is not alphanumeric or `_`, so `"home & living"` becomes
/// `"Home & Living"`.
pub fn normalize_location_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = normalize_name(raw)?;
    Ok(title_case(&trimmed))
}

/// Lowercase everything, then uppercase the first character of each word.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        at_word_start = !(ch.is_alphanumeric() || ch == '_');
    }
    out
}

/// Case-insensitive name comparison used for uniqueness decisions.
pub fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Key used for case-insensitive ordering.
pub fn sort_key(name: &str) -> String {
    name.to_lowercase()
}
