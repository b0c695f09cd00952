//! Shared input validation helpers.
//!
//! Length limits are counted in characters, not bytes, so subject names in
//! non-Latin scripts get the same budget as ASCII ones.

use crate::error::CoreError;

/// Maximum subject name length on create.
pub const SUBJECT_NAME_MAX_CREATE: usize = 80;
/// Maximum subject name length on rename.
pub const SUBJECT_NAME_MAX_UPDATE: usize = 200;
/// Maximum subject color token length.
pub const COLOR_MAX: usize = 60;
/// Maximum task, event, and todo title length.
pub const TITLE_MAX: usize = 200;
/// Maximum party name length.
pub const PARTY_NAME_MAX: usize = 80;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 30;

/// Validate that `value` is non-blank and at most `max` characters.
///
/// Returns a `CoreError::Validation` naming the field otherwise.
pub fn validate_text(value: &str, field: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

/// Normalize and validate a username.
///
/// Usernames are stored lowercase and restricted to `[a-z0-9_]` so they can be
/// typed into the party invite box without ambiguity.
pub fn normalize_username(raw: &str) -> Result<String, CoreError> {
    let username = raw.trim().to_lowercase();
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(CoreError::Validation(format!(
            "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(CoreError::Validation(
            "username may only contain letters, digits and underscores".into(),
        ));
    }
    Ok(username)
}

/// Validate that a duration in seconds is strictly positive.
pub fn validate_positive_secs(value: i64, field: &str) -> Result<(), CoreError> {
    if value <= 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be greater than zero, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn text_accepts_boundary_length() {
        let name = "a".repeat(SUBJECT_NAME_MAX_CREATE);
        assert!(validate_text(&name, "name", SUBJECT_NAME_MAX_CREATE).is_ok());
    }

    #[test]
    fn text_rejects_blank() {
        assert_matches!(
            validate_text("   ", "name", 10),
            Err(CoreError::Validation(msg)) if msg.contains("name")
        );
    }

    #[test]
    fn text_counts_chars_not_bytes() {
        // 10 three-byte characters.
        let name = "数".repeat(10);
        assert!(validate_text(&name, "name", 10).is_ok());
        assert!(validate_text(&name, "name", 9).is_err());
    }

    #[test]
    fn username_is_lowercased() {
        assert_eq!(normalize_username("  Study_Bot42 ").unwrap(), "study_bot42");
    }

    #[test]
    fn username_rejects_symbols_and_short_names() {
        assert!(normalize_username("no-dash").is_err());
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username("has space").is_err());
    }

    #[test]
    fn positive_secs() {
        assert!(validate_positive_secs(1, "duration_secs").is_ok());
        assert!(validate_positive_secs(0, "duration_secs").is_err());
        assert!(validate_positive_secs(-5, "duration_secs").is_err());
    }
}
