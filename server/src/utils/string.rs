//! String utility functions

/// Truncate to `max_len` characters, appending an ellipsis when cut
pub fn truncate_chars(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        format!("{}...", text.chars().take(max_len).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Canonical form of an email address for storage and lookup
pub fn fold_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// True for input that means "no value": empty, blank, or the literal `null`
pub fn is_blank_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "null"
}
