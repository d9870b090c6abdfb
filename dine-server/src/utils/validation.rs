//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so the limits live
//! here.

// ── Text length limits ──────────────────────────────────────────────

/// Menu item names
pub const MAX_NAME_LEN: usize = 200;

/// Table identifiers supplied by the customer client
pub const MAX_TABLE_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if value.len() > max_len {
        return Err(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ));
    }
    Ok(())
}
