//! Input checks for user registration.

use crate::constants::{FULLNAME_MAX_LEN, USERNAME_MAX_LEN, USERNAME_MIN_LEN};

/// 2–50 characters of letters, digits, `_`, `-` or space; not blank.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let trimmed = username.trim();
    let len = trimmed.chars().count();
    if len < USERNAME_MIN_LEN {
        return Err("Username must be at least 2 characters");
    }
    if len > USERNAME_MAX_LEN {
        return Err("Username must be at most 50 characters");
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ' ')
    {
        return Err("Username may only contain letters, digits, '_', '-' and spaces");
    }
    Ok(())
}

pub fn validate_fullname(fullname: &str) -> Result<(), &'static str> {
    let trimmed = fullname.trim();
    if trimmed.is_empty() {
        return Err("Full name is required");
    }
    if trimmed.chars().count() > FULLNAME_MAX_LEN {
        return Err("Full name must be at most 100 characters");
    }
    if trimmed.chars().any(char::is_control) {
        return Err("Full name contains invalid characters");
    }
    Ok(())
}

/// `local@domain.tld` with a conservative character set.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if !local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'+' || b == b'-')
    {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }
    if !domain
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    {
        return false;
    }
    domain
        .split('.')
        .all(|part| !part.is_empty() && !part.starts_with('-') && !part.ends_with('-'))
}
