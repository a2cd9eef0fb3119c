use validator::ValidateEmail;

use crate::domain::entities::rating::{MAX_RATING, MIN_RATING};

pub const MAX_NAME_LEN: usize = 60;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Display names: 1-60 characters after trimming.
pub fn is_valid_name(name: &str) -> bool {
    let len = name.trim().chars().count();
    (1..=MAX_NAME_LEN).contains(&len)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn is_valid_rating(rating: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Trims and lowercases an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Blank optional text becomes `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
