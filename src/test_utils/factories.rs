//! Test data factories.
//!
//! Each factory returns a complete, valid object. Use the closure to override
//! specific fields.

use chrono::NaiveDateTime;
use secrecy::SecretString;

use crate::{
    application::{
        password::hash_password,
        token::{DEFAULT_SESSION_TTL, TokenCodec},
    },
    domain::entities::{rating::Rating, role::Role, store::Store, user::User},
};

/// Password every factory-made user can log in with.
pub const TEST_PASSWORD: &str = "password123";
pub const TEST_SESSION_SECRET: &str = "test-session-secret";

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(
        SecretString::new(TEST_SESSION_SECRET.into()),
        DEFAULT_SESSION_TTL,
    )
}

pub fn create_test_user(role: Role, overrides: impl FnOnce(&mut User)) -> User {
    let mut user = User {
        id: 1,
        email: "user@example.com".to_string(),
        name: "Test User".to_string(),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        role,
        created_at: test_datetime(),
    };
    overrides(&mut user);
    user
}

pub fn create_test_store(owner_id: i64, overrides: impl FnOnce(&mut Store)) -> Store {
    let mut store = Store {
        id: 1,
        owner_id,
        name: "Test Store".to_string(),
        description: Some("Groceries and more".to_string()),
        address: "1 Test Street".to_string(),
        phone: None,
        email: None,
        website: None,
        created_at: test_datetime(),
        updated_at: test_datetime(),
    };
    overrides(&mut store);
    store
}

pub fn create_test_rating(
    user_id: i64,
    store_id: i64,
    overrides: impl FnOnce(&mut Rating),
) -> Rating {
    let mut rating = Rating {
        id: 1,
        user_id,
        store_id,
        rating: 4,
        review: Some("Friendly staff".to_string()),
        created_at: test_datetime(),
        updated_at: test_datetime(),
    };
    overrides(&mut rating);
    rating
}

pub fn test_datetime() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-01-15 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::password::verify_password;

    #[test]
    fn factory_user_accepts_test_password() {
        let user = create_test_user(Role::Customer, |_| {});
        assert!(verify_password(TEST_PASSWORD, &user.password_hash));
        assert!(user.claim().is_complete());
    }

    #[test]
    fn overrides_apply() {
        let store = create_test_store(9, |s| s.name = "Other".into());
        assert_eq!(store.owner_id, 9);
        assert_eq!(store.name, "Other");
    }
}
