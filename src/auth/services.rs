use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        claims::Identity,
        password::{check as check_password, hash as hash_password},
        repo::UserStore,
        repo_types::{NewUser, User, EMAIL_MAX_LEN, USERNAME_MAX_LEN},
    },
    error::AppError,
    store::StoreError,
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap();
    }
    !username.is_empty() && username.len() <= USERNAME_MAX_LEN && USERNAME_RE.is_match(username)
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    email.chars().count() <= EMAIL_MAX_LEN && EMAIL_RE.is_match(email)
}

/// Creates a user after checking the username is free. Only the Argon2
/// hash of `password` is stored.
pub async fn register(
    users: &dyn UserStore,
    username: &str,
    password: &str,
    email: Option<&str>,
) -> Result<User, AppError> {
    let username = username.trim();
    if !is_valid_username(username) {
        warn!(%username, "invalid username");
        return Err(AppError::validation(
            "Username must be 1-100 characters of letters, digits, '.', '_' or '-'",
        ));
    }
    if password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    let email = email.map(str::trim).filter(|e| !e.is_empty());
    if let Some(e) = email {
        if !is_valid_email(e) {
            return Err(AppError::validation("Invalid email"));
        }
    }

    if users.find_by_username(username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::DuplicateUsername);
    }

    let hash = hash_password(password)?;
    let user = users
        .create(NewUser {
            username,
            password_hash: &hash,
            email,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict => {
                warn!(%username, "username taken by concurrent register");
                AppError::DuplicateUsername
            }
            other => other.into(),
        })?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Checks a username/password pair. Unknown users and wrong passwords
/// produce the same error.
pub async fn verify_credentials(
    users: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<Identity, AppError> {
    let username = username.trim();
    let user = match users.find_by_username(username).await? {
        Some(u) => u,
        None => {
            warn!(%username, "login unknown username");
            return Err(AppError::InvalidCredentials);
        }
    };

    check_password(password, &user.password_hash).map_err(|e| {
        if matches!(e, AppError::InvalidCredentials) {
            warn!(user_id = user.id, "login invalid password");
        }
        e
    })?;

    Ok(Identity {
        id: user.id,
        username: user.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn username_rules() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("a.b_c-1"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(&"x".repeat(USERNAME_MAX_LEN + 1)));
    }

    #[tokio::test]
    async fn register_then_verify() {
        let store = MemoryStore::default();
        let user = register(&store, "  alice ", "password123", None).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "password123");

        let who = verify_credentials(&store, "alice", "password123").await.unwrap();
        assert_eq!(who.id, user.id);
        assert_eq!(who.username, "alice");
    }

    #[tokio::test]
    async fn duplicate_username_leaves_first_user_intact() {
        let store = MemoryStore::default();
        let first = register(&store, "alice", "first-password", None).await.unwrap();

        let err = register(&store, "alice", "second-password", None).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername));

        let who = verify_credentials(&store, "alice", "first-password").await.unwrap();
        assert_eq!(who.id, first.id);
        let err = verify_credentials(&store, "alice", "second-password").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let store = MemoryStore::default();
        register(&store, "alice", "password123", None).await.unwrap();

        let wrong = verify_credentials(&store, "alice", "nope-nope").await.unwrap_err();
        let unknown = verify_credentials(&store, "mallory", "password123").await.unwrap_err();
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn register_validates_input() {
        let store = MemoryStore::default();
        let short = register(&store, "alice", "short", None).await.unwrap_err();
        assert!(matches!(short, AppError::Validation(_)));
        let blank = register(&store, "   ", "password123", None).await.unwrap_err();
        assert!(matches!(blank, AppError::Validation(_)));
        let email = register(&store, "alice", "password123", Some("not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(email, AppError::Validation(_)));
        let long_email = format!("{}@example.com", "a".repeat(EMAIL_MAX_LEN));
        let email = register(&store, "alice", "password123", Some(&long_email))
            .await
            .unwrap_err();
        assert!(matches!(email, AppError::Validation(_)));
        assert!(store.find_by_username("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unreadable_stored_hash_is_not_reported_as_bad_password() {
        let store = MemoryStore::default();
        store.seed_user("legacy").await;
        let err = verify_credentials(&store, "legacy", "password123").await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }
}
