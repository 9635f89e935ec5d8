use sqlx::FromRow;
use time::OffsetDateTime;

/// Column width of `users.username`.
pub const USERNAME_MAX_LEN: usize = 100;
/// Column width of `users.email`.
pub const EMAIL_MAX_LEN: usize = 255;

/// User record in the database. Never serialized directly; see `PublicUser`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String, // Argon2 PHC string
    pub email: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub email: Option<&'a str>,
}
