use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use super::{
    claims::Identity,
    jwt::{SessionKeys, SESSION_TTL},
    repo_types::User,
};
use crate::{error::AppError, state::AppState};

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "token";

/// Reads the session cookie and verifies it.
pub fn resolve_identity(headers: &HeaderMap, keys: &SessionKeys) -> Option<Identity> {
    let jar = CookieJar::from_headers(headers);
    let token = jar.get(SESSION_COOKIE)?.value();
    keys.verify(token)
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(SESSION_TTL)
        .build()
}

pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), secure);
    cookie.make_removal();
    cookie
}

/// Stored record of the logged-in caller. Resolves only when the token
/// verifies and its user still exists.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(identity) = resolve_identity(&parts.headers, &state.keys) else {
            debug!("missing or invalid session cookie");
            return Err(AppError::Unauthenticated);
        };

        match state.users.find_by_id(identity.id).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(user_id = identity.id, "session token for unknown user");
                Err(AppError::Unauthenticated)
            }
        }
    }
}

/// Identity of the logged-in caller. Handlers taking this never run
/// for unauthenticated requests.
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        Ok(AuthUser(Identity {
            id: user.id,
            username: user.username,
        }))
    }
}
