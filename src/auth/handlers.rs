use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{CookieJar, WithRejection};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{LoginRequest, MeResponse, MessageResponse, RegisterRequest},
        extractors::{cleared_session_cookie, session_cookie, CurrentUser},
        services,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    services::register(
        state.users.as_ref(),
        &payload.username,
        &payload.password,
        payload.email.as_deref(),
    )
    .await?;
    Ok(Json(MessageResponse::ok("Registration successful")))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let identity =
        services::verify_credentials(state.users.as_ref(), &payload.username, &payload.password)
            .await?;

    let token = state.keys.issue(&identity).map_err(|e| {
        error!(error = %e, "session token signing failed");
        AppError::from(e)
    })?;

    info!(user_id = identity.id, username = %identity.username, "user logged in");
    let jar = jar.add(session_cookie(token, state.config.cookie_secure));
    Ok((jar, Json(MessageResponse::ok("Login successful"))))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(cleared_session_cookie(state.config.cookie_secure));
    (jar, Json(MessageResponse::ok("Logout successful")))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        user: user.into(),
    })
}
