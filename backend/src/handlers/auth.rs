//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::UserView;
use crate::services::auth::SignupInput;
use crate::services::AuthService;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Username or email address
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub user: UserView,
    pub access: String,
    pub refresh: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

#[derive(Serialize)]
pub struct LoginHintResponse {
    pub detail: String,
    pub post_example: LoginExample,
}

#[derive(Serialize)]
pub struct LoginExample {
    pub username: String,
    pub password: String,
}

/// Signup endpoint handler
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupInput>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let result = auth_service.signup(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user: result.user.into(),
            access: result.tokens.access,
            refresh: result.tokens.refresh,
        }),
    ))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.login(&body.username, &body.password).await?;

    Ok(Json(TokenPairResponse {
        access: tokens.access,
        refresh: tokens.refresh,
    }))
}

/// Friendly response for browser GETs against the login endpoint
pub async fn login_hint() -> Json<LoginHintResponse> {
    Json(LoginHintResponse {
        detail: "This endpoint issues JWT tokens. Use POST with 'username' (or email) and \
                 'password' to obtain a token pair."
            .to_string(),
        post_example: LoginExample {
            username: "user@example.com".to_string(),
            password: "your_password".to_string(),
        },
    })
}

/// Refresh token endpoint handler
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let access = auth_service.refresh_access_token(&body.refresh).await?;

    Ok(Json(RefreshResponse { access }))
}

/// Google sign-in stub
///
/// Token verification against Google is not wired up; the endpoint exists so
/// dashboard builds linking to it get a stable answer.
pub async fn google_auth() -> (StatusCode, Json<DetailResponse>) {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(DetailResponse {
            detail: "Google sign-in is not implemented.".to_string(),
        }),
    )
}
