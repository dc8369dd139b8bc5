// src/api/handlers/auth_handler.rs

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::api::dto::auth_dto::{SessionResponse, SigninRequest, SigninResponse, SignoutResponse};
use crate::api::{AppState, CookieConfig};
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedSession;
use crate::service::auth_service::SignInResult;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;

/// ログイン
pub async fn signin_handler(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SigninRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "auth_handler::signin"))?;

    info!(email = %payload.email, "User signin attempt");

    let result = app_state
        .auth_service
        .sign_in(&payload.email, &payload.password)
        .await?;

    let jar = jar.add(access_token_cookie(&result, &app_state.cookie_config));
    let response = SigninResponse {
        access_token: result.access_token,
        token_type: "Bearer".to_string(),
        session: result.session.into(),
    };

    Ok((jar, ApiResponse::success(response)))
}

/// 現在のセッション
pub async fn session_handler(
    AuthenticatedSession(session): AuthenticatedSession,
) -> AppResult<impl IntoResponse> {
    Ok(ApiResponse::success(SessionResponse::from(session)))
}

/// ログアウト（セッションを失効させCookieを削除）
pub async fn signout_handler(
    State(app_state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    app_state.auth_service.sign_out(&session).await?;

    let jar = jar.add(expired_access_token_cookie(&app_state.cookie_config));

    Ok((
        jar,
        ApiResponse::success(SignoutResponse {
            message: "Successfully signed out".to_string(),
        }),
    ))
}

pub fn auth_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/signin", post(signin_handler))
        .route("/auth/session", get(session_handler))
        .route("/auth/signout", post(signout_handler))
        .with_state(app_state)
}

// --- ヘルパー関数 ---

fn access_token_cookie(result: &SignInResult, config: &CookieConfig) -> Cookie<'static> {
    let max_age = (result.session.expires_at - Utc::now()).num_seconds().max(0);

    Cookie::build((config.access_token_name.clone(), result.access_token.clone()))
        .path(config.path.clone())
        .secure(config.secure)
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// 削除用の期限切れCookie
fn expired_access_token_cookie(config: &CookieConfig) -> Cookie<'static> {
    Cookie::build((config.access_token_name.clone(), String::new()))
        .path(config.path.clone())
        .secure(config.secure)
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build()
}
