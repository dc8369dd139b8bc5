// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::api::AppState;
use crate::error::AppError;
use crate::service::auth_service::SessionInfo;

/// アクセストークンを保持するCookie名
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// 有効なセッション（管理者とは限らない）
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub SessionInfo);

/// 許可リストで認可済みの管理者セッション
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionInfo);

/// 管理者専用ルートのガード
///
/// トークン検証 → セッション有効性 → 許可リストの順に確認する。
/// 許可リストにないユーザーのセッションはここで失効する。
pub async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookie_jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let token = extract_token(&headers, &cookie_jar).ok_or_else(|| {
        warn!(path = %path, "Missing authentication token");
        AppError::Unauthorized("Authentication required".to_string())
    })?;

    let session = state.auth_service.authorize_admin(&token).await?;
    request.extensions_mut().insert(AdminSession(session));

    Ok(next.run(request).await)
}

impl FromRequestParts<AppState> for AuthenticatedSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_jar = CookieJar::from_headers(&parts.headers);
        let token = extract_token(&parts.headers, &cookie_jar)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let session = state.auth_service.current_session(&token).await?;
        Ok(Self(session))
    }
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Administrator session required".to_string()))
    }
}

/// CORS ミドルウェア設定
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true) // Cookie送信を許可
        .max_age(std::time::Duration::from_secs(3600))
}

/// セキュリティヘッダーミドルウェア
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
    );

    response
}

// --- ヘルパー関数 ---

/// Authorizationヘッダー（Bearer）を優先し、なければCookieから取得
pub fn extract_token(headers: &HeaderMap, cookie_jar: &CookieJar) -> Option<String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    let cookie_token = cookie_jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty());

    auth_header.or(cookie_token)
}

/// クライアントIPを抽出
pub fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    // プロキシ経由の場合は最初のIP
    if let Some(forwarded_for) = headers.get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            return forwarded_str
                .split(',')
                .next()
                .map(|ip| ip.trim().to_string());
        }
    }

    if let Some(real_ip) = headers.get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return Some(ip_str.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_prefers_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer header-token".parse().unwrap());
        headers.insert(header::COOKIE, "access_token=cookie-token".parse().unwrap());
        let jar = CookieJar::from_headers(&headers);

        assert_eq!(
            extract_token(&headers, &jar),
            Some("header-token".to_string())
        );
    }

    #[test]
    fn test_extract_token_falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "access_token=cookie-token".parse().unwrap());
        let jar = CookieJar::from_headers(&headers);

        assert_eq!(
            extract_token(&headers, &jar),
            Some("cookie-token".to_string())
        );
    }

    #[test]
    fn test_extract_token_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        let jar = CookieJar::from_headers(&headers);

        assert_eq!(extract_token(&headers, &jar), None);
    }

    #[test]
    fn test_extract_client_ip() {
        let mut headers = HeaderMap::new();

        headers.insert("X-Forwarded-For", "192.168.1.1, 10.0.0.1".parse().unwrap());
        assert_eq!(extract_client_ip(&headers), Some("192.168.1.1".to_string()));

        headers.clear();
        headers.insert("X-Real-IP", "203.0.113.195".parse().unwrap());
        assert_eq!(
            extract_client_ip(&headers),
            Some("203.0.113.195".to_string())
        );

        headers.clear();
        assert_eq!(extract_client_ip(&headers), None);
    }
}
