// src/api/mod.rs
use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::auth::{cors_layer, security_headers_middleware, ACCESS_TOKEN_COOKIE};
use crate::repository::{AuthRepository, BreachRecordRepository};
use crate::service::{
    admin_service::AdminService, auth_service::AuthService, removal_service::RemovalService,
    search_service::SearchService, storage_service::StorageService,
};
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;

pub mod dto;
pub mod handlers;

use handlers::{
    admin_handler::admin_router, auth_handler::auth_router, search_handler::search_router,
    system_handler::system_router,
};

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<SearchService>,
    pub removal_service: Arc<RemovalService>,
    pub admin_service: Arc<AdminService>,
    pub auth_service: Arc<AuthService>,
    pub cookie_config: CookieConfig,
    pub config: Arc<AppConfig>,
}

/// Cookie設定
#[derive(Clone, Debug)]
pub struct CookieConfig {
    pub access_token_name: String,
    pub secure: bool,
    pub path: String,
}

impl CookieConfig {
    pub fn from_app_config(app_config: &AppConfig) -> Self {
        Self {
            access_token_name: ACCESS_TOKEN_COOKIE.to_string(),
            secure: app_config.security.cookie_secure,
            path: "/".to_string(),
        }
    }
}

impl AppState {
    pub fn new(
        app_config: AppConfig,
        breach_repo: Arc<dyn BreachRecordRepository>,
        auth_repo: Arc<dyn AuthRepository>,
        storage: Arc<dyn StorageService>,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
    ) -> Self {
        Self {
            search_service: Arc::new(SearchService::new(breach_repo.clone())),
            removal_service: Arc::new(RemovalService::new(
                breach_repo.clone(),
                app_config.payment.clone(),
            )),
            admin_service: Arc::new(AdminService::new(breach_repo, storage)),
            auth_service: Arc::new(AuthService::new(auth_repo, password_manager, jwt_manager)),
            cookie_config: CookieConfig::from_app_config(&app_config),
            config: Arc::new(app_config),
        }
    }
}

/// 全ルートとミドルウェアを組み立てる
///
/// レイヤーは後に積んだものほど外側になる。
/// リクエストコンテキストはロギングより外側に置く必要がある。
pub fn router(app_state: AppState) -> Router {
    let body_limit = app_state.config.server.body_limit;
    let cors = cors_layer(&app_state.config.cors_allowed_origins);

    Router::new()
        .merge(system_router(app_state.clone()))
        .merge(search_router(app_state.clone()))
        .merge(auth_router(app_state.clone()))
        .merge(admin_router(app_state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(axum_middleware::from_fn(inject_request_context))
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(cors)
}
