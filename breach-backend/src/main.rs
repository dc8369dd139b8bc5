// src/main.rs
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use breach_backend::api::{router, AppState};
use breach_backend::config::Config;
use breach_backend::db::{create_db_pool, run_migrations};
use breach_backend::repository::{PgAuthRepository, PgBreachRecordRepository};
use breach_backend::service::auth_service::{AuthService, SessionEvent};
use breach_backend::service::storage_service::{create_storage_service, StorageConfig};
use breach_backend::utils::jwt::JwtManager;
use breach_backend::utils::password::PasswordManager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "breach_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Breach Backend server...");

    // 設定を読み込む
    let app_config = Config::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        addr = %app_config.server_addr(),
        "Configuration loaded"
    );

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config).await?;
    tracing::info!("Database pool created successfully.");
    run_migrations(&db_pool).await?;

    // オブジェクトストレージ
    let storage = create_storage_service(StorageConfig::from_env()?);

    let jwt_manager = Arc::new(JwtManager::new(app_config.jwt.clone())?);
    let password_manager = Arc::new(PasswordManager::from_env()?);

    let server_addr = app_config.server_addr();
    let app_state = AppState::new(
        app_config,
        Arc::new(PgBreachRecordRepository::new(db_pool.clone())),
        Arc::new(PgAuthRepository::new(db_pool)),
        storage,
        password_manager,
        jwt_manager,
    );

    spawn_session_event_logger(&app_state.auth_service);

    // ルーターの設定
    let app_router = router(app_state);

    // サーバーの起動
    tracing::info!("Router configured. Server listening on {}", server_addr);
    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}

/// セッションイベントをログに流す
fn spawn_session_event_logger(auth_service: &AuthService) {
    let mut events = auth_service.subscribe();

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::SignedIn {
                    user_id,
                    session_id,
                }) => {
                    tracing::info!(%user_id, %session_id, "Session started");
                }
                Ok(SessionEvent::SignedOut {
                    user_id,
                    session_id,
                }) => {
                    tracing::info!(%user_id, %session_id, "Session ended");
                }
                Ok(SessionEvent::ForcedSignOut {
                    user_id,
                    session_id,
                }) => {
                    tracing::warn!(%user_id, %session_id, "Non-admin session revoked");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session event logger lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
