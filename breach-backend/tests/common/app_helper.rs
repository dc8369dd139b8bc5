// tests/common/app_helper.rs

use axum::{http::StatusCode, Router};
use breach_backend::{
    api::{router, AppState},
    config::AppConfig,
    domain::breach_record::BreachRecord,
    repository::{AuthRepository, InMemoryAuthRepository, InMemoryBreachRecordRepository},
    utils::{
        jwt::JwtManager,
        password::{Argon2Config, PasswordManager},
    },
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::common::{self, mock_storage::MockStorageService, request, test_data};

/// インメモリのリポジトリで組み立てたテスト用アプリ
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub breach_repo: Arc<InMemoryBreachRecordRepository>,
    pub auth_repo: Arc<InMemoryAuthRepository>,
    pub storage: Arc<MockStorageService>,
    pub password_manager: Arc<PasswordManager>,
}

pub fn setup_app(records: Vec<BreachRecord>) -> TestApp {
    setup_app_with_storage(records, MockStorageService::new())
}

pub fn setup_app_with_storage(records: Vec<BreachRecord>, storage: MockStorageService) -> TestApp {
    common::init_test_env();

    let app_config = AppConfig::for_testing();
    let breach_repo = Arc::new(InMemoryBreachRecordRepository::with_records(records));
    let auth_repo = Arc::new(InMemoryAuthRepository::new());
    let storage = Arc::new(storage);
    let password_manager = Arc::new(PasswordManager::new(Argon2Config::for_testing()).unwrap());
    let jwt_manager = Arc::new(JwtManager::new(app_config.jwt.clone()).unwrap());

    let state = AppState::new(
        app_config,
        breach_repo.clone(),
        auth_repo.clone(),
        storage.clone(),
        password_manager.clone(),
        jwt_manager,
    );

    TestApp {
        router: router(state.clone()),
        state,
        breach_repo,
        auth_repo,
        storage,
        password_manager,
    }
}

impl TestApp {
    /// ユーザーを登録する（admin=trueなら許可リストにも追加）
    pub async fn create_user(&self, email: &str, password: &str, admin: bool) -> uuid::Uuid {
        let hash = self.password_manager.hash_password(password).unwrap();
        let user = self.auth_repo.create_user(email, &hash).await.unwrap();
        if admin {
            self.auth_repo.grant_admin(user.id).await.unwrap();
        }
        user.id
    }

    /// サインインしてアクセストークンを返す
    pub async fn sign_in(&self, email: &str, password: &str) -> String {
        let response = self
            .router
            .clone()
            .oneshot(request::json_request(
                "POST",
                "/auth/signin",
                None,
                &json!({ "email": email, "password": password }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = request::body_json(response).await;
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    /// 管理者を作成してトークンを取得
    pub async fn admin_token(&self) -> String {
        self.create_user(test_data::ADMIN_EMAIL, test_data::TEST_PASSWORD, true)
            .await;
        self.sign_in(test_data::ADMIN_EMAIL, test_data::TEST_PASSWORD)
            .await
    }

    /// 許可リストにないユーザーのトークン
    pub async fn user_token(&self) -> String {
        self.create_user(test_data::USER_EMAIL, test_data::TEST_PASSWORD, false)
            .await;
        self.sign_in(test_data::USER_EMAIL, test_data::TEST_PASSWORD)
            .await
    }
}
