// src/api/dto/auth_dto.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::service::auth_service::SessionInfo;

/// ログインリクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionInfo> for SessionResponse {
    fn from(session: SessionInfo) -> Self {
        Self {
            session_id: session.session_id,
            user_id: session.user_id,
            email: session.email,
            is_admin: session.is_admin,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninResponse {
    pub access_token: String,
    pub token_type: String,
    pub session: SessionResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignoutResponse {
    pub message: String,
}
