// src/service/storage_service.rs

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, Config};
use chrono::Utc;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::utils::error_helper::external_service_error;

/// プロフィール画像のバケット
pub const PROFILE_PICTURES_BUCKET: &str = "profile-pictures";
/// 証拠書類のバケット
pub const BREACH_DOCUMENTS_BUCKET: &str = "breach-documents";

/// ストレージプロバイダーの種類
#[derive(Debug, Clone, PartialEq)]
pub enum StorageProvider {
    MinIO,
    R2,
}

impl StorageProvider {
    /// 環境変数からプロバイダーを判定
    pub fn from_env() -> Self {
        match std::env::var("STORAGE_PROVIDER")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "r2" | "cloudflare" | "cloudflare-r2" => Self::R2,
            "minio" => Self::MinIO,
            _ => {
                // ENVIRONMENTに基づくデフォルト選択
                match std::env::var("ENVIRONMENT")
                    .unwrap_or_else(|_| "development".to_string())
                    .to_lowercase()
                    .as_str()
                {
                    "production" | "staging" => Self::R2,
                    _ => Self::MinIO,
                }
            }
        }
    }
}

/// オブジェクトストレージのトレイト定義
#[async_trait]
pub trait StorageService: Send + Sync {
    /// オブジェクトを保存し、保存したキーを返す
    async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String>;

    /// 公開URLを組み立てる
    fn public_url(&self, bucket: &str, key: &str) -> String;

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()>;
}

/// S3互換ストレージサービスの実装
pub struct S3StorageService {
    client: Client,
    public_base_url: String,
}

impl S3StorageService {
    pub fn new(config: StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "storage_service",
        );

        let mut s3_config_builder = Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials);

        match config.provider {
            StorageProvider::MinIO => {
                // MinIOはpath styleを強制
                s3_config_builder = s3_config_builder.force_path_style(true);
            }
            StorageProvider::R2 => {}
        }

        Self {
            client: Client::from_conf(s3_config_builder.build()),
            public_base_url: config.public_base_url,
        }
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(object_name)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                external_service_error(e, "s3_storage_service::upload", "Failed to upload file")
            })?;

        Ok(object_name.to_string())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        build_public_url(&self.public_base_url, bucket, key)
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                external_service_error(e, "s3_storage_service::delete", "Failed to delete file")
            })?;

        Ok(())
    }
}

/// ストレージ設定
#[derive(Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// 公開URLの基点（未設定ならendpoint）
    pub public_base_url: String,
}

impl StorageConfig {
    pub fn from_env() -> AppResult<Self> {
        let provider = StorageProvider::from_env();
        tracing::info!("Storage provider: {:?}", provider);

        let required = |key: &str| {
            std::env::var(key)
                .map_err(|_| AppError::InternalServerError(format!("{} not set", key)))
        };

        let endpoint = required("STORAGE_ENDPOINT")?;
        let public_base_url =
            std::env::var("STORAGE_PUBLIC_URL").unwrap_or_else(|_| endpoint.clone());

        Ok(Self {
            provider,
            region: required("STORAGE_REGION")?,
            access_key: required("STORAGE_ACCESS_KEY")?,
            secret_key: required("STORAGE_SECRET_KEY")?,
            endpoint,
            public_base_url,
        })
    }
}

pub fn create_storage_service(config: StorageConfig) -> Arc<dyn StorageService> {
    // MinIOもR2もS3互換なので同じ実装を使用
    Arc::new(S3StorageService::new(config))
}

/// `{base}/{bucket}/{key}`（キーはURLエンコード）
pub fn build_public_url(base: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        bucket,
        urlencoding::encode(key)
    )
}

/// パス区切りなどを除いたファイル名
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '.' || *c == '-' || *c == '_' || *c == ' ')
        .collect::<String>()
        .trim()
        .trim_start_matches('.')
        .to_string();

    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// `{ミリ秒}-{ファイル名}` 形式のオブジェクト名
pub fn object_name_for(file_name: &str) -> String {
    format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_filename(file_name)
    )
}
