// tests/common/mock_storage.rs

use async_trait::async_trait;
use breach_backend::error::{AppError, AppResult};
use breach_backend::service::storage_service::{build_public_url, StorageService};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const MOCK_STORAGE_BASE: &str = "http://mock-storage.local";

/// テスト用のモックストレージサービス
#[derive(Default)]
pub struct MockStorageService {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    deleted: Mutex<Vec<(String, String)>>,
    uploads: AtomicUsize,
    /// N回目のアップロードを失敗させる（1始まり）
    fail_on_upload: Option<usize>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on_upload(n: usize) -> Self {
        Self {
            fail_on_upload: Some(n),
            ..Self::default()
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn keys_in(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, key)| key.clone())
            .collect()
    }

    pub fn deleted(&self) -> Vec<(String, String)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn upload(
        &self,
        bucket: &str,
        object_name: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> AppResult<String> {
        let attempt = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_upload == Some(attempt) {
            return Err(AppError::ExternalServiceError(
                "Failed to upload file".to_string(),
            ));
        }

        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), object_name.to_string()), data);
        Ok(object_name.to_string())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        build_public_url(MOCK_STORAGE_BASE, bucket, key)
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        let entry = (bucket.to_string(), key.to_string());
        self.objects.lock().unwrap().remove(&entry);
        self.deleted.lock().unwrap().push(entry);
        Ok(())
    }
}
