// src/service/admin_service.rs

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::breach_filter::BreachFilter;
use crate::domain::breach_record::{BreachRecord, BreachRecordChanges, NewBreachRecord};
use crate::domain::breach_status::BreachStatus;
use crate::domain::selection::Selection;
use crate::error::{AppError, AppResult};
use crate::repository::BreachRecordRepository;
use crate::service::storage_service::{
    object_name_for, StorageService, BREACH_DOCUMENTS_BUCKET, PROFILE_PICTURES_BUCKET,
};
use crate::utils::error_helper::{not_found_error, validation_error};

/// multipartで受け取ったファイル
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// 一括削除の対象指定
#[derive(Debug, Clone, Default)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
    pub select_all: bool,
    /// 表示中の一覧を決めるフィルタ
    pub filter: BreachFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeleteResult {
    pub deleted_count: u64,
    pub deleted_ids: Vec<Uuid>,
}

/// 管理画面向けサービス
pub struct AdminService {
    repo: Arc<dyn BreachRecordRepository>,
    storage: Arc<dyn StorageService>,
}

impl AdminService {
    pub fn new(repo: Arc<dyn BreachRecordRepository>, storage: Arc<dyn StorageService>) -> Self {
        Self { repo, storage }
    }

    /// 全件を作成日時の降順で取得し、フィルタを適用
    pub async fn list(&self, filter: &BreachFilter) -> AppResult<Vec<BreachRecord>> {
        if filter.date_range.is_inverted() {
            return Err(validation_error(
                "date_range",
                "Start date must not be after end date",
            ));
        }

        let records = self.repo.find_all().await?;
        Ok(filter.apply(&records).into_iter().cloned().collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<BreachRecord> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("BreachRecord", &id.to_string(), "admin_service::get"))
    }

    pub async fn change_status(&self, id: Uuid, status: BreachStatus) -> AppResult<BreachRecord> {
        let current = self.get(id).await?;
        if !current.status.can_transition_to(status) {
            return Err(validation_error(
                "status",
                &format!("Cannot change status from {} to {}", current.status, status),
            ));
        }

        let updated = self.repo.update_status(id, status).await?.ok_or_else(|| {
            not_found_error("BreachRecord", &id.to_string(), "admin_service::change_status")
        })?;

        info!(record_id = %id, from = %current.status, to = %status, "Breach record status changed");
        Ok(updated)
    }

    pub async fn update(&self, id: Uuid, changes: BreachRecordChanges) -> AppResult<BreachRecord> {
        if changes.compromised_data.is_empty() {
            return Err(validation_error(
                "compromised_data",
                "At least one compromised data item is required",
            ));
        }

        let updated = self.repo.update(id, changes).await?.ok_or_else(|| {
            not_found_error("BreachRecord", &id.to_string(), "admin_service::update")
        })?;

        info!(record_id = %id, "Breach record updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(not_found_error(
                "BreachRecord",
                &id.to_string(),
                "admin_service::delete",
            ));
        }

        info!(record_id = %id, "Breach record deleted");
        Ok(())
    }

    /// 表示中の一覧（フィルタ適用後）に含まれるものだけを削除する
    pub async fn bulk_delete(&self, request: BulkDeleteRequest) -> AppResult<BulkDeleteResult> {
        let records = self.repo.find_all().await?;
        let displayed: Vec<Uuid> = request
            .filter
            .apply(&records)
            .into_iter()
            .map(|record| record.id)
            .collect();

        let mut selection = Selection::new();
        if request.select_all {
            selection.select_all(displayed.iter().copied());
        } else {
            for id in request.ids {
                if !selection.contains(&id) {
                    selection.toggle(id);
                }
            }
            selection.retain_displayed(&displayed);
        }

        if selection.is_empty() {
            return Ok(BulkDeleteResult {
                deleted_count: 0,
                deleted_ids: Vec::new(),
            });
        }

        let deleted_ids = selection.ids().to_vec();
        let deleted_count = self.repo.delete_many(&deleted_ids).await?;
        selection.clear();

        info!(deleted_count, "Breach records bulk deleted");

        Ok(BulkDeleteResult {
            deleted_count,
            deleted_ids,
        })
    }

    /// 添付ファイルを順にアップロードしてからレコードを登録する
    ///
    /// 途中で失敗した場合はアップロード済みのオブジェクトを削除してからエラーを返す。
    pub async fn create(
        &self,
        mut new_record: NewBreachRecord,
        profile_picture: Option<UploadedFile>,
        documents: Vec<UploadedFile>,
    ) -> AppResult<BreachRecord> {
        if new_record.compromised_data.is_empty() {
            return Err(validation_error(
                "compromised_data",
                "At least one compromised data item is required",
            ));
        }

        let mut uploaded: Vec<(&'static str, String)> = Vec::new();

        let result = async {
            if let Some(file) = profile_picture {
                let url = self
                    .upload_file(PROFILE_PICTURES_BUCKET, file, &mut uploaded)
                    .await?;
                new_record.profile_picture = Some(url);
            }

            for file in documents {
                let url = self
                    .upload_file(BREACH_DOCUMENTS_BUCKET, file, &mut uploaded)
                    .await?;
                new_record.breach_documents.push(url);
            }

            let inserted = self.repo.insert(BreachRecord::from_new(new_record)).await?;
            Ok::<BreachRecord, AppError>(inserted)
        }
        .await;

        match result {
            Ok(record) => {
                info!(
                    record_id = %record.id,
                    attachments = uploaded.len(),
                    "Breach record created"
                );
                Ok(record)
            }
            Err(e) => {
                self.cleanup_uploads(&uploaded).await;
                Err(e)
            }
        }
    }

    async fn upload_file(
        &self,
        bucket: &'static str,
        file: UploadedFile,
        uploaded: &mut Vec<(&'static str, String)>,
    ) -> AppResult<String> {
        let object_name = object_name_for(&file.file_name);
        let key = self
            .storage
            .upload(bucket, &object_name, file.data, &file.content_type)
            .await?;
        let url = self.storage.public_url(bucket, &key);
        uploaded.push((bucket, key));
        Ok(url)
    }

    async fn cleanup_uploads(&self, uploaded: &[(&'static str, String)]) {
        for (bucket, key) in uploaded {
            if let Err(e) = self.storage.delete(bucket, key).await {
                warn!(bucket = %bucket, key = %key, error = %e, "Failed to clean up uploaded object");
            }
        }
    }
}
