// src/service/removal_service.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::config::PaymentConfig;
use crate::error::AppResult;
use crate::repository::BreachRecordRepository;
use crate::utils::error_helper::{external_service_error, not_found_error, validation_error};

/// 表示専用の支払い案内
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaymentPrompt {
    pub payee_id: String,
    pub payee_name: String,
    pub amount: String,
    pub currency: String,
    pub deep_link: String,
    pub qr_code_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemovalReceipt {
    pub updated_records: u64,
    pub request_date: DateTime<Utc>,
}

/// 削除依頼サービス
///
/// 支払いの検証はしない。完了通知を受けたら (email, phone) が一致する
/// すべてのレコードに依頼フラグと日時を記録する。
pub struct RemovalService {
    repo: Arc<dyn BreachRecordRepository>,
    payment: PaymentConfig,
}

impl RemovalService {
    pub fn new(repo: Arc<dyn BreachRecordRepository>, payment: PaymentConfig) -> Self {
        Self { repo, payment }
    }

    pub fn payment_prompt(&self) -> PaymentPrompt {
        let deep_link = format!(
            "upi://pay?pa={}&pn={}&am={}&cu={}",
            urlencoding::encode(&self.payment.payee_id),
            urlencoding::encode(&self.payment.payee_name),
            urlencoding::encode(&self.payment.amount),
            urlencoding::encode(&self.payment.currency),
        );
        let qr_code_url = format!(
            "{}{}",
            self.payment.qr_service_url,
            urlencoding::encode(&deep_link)
        );

        PaymentPrompt {
            payee_id: self.payment.payee_id.clone(),
            payee_name: self.payment.payee_name.clone(),
            amount: self.payment.amount.clone(),
            currency: self.payment.currency.clone(),
            deep_link,
            qr_code_url,
        }
    }

    /// 繰り返し呼ぶと依頼日時が更新される
    pub async fn complete(&self, email: &str, phone: &str) -> AppResult<RemovalReceipt> {
        if email.trim().is_empty() {
            return Err(validation_error("email", "Email is required"));
        }
        if phone.trim().is_empty() {
            return Err(validation_error("phone", "Phone is required"));
        }

        let now = Utc::now();
        let updated_records = self
            .repo
            .mark_removal_requested(email, phone, now)
            .await
            .map_err(|e| {
                external_service_error(
                    e,
                    "removal_service::complete",
                    "Failed to record removal request",
                )
            })?;

        if updated_records == 0 {
            return Err(not_found_error(
                "BreachRecord",
                &format!("{} / {}", email, phone),
                "removal_service::complete",
            ));
        }

        info!(updated_records, "Removal request recorded");

        Ok(RemovalReceipt {
            updated_records,
            request_date: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::repository::InMemoryBreachRecordRepository;

    #[test]
    fn test_payment_prompt_builds_deep_link_and_qr() {
        let service = RemovalService::new(
            Arc::new(InMemoryBreachRecordRepository::new()),
            PaymentConfig::default(),
        );

        let prompt = service.payment_prompt();

        assert_eq!(
            prompt.deep_link,
            "upi://pay?pa=removal-service%40upi&pn=Data%20Removal%20Service&am=1999.00&cu=INR"
        );
        assert!(prompt
            .qr_code_url
            .starts_with("https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=upi%3A%2F%2Fpay%3Fpa%3D"));
    }

    #[tokio::test]
    async fn test_complete_without_match_is_not_found() {
        let service = RemovalService::new(
            Arc::new(InMemoryBreachRecordRepository::new()),
            PaymentConfig::default(),
        );

        let result = service.complete("a@example.com", "555").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
