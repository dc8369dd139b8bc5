use std::env;

/// 削除リクエスト用の支払い案内設定
///
/// 表示専用で、支払いの検証は行わない。
#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub payee_id: String,
    pub payee_name: String,
    pub amount: String,
    pub currency: String,
    /// QRコード画像を生成するサービスのURL（末尾にエンコード済みのデータを連結する）
    pub qr_service_url: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            payee_id: "removal-service@upi".to_string(),
            payee_name: "Data Removal Service".to_string(),
            amount: "1999.00".to_string(),
            currency: "INR".to_string(),
            qr_service_url: "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data="
                .to_string(),
        }
    }
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            payee_id: env::var("PAYMENT_PAYEE_ID").unwrap_or(defaults.payee_id),
            payee_name: env::var("PAYMENT_PAYEE_NAME").unwrap_or(defaults.payee_name),
            amount: env::var("PAYMENT_AMOUNT").unwrap_or(defaults.amount),
            currency: env::var("PAYMENT_CURRENCY").unwrap_or(defaults.currency),
            qr_service_url: env::var("PAYMENT_QR_SERVICE_URL").unwrap_or(defaults.qr_service_url),
        };

        tracing::info!(
            payee_id = %config.payee_id,
            amount = %config.amount,
            currency = %config.currency,
            "Payment prompt configured"
        );

        config
    }
}
