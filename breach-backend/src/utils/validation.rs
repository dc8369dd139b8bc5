// src/utils/validation.rs

//! DTO間で共通のバリデーション定数と関数

use validator::ValidationError;

/// 氏名・電話番号などの自由入力の制約
pub mod text {
    pub const MIN_LENGTH: u64 = 1;
    pub const MAX_LENGTH: u64 = 255;
}

/// 検索クエリの制約
pub mod query {
    pub const MAX_LENGTH: u64 = 255;
}

/// 空白のみの文字列を弾く
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Value must not be blank".into());
        Err(error)
    } else {
        Ok(())
    }
}
