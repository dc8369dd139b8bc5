// src/utils/password.rs

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::env;
use thiserror::Error;

/// パスワード関連のエラー
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(#[from] argon2::password_hash::Error),

    #[error("Argon2 parameter error: {0}")]
    Argon2Error(#[from] argon2::Error),

    #[error("Weak password: {0}")]
    WeakPassword(String),
}

/// Argon2 設定
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// メモリコスト（KB）
    pub memory_cost: u32,
    /// 時間コスト（反復回数）
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64MB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |key: &str, fallback: u32| {
            env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            memory_cost: read("ARGON2_MEMORY_COST", defaults.memory_cost),
            time_cost: read("ARGON2_TIME_COST", defaults.time_cost),
            parallelism: read("ARGON2_PARALLELISM", defaults.parallelism),
        }
    }

    /// テスト用の軽量パラメータ
    pub fn for_testing() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// パスワードハッシュマネージャー
pub struct PasswordManager {
    argon2: Argon2<'static>,
    min_length: usize,
}

impl PasswordManager {
    pub const DEFAULT_MIN_LENGTH: usize = 8;

    pub fn new(config: Argon2Config) -> Result<Self, PasswordError> {
        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            argon2::Params::new(config.memory_cost, config.time_cost, config.parallelism, None)
                .map_err(PasswordError::Argon2Error)?,
        );

        Ok(Self {
            argon2,
            min_length: Self::DEFAULT_MIN_LENGTH,
        })
    }

    pub fn from_env() -> Result<Self, PasswordError> {
        Self::new(Argon2Config::from_env())
    }

    /// パスワードをハッシュ化
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        if password.chars().count() < self.min_length {
            return Err(PasswordError::WeakPassword(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::HashingError)?;

        Ok(password_hash.to_string())
    }

    /// パスワードを検証（パラメータはハッシュ文字列側のものを使う）
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(PasswordError::HashingError)?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::HashingError(e)),
        }
    }
}
