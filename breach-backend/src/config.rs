// src/config.rs
pub mod app;
pub mod payment;

pub use app::{AppConfig, SecurityConfig, ServerConfig};
pub use payment::PaymentConfig;

// Backward compatibility
pub type Config = AppConfig;
