// src/domain/mod.rs
pub mod admin_user_model;
pub mod breach_filter;
pub mod breach_record;
pub mod breach_record_model;
pub mod breach_status;
pub mod display;
pub mod selection;
pub mod session_model;
pub mod severity;
pub mod user_model;
