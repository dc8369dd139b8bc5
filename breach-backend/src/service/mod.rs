// src/service/mod.rs
pub mod admin_service;
pub mod auth_service;
pub mod removal_service;
pub mod search_service;
pub mod storage_service;
