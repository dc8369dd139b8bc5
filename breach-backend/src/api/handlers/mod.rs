// src/api/handlers/mod.rs
pub mod admin_handler;
pub mod auth_handler;
pub mod search_handler;
pub mod system_handler;
