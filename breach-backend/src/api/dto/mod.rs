// src/api/dto/mod.rs
pub mod auth_dto;
pub mod breach_dto;
pub mod search_dto;
