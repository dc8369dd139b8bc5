// src/domain/display.rs

//! 状態・重大度を表示用のトーンに分類する

use serde::{Deserialize, Serialize};

use super::breach_status::BreachStatus;
use super::severity::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayTone {
    Danger,
    Warning,
    Success,
    Neutral,
}

/// high→danger, medium→warning, low→success, それ以外→neutral
pub fn severity_tone(severity: &str) -> DisplayTone {
    match Severity::from_str(severity) {
        Some(Severity::High) => DisplayTone::Danger,
        Some(Severity::Medium) => DisplayTone::Warning,
        Some(Severity::Low) => DisplayTone::Success,
        None => DisplayTone::Neutral,
    }
}

/// 未知の状態は pending と同じ warning に寄せる
pub fn status_tone(status: &str) -> DisplayTone {
    match BreachStatus::from_str(status) {
        Some(BreachStatus::Approved) => DisplayTone::Success,
        Some(BreachStatus::Rejected) => DisplayTone::Danger,
        Some(BreachStatus::Pending) | None => DisplayTone::Warning,
    }
}

pub fn severity_label(severity: &str) -> String {
    Severity::from_str(severity)
        .map_or_else(|| severity.trim().to_string(), |s| s.display_name().to_string())
}

pub fn status_label(status: &str) -> String {
    BreachStatus::from_str(status)
        .map_or_else(|| status.trim().to_string(), |s| s.display_name().to_string())
}
