//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Form fields accepted by `POST /login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body returned by `POST /login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponseDto {
    pub username: String,
    pub token: String,
    /// Unix timestamp (seconds)
    pub expires_at: i64,
}

/// Body returned by `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDto {
    pub connections: usize,
    pub history_len: usize,
    pub history_capacity: usize,
}
