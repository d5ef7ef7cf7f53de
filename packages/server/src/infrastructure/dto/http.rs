//! HTTP API の DTO

use serde::{Deserialize, Serialize};

use super::websocket::{GameStateDto, PlayerDto};

/// `GET /api/health` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub message: String,
}

impl HealthDto {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Server is running".to_string(),
        }
    }
}

/// `GET /debug/race` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceDebugDto {
    pub game_state: GameStateDto,
    /// PlayerId 順
    pub players: Vec<PlayerDto>,
    pub spectators: Vec<String>,
}
