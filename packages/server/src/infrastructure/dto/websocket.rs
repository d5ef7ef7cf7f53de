//! WebSocket メッセージの DTO
//!
//! ワイヤフォーマットはすべて `{ "type": string, "payload": object }` のエンベロープ。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ========================================
// Client → Server
// ========================================

/// 受信エンベロープ
///
/// `type` を文字列のまま受け取り、未知の種類と壊れたメッセージを区別できるようにする。
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEnvelope {
    pub r#type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// `join` のペイロード
#[derive(Debug, Default, Deserialize)]
pub struct JoinPayload {
    #[serde(default)]
    pub name: Option<String>,
}

/// クライアントが送信するメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ClientMessage {
    Join {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Accelerate {},
    Restart {},
    StartRace {},
}

// ========================================
// Server → Client
// ========================================

/// サーバーが送信するメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ServerMessage {
    Joined(JoinedPayload),
    /// PlayerId → プレイヤー情報
    PlayersList(BTreeMap<String, PlayerDto>),
    PlayerProgress(PlayerProgressDto),
    GameState(GameStateDto),
    CommandRejected(CommandRejectedDto),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedPayload {
    pub player_id: String,
    pub player_name: String,
    pub game_state: GameStateDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
    pub progress: u8,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgressDto {
    pub id: String,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateDto {
    /// "waiting" | "starting" | "racing" | "finished"
    pub status: String,
    pub countdown: u32,
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_name: Option<String>,
    /// Unix timestamp (milliseconds)
    pub race_start_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRejectedDto {
    pub command: String,
    pub reason: String,
}
