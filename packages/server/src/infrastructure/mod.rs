//! インフラ層
//!
//! - `dto`: ワイヤフォーマットとドメイン型の変換
//! - `message_pusher`: `MessagePusher` の WebSocket 実装

pub mod dto;
pub mod message_pusher;
