//! ドメイン層のエラー定義

use thiserror::Error;

use super::value_object::{PlayerId, RacePhase};

/// コマンドが現在の状態では受け付けられない理由
///
/// デフォルトのポリシーでは送信者に通知されず、ログに残るだけ。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{0} has not joined the race")]
    UnknownPlayer(PlayerId),

    #[error("cannot accelerate while the race is {0}")]
    NotRacing(RacePhase),

    #[error("{0} joined after the start and is spectating until the next restart")]
    Spectating(PlayerId),

    #[error("cannot start a race while the race is {0}")]
    NotWaiting(RacePhase),

    #[error("cannot start a race without players")]
    NoPlayers,

    #[error("cannot restart while the race is {0}")]
    NotFinished(RacePhase),
}

/// メッセージ送信のエラー
#[derive(Debug, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(PlayerId),

    #[error("Failed to push message: {0}")]
    PushFailed(String),

    #[error("Failed to encode event: {0}")]
    EncodeFailed(#[from] serde_json::Error),
}
