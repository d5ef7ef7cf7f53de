//! ドメイン層
//!
//! - `value_object`: PlayerId, Progress, RacePhase など
//! - `entity`: Player と参加者ストア
//! - `race`: レースのステートマシン（集約）
//! - `connection`: 接続の生存フラグのサイドテーブル
//! - `command` / `event`: 受信コマンドと送信イベント
//! - `message_pusher`: メッセージ通知の抽象化

pub mod command;
pub mod connection;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod race;
pub mod value_object;

pub use command::Command;
pub use connection::{ConnectionTable, ProbeSweep};
pub use entity::{Player, PlayerProgress, PlayerStore};
pub use error::{MessagePushError, Rejection};
pub use event::ServerEvent;
pub use message_pusher::{MessagePusher, OutboundFrame, PusherChannel};
pub use race::{
    AccelerateOutcome, CountdownEpoch, CountdownTick, Departure, JoinOutcome, Race, RaceSettings,
    RaceSnapshot,
};
pub use value_object::{CarColor, PlayerId, PlayerName, Progress, RacePhase, Timestamp};
