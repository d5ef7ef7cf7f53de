//! MessagePusher trait 定義
//!
//! ドメイン層が必要とするメッセージ通知のインターフェースを定義します。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, PlayerId, ServerEvent};

/// 1 接続の送信キューに積まれるフレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// シリアライズ済みのイベント
    Text(String),
    /// 生存確認のプローブ
    Ping,
    /// 接続を強制的に閉じる
    Close,
}

/// 1 接続分の送信チャンネル
///
/// unbounded なので、送信側が遅い接続を待ってブロックすることはない。
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、トランスポートの具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, player_id: PlayerId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, player_id: &PlayerId);

    /// 特定の接続にイベントを送信（ユニキャスト）
    async fn push_to(
        &self,
        player_id: &PlayerId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 開いている全ての接続にイベントを送信（ブロードキャスト）
    ///
    /// 一部の接続への送信失敗は残りの接続への送信を妨げない。
    async fn broadcast(&self, event: &ServerEvent) -> Result<(), MessagePushError>;

    /// 生存確認のプローブを送信
    async fn probe(&self, player_id: &PlayerId) -> Result<(), MessagePushError>;

    /// 接続を強制的に閉じ、送信チャンネルを破棄する
    async fn terminate(&self, player_id: &PlayerId);
}
