//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（`PusherChannel`）を管理
//! - `ServerEvent` をワイヤフォーマットにシリアライズして送信（push_to, broadcast）
//! - 生存確認のプローブと強制切断
//!
//! WebSocket の受付と送信キューの生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、送信だけを担当します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{MessagePushError, MessagePusher, OutboundFrame, PlayerId, PusherChannel, ServerEvent},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 開いている接続の送信キュー
    clients: Arc<Mutex<HashMap<PlayerId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<PlayerId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
        Ok(serde_json::to_string(&ServerMessage::from(event))?)
    }

    async fn send_frame(
        &self,
        player_id: &PlayerId,
        frame: OutboundFrame,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(player_id)
            .ok_or(MessagePushError::ClientNotFound(*player_id))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, player_id: PlayerId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(player_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", player_id);
    }

    async fn unregister_client(&self, player_id: &PlayerId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(player_id).is_some() {
            tracing::debug!("Connection '{}' unregistered from MessagePusher", player_id);
        }
    }

    async fn push_to(
        &self,
        player_id: &PlayerId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let text = Self::encode(event)?;
        self.send_frame(player_id, OutboundFrame::Text(text)).await?;
        tracing::debug!("Pushed '{}' to '{}'", event.event_type(), player_id);
        Ok(())
    }

    async fn broadcast(&self, event: &ServerEvent) -> Result<(), MessagePushError> {
        // 全接続で同じフレームを共有するため、シリアライズは 1 回だけ
        let text = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for (player_id, sender) in clients.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(OutboundFrame::Text(text.clone())) {
                tracing::warn!(
                    "Failed to push '{}' to '{}': {}",
                    event.event_type(),
                    player_id,
                    e
                );
            }
        }
        tracing::debug!(
            "Broadcasted '{}' to {} connection(s)",
            event.event_type(),
            clients.len()
        );

        Ok(())
    }

    async fn probe(&self, player_id: &PlayerId) -> Result<(), MessagePushError> {
        self.send_frame(player_id, OutboundFrame::Ping).await
    }

    async fn terminate(&self, player_id: &PlayerId) {
        let mut clients = self.clients.lock().await;
        if let Some(sender) = clients.remove(player_id) {
            // 受信側がすでに終了していれば送れなくてよい
            let _ = sender.send(OutboundFrame::Close);
            tracing::debug!("Connection '{}' terminated", player_id);
        }
    }
}
