//! UseCase テスト用のヘルパー

use std::sync::Mutex as StdMutex;

use async_trait::async_trait;

use crate::domain::{MessagePushError, MessagePusher, PlayerId, PusherChannel, ServerEvent};

/// 送信されたイベントを順番どおりに記録する
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pushed {
    To(PlayerId, ServerEvent),
    All(ServerEvent),
    Probe(PlayerId),
    Terminate(PlayerId),
}

/// 送信内容を記録するだけの MessagePusher
#[derive(Debug, Default)]
pub struct RecordingPusher {
    log: StdMutex<Vec<Pushed>>,
    registered: StdMutex<Vec<PlayerId>>,
}

impl RecordingPusher {
    /// これまでの記録を取り出してクリアする
    pub fn take(&self) -> Vec<Pushed> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }

    /// ブロードキャストされたイベントだけを取り出す
    pub fn take_broadcasts(&self) -> Vec<ServerEvent> {
        self.take()
            .into_iter()
            .filter_map(|pushed| match pushed {
                Pushed::All(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn registered(&self) -> Vec<PlayerId> {
        self.registered.lock().unwrap().clone()
    }

    fn record(&self, pushed: Pushed) {
        self.log.lock().unwrap().push(pushed);
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, player_id: PlayerId, _sender: PusherChannel) {
        self.registered.lock().unwrap().push(player_id);
    }

    async fn unregister_client(&self, player_id: &PlayerId) {
        self.registered.lock().unwrap().retain(|id| id != player_id);
    }

    async fn push_to(
        &self,
        player_id: &PlayerId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        self.record(Pushed::To(*player_id, event.clone()));
        Ok(())
    }

    async fn broadcast(&self, event: &ServerEvent) -> Result<(), MessagePushError> {
        self.record(Pushed::All(event.clone()));
        Ok(())
    }

    async fn probe(&self, player_id: &PlayerId) -> Result<(), MessagePushError> {
        self.record(Pushed::Probe(*player_id));
        Ok(())
    }

    async fn terminate(&self, player_id: &PlayerId) {
        self.record(Pushed::Terminate(*player_id));
        self.registered.lock().unwrap().retain(|id| id != player_id);
    }
}
