//! UseCase: 接続の登録とハートビート
//!
//! 接続ごとの生存フラグは `ConnectionTable` が持ち、
//! 切断時の参加者の離脱は `SessionController` に委ねる。

use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::domain::{ConnectionTable, MessagePusher, PlayerId, PusherChannel};

use super::SessionController;

/// 接続管理のユースケース
pub struct ConnectionRegistry {
    table: Mutex<ConnectionTable>,
    session: Arc<SessionController>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectionRegistry {
    pub fn new(session: Arc<SessionController>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            table: Mutex::new(ConnectionTable::new()),
            session,
            message_pusher,
        }
    }

    /// 新しい接続を登録し、送信チャンネルをブロードキャスト対象に加える
    pub async fn register(&self, sender: PusherChannel) -> PlayerId {
        let player_id = self.table.lock().await.register();
        self.message_pusher.register_client(player_id, sender).await;
        tracing::info!("Connection '{}' registered", player_id);
        player_id
    }

    /// 受信があった接続を生存扱いにする
    pub async fn mark_alive(&self, player_id: &PlayerId) {
        self.table.lock().await.mark_alive(player_id);
    }

    /// 全接続を 1 回走査する
    ///
    /// 前回のプローブに応答しなかった接続は強制的に閉じて離脱させ、
    /// それ以外の接続にはプローブを送る。
    pub async fn probe_all(&self) {
        let sweep = self.table.lock().await.sweep();

        for player_id in sweep.dead {
            tracing::warn!("Connection '{}' did not answer the probe, closing", player_id);
            self.message_pusher.terminate(&player_id).await;
            self.session.leave(player_id).await;
        }

        for player_id in sweep.probed {
            if let Err(e) = self.message_pusher.probe(&player_id).await {
                tracing::debug!("Failed to probe '{}': {}", player_id, e);
            }
        }
    }

    /// 接続を取り除き、参加者を離脱させる（冪等）
    pub async fn unregister(&self, player_id: PlayerId) {
        let removed = self.table.lock().await.unregister(&player_id);
        self.message_pusher.unregister_client(&player_id).await;
        self.session.leave(player_id).await;
        if removed {
            tracing::info!("Connection '{}' unregistered", player_id);
        }
    }

    /// 一定間隔で `probe_all` を実行するタスクを起動する
    pub fn spawn_probe_loop(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // 最初の tick は即座に完了する
            ticker.tick().await;
            loop {
                ticker.tick().await;
                registry.probe_all().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ServerConfig,
        domain::ServerEvent,
        usecase::test_support::{Pushed, RecordingPusher},
    };
    use dashline_shared::time::FixedClock;
    use tokio::sync::mpsc;

    fn create_registry() -> (Arc<ConnectionRegistry>, Arc<SessionController>, Arc<RecordingPusher>) {
        let pusher = Arc::new(RecordingPusher::default());
        let session = Arc::new(SessionController::new(
            &ServerConfig::default(),
            pusher.clone(),
            Arc::new(FixedClock::new(0)),
        ));
        let registry = Arc::new(ConnectionRegistry::new(session.clone(), pusher.clone()));
        (registry, session, pusher)
    }

    #[tokio::test]
    async fn test_register_allocates_identities_in_order() {
        // テスト項目: 登録ごとに新しい PlayerId が採番され、送信チャンネルが登録される
        // given (前提条件):
        let (registry, _session, pusher) = create_registry();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        let first = registry.register(tx1).await;
        let second = registry.register(tx2).await;

        // then (期待する結果):
        assert_eq!(first, PlayerId::new(1));
        assert_eq!(second, PlayerId::new(2));
        assert_eq!(pusher.registered(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_probe_all_closes_silent_connection_after_two_sweeps() {
        // テスト項目: 応答のない接続は 1 回目でプローブされ、2 回目で閉じられて参加者が消える
        // given (前提条件):
        let (registry, session, pusher) = create_registry();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = registry.register(tx).await;
        session.join(id, Some("Silent")).await;
        pusher.take();

        // when (操作):
        registry.probe_all().await;
        let first = pusher.take();
        registry.probe_all().await;
        let second = pusher.take();

        // then (期待する結果):
        assert_eq!(first, vec![Pushed::Probe(id)]);
        assert_eq!(second[0], Pushed::Terminate(id));
        assert!(second.contains(&Pushed::All(ServerEvent::PlayersList(vec![]))));
        assert!(session.race().await.players().is_empty());
        assert!(pusher.registered().is_empty());
    }

    #[tokio::test]
    async fn test_traffic_keeps_connection_alive() {
        // テスト項目: プローブ間に受信があった接続は閉じられない
        // given (前提条件):
        let (registry, _session, pusher) = create_registry();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = registry.register(tx).await;

        // when (操作):
        registry.probe_all().await;
        registry.mark_alive(&id).await;
        registry.probe_all().await;

        // then (期待する結果):
        assert_eq!(pusher.take(), vec![Pushed::Probe(id), Pushed::Probe(id)]);
        assert_eq!(pusher.registered(), vec![id]);
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        // テスト項目: 同じ接続を 2 回取り除いても離脱の通知は 1 回だけ
        // given (前提条件):
        let (registry, session, pusher) = create_registry();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = registry.register(tx).await;
        session.join(id, None).await;
        pusher.take();

        // when (操作):
        registry.unregister(id).await;
        registry.unregister(id).await;

        // then (期待する結果):
        let broadcasts = pusher.take_broadcasts();
        assert_eq!(broadcasts.len(), 2); // playersList と gameState(waiting)
        assert_eq!(broadcasts[0], ServerEvent::PlayersList(vec![]));
        assert!(pusher.registered().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_loop_runs_on_period() {
        // テスト項目: プローブループは指定した間隔ごとに走査する
        // given (前提条件):
        let (registry, _session, pusher) = create_registry();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = registry.register(tx).await;

        // when (操作):
        let handle = registry.spawn_probe_loop(Duration::from_secs(30));
        tokio::time::sleep(Duration::from_secs(45)).await;
        handle.abort();

        // then (期待する結果):
        assert_eq!(pusher.take(), vec![Pushed::Probe(id)]);
    }
}
