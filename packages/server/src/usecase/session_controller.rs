//! UseCase: レースセッションの制御
//!
//! セッションの状態（`Race`）はこの構造体の Mutex の内側にだけ存在する。
//! 各操作はロックを保持したまま状態を遷移させ、イベントを `MessagePusher` に渡す。
//! 送信キューは unbounded なので、ロック中にネットワーク I/O を待つことはない。
//! これにより、全ての接続がイベントを状態遷移と同じ順序で受け取る。
//!
//! カウントダウンは別タスクで進み、同じ Mutex を通して状態に触れる。
//! 古いカウントダウンの tick は `CountdownEpoch` で判別して無視する。

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use dashline_shared::time::Clock;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    config::{InvalidCommandPolicy, ServerConfig},
    domain::{
        AccelerateOutcome, Command, CountdownEpoch, CountdownTick, Departure, JoinOutcome,
        MessagePusher, PlayerId, Race, Rejection, ServerEvent, Timestamp,
    },
};

/// レースセッションのユースケース
pub struct SessionController {
    race: Mutex<Race>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    policy: InvalidCommandPolicy,
    countdown_tick: Duration,
    /// 実行中のカウントダウンタスク
    countdown_task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionController {
    pub fn new(
        config: &ServerConfig,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            race: Mutex::new(Race::new(config.race)),
            message_pusher,
            clock,
            policy: config.invalid_command_policy,
            countdown_tick: config.countdown_tick,
            countdown_task: Mutex::new(None),
        }
    }

    /// 現在のセッション状態のコピー
    pub async fn race(&self) -> Race {
        self.race.lock().await.clone()
    }

    /// 受信したコマンドを実行する
    ///
    /// 受け付けられなかったコマンドはポリシーに従って処理する。
    pub async fn handle_command(self: &Arc<Self>, player_id: PlayerId, command: Command) {
        let result = match &command {
            Command::Join { name } => {
                self.join(player_id, name.as_deref()).await;
                Ok(())
            }
            Command::Accelerate => self.accelerate(player_id).await,
            Command::Restart => self.restart(player_id).await,
            Command::StartRace => self.start_race().await,
        };

        if let Err(rejection) = result {
            tracing::debug!(
                "Ignoring '{}' from '{}': {}",
                command.name(),
                player_id,
                rejection
            );
            self.report_invalid(player_id, command.name(), &rejection.to_string())
                .await;
        }
    }

    /// `reject` ポリシーのときだけ、送信者に `commandRejected` を返す
    pub async fn report_invalid(&self, player_id: PlayerId, command: &str, reason: &str) {
        if self.policy != InvalidCommandPolicy::Reject {
            return;
        }
        let event = ServerEvent::CommandRejected {
            command: command.to_string(),
            reason: reason.to_string(),
        };
        self.push_to(&player_id, &event).await;
    }

    /// 参加（同じ接続からの再参加は名前の変更のみ）
    pub async fn join(&self, player_id: PlayerId, requested_name: Option<&str>) {
        let mut race = self.race.lock().await;
        let outcome = race.join(player_id, requested_name);

        let player = outcome.player();
        match &outcome {
            JoinOutcome::Joined(_) => tracing::info!(
                "'{}' joined as '{}' ({})",
                player.id,
                player.name,
                player.color.as_str()
            ),
            JoinOutcome::Renamed(_) => {
                tracing::info!("'{}' renamed to '{}'", player.id, player.name)
            }
        }

        let ack = ServerEvent::Joined {
            player_id,
            player_name: player.name.clone(),
            game_state: race.snapshot(),
        };
        self.push_to(&player_id, &ack).await;
        self.broadcast(ServerEvent::PlayersList(race.players().list()))
            .await;
    }

    pub async fn accelerate(&self, player_id: PlayerId) -> Result<(), Rejection> {
        let mut race = self.race.lock().await;
        let event = match race.accelerate(player_id)? {
            AccelerateOutcome::Advanced(progress) => ServerEvent::PlayerProgress(progress),
            AccelerateOutcome::Finished { winner } => {
                tracing::info!("'{}' won the race", winner);
                ServerEvent::GameState(race.snapshot())
            }
        };

        self.broadcast(event).await;
        Ok(())
    }

    /// カウントダウンを開始し、tick タスクを起動する
    pub async fn start_race(self: &Arc<Self>) -> Result<(), Rejection> {
        let mut race = self.race.lock().await;
        let epoch = race.start_countdown()?;
        // ロック順は leave と同じく race → countdown_task
        let previous = self
            .countdown_task
            .lock()
            .await
            .replace(self.spawn_countdown(epoch));
        if let Some(previous) = previous {
            previous.abort();
        }

        let snapshot = race.snapshot();
        tracing::info!("Countdown started from {}", snapshot.countdown);
        self.broadcast(ServerEvent::GameState(snapshot)).await;
        Ok(())
    }

    pub async fn restart(&self, player_id: PlayerId) -> Result<(), Rejection> {
        let mut race = self.race.lock().await;
        race.restart()?;

        tracing::info!("'{}' restarted the session", player_id);
        self.broadcast(ServerEvent::GameState(race.snapshot())).await;
        self.broadcast(ServerEvent::PlayersList(race.players().list()))
            .await;
        Ok(())
    }

    /// 参加者の離脱（切断）
    ///
    /// 参加していない接続の場合は何もしない。
    pub async fn leave(&self, player_id: PlayerId) {
        let mut race = self.race.lock().await;
        let Departure::Left { back_to_waiting } = race.remove_player(&player_id) else {
            return;
        };
        if back_to_waiting && let Some(task) = self.countdown_task.lock().await.take() {
            task.abort();
        }

        tracing::info!("'{}' left the race", player_id);
        self.broadcast(ServerEvent::PlayersList(race.players().list()))
            .await;
        if back_to_waiting {
            tracing::info!("Session reset to waiting");
            self.broadcast(ServerEvent::GameState(race.snapshot())).await;
        }
    }

    fn spawn_countdown(self: &Arc<Self>, epoch: CountdownEpoch) -> JoinHandle<()> {
        // ハンドルは controller 自身が保持するので Weak で参照する
        let controller: Weak<Self> = Arc::downgrade(self);
        let period = self.countdown_tick;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // 最初の tick は即座に完了する
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                if !controller.tick_countdown(epoch).await {
                    break;
                }
            }
        })
    }

    /// カウントダウンを 1 つ進める。続行する場合は `true`
    async fn tick_countdown(&self, epoch: CountdownEpoch) -> bool {
        let mut race = self.race.lock().await;
        let now = Timestamp::new(self.clock.now_millis());
        let tick = race.tick_countdown(epoch, now);

        match tick {
            CountdownTick::Stale => {
                tracing::debug!("Stale countdown tick ignored");
                false
            }
            CountdownTick::Counting(remaining) => {
                tracing::debug!("Countdown: {}", remaining);
                self.broadcast(ServerEvent::GameState(race.snapshot())).await;
                true
            }
            CountdownTick::Started => {
                tracing::info!("Race started");
                self.broadcast(ServerEvent::GameState(race.snapshot())).await;
                false
            }
        }
    }

    async fn push_to(&self, player_id: &PlayerId, event: &ServerEvent) {
        // 送信前に切断された接続への送信失敗はよくあること
        if let Err(e) = self.message_pusher.push_to(player_id, event).await {
            tracing::debug!(
                "Dropped '{}' for '{}': {}",
                event.event_type(),
                player_id,
                e
            );
        }
    }

    async fn broadcast(&self, event: ServerEvent) {
        if let Err(e) = self.message_pusher.broadcast(&event).await {
            tracing::warn!("Failed to broadcast '{}': {}", event.event_type(), e);
        }
    }
}
