//! Entity 定義
//!
//! - `Player`: レースに参加したプレイヤー
//! - `PlayerStore`: 参加者ストア（`Race` だけが変更する）

use std::collections::BTreeMap;

use super::value_object::{CarColor, PlayerId, PlayerName, Progress};

/// レースに参加したプレイヤー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub progress: Progress,
    pub color: CarColor,
}

/// 1 人分の進捗の射影（`playerProgress` 通知用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerProgress {
    pub id: PlayerId,
    pub progress: Progress,
}

/// 参加者ストア
///
/// PlayerId 順に並んだ単純なコンテナ。検証ロジックは持たず、
/// 変更は `Race` を通してのみ行われる。
#[derive(Debug, Clone, Default)]
pub struct PlayerStore {
    players: BTreeMap<PlayerId, Player>,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいプレイヤーを登録する
    ///
    /// 色は現在の参加人数をスロット番号としてパレットから選ぶ。
    pub(crate) fn insert_new(&mut self, id: PlayerId, name: PlayerName) -> &Player {
        let color = CarColor::for_slot(self.players.len());
        self.players.entry(id).or_insert(Player {
            id,
            name,
            progress: Progress::START,
            color,
        })
    }

    pub(crate) fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub(crate) fn remove(&mut self, id: &PlayerId) -> Option<Player> {
        self.players.remove(id)
    }

    pub(crate) fn reset_progress(&mut self) {
        for player in self.players.values_mut() {
            player.progress = Progress::START;
        }
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// 全参加者の一覧（PlayerId 順）
    pub fn list(&self) -> Vec<Player> {
        self.players.values().cloned().collect()
    }

    /// 1 人分の進捗の射影
    pub fn progress_of(&self, id: &PlayerId) -> Option<PlayerProgress> {
        self.players.get(id).map(|player| PlayerProgress {
            id: player.id,
            progress: player.progress,
        })
    }
}
