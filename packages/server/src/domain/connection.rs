//! 接続テーブル
//!
//! 接続ハンドル（PlayerId）ごとの生存フラグを保持するサイドテーブル。
//! トランスポートとは独立しており、ハートビートの判定だけを担う。

use std::collections::HashMap;

use super::value_object::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConnectionState {
    alive: bool,
}

/// 1 回のハートビート走査の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeSweep {
    /// 前回のプローブ以降に応答がなく、テーブルから取り除かれた接続
    pub dead: Vec<PlayerId>,
    /// 生存フラグを下ろし、プローブを送るべき接続
    pub probed: Vec<PlayerId>,
}

/// 接続テーブル
#[derive(Debug, Default)]
pub struct ConnectionTable {
    last_issued: u64,
    connections: HashMap<PlayerId, ConnectionState>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい接続を登録し、採番した PlayerId を返す（`alive = true`）
    pub fn register(&mut self) -> PlayerId {
        self.last_issued += 1;
        let id = PlayerId::new(self.last_issued);
        self.connections.insert(id, ConnectionState { alive: true });
        id
    }

    /// 受信があった接続を生存扱いにする
    ///
    /// 登録されていない接続の場合は `false` を返す。
    pub fn mark_alive(&mut self, id: &PlayerId) -> bool {
        match self.connections.get_mut(id) {
            Some(state) => {
                state.alive = true;
                true
            }
            None => false,
        }
    }

    /// 全接続を走査する
    ///
    /// 生存フラグが下りたままの接続はテーブルから取り除き、
    /// それ以外はフラグを下ろしてプローブ対象にする。
    pub fn sweep(&mut self) -> ProbeSweep {
        let mut sweep = ProbeSweep::default();
        for (id, state) in self.connections.iter_mut() {
            if state.alive {
                state.alive = false;
                sweep.probed.push(*id);
            } else {
                sweep.dead.push(*id);
            }
        }
        for id in &sweep.dead {
            self.connections.remove(id);
        }
        sweep.dead.sort();
        sweep.probed.sort();
        sweep
    }

    /// 接続を取り除く。既に取り除かれていれば `false`（冪等）
    pub fn unregister(&mut self, id: &PlayerId) -> bool {
        self.connections.remove(id).is_some()
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.connections.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
