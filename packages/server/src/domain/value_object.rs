//! Value Object 定義
//!
//! 不変で、値によって同一性が決まる型をまとめています。

use std::fmt;

/// プレイヤー（接続）の識別子
///
/// 接続時に単調増加カウンタから採番されます。ワイヤ上では `player_<n>` 形式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(u64);

impl PlayerId {
    pub const fn new(number: u64) -> Self {
        Self(number)
    }

    /// 採番された連番
    pub fn number(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player_{}", self.0)
    }
}

/// プレイヤーの表示名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    /// クライアントが指定した名前から表示名を作る
    ///
    /// 前後の空白は取り除き、未指定または空の場合は `Player <n>` を使う。
    pub fn from_requested(requested: Option<&str>, player_id: PlayerId) -> Self {
        match requested.map(str::trim) {
            Some(name) if !name.is_empty() => Self(name.to_string()),
            _ => Self::placeholder(player_id),
        }
    }

    pub fn placeholder(player_id: PlayerId) -> Self {
        Self(format!("Player {}", player_id.number()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// レース進捗（0〜100 のパーセンテージ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Progress(u8);

impl Progress {
    pub const START: Progress = Progress(0);
    pub const FINISH: Progress = Progress(100);

    /// `step` だけ進め、100 で頭打ちにする
    pub fn advance(self, step: u8) -> Self {
        Self(self.0.saturating_add(step).min(Self::FINISH.0))
    }

    pub fn is_finished(&self) -> bool {
        *self == Self::FINISH
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// 車の色（固定パレット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarColor {
    Red,
    Blue,
    Green,
    Purple,
    Orange,
    Cyan,
}

impl CarColor {
    pub const PALETTE: [CarColor; 6] = [
        CarColor::Red,
        CarColor::Blue,
        CarColor::Green,
        CarColor::Purple,
        CarColor::Orange,
        CarColor::Cyan,
    ];

    /// 参加順のスロット番号からパレットを循環して色を選ぶ
    pub fn for_slot(slot: usize) -> Self {
        Self::PALETTE[slot % Self::PALETTE.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CarColor::Red => "red",
            CarColor::Blue => "blue",
            CarColor::Green => "green",
            CarColor::Purple => "purple",
            CarColor::Orange => "orange",
            CarColor::Cyan => "cyan",
        }
    }
}

/// レースのフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RacePhase {
    #[default]
    Waiting,
    Starting,
    Racing,
    Finished,
}

impl RacePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RacePhase::Waiting => "waiting",
            RacePhase::Starting => "starting",
            RacePhase::Racing => "racing",
            RacePhase::Finished => "finished",
        }
    }
}

impl fmt::Display for RacePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unix timestamp (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
