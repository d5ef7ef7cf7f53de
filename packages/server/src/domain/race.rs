//! Race aggregate: the authoritative race-phase state machine.
//!
//! ```text
//! Waiting --startRace--> Starting --countdown 0--> Racing --100%--> Finished
//!    ^                                                                 |
//!    +----------------------------- restart ---------------------------+
//! ```
//!
//! Every method is synchronous and side-effect free apart from mutating
//! `self`; timers and delivery live in the usecase layer.

use super::{
    entity::{Player, PlayerProgress, PlayerStore},
    error::Rejection,
    value_object::{PlayerId, PlayerName, RacePhase, Timestamp},
};

/// Tunable race rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceSettings {
    /// Countdown value set when entering `Starting`
    pub countdown_from: u32,
    /// Progress added by one `accelerate`
    pub progress_step: u8,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            countdown_from: 3,
            progress_step: 5,
        }
    }
}

/// Identifies one countdown run; ticks carrying an older epoch are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownEpoch(u64);

/// Result of a single countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Still counting; carries the remaining seconds
    Counting(u32),
    /// Countdown reached zero and the race is now `Racing`
    Started,
    /// The countdown this tick belongs to no longer exists
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined(Player),
    /// The connection had already joined; only the display name changed
    Renamed(Player),
}

impl JoinOutcome {
    pub fn player(&self) -> &Player {
        match self {
            JoinOutcome::Joined(player) | JoinOutcome::Renamed(player) => player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelerateOutcome {
    Advanced(PlayerProgress),
    Finished { winner: PlayerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The connection never joined
    NotJoined,
    /// The player was removed; `back_to_waiting` is set when the session was reset
    Left { back_to_waiting: bool },
}

/// Read-only view of the session used for `gameState` events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceSnapshot {
    pub phase: RacePhase,
    pub countdown: u32,
    pub winner: Option<PlayerId>,
    /// Set only while the winner is still connected
    pub winner_name: Option<PlayerName>,
    pub race_started_at: Option<Timestamp>,
}

#[derive(Debug, Clone)]
pub struct Race {
    settings: RaceSettings,
    phase: RacePhase,
    countdown_remaining: u32,
    winner: Option<PlayerId>,
    race_started_at: Option<Timestamp>,
    countdown_epoch: u64,
    players: PlayerStore,
    /// Players who joined after the start; they cannot accelerate until the next restart
    spectators: Vec<PlayerId>,
}

impl Race {
    pub fn new(settings: RaceSettings) -> Self {
        Self {
            settings,
            phase: RacePhase::Waiting,
            countdown_remaining: settings.countdown_from,
            winner: None,
            race_started_at: None,
            countdown_epoch: 0,
            players: PlayerStore::new(),
            spectators: Vec::new(),
        }
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn race_started_at(&self) -> Option<Timestamp> {
        self.race_started_at
    }

    pub fn players(&self) -> &PlayerStore {
        &self.players
    }

    pub fn is_spectating(&self, id: &PlayerId) -> bool {
        self.spectators.contains(id)
    }

    pub fn spectators(&self) -> &[PlayerId] {
        &self.spectators
    }

    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            phase: self.phase,
            countdown: self.countdown_remaining,
            winner: self.winner,
            winner_name: self
                .winner
                .and_then(|id| self.players.get(&id))
                .map(|player| player.name.clone()),
            race_started_at: self.race_started_at,
        }
    }

    /// Accepted in every phase. Players joining a race already under way
    /// spectate until the next restart.
    pub fn join(&mut self, id: PlayerId, requested_name: Option<&str>) -> JoinOutcome {
        let name = PlayerName::from_requested(requested_name, id);

        if let Some(player) = self.players.get_mut(&id) {
            player.name = name;
            return JoinOutcome::Renamed(player.clone());
        }

        if matches!(self.phase, RacePhase::Racing | RacePhase::Finished) {
            self.spectators.push(id);
        }
        JoinOutcome::Joined(self.players.insert_new(id, name).clone())
    }

    pub fn accelerate(&mut self, id: PlayerId) -> Result<AccelerateOutcome, Rejection> {
        if self.phase != RacePhase::Racing {
            return Err(Rejection::NotRacing(self.phase));
        }
        if self.is_spectating(&id) {
            return Err(Rejection::Spectating(id));
        }
        let step = self.settings.progress_step;
        let player = self
            .players
            .get_mut(&id)
            .ok_or(Rejection::UnknownPlayer(id))?;

        player.progress = player.progress.advance(step);
        if !player.progress.is_finished() {
            let progress = self
                .players
                .progress_of(&id)
                .ok_or(Rejection::UnknownPlayer(id))?;
            return Ok(AccelerateOutcome::Advanced(progress));
        }

        self.phase = RacePhase::Finished;
        self.winner = Some(id);
        Ok(AccelerateOutcome::Finished { winner: id })
    }

    pub fn start_countdown(&mut self) -> Result<CountdownEpoch, Rejection> {
        if self.phase != RacePhase::Waiting {
            return Err(Rejection::NotWaiting(self.phase));
        }
        if self.players.is_empty() {
            return Err(Rejection::NoPlayers);
        }

        self.phase = RacePhase::Starting;
        self.countdown_remaining = self.settings.countdown_from;
        self.countdown_epoch += 1;
        Ok(CountdownEpoch(self.countdown_epoch))
    }

    pub fn tick_countdown(&mut self, epoch: CountdownEpoch, now: Timestamp) -> CountdownTick {
        if self.phase != RacePhase::Starting || epoch.0 != self.countdown_epoch {
            return CountdownTick::Stale;
        }

        self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        if self.countdown_remaining > 0 {
            return CountdownTick::Counting(self.countdown_remaining);
        }

        self.phase = RacePhase::Racing;
        self.race_started_at = Some(now);
        CountdownTick::Started
    }

    pub fn restart(&mut self) -> Result<(), Rejection> {
        if self.phase != RacePhase::Finished {
            return Err(Rejection::NotFinished(self.phase));
        }
        self.reset_to_waiting();
        Ok(())
    }

    /// Removes the player in any phase. The session falls back to `Waiting`
    /// when nobody is left, or when only spectators remain in a race that
    /// has not finished yet.
    pub fn remove_player(&mut self, id: &PlayerId) -> Departure {
        if self.players.remove(id).is_none() {
            return Departure::NotJoined;
        }
        self.spectators.retain(|spectator| spectator != id);

        let in_progress = matches!(self.phase, RacePhase::Starting | RacePhase::Racing);
        let racers_left = self.players.len() > self.spectators.len();
        let back_to_waiting = self.players.is_empty() || (in_progress && !racers_left);
        if back_to_waiting {
            self.reset_to_waiting();
        }
        Departure::Left { back_to_waiting }
    }

    fn reset_to_waiting(&mut self) {
        self.phase = RacePhase::Waiting;
        self.countdown_remaining = self.settings.countdown_from;
        self.winner = None;
        self.race_started_at = None;
        // invalidates any countdown still ticking
        self.countdown_epoch += 1;
        self.spectators.clear();
        self.players.reset_progress();
    }
}

impl Default for Race {
    fn default() -> Self {
        Self::new(RaceSettings::default())
    }
}
