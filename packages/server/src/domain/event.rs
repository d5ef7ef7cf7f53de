//! Events pushed from the session to connected clients.

use super::{
    entity::{Player, PlayerProgress},
    race::RaceSnapshot,
    value_object::{PlayerId, PlayerName},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Acknowledgement sent to the connection that joined
    Joined {
        player_id: PlayerId,
        player_name: PlayerName,
        game_state: RaceSnapshot,
    },
    PlayersList(Vec<Player>),
    PlayerProgress(PlayerProgress),
    GameState(RaceSnapshot),
    /// Sent to the originator only when invalid commands are rejected explicitly
    CommandRejected { command: String, reason: String },
}

impl ServerEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ServerEvent::Joined { .. } => "joined",
            ServerEvent::PlayersList(_) => "playersList",
            ServerEvent::PlayerProgress(_) => "playerProgress",
            ServerEvent::GameState(_) => "gameState",
            ServerEvent::CommandRejected { .. } => "commandRejected",
        }
    }
}
