//! Domain logic for client-side operations.
//!
//! This module contains pure functions and state that implement the client
//! behavior without side effects, making them easy to test.

use std::collections::BTreeMap;

use dashline_server::infrastructure::dto::websocket::{
    ClientMessage, GameStateDto, PlayerDto, ServerMessage,
};

/// What a line typed at the prompt asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientInput {
    Send(ClientMessage),
    Help,
    Quit,
    Unknown(String),
}

/// Parse one line of user input.
///
/// An empty line accelerates, so holding Enter drives the car.
pub fn parse_input(line: &str) -> ClientInput {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" | "a" | "go" => ClientInput::Send(ClientMessage::Accelerate {}),
        "start" => ClientInput::Send(ClientMessage::StartRace {}),
        "restart" => ClientInput::Send(ClientMessage::Restart {}),
        "join" => ClientInput::Send(ClientMessage::Join {
            name: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "help" | "?" => ClientInput::Help,
        "quit" | "exit" => ClientInput::Quit,
        _ => ClientInput::Unknown(line.to_string()),
    }
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(current_attempt: u32, max_attempts: u32) -> bool {
    current_attempt < max_attempts
}

/// The client's picture of the race, updated from server messages
#[derive(Debug, Clone, Default)]
pub struct RaceView {
    /// Own player id, known after `joined`
    pub me: Option<String>,
    pub players: BTreeMap<String, PlayerDto>,
    pub game_state: Option<GameStateDto>,
}

impl RaceView {
    pub fn apply(&mut self, message: &ServerMessage) {
        match message {
            ServerMessage::Joined(joined) => {
                self.me = Some(joined.player_id.clone());
                self.game_state = Some(joined.game_state.clone());
            }
            ServerMessage::PlayersList(players) => self.players = players.clone(),
            ServerMessage::PlayerProgress(update) => {
                if let Some(player) = self.players.get_mut(&update.id) {
                    player.progress = update.progress;
                }
            }
            ServerMessage::GameState(state) => self.game_state = Some(state.clone()),
            ServerMessage::CommandRejected(_) => {}
        }
    }

    pub fn is_me(&self, player_id: &str) -> bool {
        self.me.as_deref() == Some(player_id)
    }

    /// Display name for a player, falling back to the id
    pub fn name_of<'a>(&'a self, player_id: &'a str) -> &'a str {
        self.players
            .get(player_id)
            .map(|player| player.name.as_str())
            .unwrap_or(player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashline_server::infrastructure::dto::websocket::{JoinedPayload, PlayerProgressDto};

    fn player(id: &str, name: &str, progress: u8) -> PlayerDto {
        PlayerDto {
            id: id.to_string(),
            name: name.to_string(),
            progress,
            color: "red".to_string(),
        }
    }

    fn waiting() -> GameStateDto {
        GameStateDto {
            status: "waiting".to_string(),
            countdown: 3,
            winner: None,
            winner_name: None,
            race_start_time: None,
        }
    }

    #[test]
    fn test_parse_input_accelerate_shortcuts() {
        // テスト項目: 空行・a・go は accelerate になる
        // given (前提条件):
        let lines = ["", "   ", "a", "go"];

        // when (操作):
        let inputs: Vec<ClientInput> = lines.iter().map(|line| parse_input(line)).collect();

        // then (期待する結果):
        assert!(
            inputs
                .iter()
                .all(|input| *input == ClientInput::Send(ClientMessage::Accelerate {}))
        );
    }

    #[test]
    fn test_parse_input_commands() {
        // テスト項目: start / restart / help / quit がそれぞれの入力になる
        // given (前提条件):
        let lines = ["start", "restart", "help", "quit"];

        // when (操作):
        let inputs: Vec<ClientInput> = lines.iter().map(|line| parse_input(line)).collect();

        // then (期待する結果):
        assert_eq!(
            inputs,
            vec![
                ClientInput::Send(ClientMessage::StartRace {}),
                ClientInput::Send(ClientMessage::Restart {}),
                ClientInput::Help,
                ClientInput::Quit,
            ]
        );
    }

    #[test]
    fn test_parse_input_join_with_and_without_name() {
        // テスト項目: join は続く文字列を名前として扱い、名前がなければ None になる
        // given (前提条件):
        let with_name = "join  Speedy Gonzales ";
        let without_name = "join";

        // when (操作):
        let named = parse_input(with_name);
        let unnamed = parse_input(without_name);

        // then (期待する結果):
        assert_eq!(
            named,
            ClientInput::Send(ClientMessage::Join {
                name: Some("Speedy Gonzales".to_string())
            })
        );
        assert_eq!(
            unnamed,
            ClientInput::Send(ClientMessage::Join { name: None })
        );
    }

    #[test]
    fn test_parse_input_unknown() {
        // テスト項目: 未知の入力は Unknown になる
        // given (前提条件):
        let line = "boost now";

        // when (操作):
        let input = parse_input(line);

        // then (期待する結果):
        assert_eq!(input, ClientInput::Unknown("boost now".to_string()));
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let (current, max) = (4, 5);

        // when (操作):
        let result = should_attempt_reconnect(current, max);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let (current, max) = (5, 5);

        // when (操作):
        let result = should_attempt_reconnect(current, max);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_race_view_tracks_messages() {
        // テスト項目: joined・playersList・playerProgress・gameState が RaceView に反映される
        // given (前提条件):
        let mut view = RaceView::default();
        let mut players = BTreeMap::new();
        players.insert("player_1".to_string(), player("player_1", "Alice", 0));

        // when (操作):
        view.apply(&ServerMessage::Joined(JoinedPayload {
            player_id: "player_1".to_string(),
            player_name: "Alice".to_string(),
            game_state: waiting(),
        }));
        view.apply(&ServerMessage::PlayersList(players));
        view.apply(&ServerMessage::PlayerProgress(PlayerProgressDto {
            id: "player_1".to_string(),
            progress: 35,
        }));
        // 一覧にないプレイヤーの進捗は無視される
        view.apply(&ServerMessage::PlayerProgress(PlayerProgressDto {
            id: "player_9".to_string(),
            progress: 50,
        }));

        // then (期待する結果):
        assert!(view.is_me("player_1"));
        assert_eq!(view.name_of("player_1"), "Alice");
        assert_eq!(view.name_of("player_9"), "player_9");
        assert_eq!(view.players["player_1"].progress, 35);
        assert_eq!(view.players.len(), 1);
        assert_eq!(view.game_state, Some(waiting()));
    }
}
