//! Conversion logic between DTOs and domain types.

use thiserror::Error;

use crate::domain::{Command, Player, PlayerProgress, Race, RaceSnapshot, ServerEvent};
use crate::infrastructure::dto::{http, websocket as dto};

/// Errors raised while decoding an inbound envelope
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("unknown message type '{0}'")]
    UnknownType(String),

    #[error("invalid payload for '{message_type}': {source}")]
    InvalidPayload {
        message_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode a raw text frame into a domain command
pub fn decode_command(text: &str) -> Result<Command, DecodeError> {
    let envelope: dto::InboundEnvelope =
        serde_json::from_str(text).map_err(DecodeError::MalformedEnvelope)?;
    Command::try_from(envelope)
}

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<dto::InboundEnvelope> for Command {
    type Error = DecodeError;

    fn try_from(envelope: dto::InboundEnvelope) -> Result<Self, Self::Error> {
        match envelope.r#type.as_str() {
            "join" => {
                // a missing payload is the same as `{}`
                let payload = if envelope.payload.is_null() {
                    dto::JoinPayload::default()
                } else {
                    serde_json::from_value::<dto::JoinPayload>(envelope.payload).map_err(
                        |source| DecodeError::InvalidPayload {
                            message_type: "join".to_string(),
                            source,
                        },
                    )?
                };
                Ok(Command::Join { name: payload.name })
            }
            "accelerate" => Ok(Command::Accelerate),
            "restart" => Ok(Command::Restart),
            "startRace" => Ok(Command::StartRace),
            other => Err(DecodeError::UnknownType(other.to_string())),
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&Player> for dto::PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.to_string(),
            name: player.name.to_string(),
            progress: player.progress.value(),
            color: player.color.as_str().to_string(),
        }
    }
}

impl From<&PlayerProgress> for dto::PlayerProgressDto {
    fn from(projection: &PlayerProgress) -> Self {
        Self {
            id: projection.id.to_string(),
            progress: projection.progress.value(),
        }
    }
}

impl From<&RaceSnapshot> for dto::GameStateDto {
    fn from(snapshot: &RaceSnapshot) -> Self {
        Self {
            status: snapshot.phase.as_str().to_string(),
            countdown: snapshot.countdown,
            winner: snapshot.winner.map(|id| id.to_string()),
            winner_name: snapshot.winner_name.as_ref().map(|name| name.to_string()),
            race_start_time: snapshot.race_started_at.map(|ts| ts.value()),
        }
    }
}

impl From<&ServerEvent> for dto::ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Joined {
                player_id,
                player_name,
                game_state,
            } => dto::ServerMessage::Joined(dto::JoinedPayload {
                player_id: player_id.to_string(),
                player_name: player_name.to_string(),
                game_state: game_state.into(),
            }),
            ServerEvent::PlayersList(players) => dto::ServerMessage::PlayersList(
                players
                    .iter()
                    .map(|player| (player.id.to_string(), player.into()))
                    .collect(),
            ),
            ServerEvent::PlayerProgress(projection) => {
                dto::ServerMessage::PlayerProgress(projection.into())
            }
            ServerEvent::GameState(snapshot) => dto::ServerMessage::GameState(snapshot.into()),
            ServerEvent::CommandRejected { command, reason } => {
                dto::ServerMessage::CommandRejected(dto::CommandRejectedDto {
                    command: command.clone(),
                    reason: reason.clone(),
                })
            }
        }
    }
}

impl From<&Race> for http::RaceDebugDto {
    fn from(race: &Race) -> Self {
        Self {
            game_state: (&race.snapshot()).into(),
            players: race.players().list().iter().map(Into::into).collect(),
            spectators: race.spectators().iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerId, RacePhase, Timestamp};
    use serde_json::json;

    #[test]
    fn test_decode_join_with_name() {
        // テスト項目: join コマンドが名前付きでデコードされる
        // given (前提条件):
        let text = r#"{"type":"join","payload":{"name":"Alice"}}"#;

        // when (操作):
        let command = decode_command(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            command,
            Command::Join {
                name: Some("Alice".to_string())
            }
        );
    }

    #[test]
    fn test_decode_join_without_payload() {
        // テスト項目: ペイロードのない join は名前なしとして扱われる
        // given (前提条件):
        let missing = r#"{"type":"join"}"#;
        let empty = r#"{"type":"join","payload":{}}"#;

        // when (操作):
        let from_missing = decode_command(missing).unwrap();
        let from_empty = decode_command(empty).unwrap();

        // then (期待する結果):
        assert_eq!(from_missing, Command::Join { name: None });
        assert_eq!(from_empty, Command::Join { name: None });
    }

    #[test]
    fn test_decode_payloadless_commands() {
        // テスト項目: accelerate / restart / startRace がペイロードに関係なくデコードされる
        // given (前提条件):
        let inputs = [
            r#"{"type":"accelerate","payload":{}}"#,
            r#"{"type":"restart"}"#,
            r#"{"type":"startRace","payload":{"ignored":true}}"#,
        ];

        // when (操作):
        let commands: Vec<Command> = inputs.iter().map(|t| decode_command(t).unwrap()).collect();

        // then (期待する結果):
        assert_eq!(
            commands,
            vec![Command::Accelerate, Command::Restart, Command::StartRace]
        );
    }

    #[test]
    fn test_decode_unknown_type() {
        // テスト項目: 未知の type は UnknownType エラーになる
        // given (前提条件):
        let text = r#"{"type":"boost","payload":{}}"#;

        // when (操作):
        let result = decode_command(text);

        // then (期待する結果):
        assert!(matches!(result, Err(DecodeError::UnknownType(t)) if t == "boost"));
    }

    #[test]
    fn test_decode_malformed_envelope() {
        // テスト項目: JSON として壊れたメッセージや type のないメッセージは MalformedEnvelope になる
        // given (前提条件):
        let inputs = ["not json", r#"{"payload":{}}"#, r#"{"type":5}"#];

        // when (操作):
        let results: Vec<_> = inputs.iter().map(|t| decode_command(t)).collect();

        // then (期待する結果):
        assert!(
            results
                .iter()
                .all(|r| matches!(r, Err(DecodeError::MalformedEnvelope(_))))
        );
    }

    #[test]
    fn test_decode_join_with_invalid_payload() {
        // テスト項目: join のペイロードが不正な場合は InvalidPayload になる
        // given (前提条件):
        let text = r#"{"type":"join","payload":{"name":42}}"#;

        // when (操作):
        let result = decode_command(text);

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(DecodeError::InvalidPayload { message_type, .. }) if message_type == "join"
        ));
    }

    #[test]
    fn test_client_message_wire_format_decodes_to_same_command() {
        // テスト項目: クライアントがシリアライズしたメッセージがサーバー側で同じコマンドにデコードされる
        // given (前提条件):
        let cases = [
            (
                dto::ClientMessage::Join {
                    name: Some("Bob".to_string()),
                },
                Command::Join {
                    name: Some("Bob".to_string()),
                },
            ),
            (
                dto::ClientMessage::Join { name: None },
                Command::Join { name: None },
            ),
            (dto::ClientMessage::Accelerate {}, Command::Accelerate),
            (dto::ClientMessage::Restart {}, Command::Restart),
            (dto::ClientMessage::StartRace {}, Command::StartRace),
        ];

        for (message, expected) in cases {
            // when (操作):
            let text = serde_json::to_string(&message).unwrap();
            let decoded = decode_command(&text).unwrap();

            // then (期待する結果):
            assert_eq!(decoded, expected);
        }
    }

    #[test]
    fn test_game_state_wire_format() {
        // テスト項目: gameState が camelCase のキーでシリアライズされ、勝者名は勝者がいる場合のみ含まれる
        // given (前提条件):
        let waiting = RaceSnapshot {
            phase: RacePhase::Waiting,
            countdown: 3,
            winner: None,
            winner_name: None,
            race_started_at: None,
        };
        let mut race = Race::default();
        race.join(PlayerId::new(1), Some("Alice"));
        let epoch = race.start_countdown().unwrap();
        for _ in 0..3 {
            race.tick_countdown(epoch, Timestamp::new(1000));
        }
        for _ in 0..20 {
            race.accelerate(PlayerId::new(1)).unwrap();
        }

        // when (操作):
        let waiting_json =
            serde_json::to_value(dto::ServerMessage::from(&ServerEvent::GameState(waiting)))
                .unwrap();
        let finished_json = serde_json::to_value(dto::ServerMessage::from(
            &ServerEvent::GameState(race.snapshot()),
        ))
        .unwrap();

        // then (期待する結果):
        assert_eq!(
            waiting_json,
            json!({
                "type": "gameState",
                "payload": {
                    "status": "waiting",
                    "countdown": 3,
                    "winner": null,
                    "raceStartTime": null
                }
            })
        );
        assert_eq!(
            finished_json,
            json!({
                "type": "gameState",
                "payload": {
                    "status": "finished",
                    "countdown": 0,
                    "winner": "player_1",
                    "winnerName": "Alice",
                    "raceStartTime": 1000
                }
            })
        );
    }

    #[test]
    fn test_players_list_wire_format() {
        // テスト項目: playersList が PlayerId をキーとするマップとしてシリアライズされる
        // given (前提条件):
        let mut race = Race::default();
        race.join(PlayerId::new(1), Some("Alice"));
        race.join(PlayerId::new(2), None);
        let event = ServerEvent::PlayersList(race.players().list());

        // when (操作):
        let value = serde_json::to_value(dto::ServerMessage::from(&event)).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "type": "playersList",
                "payload": {
                    "player_1": {"id": "player_1", "name": "Alice", "progress": 0, "color": "red"},
                    "player_2": {"id": "player_2", "name": "Player 2", "progress": 0, "color": "blue"}
                }
            })
        );
    }

    #[test]
    fn test_joined_wire_format() {
        // テスト項目: joined がプレイヤー ID・名前・ゲーム状態を含む
        // given (前提条件):
        let race = Race::default();
        let event = ServerEvent::Joined {
            player_id: PlayerId::new(4),
            player_name: crate::domain::PlayerName::placeholder(PlayerId::new(4)),
            game_state: race.snapshot(),
        };

        // when (操作):
        let value = serde_json::to_value(dto::ServerMessage::from(&event)).unwrap();

        // then (期待する結果):
        assert_eq!(value["type"], "joined");
        assert_eq!(value["payload"]["playerId"], "player_4");
        assert_eq!(value["payload"]["playerName"], "Player 4");
        assert_eq!(value["payload"]["gameState"]["status"], "waiting");
    }
}
