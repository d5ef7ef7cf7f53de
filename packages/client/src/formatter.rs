//! Message formatting utilities for client display.

use dashline_server::infrastructure::dto::websocket::{
    CommandRejectedDto, GameStateDto, JoinedPayload, PlayerProgressDto,
};
use dashline_shared::time::{format_elapsed_millis, timestamp_to_rfc3339};

use crate::domain::RaceView;

const BAR_WIDTH: usize = 20;
const SEPARATOR: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Render progress (0-100) as a fixed-width bar, e.g. `[#####---------------]  25%`
    pub fn format_progress_bar(progress: u8) -> String {
        let progress = progress.min(100);
        let filled = usize::from(progress) * BAR_WIDTH / 100;
        format!(
            "[{}{}] {:>3}%",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            progress
        )
    }

    pub fn format_joined(joined: &JoinedPayload) -> String {
        format!(
            "\nJoined as '{}' ({}). Race is {}.\n",
            joined.player_name, joined.player_id, joined.game_state.status
        )
    }

    /// Format the whole board, one line per player
    pub fn format_players_list(view: &RaceView) -> String {
        let mut output = String::new();
        output.push_str("\n\n");
        output.push_str(SEPARATOR);
        output.push_str("\nPlayers:\n");

        if view.players.is_empty() {
            output.push_str("(No players)\n");
        } else {
            for player in view.players.values() {
                let me_suffix = if view.is_me(&player.id) { " (me)" } else { "" };
                output.push_str(&format!(
                    "{} {}{} [{}]\n",
                    Self::format_progress_bar(player.progress),
                    player.name,
                    me_suffix,
                    player.color
                ));
            }
        }

        output.push_str(SEPARATOR);
        output.push('\n');
        output
    }

    pub fn format_player_progress(view: &RaceView, update: &PlayerProgressDto) -> String {
        format!(
            "\n{} {}\n",
            Self::format_progress_bar(update.progress),
            view.name_of(&update.id)
        )
    }

    /// Format a game state change
    ///
    /// `now_millis` is used for the elapsed time shown when the race is finished.
    pub fn format_game_state(state: &GameStateDto, now_millis: i64) -> String {
        match state.status.as_str() {
            "waiting" => "\nWaiting for players. Type 'start' to begin the race.\n".to_string(),
            "starting" => format!("\nStarting in {}...\n", state.countdown),
            "racing" => {
                let started = state
                    .race_start_time
                    .and_then(timestamp_to_rfc3339)
                    .map(|at| format!(" (started at {})", at))
                    .unwrap_or_default();
                format!("\nGO!{} Press Enter to accelerate.\n", started)
            }
            "finished" => {
                let winner = state
                    .winner_name
                    .as_deref()
                    .or(state.winner.as_deref())
                    .unwrap_or("unknown");
                let elapsed = state
                    .race_start_time
                    .map(|start| format!(" in {}", format_elapsed_millis(now_millis - start)))
                    .unwrap_or_default();
                format!(
                    "\n{}\nWinner: {}{}\nType 'restart' for another race.\n{}\n",
                    SEPARATOR, winner, elapsed, SEPARATOR
                )
            }
            other => format!("\nRace is {}\n", other),
        }
    }

    pub fn format_command_rejected(rejected: &CommandRejectedDto) -> String {
        format!("\n! '{}' rejected: {}\n", rejected.command, rejected.reason)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    pub fn format_help() -> String {
        "\nCommands:\n  \
         <Enter> | a | go   accelerate\n  \
         start              start the countdown\n  \
         restart            reset a finished race\n  \
         join <name>        change your name\n  \
         help               show this help\n  \
         quit               leave\n"
            .to_string()
    }
}
