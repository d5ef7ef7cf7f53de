//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use dashline_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use dashline_shared::time::current_timestamp_millis;

use crate::{
    domain::{ClientInput, RaceView, parse_input},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Spawn a blocking thread for rustyline (synchronous readline).
///
/// Every line, including an empty one, is forwarded to the returned receiver.
/// The receiver closes on Ctrl+C or Ctrl+D.
pub fn spawn_readline(prompt: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                    }
                    if input_tx.send(line.to_string()).is_err() {
                        // Channel closed, exit thread
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

async fn send(write: &mut WsWriter, message: &ClientMessage) -> Result<(), ClientError> {
    let json = serde_json::to_string(message)?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

/// Update the view with one server frame and render it
fn render(view: &mut RaceView, text: &str) -> String {
    let Ok(message) = serde_json::from_str::<ServerMessage>(text) else {
        return MessageFormatter::format_raw_message(text);
    };
    view.apply(&message);

    match &message {
        ServerMessage::Joined(joined) => MessageFormatter::format_joined(joined),
        ServerMessage::PlayersList(_) => MessageFormatter::format_players_list(view),
        ServerMessage::PlayerProgress(update) => {
            MessageFormatter::format_player_progress(view, update)
        }
        ServerMessage::GameState(state) => {
            MessageFormatter::format_game_state(state, current_timestamp_millis())
        }
        ServerMessage::CommandRejected(rejected) => {
            MessageFormatter::format_command_rejected(rejected)
        }
    }
}

/// Run one WebSocket client session
///
/// Joins with `name` right after connecting; `join <name>` updates it so a
/// reconnect keeps the latest name.
///
/// # Returns
///
/// * `Ok(())` - the user quit
/// * `Err(ClientError)` - the connection failed or was lost
pub async fn run_client_session(
    url: &str,
    name: &mut Option<String>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    prompt: &str,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to race server!");
    println!("\nType 'help' for commands. Press Enter to accelerate, Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();
    send(&mut write, &ClientMessage::Join { name: name.clone() }).await?;

    // Spawn a task to handle incoming messages
    let prompt_for_read = prompt.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut view = RaceView::default();

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    print!("{}", render(&mut view, text.as_str()));
                    redisplay_prompt(&prompt_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut read_task => {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            line = input_rx.recv() => {
                let input = match line {
                    Some(line) => parse_input(&line),
                    // readline thread ended
                    None => ClientInput::Quit,
                };

                match input {
                    ClientInput::Send(message) => {
                        if let ClientMessage::Join { name: requested } = &message {
                            name.clone_from(requested);
                        }
                        if let Err(e) = send(&mut write, &message).await {
                            read_task.abort();
                            return Err(e);
                        }
                    }
                    ClientInput::Help => {
                        print!("{}", MessageFormatter::format_help());
                        redisplay_prompt(prompt);
                    }
                    ClientInput::Unknown(line) => {
                        println!("Unknown command '{}'. Type 'help' for commands.", line);
                        redisplay_prompt(prompt);
                    }
                    ClientInput::Quit => {
                        let _ = write.send(Message::Close(None)).await;
                        read_task.abort();
                        return Ok(());
                    }
                }
            }
        }
    }
}
