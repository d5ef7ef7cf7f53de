//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{domain::OutboundFrame, ui::state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's outbound queue into the WebSocket sink.
///
/// `OutboundFrame::Close` sends a close frame and ends the task.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let message = match frame {
                OutboundFrame::Text(text) => Message::Text(text.into()),
                OutboundFrame::Ping => Message::Ping(Bytes::new()),
                OutboundFrame::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            };
            if sender.send(message).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection's outbound frames
    let (tx, rx) = mpsc::unbounded_channel();
    let player_id = state.connections.register(tx).await;

    let state_clone = state.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", player_id, e);
                    break;
                }
            };

            // any inbound frame counts as a liveness signal
            state_clone.connections.mark_alive(&player_id).await;

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", player_id, text.as_str());
                    state_clone
                        .dispatcher
                        .dispatch(player_id, text.as_str())
                        .await;
                }
                Message::Close(_) => {
                    tracing::info!("'{}' requested close", player_id);
                    break;
                }
                // Pong answers the probe; Ping is answered by axum
                _ => {}
            }
        }
    });

    // Spawn a task to send queued frames to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.connections.unregister(player_id).await;
}
