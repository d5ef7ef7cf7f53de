//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::should_attempt_reconnect,
    error::ClientError,
    session::{run_client_session, spawn_readline},
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the terminal client with reconnection logic
pub async fn run_client(url: String, name: Option<String>) -> Result<(), ClientError> {
    let prompt = format!("{}> ", name.as_deref().unwrap_or("race"));
    let mut input_rx = spawn_readline(prompt.clone());
    let mut name = name;
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &mut name, &mut input_rx, &prompt).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If the user quit, don't reconnect
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
