//! Routes decoded inbound messages to the session.

use std::sync::Arc;

use crate::{
    domain::PlayerId,
    infrastructure::dto::{DecodeError, decode_command},
    usecase::SessionController,
};

/// Decodes `{type, payload}` text frames and hands the commands to the session.
///
/// Undecodable frames are logged and dropped; they never close the connection.
pub struct MessageDispatcher {
    session: Arc<SessionController>,
}

impl MessageDispatcher {
    pub fn new(session: Arc<SessionController>) -> Self {
        Self { session }
    }

    pub async fn dispatch(&self, player_id: PlayerId, text: &str) {
        match decode_command(text) {
            Ok(command) => self.session.handle_command(player_id, command).await,
            Err(e) => {
                tracing::warn!("Dropping message from '{}': {}", player_id, e);
                let command = match &e {
                    DecodeError::UnknownType(message_type)
                    | DecodeError::InvalidPayload { message_type, .. } => message_type.as_str(),
                    DecodeError::MalformedEnvelope(_) => "unknown",
                };
                self.session
                    .report_invalid(player_id, command, &e.to_string())
                    .await;
            }
        }
    }
}
