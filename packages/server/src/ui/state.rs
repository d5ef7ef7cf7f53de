//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{ConnectionRegistry, SessionController};

use super::dispatcher::MessageDispatcher;

/// Shared application state
pub struct AppState {
    /// SessionController（レースセッションのユースケース）
    pub session: Arc<SessionController>,
    /// ConnectionRegistry（接続管理のユースケース）
    pub connections: Arc<ConnectionRegistry>,
    pub dispatcher: MessageDispatcher,
}
