//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{debug_race, health_check};
pub use websocket::websocket_handler;
