//! Data Transfer Objects (DTOs) for the race session.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket message DTOs
//! - `http`: HTTP API response DTOs
//!
//! `conversion` maps them to and from the domain types.

pub mod conversion;
pub mod http;
pub mod websocket;

pub use conversion::{DecodeError, decode_command};
