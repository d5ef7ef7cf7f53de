//! Dashline race session coordinator.
//!
//! - `domain`: race state machine, players and connection liveness
//! - `usecase`: session controller and connection registry
//! - `infrastructure`: wire DTOs and the WebSocket message pusher
//! - `ui`: axum routes and WebSocket handlers

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
