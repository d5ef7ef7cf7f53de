//! Race session server: routes, handlers and lifecycle.

mod dispatcher;
mod handler;
mod server;
mod signal;
pub mod state;

pub use dispatcher::MessageDispatcher;
pub use server::Server;
