//! Dashline race session server.
//!
//! Coordinates one shared race between every connected WebSocket client and
//! serves the browser client from the static asset directory.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dashline-server
//! cargo run --bin dashline-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use dashline_server::{
    config::{InvalidCommandPolicy, ServerConfig},
    domain::RaceSettings,
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::Server,
    usecase::{ConnectionRegistry, SessionController},
};
use dashline_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "dashline-server")]
#[command(about = "Real-time multiplayer race session server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Directory of static assets served at `/`
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    static_dir: PathBuf,

    /// Seconds between liveness probes
    #[arg(long, env = "HEARTBEAT_SECS", default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    heartbeat_secs: u64,

    /// Milliseconds between countdown steps
    #[arg(long, env = "COUNTDOWN_TICK_MS", default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    countdown_tick_ms: u64,

    /// Countdown start value
    #[arg(long, env = "COUNTDOWN_FROM", default_value = "3")]
    countdown_from: u32,

    /// Progress added by one accelerate
    #[arg(long, env = "PROGRESS_STEP", default_value = "5", value_parser = clap::value_parser!(u8).range(1..=100))]
    progress_step: u8,

    /// How commands that cannot be applied are answered
    #[arg(long, env = "INVALID_COMMAND_POLICY", value_enum, default_value_t = InvalidCommandPolicy::Ignore)]
    invalid_command_policy: InvalidCommandPolicy,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            static_dir: args.static_dir,
            heartbeat_interval: Duration::from_secs(args.heartbeat_secs),
            countdown_tick: Duration::from_millis(args.countdown_tick_ms),
            race: RaceSettings {
                countdown_from: args.countdown_from,
                progress_step: args.progress_step,
            },
            invalid_command_policy: args.invalid_command_policy,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies in order:
    // 1. MessagePusher
    // 2. UseCases
    // 3. Server

    // 1. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 2. Create UseCases
    let session = Arc::new(SessionController::new(
        &config,
        message_pusher.clone(),
        Arc::new(SystemClock),
    ));
    let connections = Arc::new(ConnectionRegistry::new(session.clone(), message_pusher));

    // 3. Create and run the server
    let server = Server::new(config, session, connections);
    if let Err(e) = server.run().await {
        if e.is_addr_in_use() {
            tracing::error!("Port already in use: {}", e);
        } else {
            tracing::error!("Server error: {}", e);
        }
        std::process::exit(1);
    }
}
