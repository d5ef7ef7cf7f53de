//! Terminal race client for Dashline.
//!
//! Connects to the race server, joins with the given name and reads commands
//! from stdin. Pressing Enter on an empty line accelerates.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dashline-client -- --name Alice
//! cargo run --bin dashline-client -- -u ws://127.0.0.1:3000/ws -n Bob
//! ```

use clap::Parser;

use dashline_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "dashline-client")]
#[command(about = "Terminal client for the Dashline race server", long_about = None)]
struct Args {
    /// Display name (the server picks "Player N" when omitted)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, env = "DASHLINE_URL", default_value = "ws://127.0.0.1:3000/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = dashline_client::run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
