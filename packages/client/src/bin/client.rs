//! CLI chat client with identity registration and presence display.
//!
//! Connects to the chat server, claims the given username once the channel
//! is up, then sends messages from stdin. Sent messages appear in the local
//! log immediately; the online-users panel refreshes whenever the server
//! signals a membership change. Automatically reconnects on disconnection
//! (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-client -- --username alice
//! cargo run --bin irori-client -- -n bob
//! ```

use clap::Parser;

use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "CLI chat client with identity registration and presence", long_about = None)]
struct Args {
    /// Username to claim after connecting (display name; uniqueness is not
    /// enforced)
    #[arg(short = 'n', long)]
    username: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Base URL of the HTTP API (online-users snapshot)
    #[arg(short = 'a', long, default_value = "http://127.0.0.1:8080")]
    api_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = irori_client::run_client(args.url, args.api_url, args.username).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
