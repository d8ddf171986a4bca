//! WebSocket chat server with identity registration, presence and broadcast.
//!
//! Clients connect anonymously, claim a username, then exchange messages.
//! Messages are relayed to all other identified clients; the online-user set
//! is exposed over HTTP at `/online-users`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- --host 0.0.0.0 --port 3000
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use tokio::sync::Mutex;

use irori_server::{
    domain::{OnlineRegistry, Timestamp},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryRegistryRepository,
    },
    ui::Server,
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, GetOnlineUsersUseCase,
        RegisterIdentityUseCase, RelayMessageUseCase,
    },
};
use irori_shared::{logger::setup_logger, time::now_epoch_millis};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "WebSocket chat server with identity registration and presence", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory registry)
    let registry = Arc::new(Mutex::new(OnlineRegistry::new(Timestamp::new(
        now_epoch_millis(),
    ))));
    let repository = Arc::new(InMemoryRegistryRepository::new(registry));

    // 2. Create MessagePusher (WebSocket implementation)
    let channels = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(channels));

    // 3. Create UseCases
    let connect_session_usecase = Arc::new(ConnectSessionUseCase::new(message_pusher.clone()));
    let register_identity_usecase = Arc::new(RegisterIdentityUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let relay_message_usecase = Arc::new(RelayMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let get_online_users_usecase = Arc::new(GetOnlineUsersUseCase::new(repository.clone()));

    // 4. Create and run the server
    let server = Server::new(
        connect_session_usecase,
        register_identity_usecase,
        relay_message_usecase,
        disconnect_session_usecase,
        get_online_users_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
