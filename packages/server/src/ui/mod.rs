//! UI layer: axum router, WebSocket and HTTP handlers.

mod handler;
mod server;
mod signal;
mod state;

pub use server::Server;
