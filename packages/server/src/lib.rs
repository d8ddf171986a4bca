//! WebSocket chat server library for irori.
//!
//! Identity registration, presence tracking and message fan-out for the
//! irori chat application.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
