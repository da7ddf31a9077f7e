//! Authenticated real-time broadcast relay.
//!
//! Clients log in for a signed token, open a WebSocket, and every message they send is
//! fanned out to all connected participants. Newcomers receive a bounded replay of
//! recent messages before live traffic.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
