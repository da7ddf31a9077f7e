//! Terminal client for the Hiroba relay.
//!
//! Logs in over HTTP, connects to the relay with the issued `token` cookie,
//! prints every broadcast and sends each line typed at the prompt.

mod domain;
pub mod error;
mod formatter;
mod login;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
