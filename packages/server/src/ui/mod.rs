//! WebSocket relay server implementation.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::http::TOKEN_COOKIE;
pub use server::Server;
