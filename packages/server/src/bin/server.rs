//! Authenticated broadcast chat server.
//!
//! Issues signed tokens on `POST /login` and relays every message received on `/ws`
//! to all connected sessions, replaying recent history to newcomers.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --jwt-secret s3cret
//! HIROBA_JWT_SECRET=s3cret cargo run --bin hiroba-server -- --credential-policy first-use
//! ```

use clap::Parser;

use hiroba_server::{
    config::{CredentialPolicy, DEFAULT_HOST, DEFAULT_JWT_SECRET, ServerConfig},
    domain::DEFAULT_HISTORY_CAPACITY,
    ui::Server,
};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Authenticated WebSocket broadcast chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value = "8080")]
    port: u16,

    /// Secret used to sign identity tokens (HS256)
    #[arg(long, env = "HIROBA_JWT_SECRET", default_value = DEFAULT_JWT_SECRET, hide_env_values = true)]
    jwt_secret: String,

    /// Number of recent messages replayed to newly admitted sessions
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// Lifetime of issued tokens, in hours
    #[arg(long, default_value_t = 24)]
    token_ttl_hours: i64,

    /// How the password submitted on login is treated
    #[arg(long, value_enum, default_value_t = CredentialPolicy::AcceptAny)]
    credential_policy: CredentialPolicy,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            jwt_secret: self.jwt_secret,
            history_capacity: self.history_capacity,
            token_ttl_seconds: self.token_ttl_hours.saturating_mul(60 * 60),
            credential_policy: self.credential_policy,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let config = Args::parse().into_config();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(2);
    }
    if config.uses_default_secret() {
        tracing::warn!("Using the built-in development JWT secret; set HIROBA_JWT_SECRET in production");
    }
    tracing::info!(
        "History capacity: {}, token ttl: {}s, credential policy: {:?}",
        config.history_capacity,
        config.token_ttl_seconds,
        config.credential_policy
    );

    let server = Server::from_config(&config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
