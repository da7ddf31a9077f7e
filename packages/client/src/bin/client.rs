//! Terminal chat client for the Hiroba relay, with reconnection support.
//!
//! Logs in with a username and password, connects to the relay and sends lines
//! typed at the prompt. Reconnects on connection loss (max 5 attempts with 5
//! second interval) and exits immediately when the server rejects the credentials.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --username alice --password pw
//! cargo run --bin hiroba-client -- -n bob -P pw --url http://127.0.0.1:3000
//! ```

use clap::Parser;

use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "Terminal client for the Hiroba broadcast chat", long_about = None)]
struct Args {
    /// Username shown to other participants
    #[arg(short = 'n', long)]
    username: String,

    /// Password submitted on login
    #[arg(short = 'P', long, env = "HIROBA_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// HTTP base URL of the server
    #[arg(short = 'u', long, default_value = "http://127.0.0.1:8080")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = hiroba_client::run_client(args.url, args.username, args.password).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
