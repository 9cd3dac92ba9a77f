//! Headless host for the Spinwheel chat lottery.
//!
//! Reads chat credentials from a `key=value` config file, collects `!join` commands from
//! the stream chat while joins are open, and spins the wheel from console commands.
//! Without a usable config the wheel still runs, with the host as the only automatic entrant.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin spinwheel
//! cargo run --bin spinwheel -- --config ./twitch.cfg --countdown-secs 30
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use spinwheel_core::{
    infrastructure::{
        ChatServer,
        chat::session::{DEFAULT_CHAT_HOST, DEFAULT_CHAT_PORT},
        config_file::DEFAULT_CONFIG_PATH,
    },
    usecase::DEFAULT_COUNTDOWN_SECS,
};
use spinwheel_host::{HostOptions, run_host};
use spinwheel_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "spinwheel")]
#[command(about = "Chat-driven spin-the-wheel lottery", long_about = None)]
struct Args {
    /// Path to the chat session config file
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Chat server host
    #[arg(short = 's', long, default_value = DEFAULT_CHAT_HOST)]
    server: String,

    /// Chat server port
    #[arg(short = 'p', long, default_value_t = DEFAULT_CHAT_PORT)]
    port: u16,

    /// Interval of the simulation tick in milliseconds
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Length of the join countdown in seconds
    #[arg(long, default_value_t = DEFAULT_COUNTDOWN_SECS)]
    countdown_secs: u32,

    /// Default log level, overridden by RUST_LOG
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let options = HostOptions {
        config_path: args.config,
        server: ChatServer::new(args.server, args.port),
        tick: Duration::from_millis(args.tick_ms.max(1)),
        countdown_secs: args.countdown_secs,
    };

    run_host(options).await;
}
