//! Pubbot - A Discord bot to organise the weekly pub outing.
//!
//! This is the main entry point for the pubbot, which helps a group of friends
//! coordinate their weekly pub from a Discord server.
//!
//! # Overview
//!
//! Pubbot knows the weekly pub slot (weekday, hour and minute) and a list of
//! pubs. Users pick next week's pub, the bot creates a Discord scheduled event
//! for it and announces it in the pub channel.
//!
//! # Features
//!
//! - **Pub Info**: `/pub info` shows when and where the next pub is
//! - **Next Pub**: `/pub next` lets a user choose next week's pub and schedules it
//! - **Spontaneous Pub**: `/pub now` announces a pub happening right now
//! - **Joke Pubs**: pubs with a `fake` user only ping that user instead of scheduling anything
//! - **YAML Configuration**: Simple configuration file format with environment variable support
//!
//! # Configuration
//!
//! See the [`config`] module for the configuration file format. Any value can be
//! overridden with a `PUBBOT_` environment variable:
//!
//! ```bash
//! export PUBBOT_DISCORD__TOKEN="your-bot-token"
//! ```
//!
//! # Usage
//!
//! ```bash
//! pubbot --config config.yaml
//! ```
//!
//! # Architecture
//!
//! - [`bot`] - Discord client and command registration
//! - [`commands`] - `/pub` slash command definitions
//! - [`config`] - YAML configuration file structures and loading
//! - [`platform`] - Chat platform abstraction and its Discord implementation
//! - [`pubs`] - Pub time computation, selection, announcements and command flows
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)
//!   - Set to `debug` for verbose output
//!   - Set to `warn` or `error` for minimal logging

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod platform;
mod pubs;

/// Command-line arguments for the pubbot.
///
/// # Examples
///
/// ```bash
/// pubbot --config config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// Values can be overridden with `PUBBOT_` environment variables, using
    /// `__` to separate nested keys (e.g. `PUBBOT_DISCORD__TOKEN`).
    #[arg(short, long)]
    config: String,
}

/// Main entry point for the pubbot.
///
/// 1. **Logging Setup**: `info` level by default, overridden by `RUST_LOG`
/// 2. **Argument Parsing**: Parses command-line arguments using `clap`
/// 3. **Configuration Loading**: Reads and validates the YAML configuration
/// 4. **Bot Execution**: Connects to Discord and serves the `/pub` commands
///
/// Configuration and connection errors are logged and end the process.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting pubbot {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {:#}", e);
            return;
        }
    };

    let bot = match Bot::new(config).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {:#}", e);
            return;
        }
    };

    if let Err(e) = bot.start().await {
        error!("Bot stopped: {:#}", e);
    }
}
