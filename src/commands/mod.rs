//! Slash commands of the bot.
//!
//! The bot exposes a single `/pub` command group:
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `/pub info` | None | Show when and where the next pub is |
//! | `/pub next` | None | Choose the pub for next week and schedule it |
//! | `/pub now` | None | Announce a spontaneous pub happening right now |
//!
//! # Architecture
//!
//! ```text
//! Discord interaction
//!      │
//!      ▼
//! ┌──────────────┐
//! │  pub_group   │  ← poise command group
//! └──────────────┘
//!      │
//!      ├── info ──┐
//!      ├── next ──┼──► DiscordPlatform + pubs::flows
//!      └── now  ──┘
//! ```
//!
//! The handlers in [`actions`] only build a [`DiscordPlatform`](crate::platform::DiscordPlatform)
//! for the invocation and run the matching flow from [`crate::pubs::flows`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::PubConfig;

mod actions;

/// Error returned by the command handlers.
pub type Error = anyhow::Error;
/// Poise context of a command invocation.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data shared by every command invocation.
///
/// Built once when the bot connects and only read afterwards.
#[derive(Debug)]
pub struct Data {
    /// Weekly pub configuration
    pub pub_config: PubConfig,
    /// Time zone of the weekly pub slot
    pub timezone: Tz,
}

impl Data {
    /// Current time in the configured time zone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }

    /// How long a user has to choose a pub.
    pub fn selection_timeout(&self) -> Duration {
        Duration::from_secs(self.pub_config.selection_timeout)
    }
}

/// Manage the pub event
#[poise::command(
    slash_command,
    rename = "pub",
    guild_only,
    subcommands("actions::info", "actions::next", "actions::now"),
    subcommand_required
)]
pub async fn pub_group(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Returns every command to register.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![pub_group()]
}
