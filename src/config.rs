//! Configuration file structures for the pubbot.
//!
//! The configuration is read from a YAML file and can be overridden with
//! environment variables prefixed by `PUBBOT_` (nested keys are separated by `__`).
//! It is loaded once at startup and never mutated afterwards.
//!
//! # Configuration File Format
//!
//! ```yaml
//! # Discord bot account
//! discord:
//!   token: "bot-token"
//!   # Optional: register the commands in this guild only
//!   guild_id: 123456789012345678
//!
//! # Time zone used to compute the pub time
//! timezone: "Europe/London"
//!
//! # Weekly pub slot
//! pub:
//!   weekday: 4 # 0 = Monday, 6 = Sunday
//!   hour: 19
//!   minute: 0
//!   channel_id: 123456789012345678
//!   description: "Weekly social at the pub"
//!   selection_timeout: 180
//!   pubs:
//!     - name: "The Crown"
//!       emoji: "👑"
//!       map_url: "https://maps.example.com/crown"
//!       menu_url: "https://crown.example.com/menu"
//!     - name: "The Moon"
//!       emoji: "🌙"
//!       map_url: "https://maps.example.com/moon"
//!       fake: "123456789"
//! ```
//!
//! # Environment Variable Overrides
//!
//! ```bash
//! export PUBBOT_DISCORD__TOKEN="secret-token"
//! export PUBBOT_PUB__CHANNEL_ID="123456789012345678"
//! ```

use std::{collections::HashSet, path::Path};

use anyhow::bail;
use chrono_tz::Tz;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Prefix of the environment variables overriding the configuration file.
const ENV_PREFIX: &str = "PUBBOT_";

/// Default number of seconds a user has to choose a pub.
const DEFAULT_SELECTION_TIMEOUT: u64 = 180;

/// Discord select menus hold at most 25 options.
const MAX_PUBS: usize = 25;

/// Discord select menu option labels hold at most 100 characters.
const MAX_CHOICE_LABEL_LENGTH: usize = 100;

/// Root configuration structure for the pubbot.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Discord account configuration
    pub discord: Discord,
    /// Time zone in which the weekly slot is expressed
    pub timezone: Tz,
    /// Weekly pub configuration
    #[serde(rename = "pub")]
    pub pub_config: PubConfig,
}

/// Discord account configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Discord {
    /// Bot token used to connect to the gateway.
    pub token: String,

    /// Guild where the slash commands are registered.
    ///
    /// When absent, the commands are registered globally, which can take a
    /// while to propagate.
    #[serde(default)]
    pub guild_id: Option<u64>,
}

/// Weekly pub slot and the list of known pubs.
#[derive(Debug, Clone, Deserialize)]
pub struct PubConfig {
    /// Day of the week, from 0 (Monday) to 6 (Sunday)
    pub weekday: u32,
    /// Hour of the day, from 0 to 23
    pub hour: u32,
    /// Minute of the hour, from 0 to 59
    pub minute: u32,
    /// Text channel where the announcements are posted
    pub channel_id: u64,
    /// Description attached to the scheduled events
    pub description: String,
    /// Seconds a user has to pick a pub before the prompt expires
    #[serde(default = "default_selection_timeout")]
    pub selection_timeout: u64,
    /// Known pubs, in the order they are offered to the users
    pub pubs: Vec<PubInfo>,
}

/// A pub that can be chosen for an outing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PubInfo {
    /// Name of the pub, also used as the event location
    pub name: String,
    /// Emoji decorating the pub name
    pub emoji: String,
    /// Link to the pub on a map
    pub map_url: String,
    /// Link to the menu, if the pub has one online
    #[serde(default)]
    pub menu_url: Option<String>,
    /// User to mention instead of creating an event.
    ///
    /// Set for joke pubs: choosing one pings this user rather than
    /// scheduling anything.
    #[serde(default)]
    pub fake: Option<String>,
}

impl PubInfo {
    /// Label of the pub in the selection prompt.
    pub fn choice_label(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}

fn default_selection_timeout() -> u64 {
    DEFAULT_SELECTION_TIMEOUT
}

impl Config {
    /// Loads the configuration from a YAML file, applies the `PUBBOT_`
    /// environment overrides and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a required
    /// value is missing, or if the pub slot or pub list is invalid.
    pub fn load(path: &str) -> Result<Self, anyhow::Error> {
        // Figment silently ignores missing files
        if !Path::new(path).is_file() {
            bail!("config file {} not found", path);
        }

        let config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.pub_config.validate()?;

        Ok(config)
    }
}

impl PubConfig {
    /// Checks the weekly slot is a real time of the week and that pubs are
    /// uniquely named, since events are matched back to pubs by name.
    /// Pubs must also fit in a Discord select menu.
    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.weekday > 6 {
            bail!("pub.weekday must be between 0 and 6, got {}", self.weekday);
        }
        if self.hour > 23 {
            bail!("pub.hour must be between 0 and 23, got {}", self.hour);
        }
        if self.minute > 59 {
            bail!("pub.minute must be between 0 and 59, got {}", self.minute);
        }
        if self.pubs.is_empty() {
            bail!("pub.pubs must contain at least one pub");
        }
        if self.pubs.len() > MAX_PUBS {
            bail!(
                "pub.pubs must contain at most {} pubs, got {}",
                MAX_PUBS,
                self.pubs.len()
            );
        }

        let mut names = HashSet::new();
        for pub_info in &self.pubs {
            if !names.insert(pub_info.name.as_str()) {
                bail!("pub {} is configured twice", pub_info.name);
            }
            if pub_info.choice_label().chars().count() > MAX_CHOICE_LABEL_LENGTH {
                bail!(
                    "pub {} is too long: emoji and name must fit in {} characters",
                    pub_info.name,
                    MAX_CHOICE_LABEL_LENGTH
                );
            }
        }

        Ok(())
    }

    /// Finds the configured pub with the given name.
    pub fn find_pub(&self, name: &str) -> Option<&PubInfo> {
        self.pubs.iter().find(|pub_info| pub_info.name == name)
    }
}
