//! Chat platform abstraction used by the pub commands.
//!
//! The pub logic never talks to Discord directly. It goes through the
//! [`Platform`] trait, which exposes only the calls the commands need:
//! reading and creating scheduled events, replying to the invoking user,
//! posting in a channel and asking the user to pick a pub.
//!
//! # Implementations
//!
//! - [`DiscordPlatform`] - adapter over a poise command context
//! - `MockPlatform` - generated by `mockall` for the tests
//!
//! # Examples
//!
//! ```no_run
//! # use pubbot::platform::{OutgoingMessage, Platform};
//! # async fn example<P: Platform>(platform: &P) -> Result<(), anyhow::Error> {
//! let events = platform.scheduled_events().await?;
//! platform
//!     .reply(OutgoingMessage::text(format!("{} events", events.len())))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use mockall::automock;
use thiserror::Error;

use crate::config::PubInfo;

mod discord;

pub use crate::platform::discord::DiscordPlatform;

/// A scheduled event that already exists in the guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    /// Title of the event
    pub name: String,
    /// Start of the event
    pub start_time: DateTime<Utc>,
    /// Location of an external event, usually the pub name
    pub location: Option<String>,
}

/// A scheduled event to create in the guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScheduledEvent {
    /// Title of the event
    pub name: String,
    /// Start of the event
    pub start_time: DateTime<Utc>,
    /// End of the event
    pub end_time: DateTime<Utc>,
    /// Where the event takes place
    pub location: String,
    /// Description shown on the event page
    pub description: String,
    /// Reason recorded in the audit log
    pub reason: String,
}

/// A button opening an external link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    /// Text displayed on the button
    pub label: String,
    /// URL opened when the button is clicked
    pub url: String,
}

/// A message to send, with optional link buttons below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Markdown content of the message
    pub content: String,
    /// Link buttons, displayed in order on a single row
    pub links: Vec<LinkButton>,
}

impl OutgoingMessage {
    /// Creates a message without any button.
    pub fn text(content: impl Into<String>) -> Self {
        OutgoingMessage {
            content: content.into(),
            links: Vec::new(),
        }
    }

    /// Creates a message with link buttons.
    pub fn with_links(content: impl Into<String>, links: Vec<LinkButton>) -> Self {
        OutgoingMessage {
            content: content.into(),
            links,
        }
    }
}

/// Errors raised by the platform when a command cannot go on.
///
/// None of them is reported to the user: they abort the command and are
/// logged by the framework error handler.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum PubError {
    /// The command was used outside of a guild
    #[error("command used outside of a guild")]
    NotInGuild,
    /// The configured channel is not a guild text or announcement channel
    #[error("channel {0} is not a text channel")]
    NotTextChannel(u64),
    /// The user did not choose a pub before the prompt expired
    #[error("no pub was chosen in time")]
    SelectionTimedOut,
    /// The pub time does not exist in the configured time zone
    #[error("the pub time does not exist in the configured time zone")]
    InvalidLocalTime,
}

/// Outbound operations of the chat platform, scoped to one command invocation.
///
/// This trait abstracts the Discord calls for easier testing with mocks.
#[automock]
pub trait Platform {
    /// Name of the user who invoked the command.
    fn user_name(&self) -> String;
    /// Lists the scheduled events of the guild the command was used in.
    async fn scheduled_events(&self) -> Result<Vec<ScheduledEvent>, anyhow::Error>;
    /// Creates a scheduled event in the guild the command was used in.
    async fn create_scheduled_event(&self, event: NewScheduledEvent)
    -> Result<(), anyhow::Error>;
    /// Replies to the invoking user only.
    async fn reply(&self, message: OutgoingMessage) -> Result<(), anyhow::Error>;
    /// Posts a message in a guild text or announcement channel.
    async fn send_to_channel(
        &self,
        channel_id: u64,
        message: OutgoingMessage,
    ) -> Result<(), anyhow::Error>;
    /// Privately asks the invoking user to choose one of the pubs.
    ///
    /// Suspends until the user answers. Fails with
    /// [`PubError::SelectionTimedOut`] if the prompt expires first.
    async fn choose_pub(&self, prompt: &str, pubs: &[PubInfo]) -> Result<PubInfo, anyhow::Error>;
}
