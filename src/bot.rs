//! Bot module wiring the pub commands to Discord.
//!
//! This module provides the [`Bot`] implementation that connects to the
//! Discord gateway, registers the `/pub` slash commands and dispatches each
//! invocation to its handler.
//!
//! # Command Processing Flow
//!
//! ```text
//! Interaction → poise dispatch → /pub <subcommand> → flow → Discord replies
//! ```
//!
//! Every invocation runs in its own task. The only state they share is the
//! read-only [`Data`], so no locking is needed.
//!
//! # Example
//!
//! ```no_run
//! # use pubbot::bot::Bot;
//! # use pubbot::config::Config;
//! # async fn run() -> Result<(), anyhow::Error> {
//! let config = Config::load("config.yaml")?;
//!
//! let bot = Bot::new(config).await?;
//! bot.start().await?; // Runs until the gateway connection ends
//! # Ok(())
//! # }
//! ```

use log::{error, info};
use poise::{
    Framework, FrameworkError, FrameworkOptions,
    serenity_prelude::{Client, ClientBuilder, GatewayIntents, GuildId},
};

use crate::{
    commands::{self, Data, Error},
    config::Config,
    platform::PubError,
};

/// Main bot structure holding the Discord client.
///
/// The client owns the poise framework, which in turn owns the shared
/// [`Data`] built from the configuration once the gateway is ready.
pub struct Bot {
    /// Discord client, ready to connect to the gateway
    client: Client,
}

impl Bot {
    /// Creates a new Bot from the configuration.
    ///
    /// Builds the poise framework with the `/pub` command group and the Discord
    /// client. The commands are registered when the gateway connection is
    /// ready: in `discord.guild_id` if set, globally otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the Discord client cannot be built (e.g. malformed token).
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let Config {
            discord,
            timezone,
            pub_config,
        } = config;
        let guild_id = discord.guild_id;

        let framework = Framework::builder()
            .options(FrameworkOptions {
                commands: commands::all(),
                on_error: |error| Box::pin(on_error(error)),
                ..Default::default()
            })
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("connected to discord as {}", ready.user.name);

                    let commands = &framework.options().commands;
                    match guild_id {
                        Some(guild_id) => {
                            info!("registering commands in guild {}", guild_id);
                            poise::builtins::register_in_guild(
                                ctx,
                                commands,
                                GuildId::new(guild_id),
                            )
                            .await?;
                        }
                        None => {
                            info!("registering commands globally");
                            poise::builtins::register_globally(ctx, commands).await?;
                        }
                    }

                    Ok(Data {
                        pub_config,
                        timezone,
                    })
                })
            })
            .build();

        let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_SCHEDULED_EVENTS;
        let client = ClientBuilder::new(&discord.token, intents)
            .framework(framework)
            .await?;

        Ok(Bot { client })
    }

    /// Connects to the gateway and processes commands until the connection ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway connection fails or is closed by Discord
    /// (invalid token, missing intents...).
    pub async fn start(mut self) -> Result<(), anyhow::Error> {
        info!("starting discord client");
        self.client.start().await?;
        Ok(())
    }
}

/// Logs the errors raised by the commands.
///
/// A pub prompt left unanswered is expected and only logged at info level.
/// Other framework errors (wrong context, missing permissions...) are handled
/// by the poise default handler.
async fn on_error(error: FrameworkError<'_, Data, Error>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            let command = &ctx.command().qualified_name;
            match error.downcast_ref::<PubError>() {
                Some(PubError::SelectionTimedOut) => info!("/{} aborted: {}", command, error),
                _ => error!("/{} failed: {:?}", command, error),
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("failed to handle framework error: {}", e);
            }
        }
    }
}
