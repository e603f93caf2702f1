//! Discord implementation of the [`Platform`] trait.
//!
//! Wraps the poise context of a slash command invocation and translates the
//! platform operations into serenity HTTP calls and gateway collectors.

use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use poise::{
    CreateReply,
    serenity_prelude::{
        ChannelId, ChannelType, ComponentInteractionCollector, ComponentInteractionDataKind,
        CreateActionRow, CreateButton, CreateInteractionResponse,
        CreateInteractionResponseMessage, CreateMessage, CreateScheduledEvent, CreateSelectMenu,
        CreateSelectMenuKind, CreateSelectMenuOption, GuildId, ScheduledEventType, Timestamp,
    },
};

use crate::{
    commands::Context,
    config::PubInfo,
    platform::{
        LinkButton, NewScheduledEvent, OutgoingMessage, Platform, PubError, ScheduledEvent,
    },
    pubs::responses::{format_pub_chosen, format_selection_expired},
};

/// Discord platform bound to a single slash command invocation.
pub struct DiscordPlatform<'a> {
    /// Context of the command invocation
    ctx: Context<'a>,
    /// How long the user has to choose a pub
    selection_timeout: Duration,
}

impl<'a> DiscordPlatform<'a> {
    /// Create a new [DiscordPlatform].
    ///
    /// # Arguments
    ///
    /// * `ctx` - The poise context of the command invocation.
    /// * `selection_timeout` - How long the pub selection prompt stays open.
    pub fn new(ctx: Context<'a>, selection_timeout: Duration) -> Self {
        DiscordPlatform {
            ctx,
            selection_timeout,
        }
    }

    fn guild_id(&self) -> Result<GuildId, PubError> {
        self.ctx.guild_id().ok_or(PubError::NotInGuild)
    }
}

impl Platform for DiscordPlatform<'_> {
    fn user_name(&self) -> String {
        self.ctx.author().name.clone()
    }

    async fn scheduled_events(&self) -> Result<Vec<ScheduledEvent>, anyhow::Error> {
        let guild_id = self.guild_id()?;
        let events = guild_id.scheduled_events(self.ctx.http(), false).await?;
        debug!("guild {} has {} scheduled events", guild_id, events.len());

        events
            .into_iter()
            .map(|event| -> Result<ScheduledEvent, anyhow::Error> {
                Ok(ScheduledEvent {
                    start_time: from_timestamp(event.start_time)?,
                    location: event
                        .metadata
                        .and_then(|metadata| metadata.location.into()),
                    name: event.name,
                })
            })
            .collect()
    }

    async fn create_scheduled_event(
        &self,
        event: NewScheduledEvent,
    ) -> Result<(), anyhow::Error> {
        let guild_id = self.guild_id()?;

        let builder = CreateScheduledEvent::new(
            ScheduledEventType::External,
            event.name,
            to_timestamp(event.start_time)?,
        )
        .end_time(to_timestamp(event.end_time)?)
        .location(event.location)
        .description(event.description)
        .audit_log_reason(&event.reason);

        let created = guild_id.create_scheduled_event(self.ctx, builder).await?;
        info!("created scheduled event {}", created.id);

        Ok(())
    }

    async fn reply(&self, message: OutgoingMessage) -> Result<(), anyhow::Error> {
        self.ctx
            .send(
                CreateReply::default()
                    .content(message.content)
                    .components(link_rows(&message.links))
                    .ephemeral(true),
            )
            .await?;

        Ok(())
    }

    async fn send_to_channel(
        &self,
        channel_id: u64,
        message: OutgoingMessage,
    ) -> Result<(), anyhow::Error> {
        let channel = ChannelId::new(channel_id).to_channel(self.ctx).await?;
        let Some(channel) = channel
            .guild()
            .filter(|channel| is_text_channel(channel.kind))
        else {
            return Err(PubError::NotTextChannel(channel_id).into());
        };

        channel
            .send_message(
                self.ctx,
                CreateMessage::new()
                    .content(message.content)
                    .components(link_rows(&message.links)),
            )
            .await?;

        Ok(())
    }

    async fn choose_pub(&self, prompt: &str, pubs: &[PubInfo]) -> Result<PubInfo, anyhow::Error> {
        // The interaction id keeps concurrent prompts apart
        let custom_id = format!("pub-choice-{}", self.ctx.id());

        let options = pubs
            .iter()
            .enumerate()
            .map(|(index, pub_info)| {
                CreateSelectMenuOption::new(pub_info.choice_label(), index.to_string())
            })
            .collect();
        let menu = CreateSelectMenu::new(&custom_id, CreateSelectMenuKind::String { options })
            .placeholder("Choose a pub");

        let prompt_handle = self
            .ctx
            .send(
                CreateReply::default()
                    .content(prompt)
                    .components(vec![CreateActionRow::SelectMenu(menu)])
                    .ephemeral(true),
            )
            .await?;

        let Some(interaction) = ComponentInteractionCollector::new(self.ctx.serenity_context())
            .author_id(self.ctx.author().id)
            .channel_id(self.ctx.channel_id())
            .filter(move |interaction| interaction.data.custom_id == custom_id)
            .timeout(self.selection_timeout)
            .await
        else {
            info!("{} did not choose a pub in time", self.user_name());

            // Close the expired prompt
            let expired = CreateReply::default()
                .content(format_selection_expired())
                .components(Vec::new());
            if let Err(e) = prompt_handle.edit(self.ctx, expired).await {
                warn!("failed to close the pub prompt: {}", e);
            }

            return Err(PubError::SelectionTimedOut.into());
        };

        let index = match &interaction.data.kind {
            ComponentInteractionDataKind::StringSelect { values } => {
                values.first().and_then(|value| value.parse::<usize>().ok())
            }
            _ => None,
        };
        let pub_info = index
            .and_then(|index| pubs.get(index))
            .cloned()
            .ok_or_else(|| anyhow!("unexpected pub selection {:?}", interaction.data.kind))?;

        interaction
            .create_response(
                self.ctx,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .content(format_pub_chosen(&pub_info))
                        .components(Vec::new()),
                ),
            )
            .await?;

        Ok(pub_info)
    }
}

/// Whether messages can be posted in channels of this kind.
fn is_text_channel(kind: ChannelType) -> bool {
    matches!(kind, ChannelType::Text | ChannelType::News)
}

/// Lays out link buttons on a single row, or no row at all without links.
fn link_rows(links: &[LinkButton]) -> Vec<CreateActionRow> {
    if links.is_empty() {
        return Vec::new();
    }

    vec![CreateActionRow::Buttons(
        links
            .iter()
            .map(|link| CreateButton::new_link(&link.url).label(&link.label))
            .collect(),
    )]
}

fn to_timestamp(time: DateTime<Utc>) -> Result<Timestamp, anyhow::Error> {
    Ok(Timestamp::from_unix_timestamp(time.timestamp())?)
}

fn from_timestamp(timestamp: Timestamp) -> Result<DateTime<Utc>, anyhow::Error> {
    DateTime::from_timestamp(timestamp.unix_timestamp(), 0)
        .ok_or_else(|| anyhow!("invalid event timestamp {}", timestamp))
}
