//! `/pub now` handler.

use crate::{
    commands::{Context, Error},
    platform::DiscordPlatform,
    pubs::flows,
};

/// Announce a spontaneous pub event.
#[poise::command(slash_command, guild_only)]
pub async fn now(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let platform = DiscordPlatform::new(ctx, data.selection_timeout());
    flows::now(&platform, &data.pub_config, || data.now()).await
}
