//! `/pub info` handler.

use crate::{
    commands::{Context, Error},
    platform::DiscordPlatform,
    pubs::flows,
};

/// Get information about the pub.
#[poise::command(slash_command, guild_only)]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let platform = DiscordPlatform::new(ctx, data.selection_timeout());
    flows::info(&platform, &data.pub_config, &data.now()).await
}
