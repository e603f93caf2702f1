//! `/pub next` handler.

use crate::{
    commands::{Context, Error},
    platform::DiscordPlatform,
    pubs::flows,
};

/// Select the pub for next week.
#[poise::command(slash_command, guild_only)]
pub async fn next(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let platform = DiscordPlatform::new(ctx, data.selection_timeout());
    flows::next(&platform, &data.pub_config, &data.now()).await
}
