//! Announcement of a chosen pub.
//!
//! A real pub gets a scheduled event and an announcement in the pub channel.
//! A joke pub only gets a message mentioning its user.

use chrono::{DateTime, Duration, TimeZone, Utc};
use log::info;

use crate::{
    config::{PubConfig, PubInfo},
    platform::{NewScheduledEvent, Platform},
    pubs::responses::{Occasion, format_announcement, format_event_title, format_fake_pub},
};

/// How long a pub event lasts.
const PUB_DURATION_HOURS: i64 = 3;

/// Announces a pub starting at `start_time` in the configured channel.
///
/// # Arguments
///
/// * `platform` - Platform of the command invocation
/// * `config` - Pub configuration, for the channel and event description
/// * `pub_info` - The chosen pub
/// * `start_time` - Start of the outing
/// * `occasion` - Whether this is next week's pub or a spontaneous one
///
/// # Errors
///
/// Returns the first platform error. If the event creation fails, nothing is
/// posted in the channel.
pub async fn announce<P: Platform, Tz: TimeZone>(
    platform: &P,
    config: &PubConfig,
    pub_info: &PubInfo,
    start_time: &DateTime<Tz>,
    occasion: Occasion,
) -> Result<(), anyhow::Error> {
    if let Some(fake_user) = &pub_info.fake {
        info!("{} is a fake pub, pinging {}", pub_info.name, fake_user);
        return platform
            .send_to_channel(
                config.channel_id,
                format_fake_pub(pub_info, fake_user, occasion),
            )
            .await;
    }

    let start_time = start_time.with_timezone(&Utc);
    info!("creating scheduled event at {}", start_time);

    platform
        .create_scheduled_event(new_pub_event(
            platform,
            config,
            pub_info,
            start_time,
            occasion,
        ))
        .await?;

    info!("posting pub info in channel {}", config.channel_id);
    platform
        .send_to_channel(
            config.channel_id,
            format_announcement(pub_info, &start_time, occasion),
        )
        .await
}

fn new_pub_event<P: Platform>(
    platform: &P,
    config: &PubConfig,
    pub_info: &PubInfo,
    start_time: DateTime<Utc>,
    occasion: Occasion,
) -> NewScheduledEvent {
    let command = match occasion {
        Occasion::NextWeek => "next",
        Occasion::RightNow => "now",
    };

    NewScheduledEvent {
        name: format_event_title(pub_info, occasion),
        start_time,
        end_time: start_time + Duration::hours(PUB_DURATION_HOURS),
        location: pub_info.name.clone(),
        description: config.description.clone(),
        reason: format!(
            "{} used the /pub {} command",
            platform.user_name(),
            command
        ),
    }
}
