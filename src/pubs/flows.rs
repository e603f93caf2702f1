//! `/pub` command flows.
//!
//! Each flow runs once per command invocation against a [`Platform`]. The
//! current time is passed in by the caller, already in the configured time
//! zone: as a value for `info` and `next`, as a clock for `now`.
//!
//! ```text
//! info: pub time → lookup → reply (no pub | unknown pub | announcement)
//! next: pub time → lookup → (exists → reply) | choose → lookup → announce
//! now:  choose → now + 1s → announce
//! ```

use chrono::{DateTime, Duration, TimeZone};
use log::info;

use crate::{
    config::PubConfig,
    platform::{OutgoingMessage, Platform, PubError},
    pubs::{
        announcer::announce,
        chooser::choose_pub,
        responses::{
            Occasion, format_announcement, format_event_exists, format_next_prompt,
            format_no_pub_scheduled, format_now_prompt, format_unknown_location,
        },
        schedule::{find_pub_event, next_configured_pub_time},
    },
};

/// Shows the pub scheduled for the next weekly slot.
///
/// Replies privately with one of:
/// - "There is no pub scheduled" when no pub event starts at the next slot
/// - "No information about ..." when the event location is not a configured pub
/// - the pub announcement with its link buttons
pub async fn info<P: Platform, Tz: TimeZone>(
    platform: &P,
    config: &PubConfig,
    now: &DateTime<Tz>,
) -> Result<(), anyhow::Error> {
    info!("{} used /pub info", platform.user_name());

    let pub_time = next_configured_pub_time(now, config).ok_or(PubError::InvalidLocalTime)?;
    let events = platform.scheduled_events().await?;

    let Some(event) = find_pub_event(&events, &pub_time) else {
        info!("there is no scheduled pub");
        return platform
            .reply(OutgoingMessage::text(format_no_pub_scheduled()))
            .await;
    };

    let location = event.location.as_deref();
    let message = match location.and_then(|location| config.find_pub(location)) {
        Some(pub_info) => format_announcement(pub_info, &event.start_time, Occasion::NextWeek),
        None => OutgoingMessage::text(format_unknown_location(location)),
    };

    platform.reply(message).await
}

/// Chooses the pub for the next weekly slot and announces it.
///
/// Does nothing but reply "A pub event already exists." when the slot
/// already has a pub event. The check is repeated once the user has chosen,
/// since the prompt can stay open for minutes.
pub async fn next<P: Platform, Tz: TimeZone>(
    platform: &P,
    config: &PubConfig,
    now: &DateTime<Tz>,
) -> Result<(), anyhow::Error>
where
    Tz::Offset: std::fmt::Display,
{
    info!("{} used /pub next", platform.user_name());

    let pub_time = next_configured_pub_time(now, config).ok_or(PubError::InvalidLocalTime)?;

    if pub_event_exists(platform, &pub_time).await? {
        return platform
            .reply(OutgoingMessage::text(format_event_exists()))
            .await;
    }

    let pub_info = choose_pub(platform, &format_next_prompt(&pub_time), &config.pubs).await?;

    // Someone else may have scheduled the pub while the prompt was open
    if pub_event_exists(platform, &pub_time).await? {
        return platform
            .reply(OutgoingMessage::text(format_event_exists()))
            .await;
    }

    announce(platform, config, &pub_info, &pub_time, Occasion::NextWeek).await
}

/// Chooses a pub and announces a spontaneous outing starting now.
///
/// The clock is read once the user has chosen, as the prompt can stay open
/// for minutes. The event starts one second later so that Discord does not
/// reject a start time in the past.
pub async fn now<P, Tz, C>(
    platform: &P,
    config: &PubConfig,
    clock: C,
) -> Result<(), anyhow::Error>
where
    P: Platform,
    Tz: TimeZone,
    C: Fn() -> DateTime<Tz>,
{
    info!("{} used /pub now", platform.user_name());

    let pub_info = choose_pub(platform, &format_now_prompt(), &config.pubs).await?;
    let pub_time = clock() + Duration::seconds(1);

    announce(platform, config, &pub_info, &pub_time, Occasion::RightNow).await
}

async fn pub_event_exists<P: Platform, Tz: TimeZone>(
    platform: &P,
    pub_time: &DateTime<Tz>,
) -> Result<bool, anyhow::Error> {
    let events = platform.scheduled_events().await?;
    let exists = find_pub_event(&events, pub_time).is_some();
    if exists {
        info!("a pub event already exists");
    }
    Ok(exists)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use chrono::Utc;

    use super::*;
    use crate::{
        config::PubInfo,
        platform::{MockPlatform, ScheduledEvent},
    };

    fn create_pubs() -> Vec<PubInfo> {
        vec![
            PubInfo {
                name: "The Crown".to_string(),
                emoji: "👑".to_string(),
                map_url: "https://maps.example.com/crown".to_string(),
                menu_url: Some("https://crown.example.com/menu".to_string()),
                fake: None,
            },
            PubInfo {
                name: "The Moon".to_string(),
                emoji: "🌙".to_string(),
                map_url: "https://maps.example.com/moon".to_string(),
                menu_url: None,
                fake: Some("1234".to_string()),
            },
        ]
    }

    fn create_config() -> PubConfig {
        PubConfig {
            weekday: 4,
            hour: 19,
            minute: 0,
            channel_id: 42,
            description: "Weekly pub".to_string(),
            selection_timeout: 180,
            pubs: create_pubs(),
        }
    }

    /// Monday 4 March 2024, 10:00
    fn monday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap()
    }

    /// Friday 8 March 2024, 19:00
    fn friday_pub_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 8, 19, 0, 0).unwrap()
    }

    fn create_pub_event(location: &str) -> ScheduledEvent {
        ScheduledEvent {
            name: "👑 Pub 👑".to_string(),
            start_time: friday_pub_time(),
            location: Some(location.to_string()),
        }
    }

    fn create_mock_platform() -> MockPlatform {
        let mut mock_platform = MockPlatform::new();
        mock_platform
            .expect_user_name()
            .returning(|| "alice".to_string());
        mock_platform
    }

    #[tokio::test]
    async fn test_info_no_pub_scheduled() {
        let mut mock_platform = create_mock_platform();
        mock_platform
            .expect_scheduled_events()
            .times(1)
            .returning(|| Ok(vec![]));
        mock_platform
            .expect_reply()
            .withf(|message| message.content == "There is no pub scheduled")
            .times(1)
            .returning(|_| Ok(()));

        info(&mock_platform, &create_config(), &monday_morning())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_info_ignores_other_weeks() {
        let mut mock_platform = create_mock_platform();
        mock_platform.expect_scheduled_events().returning(|| {
            let mut event = create_pub_event("The Crown");
            event.start_time = event.start_time - Duration::days(7);
            Ok(vec![event])
        });
        mock_platform
            .expect_reply()
            .withf(|message| message.content == "There is no pub scheduled")
            .times(1)
            .returning(|_| Ok(()));

        info(&mock_platform, &create_config(), &monday_morning())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_info_unknown_pub() {
        let mut mock_platform = create_mock_platform();
        mock_platform
            .expect_scheduled_events()
            .returning(|| Ok(vec![create_pub_event("The Anchor")]));
        mock_platform
            .expect_reply()
            .withf(|message| {
                message.content == "No information about The Anchor" && message.links.is_empty()
            })
            .times(1)
            .returning(|_| Ok(()));

        info(&mock_platform, &create_config(), &monday_morning())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_info_event_without_location() {
        let mut mock_platform = create_mock_platform();
        mock_platform.expect_scheduled_events().times(1).returning(|| {
            Ok(vec![ScheduledEvent {
                location: None,
                ..create_pub_event("")
            }])
        });
        mock_platform
            .expect_reply()
            .withf(|message| message.content == "No information about this event")
            .times(1)
            .returning(|_| Ok(()));

        info(&mock_platform, &create_config(), &monday_morning())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_info_known_pub() {
        let mut mock_platform = create_mock_platform();
        mock_platform
            .expect_scheduled_events()
            .returning(|| Ok(vec![create_pub_event("The Crown")]));
        mock_platform
            .expect_reply()
            .withf(|message| {
                message.content.contains("<t:1709924400:R>")
                    && message.content.contains("👑 **The Crown** 👑")
                    && message.links.len() == 2
            })
            .times(1)
            .returning(|_| Ok(()));
        mock_platform.expect_send_to_channel().never();

        info(&mock_platform, &create_config(), &monday_morning())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_next_event_already_exists() {
        let mut mock_platform = create_mock_platform();
        mock_platform
            .expect_scheduled_events()
            .times(1)
            .returning(|| Ok(vec![create_pub_event("The Crown")]));
        mock_platform
            .expect_reply()
            .withf(|message| message.content == "A pub event already exists.")
            .times(1)
            .returning(|_| Ok(()));
        mock_platform.expect_choose_pub().never();
        mock_platform.expect_create_scheduled_event().never();
        mock_platform.expect_send_to_channel().never();

        next(&mock_platform, &create_config(), &monday_morning())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_next_creates_event() {
        let crown = create_pubs()[0].clone();

        let mut mock_platform = create_mock_platform();
        mock_platform
            .expect_scheduled_events()
            .times(2)
            .returning(|| Ok(vec![]));
        mock_platform
            .expect_choose_pub()
            .withf(|prompt, pubs| {
                prompt == "Please choose the pub for 2024-03-08 19:00:00 UTC" && pubs.len() == 2
            })
            .times(1)
            .returning(move |_, _| Ok(crown.clone()));
        mock_platform
            .expect_create_scheduled_event()
            .withf(|event| event.start_time == friday_pub_time() && event.location == "The Crown")
            .times(1)
            .returning(|_| Ok(()));
        mock_platform
            .expect_send_to_channel()
            .withf(|channel_id, message| {
                *channel_id == 42 && message.content.starts_with("**Pub Next Week**")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        mock_platform.expect_reply().never();

        next(&mock_platform, &create_config(), &monday_morning())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_next_fake_pub() {
        let moon = create_pubs()[1].clone();

        let mut mock_platform = create_mock_platform();
        mock_platform
            .expect_scheduled_events()
            .returning(|| Ok(vec![]));
        mock_platform
            .expect_choose_pub()
            .times(1)
            .returning(move |_, _| Ok(moon.clone()));
        mock_platform.expect_create_scheduled_event().never();
        mock_platform
            .expect_send_to_channel()
            .withf(|_, message| message.content == "Oi <@1234>, can we go to The Moon next week?")
            .times(1)
            .returning(|_, _| Ok(()));

        next(&mock_platform, &create_config(), &monday_morning())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_next_event_created_while_choosing() {
        let crown = create_pubs()[0].clone();
        let lookups = Arc::new(AtomicUsize::new(0));

        let mut mock_platform = create_mock_platform();
        mock_platform
            .expect_scheduled_events()
            .times(2)
            .returning(move || match lookups.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(vec![]),
                _ => Ok(vec![create_pub_event("The Moon")]),
            });
        mock_platform
            .expect_choose_pub()
            .times(1)
            .returning(move |_, _| Ok(crown.clone()));
        mock_platform
            .expect_reply()
            .withf(|message| message.content == "A pub event already exists.")
            .times(1)
            .returning(|_| Ok(()));
        mock_platform.expect_create_scheduled_event().never();
        mock_platform.expect_send_to_channel().never();

        next(&mock_platform, &create_config(), &monday_morning())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_next_selection_timeout() {
        let mut mock_platform = create_mock_platform();
        mock_platform
            .expect_scheduled_events()
            .times(1)
            .returning(|| Ok(vec![]));
        mock_platform
            .expect_choose_pub()
            .times(1)
            .returning(|_, _| Err(PubError::SelectionTimedOut.into()));
        mock_platform.expect_create_scheduled_event().never();
        mock_platform.expect_send_to_channel().never();
        mock_platform.expect_reply().never();

        let error = next(&mock_platform, &create_config(), &monday_morning())
            .await
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<PubError>(),
            Some(&PubError::SelectionTimedOut)
        );
    }

    #[tokio::test]
    async fn test_now_ignores_existing_event() {
        let crown = create_pubs()[0].clone();
        let now_time = friday_pub_time();

        let mut mock_platform = create_mock_platform();
        mock_platform.expect_scheduled_events().never();
        mock_platform
            .expect_choose_pub()
            .withf(|prompt, _| prompt == "Please choose the spontaneous pub")
            .times(1)
            .returning(move |_, _| Ok(crown.clone()));
        mock_platform
            .expect_create_scheduled_event()
            .withf(move |event| {
                event.start_time == now_time + Duration::seconds(1)
                    && event.end_time == now_time + Duration::seconds(1) + Duration::hours(3)
                    && event.name == "👑 Spontaneous Pub 👑"
            })
            .times(1)
            .returning(|_| Ok(()));
        mock_platform
            .expect_send_to_channel()
            .withf(|_, message| {
                message.content.starts_with("**Pub Right Now**")
                    && !message.content.contains("please mark")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        now(&mock_platform, &create_config(), move || now_time)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_now_reads_clock_after_choice() {
        let crown = create_pubs()[0].clone();
        let started_at = friday_pub_time();
        let elapsed_seconds = Arc::new(AtomicUsize::new(0));

        let mut mock_platform = create_mock_platform();
        let choice_seconds = elapsed_seconds.clone();
        mock_platform
            .expect_choose_pub()
            .times(1)
            .returning(move |_, _| {
                // The user takes a minute to choose
                choice_seconds.fetch_add(60, Ordering::SeqCst);
                Ok(crown.clone())
            });
        mock_platform
            .expect_create_scheduled_event()
            .withf(move |event| event.start_time == started_at + Duration::seconds(61))
            .times(1)
            .returning(|_| Ok(()));
        mock_platform
            .expect_send_to_channel()
            .times(1)
            .returning(|_, _| Ok(()));

        let clock_seconds = elapsed_seconds.clone();
        let clock = move || {
            started_at + Duration::seconds(clock_seconds.load(Ordering::SeqCst) as i64)
        };
        now(&mock_platform, &create_config(), clock).await.unwrap();
    }

    #[tokio::test]
    async fn test_now_fake_pub() {
        let moon = create_pubs()[1].clone();

        let mut mock_platform = create_mock_platform();
        mock_platform
            .expect_choose_pub()
            .times(1)
            .returning(move |_, _| Ok(moon.clone()));
        mock_platform.expect_create_scheduled_event().never();
        mock_platform
            .expect_send_to_channel()
            .withf(|_, message| message.content == "Oi <@1234>, can we go to The Moon?")
            .times(1)
            .returning(|_, _| Ok(()));

        now(&mock_platform, &create_config(), monday_morning)
            .await
            .unwrap();
    }
}
