//! Weekly pub slot arithmetic.
//!
//! Computes when the next pub happens and finds the scheduled event
//! created for it, if any.

use chrono::{DateTime, Datelike, Days, LocalResult, NaiveTime, TimeZone, Timelike};
use log::debug;

use crate::{config::PubConfig, platform::ScheduledEvent};

/// Marker identifying pub events among the guild scheduled events.
///
/// Discord has no way to tag an event, so the title is the only hint.
const PUB_EVENT_MARKER: &str = "Pub";

/// Computes the next occurrence of the weekly pub slot at or after `now`.
///
/// The slot is the configured weekday (0 is Monday), hour and minute,
/// expressed in the time zone of `now`. If `now` is on the slot weekday at
/// exactly the slot time, the slot of the current week is returned.
///
/// # Returns
///
/// * `Some(DateTime)` - The start of the next pub
/// * `None` - The slot falls in a gap of the time zone (daylight saving change)
///
/// # Examples
///
/// ```
/// # use chrono::{TimeZone, Utc};
/// # use pubbot::pubs::schedule::next_pub_time;
/// // Monday 10:00, pub on Friday at 19:00
/// let now = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
/// let pub_time = next_pub_time(&now, 4, 19, 0).unwrap();
/// assert_eq!(pub_time, Utc.with_ymd_and_hms(2024, 3, 8, 19, 0, 0).unwrap());
/// ```
pub fn next_pub_time<Tz: TimeZone>(
    now: &DateTime<Tz>,
    weekday: u32,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Tz>> {
    let today = now.date_naive();
    let today_weekday = today.weekday().num_days_from_monday();

    let monday = if today_weekday < weekday
        || (today_weekday == weekday && (now.hour(), now.minute()) <= (hour, minute))
    {
        // The pub has not happened yet this week
        today.checked_sub_days(Days::new(today_weekday.into()))?
    } else {
        // The pub is over, look at next week
        today.checked_add_days(Days::new((7 - today_weekday).into()))?
    };
    let pub_day = monday.checked_add_days(Days::new(weekday.into()))?;
    let pub_time = pub_day.and_time(NaiveTime::from_hms_opt(hour, minute, 0)?);

    match now.timezone().from_local_datetime(&pub_time) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => None,
    }
}

/// Computes the next pub time for the configured weekly slot.
pub fn next_configured_pub_time<Tz: TimeZone>(
    now: &DateTime<Tz>,
    config: &PubConfig,
) -> Option<DateTime<Tz>> {
    next_pub_time(now, config.weekday, config.hour, config.minute)
}

/// Tells whether a scheduled event is a pub event.
pub fn is_pub_event(event: &ScheduledEvent) -> bool {
    event.name.contains(PUB_EVENT_MARKER)
}

/// Finds the pub event starting exactly at `pub_time`.
///
/// Returns the first matching event in iteration order.
pub fn find_pub_event<'a, Tz: TimeZone>(
    events: &'a [ScheduledEvent],
    pub_time: &DateTime<Tz>,
) -> Option<&'a ScheduledEvent> {
    let event = events
        .iter()
        .find(|event| is_pub_event(event) && event.start_time == *pub_time);

    debug!(
        "pub event at {:?} among {} events: {:?}",
        pub_time,
        events.len(),
        event
    );

    event
}
