//! Markdown response formatters for the pub commands.
//!
//! Every text the bot shows to users is built here. Times are rendered as
//! Discord relative timestamps (`<t:unix:R>`) so each reader sees them in
//! their own locale.

use chrono::{DateTime, TimeZone};

use crate::{
    config::PubInfo,
    platform::{LinkButton, OutgoingMessage},
};

/// When the announced outing takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occasion {
    /// The weekly pub of next week
    NextWeek,
    /// A spontaneous pub, starting right now
    RightNow,
}

/// Formats a time as a Discord relative timestamp.
///
/// # Examples
///
/// ```
/// # use chrono::{TimeZone, Utc};
/// # use pubbot::pubs::responses::format_relative_time;
/// let time = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
/// assert_eq!(format_relative_time(&time), "<t:1700000000:R>");
/// ```
pub fn format_relative_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    format!("<t:{}:R>", time.timestamp())
}

/// Formats a pub name decorated with its emoji on both sides.
pub fn format_pub_name(pub_info: &PubInfo) -> String {
    format!("{} **{}** {}", pub_info.emoji, pub_info.name, pub_info.emoji)
}

/// Formats the title of the scheduled event created for a pub.
pub fn format_event_title(pub_info: &PubInfo, occasion: Occasion) -> String {
    let title = match occasion {
        Occasion::NextWeek => "Pub",
        Occasion::RightNow => "Spontaneous Pub",
    };
    format!("{} {} {}", pub_info.emoji, title, pub_info.emoji)
}

/// Builds the link buttons of a pub: the map, then the menu if there is one.
pub fn pub_links(pub_info: &PubInfo) -> Vec<LinkButton> {
    let mut links = vec![LinkButton {
        label: "Map".to_owned(),
        url: pub_info.map_url.clone(),
    }];

    if let Some(menu_url) = &pub_info.menu_url {
        links.push(LinkButton {
            label: "Menu".to_owned(),
            url: menu_url.clone(),
        });
    }

    links
}

/// Formats the announcement of a pub, with its link buttons.
///
/// Used both for `/pub info` and for the channel announcement of a new event.
pub fn format_announcement<Tz: TimeZone>(
    pub_info: &PubInfo,
    start_time: &DateTime<Tz>,
    occasion: Occasion,
) -> OutgoingMessage {
    let relative_time = format_relative_time(start_time);
    let pub_name = format_pub_name(pub_info);

    let lines = match occasion {
        Occasion::NextWeek => [
            "**Pub Next Week**".to_owned(),
            format!("The next pub will be {}", relative_time),
            format!("It will be held at {}", pub_name),
            String::new(),
            "If you are coming, please mark 🔔 interest on the event!".to_owned(),
        ],
        Occasion::RightNow => [
            "**Pub Right Now**".to_owned(),
            format!("There is a pub right now: {}", relative_time),
            format!("It is being held at {}", pub_name),
            String::new(),
            "If you are coming, please don't waste time marking 🔔 interest on the event, \
            just go immediately!"
                .to_owned(),
        ],
    };

    OutgoingMessage::with_links(lines.join("\n"), pub_links(pub_info))
}

/// Formats the message posted when a joke pub is chosen.
///
/// The message mentions the user attached to the pub instead of scheduling
/// anything.
pub fn format_fake_pub(pub_info: &PubInfo, fake_user: &str, occasion: Occasion) -> OutgoingMessage {
    let when = match occasion {
        Occasion::NextWeek => " next week",
        Occasion::RightNow => "",
    };

    OutgoingMessage::with_links(
        format!("Oi <@{}>, can we go to {}{}?", fake_user, pub_info.name, when),
        pub_links(pub_info),
    )
}

/// Formats the prompt asking for next week's pub.
pub fn format_next_prompt<Tz: TimeZone>(pub_time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Please choose the pub for {}", pub_time)
}

/// Formats the prompt asking for a spontaneous pub.
pub fn format_now_prompt() -> String {
    "Please choose the spontaneous pub".to_owned()
}

/// Formats the confirmation shown once a pub is chosen.
pub fn format_pub_chosen(pub_info: &PubInfo) -> String {
    format!("You chose {}", format_pub_name(pub_info))
}

/// Formats the response when no pub event is scheduled.
pub fn format_no_pub_scheduled() -> String {
    "There is no pub scheduled".to_owned()
}

/// Formats the response when the pub of an event is not configured, or the
/// event has no location.
pub fn format_unknown_location(location: Option<&str>) -> String {
    format!("No information about {}", location.unwrap_or("this event"))
}

/// Replaces the pub prompt once it has expired.
pub fn format_selection_expired() -> String {
    "You did not choose a pub in time.".to_owned()
}

/// Formats the response when next week's pub event already exists.
pub fn format_event_exists() -> String {
    "A pub event already exists.".to_owned()
}
