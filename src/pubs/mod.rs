//! Weekly pub organisation.
//!
//! This module holds everything the `/pub` commands do, independently of the
//! chat platform:
//!
//! - [`schedule`] - next pub time computation and pub event lookup
//! - [`chooser`] - interactive pub selection
//! - [`announcer`] - scheduled event creation and channel announcements
//! - [`responses`] - Markdown formatting of every message
//! - [`flows`] - the `info`, `next` and `now` command flows
//!
//! # Flow
//!
//! ```text
//! Slash command → flows::{info, next, now} → Platform (Discord or mock)
//! ```

mod announcer;
mod chooser;
pub mod flows;
pub mod responses;
pub mod schedule;
