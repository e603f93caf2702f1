//! `/pub` subcommand handlers.
//!
//! Each handler wraps its invocation context in a
//! [`DiscordPlatform`](crate::platform::DiscordPlatform) and runs the flow of
//! the same name. Errors are left to the framework error handler.

mod info;
mod next;
mod now;

pub use crate::commands::actions::{info::info, next::next, now::now};
