//! Interactive pub selection.

use log::info;

use crate::{config::PubInfo, platform::Platform};

/// Asks the invoking user to pick one of the configured pubs.
///
/// The prompt is only visible to the user. The call suspends until the user
/// answers and fails if the prompt expires, in which case the caller must
/// stop without announcing anything.
pub async fn choose_pub<P: Platform>(
    platform: &P,
    prompt: &str,
    pubs: &[PubInfo],
) -> Result<PubInfo, anyhow::Error> {
    let pub_info = platform.choose_pub(prompt, pubs).await?;
    info!("{} chose {}", platform.user_name(), pub_info.name);
    Ok(pub_info)
}
