//! Discord bot commands.
//!
//! This module contains all available bot commands organized by functionality.

pub mod card;
pub mod leaderboard;
pub mod mystats;
pub mod nuke;
pub mod ping;
pub mod render;
pub mod serverstats;

pub use card::card;
pub use leaderboard::leaderboard;
pub use mystats::mystats;
pub use nuke::nuke;
pub use ping::ping;
pub use serverstats::serverstats;

use crate::types::{Context, Error};
use gatebot::cooldown::{command_key, format_remaining};

/// Start the stats cooldown for the invoking user.
///
/// Replies with the remaining wait and returns `false` while a cooldown is running.
pub async fn acquire_stats_cooldown(context: Context<'_>, command: &str) -> Result<bool, Error> {
    let data = context.data();
    let key = command_key(command, context.author().id.get());

    match data.cooldowns.try_acquire(&key, data.stats_cooldown) {
        Ok(()) => Ok(true),
        Err(remaining) => {
            context
                .send(
                    poise::CreateReply::default()
                        .content(format!(
                            "⏳ `/{}` is on cooldown. Please wait {}.",
                            command,
                            format_remaining(remaining)
                        ))
                        .ephemeral(true),
                )
                .await?;
            Ok(false)
        }
    }
}

/// Drop the invoking user's stats cooldown so a failed command can be retried at once.
pub fn release_stats_cooldown(context: Context<'_>, command: &str) {
    let key = command_key(command, context.author().id.get());
    context.data().cooldowns.reset(&key);
}
