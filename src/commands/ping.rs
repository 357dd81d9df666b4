//! Ping command for bot health check.

use crate::types::{Context, Error};

/// Check that the bot is responsive.
#[poise::command(slash_command)]
pub async fn ping(context: Context<'_>) -> Result<(), Error> {
    let started = std::time::Instant::now();
    let reply = context.say("Pong! 🏓").await?;
    let elapsed = started.elapsed();

    reply
        .edit(
            context,
            poise::CreateReply::default().content(format!("Pong! 🏓 ({} ms)", elapsed.as_millis())),
        )
        .await?;
    Ok(())
}
