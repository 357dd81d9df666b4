//! Claim leaderboard.

use crate::commands::{acquire_stats_cooldown, render};
use crate::types::{Context, Error};
use gatebot::stats::Tier;
use poise::serenity_prelude as serenity;

const DEFAULT_LIMIT: u32 = 10;

/// Show the top claimers in this server.
#[poise::command(slash_command, guild_only)]
pub async fn leaderboard(
    context: Context<'_>,
    #[description = "Only count one tier (CT, RT, SRT, SSRT, URT, EXT)"]
    tier: Option<String>,
    #[description = "How many players to show (default: 10)"]
    #[min = 1]
    #[max = 25]
    limit: Option<u32>,
) -> Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        context.say("❌ This command only works inside a server.").await?;
        return Ok(());
    };

    let tier = match tier.as_deref().map(Tier::parse) {
        None => None,
        Some(Some(tier)) => Some(tier),
        Some(None) => {
            context
                .say("❌ Unknown tier. Use one of: CT, RT, SRT, SSRT, URT, EXT.")
                .await?;
            return Ok(());
        }
    };

    if !acquire_stats_cooldown(context, "leaderboard").await? {
        return Ok(());
    }

    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 25);
    let entries = match context
        .data()
        .claim_repository()
        .leaderboard(&guild_id.to_string(), tier.map(Tier::as_str), limit)
        .await
    {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(guild_id = %guild_id, "Failed to load leaderboard: {}", e);
            context
                .send(poise::CreateReply::default().embed(render::error_embed("Failed to load the leaderboard.")))
                .await?;
            return Ok(());
        }
    };

    let title = match tier {
        Some(tier) => format!("🏅 {} leaderboard", tier),
        None => "🏅 Claim leaderboard".to_string(),
    };
    let embed = serenity::CreateEmbed::new()
        .title(title)
        .description(render::leaderboard_description(&entries, tier))
        .color(0xf1c40f);

    context.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
