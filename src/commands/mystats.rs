//! Per-player claim stats.

use crate::commands::{acquire_stats_cooldown, release_stats_cooldown, render};
use crate::types::{Context, Error};
use gatebot::stats::{build_report, ReportKind, ReportOptions};
use poise::serenity_prelude as serenity;
use poise::ChoiceParameter;

/// Show claim stats for yourself or another player in this server.
#[poise::command(slash_command, guild_only)]
pub async fn mystats(
    context: Context<'_>,
    #[description = "Which stats to show (default: overview)"]
    kind: Option<ReportKind>,
    #[description = "Player to inspect (default: you)"]
    user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        context.say("❌ This command only works inside a server.").await?;
        return Ok(());
    };

    if !acquire_stats_cooldown(context, "mystats").await? {
        return Ok(());
    }

    context.defer().await?;

    let target = user.unwrap_or_else(|| context.author().clone());
    let kind = kind.unwrap_or(ReportKind::Overview);

    let repo = context.data().claim_repository();
    let snapshot = match repo.player_snapshot(&guild_id.to_string(), &target.id.to_string()).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(guild_id = %guild_id, user_id = %target.id, "Failed to load claims: {}", e);
            release_stats_cooldown(context, "mystats");
            context
                .send(poise::CreateReply::default().embed(render::error_embed("Failed to load claims.")))
                .await?;
            return Ok(());
        }
    };

    let now = chrono::Utc::now();
    let report = build_report(kind, &snapshot, ReportOptions::player(), now, &context.data().cards).await;

    let title = format!("{}'s {} stats", target.name, kind.name());
    context
        .send(poise::CreateReply::default().embed(render::report_embed(&title, &report)))
        .await?;

    Ok(())
}
