//! Server-wide claim stats.

use crate::commands::{acquire_stats_cooldown, release_stats_cooldown, render};
use crate::types::{Context, Error};
use gatebot::stats::{build_report, ReportKind, ReportOptions};
use poise::ChoiceParameter;

/// Show claim stats for the whole server.
#[poise::command(slash_command, guild_only)]
pub async fn serverstats(
    context: Context<'_>,
    #[description = "Which stats to show (default: overview)"]
    kind: Option<ReportKind>,
) -> Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        context.say("❌ This command only works inside a server.").await?;
        return Ok(());
    };

    if !acquire_stats_cooldown(context, "serverstats").await? {
        return Ok(());
    }

    context.defer().await?;

    let kind = kind.unwrap_or(ReportKind::Overview);

    let snapshot = match context.data().claim_repository().guild_snapshot(&guild_id.to_string()).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(guild_id = %guild_id, "Failed to load claims: {}", e);
            release_stats_cooldown(context, "serverstats");
            context
                .send(poise::CreateReply::default().embed(render::error_embed("Failed to load claims.")))
                .await?;
            return Ok(());
        }
    };

    let now = chrono::Utc::now();
    let report = build_report(kind, &snapshot, ReportOptions::server(), now, &context.data().cards).await;

    let server_name = context
        .guild()
        .map(|guild| guild.name.clone())
        .unwrap_or_else(|| "Server".to_string());
    let title = format!("{} {} stats", server_name, kind.name());
    context
        .send(poise::CreateReply::default().embed(render::report_embed(&title, &report)))
        .await?;

    Ok(())
}
