//! Administrative claim wipe.

use crate::types::{Context, Error};

/// Delete every recorded claim in this server.
///
/// Restricted to administrators. The server id must be typed as confirmation.
#[poise::command(slash_command, guild_only, default_member_permissions = "ADMINISTRATOR")]
pub async fn nuke(
    context: Context<'_>,
    #[description = "Type this server's id to confirm"]
    confirm: String,
) -> Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        context.say("❌ This command only works inside a server.").await?;
        return Ok(());
    };

    if confirm.trim() != guild_id.to_string() {
        context
            .send(
                poise::CreateReply::default()
                    .content("❌ Confirmation does not match this server's id. Nothing was deleted.")
                    .ephemeral(true),
            )
            .await?;
        return Ok(());
    }

    context.defer().await?;

    match context.data().claim_repository().nuke_guild(&guild_id.to_string()).await {
        Ok(removed) => {
            tracing::info!(
                guild_id = %guild_id,
                user_id = %context.author().id,
                removed,
                "claims nuked by administrator"
            );
            context
                .say(format!("💥 Deleted {} claim{} from this server.", removed, if removed == 1 { "" } else { "s" }))
                .await?;
        }
        Err(e) => {
            tracing::error!(guild_id = %guild_id, "Failed to nuke claims: {}", e);
            context.say(format!("❌ Failed to delete claims: {}", e)).await?;
        }
    }

    Ok(())
}
