//! Card lookup command.
//!
//! Looks up card metadata on the Mazoku API.

use crate::commands::render;
use crate::types::{Context, Error};
use gatebot::mazoku::CardLookup;
use gatebot::utils::validation::validate_card_id;
use gatebot::GateError;
use poise::serenity_prelude as serenity;

/// Look up a Mazoku card by its id.
#[poise::command(slash_command)]
pub async fn card(
    context: Context<'_>,
    #[description = "Mazoku card id"]
    #[min_length = 1]
    #[max_length = 64]
    id: String,
) -> Result<(), Error> {
    // Validate id format
    if let Err(e) = validate_card_id(&id) {
        context.say(format!("❌ {}", e)).await?;
        return Ok(());
    }

    context.defer().await?;

    match context.data().cards.fetch_card(&id).await {
        Ok(card) => {
            let mut embed = serenity::CreateEmbed::new()
                .title(&card.name)
                .field("ID", format!("`{}`", card.id), true)
                .color(0x3498db);
            if let Some(series) = &card.series {
                embed = embed.field("Series", series, true);
            }
            if let Some(tier) = &card.tier {
                embed = embed.field("Tier", tier, true);
            }
            if let Some(url) = &card.image_url {
                embed = embed.image(url);
            }
            context.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e @ GateError::ServersUnavailable(_)) => {
            tracing::warn!(card_id = %id, "Mazoku unavailable: {}", e);
            context
                .send(poise::CreateReply::default().embed(render::error_embed(
                    "Mazoku servers are unavailable right now. Please try again later.",
                )))
                .await?;
        }
        Err(e) => {
            tracing::warn!(card_id = %id, "Card lookup failed: {}", e);
            context
                .send(poise::CreateReply::default().embed(render::error_embed(
                    &format!("Failed to look up card `{}`.", id),
                )))
                .await?;
        }
    }

    Ok(())
}
