use crate::types::{Data, Error};
use crate::commands::{card, leaderboard, mystats, nuke, ping, serverstats};
use gatebot::config::Config;
use gatebot::cooldown::CooldownStore;
use gatebot::database;
use gatebot::mazoku::{CachedCardLookup, MazokuClient};
use poise::serenity_prelude as serenity;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;

    let intents = serenity::GatewayIntents::non_privileged();

    // Initialize DB (creates file and tables if needed)
    database::init_db(&config.db_path).await?;
    tracing::info!(db_path = %config.db_path, "claim store ready");

    let http_client = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("gatebot/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let data = Data {
        db_path: config.db_path.clone(),
        cards: CachedCardLookup::new(
            MazokuClient::new(http_client, config.mazoku_api_url.clone()),
            config.card_cache_ttl,
        ),
        cooldowns: CooldownStore::new(),
        stats_cooldown: config.stats_cooldown,
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![ping(), mystats(), serverstats(), leaderboard(), card(), nuke()],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |context, ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot logged in as {}", ready.user.name);
                poise::builtins::register_globally(context, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    tracing::info!("Starting Discord bot...");
    client.start().await?;

    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(command = %ctx.command().name, "Command failed: {}", error);
            if let Err(e) = ctx.say("❌ Something went wrong while running this command.").await {
                tracing::error!("Failed to report command error: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}
