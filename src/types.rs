//! Type definitions and aliases for the bot.
//!
//! This module contains shared types used throughout the application.

use std::time::Duration;

use gatebot::cooldown::CooldownStore;
use gatebot::database::ClaimRepository;
use gatebot::mazoku::{CachedCardLookup, MazokuClient};

/// Bot application data shared across all commands.
///
/// This data is accessible in all command handlers through the context.
pub struct Data {
    /// Path to the SQLite database file
    pub db_path: String,
    /// Mazoku card lookups, cached
    pub cards: CachedCardLookup<MazokuClient>,
    /// Per-user command cooldowns
    pub cooldowns: CooldownStore,
    /// Cooldown applied to stats commands
    pub stats_cooldown: Duration,
}

impl Data {
    /// Create a new claim repository for database operations.
    pub fn claim_repository(&self) -> ClaimRepository {
        ClaimRepository::new(self.db_path.clone())
    }
}

/// Error type for bot commands (maintains compatibility with poise).
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type alias for easier usage.
pub type Context<'a> = poise::Context<'a, Data, Error>;
