//! Claim store.
//!
//! This module provides a repository over SQLite for claim events: ingestion,
//! per-guild and per-player snapshots, leaderboards and the administrative
//! guild wipe.

use rusqlite::{params, Connection};
use crate::error::{GateError, Result};
use crate::stats::{parse_timestamp, Claim, ClaimSnapshot, Tier};
use crate::utils::validation::{validate_card_id, validate_print, validate_snowflake, validate_tier};
use std::path::Path;

/// Claims kept per tier, both per guild and per player. Older ones are trimmed;
/// the lifetime counters keep counting.
pub const RETAINED_PER_TIER: i64 = 100;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub owner: String,
    pub claims: u64,
}

/// Initialize the database schema.
///
/// Creates the necessary tables and indices if they don't already exist.
/// Also creates the parent directory if needed.
///
/// # Errors
///
/// Returns an error if the database cannot be created or initialized.
pub async fn init_db(path: &str) -> Result<()> {
    let path = path.to_string();
    tokio::task::spawn_blocking(move || init_db_sync(&path))
        .await
        .map_err(|e| GateError::Database(format!("Task join error: {}", e)))??;
    Ok(())
}

fn init_db_sync(path: &str) -> Result<()> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;

    // Claim events; trimmed to the newest RETAINED_PER_TIER per tier
    conn.execute(
        "CREATE TABLE IF NOT EXISTS claims (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            guild_id TEXT NOT NULL,
            owner TEXT NOT NULL,
            card_id TEXT NOT NULL,
            card_name TEXT NOT NULL,
            tier TEXT NOT NULL,
            print INTEGER NOT NULL CHECK (print >= 1),
            timestamp TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_claims_guild_tier ON claims(guild_id, tier, id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_claims_guild_owner ON claims(guild_id, owner, tier, id)",
        [],
    )?;

    // Lifetime claim counters, never trimmed
    conn.execute(
        "CREATE TABLE IF NOT EXISTS claim_counts (
            guild_id TEXT NOT NULL,
            owner TEXT NOT NULL,
            tier TEXT NOT NULL,
            count INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (guild_id, owner, tier)
        )",
        [],
    )?;

    Ok(())
}

/// Canonical tier name for storage: known tiers upper-cased, others trimmed.
fn normalize_tier(tier: &str) -> String {
    match Tier::parse(tier) {
        Some(known) => known.as_str().to_string(),
        None => tier.trim().to_string(),
    }
}

/// Repository for claim database operations.
pub struct ClaimRepository {
    db_path: String,
}

impl ClaimRepository {
    /// Create a new claim repository.
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// Run `op` against a fresh connection on the blocking pool.
    async fn with_connection<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = Connection::open(&db_path)
                .map_err(|e| GateError::Database(format!("Failed to connect to database: {}", e)))?;
            op(&mut conn)
        })
        .await
        .map_err(|e| GateError::Database(format!("Task join error: {}", e)))?
    }

    /// Record a claim in a guild.
    ///
    /// Appends the claim, bumps the owner's lifetime counter for its tier, then
    /// trims claims that have fallen out of both the guild's and their owner's
    /// newest [`RETAINED_PER_TIER`] for that tier.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a print below 1, a malformed card id,
    /// guild id or owner id, a blank tier, or an unparseable timestamp.
    pub async fn record_claim(&self, guild_id: &str, claim: Claim) -> Result<()> {
        validate_snowflake(guild_id)?;
        validate_snowflake(&claim.owner)?;
        validate_card_id(&claim.card_id)?;
        validate_print(claim.print)?;
        validate_tier(&claim.tier)?;
        parse_timestamp(&claim.timestamp)
            .map_err(|e| GateError::Validation(e.to_string()))?;

        let guild_id = guild_id.to_string();
        let tier = normalize_tier(&claim.tier);

        self.with_connection(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO claims (guild_id, owner, card_id, card_name, tier, print, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    guild_id,
                    claim.owner,
                    claim.card_id,
                    claim.card_name,
                    tier,
                    claim.print,
                    claim.timestamp,
                ],
            )?;

            tx.execute(
                "INSERT INTO claim_counts (guild_id, owner, tier, count)
                 VALUES (?1, ?2, ?3, 1)
                 ON CONFLICT(guild_id, owner, tier) DO UPDATE SET count = count + 1",
                params![guild_id, claim.owner, tier],
            )?;

            let trimmed = tx.execute(
                "DELETE FROM claims
                 WHERE guild_id = ?1 AND tier = ?2
                   AND id NOT IN (
                       SELECT id FROM claims
                       WHERE guild_id = ?1 AND tier = ?2
                       ORDER BY id DESC LIMIT ?3
                   )
                   AND id NOT IN (
                       SELECT newer.id FROM claims AS newer
                       WHERE newer.guild_id = ?1 AND newer.tier = ?2
                         AND newer.owner = claims.owner
                       ORDER BY newer.id DESC LIMIT ?3
                   )",
                params![guild_id, tier, RETAINED_PER_TIER],
            )?;

            tx.commit()?;

            if trimmed > 0 {
                tracing::debug!(guild_id = %guild_id, tier = %tier, trimmed, "trimmed old claims");
            }
            Ok(())
        })
        .await
    }

    /// Newest claims of every tier in a guild, with the guild's lifetime counts.
    pub async fn guild_snapshot(&self, guild_id: &str) -> Result<ClaimSnapshot> {
        let guild_id = guild_id.to_string();
        self.with_connection(move |conn| {
            let mut snapshot = ClaimSnapshot::new();

            let mut stmt = conn.prepare(
                "SELECT owner, card_id, card_name, tier, print, timestamp FROM (
                     SELECT *, ROW_NUMBER() OVER (PARTITION BY tier ORDER BY id DESC) AS rn
                     FROM claims WHERE guild_id = ?1
                 ) WHERE rn <= ?2 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![guild_id, RETAINED_PER_TIER], row_to_claim)?;
            for claim in rows {
                snapshot.push(claim?);
            }

            let mut stmt = conn.prepare(
                "SELECT tier, SUM(count) FROM claim_counts WHERE guild_id = ?1 GROUP BY tier",
            )?;
            let totals = stmt.query_map(params![guild_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for total in totals {
                let (tier, count) = total?;
                snapshot.set_total(&tier, count.max(0) as u64);
            }

            Ok(snapshot)
        })
        .await
    }

    /// Newest claims of every tier by one player in a guild, with their lifetime counts.
    pub async fn player_snapshot(&self, guild_id: &str, owner: &str) -> Result<ClaimSnapshot> {
        let guild_id = guild_id.to_string();
        let owner = owner.to_string();
        self.with_connection(move |conn| {
            let mut snapshot = ClaimSnapshot::new();

            let mut stmt = conn.prepare(
                "SELECT owner, card_id, card_name, tier, print, timestamp FROM (
                     SELECT *, ROW_NUMBER() OVER (PARTITION BY tier ORDER BY id DESC) AS rn
                     FROM claims WHERE guild_id = ?1 AND owner = ?2
                 ) WHERE rn <= ?3 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![guild_id, owner, RETAINED_PER_TIER], row_to_claim)?;
            for claim in rows {
                snapshot.push(claim?);
            }

            let mut stmt = conn.prepare(
                "SELECT tier, count FROM claim_counts WHERE guild_id = ?1 AND owner = ?2",
            )?;
            let totals = stmt.query_map(params![guild_id, owner], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for total in totals {
                let (tier, count) = total?;
                snapshot.set_total(&tier, count.max(0) as u64);
            }

            Ok(snapshot)
        })
        .await
    }

    /// Top claimers in a guild, optionally for one tier.
    ///
    /// Ordered by claim count, ties broken by owner id.
    pub async fn leaderboard(
        &self,
        guild_id: &str,
        tier: Option<&str>,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>> {
        let guild_id = guild_id.to_string();
        let tier = tier.map(normalize_tier);
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT owner, SUM(count) AS total FROM claim_counts
                 WHERE guild_id = ?1 AND (?2 IS NULL OR tier = ?2)
                 GROUP BY owner
                 HAVING total > 0
                 ORDER BY total DESC, owner ASC
                 LIMIT ?3",
            )?;

            let rows = stmt.query_map(params![guild_id, tier, limit], |row| {
                Ok(LeaderboardEntry {
                    owner: row.get(0)?,
                    claims: row.get::<_, i64>(1)?.max(0) as u64,
                })
            })?;

            let mut entries = Vec::new();
            for entry in rows {
                entries.push(entry?);
            }
            Ok(entries)
        })
        .await
    }

    /// Delete every claim and counter of a guild. Returns the number of claims removed.
    pub async fn nuke_guild(&self, guild_id: &str) -> Result<usize> {
        let guild_id = guild_id.to_string();
        self.with_connection(move |conn| {
            let tx = conn.transaction()?;
            let removed = tx.execute("DELETE FROM claims WHERE guild_id = ?1", params![guild_id])?;
            tx.execute("DELETE FROM claim_counts WHERE guild_id = ?1", params![guild_id])?;
            tx.commit()?;
            tracing::info!(guild_id = %guild_id, removed, "guild claims nuked");
            Ok(removed)
        })
        .await
    }
}

fn row_to_claim(row: &rusqlite::Row<'_>) -> rusqlite::Result<Claim> {
    Ok(Claim {
        owner: row.get(0)?,
        card_id: row.get(1)?,
        card_name: row.get(2)?,
        tier: row.get(3)?,
        print: row.get(4)?,
        timestamp: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    const GUILD: &str = "111111111111111111";
    const OTHER_GUILD: &str = "222222222222222222";

    /// Helper function to create a test database in a temporary directory
    async fn setup_test_db() -> (TempDir, ClaimRepository) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested").join("test.db");
        let db_path_str = db_path.to_str().expect("Invalid path").to_string();

        init_db(&db_path_str).await.expect("Failed to initialize database");

        let repo = ClaimRepository::new(db_path_str);
        (temp_dir, repo)
    }

    fn claim(owner: &str, tier: &str, print: i64, seq: i64) -> Claim {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Claim {
            owner: owner.to_string(),
            card_id: format!("card{}", seq),
            card_name: format!("Card {}", seq),
            tier: tier.to_string(),
            print,
            timestamp: (base + Duration::seconds(seq)).to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_record_and_snapshot() {
        let (_temp_dir, repo) = setup_test_db().await;

        repo.record_claim(GUILD, claim("1", "ct", 900, 1)).await.unwrap();
        repo.record_claim(GUILD, claim("1", "SSRT", 4, 2)).await.unwrap();
        repo.record_claim(GUILD, claim("2", "CT", 45, 3)).await.unwrap();
        repo.record_claim(OTHER_GUILD, claim("1", "RT", 10, 4)).await.unwrap();

        let guild = repo.guild_snapshot(GUILD).await.unwrap();
        assert_eq!(guild.total(), 3);
        assert_eq!(guild.bucket("CT").len(), 2);
        // Insertion order is preserved within a bucket
        assert_eq!(guild.bucket("CT")[0].print, 900);
        assert_eq!(guild.bucket("CT")[1].print, 45);
        assert_eq!(guild.bucket("SSRT").len(), 1);
        assert!(guild.bucket("RT").is_empty());

        let player = repo.player_snapshot(GUILD, "1").await.unwrap();
        assert_eq!(player.total(), 2);
        assert_eq!(player.total_for("CT"), 1);
        assert_eq!(player.bucket("SSRT")[0].card_id, "card2");
    }

    #[tokio::test]
    async fn test_record_claim_validation() {
        let (_temp_dir, repo) = setup_test_db().await;

        let zero_print = claim("1", "CT", 0, 1);
        assert!(matches!(repo.record_claim(GUILD, zero_print).await, Err(GateError::Validation(_))));

        let mut bad_time = claim("1", "CT", 5, 2);
        bad_time.timestamp = "last tuesday".to_string();
        assert!(matches!(repo.record_claim(GUILD, bad_time).await, Err(GateError::Validation(_))));

        assert!(repo.record_claim("not-a-guild", claim("1", "CT", 5, 3)).await.is_err());

        let blank_tier = claim("1", "  ", 5, 4);
        assert!(matches!(repo.record_claim(GUILD, blank_tier).await, Err(GateError::Validation(_))));

        let snapshot = repo.guild_snapshot(GUILD).await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_retention_keeps_lifetime_counts() {
        let (_temp_dir, repo) = setup_test_db().await;

        for seq in 0..(RETAINED_PER_TIER + 5) {
            repo.record_claim(GUILD, claim("1", "CT", 100 + seq, seq)).await.unwrap();
        }

        let snapshot = repo.guild_snapshot(GUILD).await.unwrap();
        let bucket = snapshot.bucket("CT");
        assert_eq!(bucket.len() as i64, RETAINED_PER_TIER);
        assert_eq!(bucket[0].print, 105);
        assert_eq!(snapshot.total_for("CT"), (RETAINED_PER_TIER + 5) as u64);
    }

    #[tokio::test]
    async fn test_retention_keeps_each_players_newest() {
        let (_temp_dir, repo) = setup_test_db().await;

        // Player 1 claims once, then player 2 floods the tier.
        repo.record_claim(GUILD, claim("1", "RT", 77, 0)).await.unwrap();
        for seq in 1..=RETAINED_PER_TIER {
            repo.record_claim(GUILD, claim("2", "RT", 200, seq)).await.unwrap();
        }

        let guild = repo.guild_snapshot(GUILD).await.unwrap();
        assert_eq!(guild.bucket("RT").len() as i64, RETAINED_PER_TIER);
        assert!(guild.bucket("RT").iter().all(|c| c.owner == "2"));

        let player = repo.player_snapshot(GUILD, "1").await.unwrap();
        assert_eq!(player.bucket("RT").len(), 1);
        assert_eq!(player.bucket("RT")[0].print, 77);
    }

    #[tokio::test]
    async fn test_leaderboard() {
        let (_temp_dir, repo) = setup_test_db().await;

        let mut seq = 0;
        for (owner, tier, times) in [("3", "CT", 2), ("1", "CT", 3), ("1", "SSRT", 1), ("2", "SSRT", 4)] {
            for _ in 0..times {
                seq += 1;
                repo.record_claim(GUILD, claim(owner, tier, 50, seq)).await.unwrap();
            }
        }

        let overall = repo.leaderboard(GUILD, None, 10).await.unwrap();
        assert_eq!(
            overall,
            vec![
                LeaderboardEntry { owner: "1".to_string(), claims: 4 },
                LeaderboardEntry { owner: "2".to_string(), claims: 4 },
                LeaderboardEntry { owner: "3".to_string(), claims: 2 },
            ]
        );

        let ssrt = repo.leaderboard(GUILD, Some("ssrt"), 1).await.unwrap();
        assert_eq!(ssrt, vec![LeaderboardEntry { owner: "2".to_string(), claims: 4 }]);

        assert!(repo.leaderboard(OTHER_GUILD, None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nuke_guild() {
        let (_temp_dir, repo) = setup_test_db().await;

        repo.record_claim(GUILD, claim("1", "CT", 5, 1)).await.unwrap();
        repo.record_claim(GUILD, claim("1", "RT", 6, 2)).await.unwrap();
        repo.record_claim(OTHER_GUILD, claim("1", "RT", 7, 3)).await.unwrap();

        assert_eq!(repo.nuke_guild(GUILD).await.unwrap(), 2);
        assert!(repo.guild_snapshot(GUILD).await.unwrap().is_empty());
        assert!(repo.leaderboard(GUILD, None, 10).await.unwrap().is_empty());

        // Other guilds are untouched
        assert_eq!(repo.guild_snapshot(OTHER_GUILD).await.unwrap().total(), 1);

        // Nuking an empty guild is not an error
        assert_eq!(repo.nuke_guild(GUILD).await.unwrap(), 0);
    }
}
