//! Mazoku API integration.
//!
//! This module provides card metadata lookups against the Mazoku REST API,
//! plus an in-memory cache that keeps fetched cards for a fixed time-to-live.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{GateError, Result};
use crate::utils::validation::validate_card_id;

/// Card metadata returned by the Mazoku API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardMetadata {
    /// Card identifier
    pub id: String,
    /// Character or card name
    pub name: String,
    /// Series the card belongs to
    #[serde(default)]
    pub series: Option<String>,
    /// Card artwork
    #[serde(default)]
    pub image_url: Option<String>,
    /// Tier name as reported by Mazoku
    #[serde(default)]
    pub tier: Option<String>,
}

/// Something that can resolve a card id into metadata.
///
/// The stats reports take this as an injected capability so they can be
/// exercised without the network.
#[async_trait]
pub trait CardLookup: Send + Sync {
    async fn fetch_card(&self, card_id: &str) -> Result<CardMetadata>;
}

/// HTTP client for the Mazoku REST API.
#[derive(Debug, Clone)]
pub struct MazokuClient {
    http: reqwest::Client,
    base_url: String,
}

impl MazokuClient {
    /// Create a client for the API rooted at `base_url` (no trailing slash needed).
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Fetch a card by id.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::ServersUnavailable`] when Mazoku answers 400, 404 or 500,
    /// [`GateError::MazokuApi`] for any other failure status or a malformed body,
    /// and [`GateError::Validation`] for an unusable card id.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gatebot::mazoku::MazokuClient;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = MazokuClient::new(reqwest::Client::new(), "https://api.mazoku.cc");
    /// let card = client.get_card("0f3c2a").await?;
    /// println!("{} from {:?}", card.name, card.series);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_card(&self, card_id: &str) -> Result<CardMetadata> {
        validate_card_id(card_id)?;

        let url = format!("{}/cards/{}", self.base_url, card_id);
        let resp = self.http.get(&url).send().await
            .map_err(|e| GateError::Network(format!("Mazoku request failed: {}", e)))?;

        let status = resp.status();
        if status.is_success() {
            resp.json::<CardMetadata>().await
                .map_err(|e| GateError::MazokuApi(format!("Invalid response: {}", e)))
        } else {
            Err(classify_status(status.as_u16()))
        }
    }
}

#[async_trait]
impl CardLookup for MazokuClient {
    async fn fetch_card(&self, card_id: &str) -> Result<CardMetadata> {
        self.get_card(card_id).await
    }
}

/// Map a failing HTTP status to an error.
///
/// Mazoku signals outages with 400, 404 and 500, so those become
/// [`GateError::ServersUnavailable`].
pub fn classify_status(status: u16) -> GateError {
    match status {
        400 | 404 | 500 => GateError::ServersUnavailable(status),
        other => GateError::MazokuApi(format!("API returned error: {}", other)),
    }
}

struct CacheEntry {
    fetched_at: Instant,
    card: CardMetadata,
}

/// Card lookup with a time-to-live cache in front of another lookup.
///
/// Stale entries are dropped when they are read or when a new card is stored,
/// there is no background sweep.
pub struct CachedCardLookup<L> {
    inner: L,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<L: CardLookup> CachedCardLookup<L> {
    pub fn new(inner: L, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn cached_at(&self, card_id: &str, now: Instant) -> Option<CardMetadata> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match entries.get(card_id) {
            Some(entry) if now.saturating_duration_since(entry.fetched_at) < self.ttl => {
                Some(entry.card.clone())
            }
            Some(_) => {
                entries.remove(card_id);
                None
            }
            None => None,
        }
    }

    fn store_at(&self, card: CardMetadata, card_id: &str, now: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.retain(|_, entry| now.saturating_duration_since(entry.fetched_at) < self.ttl);
        entries.insert(card_id.to_string(), CacheEntry { fetched_at: now, card });
    }

    /// Number of cached entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<L: CardLookup> CardLookup for CachedCardLookup<L> {
    async fn fetch_card(&self, card_id: &str) -> Result<CardMetadata> {
        if let Some(card) = self.cached_at(card_id, Instant::now()) {
            tracing::debug!(card_id, "card metadata served from cache");
            return Ok(card);
        }

        let card = self.inner.fetch_card(card_id).await?;
        self.store_at(card.clone(), card_id, Instant::now());
        Ok(card)
    }
}
