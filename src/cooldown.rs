//! Per-key command cooldowns.
//!
//! Keys map to an expiry instant. Expired entries are removed when they are
//! next looked at or when a new cooldown starts; nothing runs in the background.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory cooldown table shared by command handlers.
#[derive(Debug, Default)]
pub struct CooldownStore {
    expiries: Mutex<HashMap<String, Instant>>,
}

impl CooldownStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cooldown for `key` unless one is running.
    ///
    /// Returns the time left on the running cooldown as the error.
    pub fn try_acquire(&self, key: &str, cooldown: Duration) -> Result<(), Duration> {
        self.try_acquire_at(key, cooldown, Instant::now())
    }

    fn try_acquire_at(&self, key: &str, cooldown: Duration, now: Instant) -> Result<(), Duration> {
        let mut expiries = self.expiries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(expiry) = expiries.get(key) {
            if *expiry > now {
                return Err(*expiry - now);
            }
            expiries.remove(key);
        }

        if !cooldown.is_zero() {
            expiries.retain(|_, expiry| *expiry > now);
            expiries.insert(key.to_string(), now + cooldown);
        }
        Ok(())
    }

    #[cfg(test)]
    fn remaining_at(&self, key: &str, now: Instant) -> Option<Duration> {
        let mut expiries = self.expiries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match expiries.get(key) {
            Some(expiry) if *expiry > now => Some(*expiry - now),
            Some(_) => {
                expiries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Drop a running cooldown.
    pub fn reset(&self, key: &str) {
        self.expiries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
    }

    /// Number of tracked keys, expired ones not yet read included.
    pub fn len(&self) -> usize {
        self.expiries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cooldown key for one command and user.
pub fn command_key(command: &str, user_id: u64) -> String {
    format!("{}:{}", command, user_id)
}

/// Render a remaining cooldown for a chat reply, e.g. `1 minute and 5 seconds`.
pub fn format_remaining(remaining: Duration) -> String {
    // Round up so "0 seconds" is never shown while still on cooldown.
    let total = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    let minutes = total / 60;
    let seconds = total % 60;

    let plural = |n: u64| if n == 1 { "" } else { "s" };
    if minutes > 0 {
        format!(
            "{} minute{} and {} second{}",
            minutes, plural(minutes), seconds, plural(seconds)
        )
    } else {
        format!("{} second{}", seconds, plural(seconds))
    }
}
