//! Average time between consecutive claims.

use chrono::{DateTime, Utc};
use std::fmt;

/// Mean gap between claims, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AverageInterval {
    seconds: u64,
}

impl AverageInterval {
    pub fn from_secs(seconds: u64) -> Self {
        Self { seconds }
    }

    pub fn as_secs(self) -> u64 {
        self.seconds
    }

    fn parts(self) -> (u64, u64, u64) {
        (self.seconds / 3600, (self.seconds % 3600) / 60, self.seconds % 60)
    }

    /// Plain form: `1h2m3s`, `1m30s`, `45s`. Zero hours/minutes are left out.
    pub fn compact(self) -> String {
        let (hours, minutes, seconds) = self.parts();
        let mut out = String::new();
        if hours > 0 {
            out.push_str(&format!("{}h", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}m", minutes));
        }
        out.push_str(&format!("{}s", seconds));
        out
    }

    /// Embed form with bold two-digit units: `**01**h**01**m**01**s`, `**59**s`.
    pub fn markdown(self) -> String {
        let (hours, minutes, seconds) = self.parts();
        let mut out = String::new();
        if hours > 0 {
            out.push_str(&format!("**{:02}**h", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("**{:02}**m", minutes));
        }
        out.push_str(&format!("**{:02}**s", seconds));
        out
    }
}

impl fmt::Display for AverageInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compact())
    }
}

/// Average inter-arrival time of `timestamps`, counting `now` as a final sample.
///
/// Returns `None` with fewer than two timestamps. Sub-second precision is
/// dropped and the mean truncates toward zero; a negative mean (possible only
/// with timestamps after `now`) clamps to zero.
pub fn average_interval(timestamps: &[DateTime<Utc>], now: DateTime<Utc>) -> Option<AverageInterval> {
    if timestamps.len() < 2 {
        return None;
    }

    let mut samples: Vec<i64> = timestamps.iter().map(|t| t.timestamp()).collect();
    samples.sort_unstable();
    samples.push(now.timestamp());

    let gaps: Vec<i64> = samples.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let mean = gaps.iter().sum::<i64>() / gaps.len() as i64;

    Some(AverageInterval::from_secs(mean.max(0) as u64))
}
