//! Claim statistics.
//!
//! Every stats command reads the same claim snapshot through this module: the
//! print-range classifier, the quality ranker, the time-window filter and the
//! inter-arrival aggregator, tied together per report type in [`report`].

pub mod interval;
pub mod print_range;
pub mod quality;
pub mod report;
pub mod window;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{GateError, Result};

pub use interval::{average_interval, AverageInterval};
pub use print_range::{PrintRange, PrintScheme};
pub use quality::{is_higher_quality, select_best};
pub use report::{build_report, Report, ReportKind, ReportOptions};
pub use window::{is_within, TimeWindow};

/// Card rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Ct,
    Rt,
    Srt,
    Ssrt,
    Urt,
    Ext,
}

impl Tier {
    /// All known tiers, from most common to rarest.
    pub const ALL: [Tier; 6] = [Tier::Ct, Tier::Rt, Tier::Srt, Tier::Ssrt, Tier::Urt, Tier::Ext];

    /// Parse a tier name, ignoring case. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Tier> {
        match name.trim().to_ascii_uppercase().as_str() {
            "CT" => Some(Tier::Ct),
            "RT" => Some(Tier::Rt),
            "SRT" => Some(Tier::Srt),
            "SSRT" => Some(Tier::Ssrt),
            "URT" => Some(Tier::Urt),
            "EXT" => Some(Tier::Ext),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Ct => "CT",
            Tier::Rt => "RT",
            Tier::Srt => "SRT",
            Tier::Ssrt => "SSRT",
            Tier::Urt => "URT",
            Tier::Ext => "EXT",
        }
    }

    /// Weight used by the quality ranker. Only the four base tiers are
    /// ranked; URT and EXT weigh zero like unknown tiers.
    pub fn weight(self) -> u8 {
        match self {
            Tier::Ct => 1,
            Tier::Rt => 2,
            Tier::Srt => 3,
            Tier::Ssrt => 4,
            Tier::Urt | Tier::Ext => 0,
        }
    }

    /// Rarity order used when listing tiers. Higher is rarer.
    pub fn rank(self) -> u8 {
        match self {
            Tier::Ct => 1,
            Tier::Rt => 2,
            Tier::Srt => 3,
            Tier::Ssrt => 4,
            Tier::Urt => 5,
            Tier::Ext => 6,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One card-claim event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Discord id of the claiming user
    pub owner: String,
    pub card_id: String,
    pub card_name: String,
    /// Tier name as recorded; may be outside the known set
    pub tier: String,
    /// Edition number of this card instance
    pub print: i64,
    /// RFC 3339 date-time or epoch milliseconds
    pub timestamp: String,
}

impl Claim {
    /// Known tier of this claim, if any.
    pub fn tier(&self) -> Option<Tier> {
        Tier::parse(&self.tier)
    }

    /// Tier weight for ranking; tiers outside CT/RT/SRT/SSRT weigh zero.
    pub fn tier_rank(&self) -> u8 {
        self.tier().map(Tier::weight).unwrap_or(0)
    }

    /// Parse the claim timestamp.
    pub fn claimed_at(&self) -> Result<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Parse a stored claim timestamp.
///
/// Accepts RFC 3339 (`2024-05-01T12:00:00Z`, `2024-05-01T12:00:00.250+02:00`)
/// or a plain integer of milliseconds since the Unix epoch.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(millis) = raw.parse::<i64>() {
        if let Some(parsed) = DateTime::from_timestamp_millis(millis) {
            return Ok(parsed);
        }
    }

    Err(GateError::InvalidInput(format!("Unparseable claim timestamp: '{}'", raw)))
}

/// Claims of one guild or player, bucketed by tier.
///
/// Buckets keep insertion order. `totals` mirrors the lifetime per-tier claim
/// counters, which keep counting after old claims fall out of the retained
/// window.
#[derive(Debug, Clone, Default)]
pub struct ClaimSnapshot {
    by_tier: BTreeMap<String, Vec<Claim>>,
    totals: BTreeMap<String, u64>,
}

impl ClaimSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a claim to its tier bucket.
    pub fn push(&mut self, claim: Claim) {
        self.by_tier.entry(claim.tier.clone()).or_default().push(claim);
    }

    /// Record the lifetime claim count of a tier.
    pub fn set_total(&mut self, tier: &str, count: u64) {
        self.totals.insert(tier.to_string(), count);
    }

    pub fn is_empty(&self) -> bool {
        self.by_tier.values().all(Vec::is_empty) && self.total() == 0
    }

    /// Retained claims of one tier bucket.
    pub fn bucket(&self, tier: &str) -> &[Claim] {
        self.by_tier.get(tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tier names that have retained claims or a lifetime count.
    pub fn tier_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_tier
            .keys()
            .chain(self.totals.keys())
            .cloned()
            .collect();
        names.sort_by(|a, b| tier_order(a).cmp(&tier_order(b)).then_with(|| a.cmp(b)));
        names.dedup();
        names
    }

    /// Every retained claim, bucket by bucket.
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.by_tier.values().flatten()
    }

    /// Lifetime count of a tier, falling back to the retained bucket size.
    pub fn total_for(&self, tier: &str) -> u64 {
        self.totals
            .get(tier)
            .copied()
            .unwrap_or_else(|| self.bucket(tier).len() as u64)
    }

    /// Lifetime count across all tiers.
    pub fn total(&self) -> u64 {
        let mut names: Vec<&String> = self.by_tier.keys().chain(self.totals.keys()).collect();
        names.sort();
        names.dedup();
        names.into_iter().map(|name| self.total_for(name)).sum()
    }
}

/// Sort key putting known tiers first in rarity order, unknown names last.
fn tier_order(name: &str) -> u8 {
    Tier::parse(name).map(Tier::rank).unwrap_or(u8::MAX)
}


#[cfg(test)]
mod tests {
    use super::test_support::claim;
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tier_parse() {
        assert_eq!(Tier::parse("ssrt"), Some(Tier::Ssrt));
        assert_eq!(Tier::parse(" CT "), Some(Tier::Ct));
        assert_eq!(Tier::parse("EXT"), Some(Tier::Ext));
        assert_eq!(Tier::parse("LEGEND"), None);
        assert_eq!(Tier::parse(""), None);
    }

    #[test]
    fn test_unknown_tier_ranks_zero() {
        let at = Utc::now();
        assert_eq!(claim("MYSTERY", 1, at).tier_rank(), 0);
        assert_eq!(claim("SSRT", 1, at).tier_rank(), 4);
        assert_eq!(claim("URT", 1, at).tier_rank(), 0);
        assert_eq!(claim("ext", 1, at).tier_rank(), 0);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        assert_eq!(parse_timestamp("2024-05-01T12:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-05-01T14:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("1714564800000").unwrap(), expected);

        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_snapshot_totals_prefer_lifetime_counters() {
        let at = Utc::now();
        let mut snapshot = ClaimSnapshot::new();
        snapshot.push(claim("CT", 50, at));
        snapshot.push(claim("CT", 60, at));
        snapshot.push(claim("RT", 5, at));
        snapshot.set_total("CT", 340);

        assert_eq!(snapshot.total_for("CT"), 340);
        assert_eq!(snapshot.total_for("RT"), 1);
        assert_eq!(snapshot.total_for("SRT"), 0);
        assert_eq!(snapshot.total(), 341);
        assert_eq!(snapshot.claims().count(), 3);
    }

    #[test]
    fn test_snapshot_tier_names_in_rarity_order() {
        let at = Utc::now();
        let mut snapshot = ClaimSnapshot::new();
        snapshot.push(claim("ZETA", 1, at));
        snapshot.push(claim("SSRT", 1, at));
        snapshot.push(claim("CT", 1, at));
        snapshot.set_total("RT", 3);

        assert_eq!(snapshot.tier_names(), vec!["CT", "RT", "SSRT", "ZETA"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = ClaimSnapshot::new();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total(), 0);
        assert!(snapshot.bucket("CT").is_empty());
    }
}
