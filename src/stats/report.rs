//! Stats reports over a claim snapshot.
//!
//! Each report is a pure function of the snapshot, the current time and the
//! report options. Only [`ReportKind::Best`] awaits anything: the card lookup
//! used to enrich the winning claim.

use chrono::{DateTime, Utc};

use super::interval::{average_interval, AverageInterval};
use super::print_range::{PrintRange, PrintScheme};
use super::quality::select_best;
use super::window::TimeWindow;
use super::{Claim, ClaimSnapshot, Tier};
use crate::mazoku::{CardLookup, CardMetadata};

/// Which view of the claim snapshot to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ReportKind {
    #[name = "overview"]
    Overview,
    #[name = "best"]
    Best,
    #[name = "tiers"]
    Tiers,
    #[name = "prints"]
    Prints,
    #[name = "tiertimes"]
    TierTimes,
    #[name = "printtimes"]
    PrintTimes,
}

/// Window and print-range choices of a report scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Window for "recent" counts and the best claim
    pub recent_window: TimeWindow,
    /// Window for inter-arrival averages
    pub interval_window: TimeWindow,
    pub print_scheme: PrintScheme,
}

impl ReportOptions {
    /// Per-player stats: last hour, HP up to 2000.
    pub fn player() -> Self {
        Self {
            recent_window: TimeWindow::Hour,
            interval_window: TimeWindow::Week,
            print_scheme: PrintScheme::Extended,
        }
    }

    /// Server-wide stats: last 30 minutes, HP up to 1000.
    pub fn server() -> Self {
        Self {
            recent_window: TimeWindow::HalfHour,
            interval_window: TimeWindow::Week,
            print_scheme: PrintScheme::Compact,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub window: TimeWindow,
    /// Retained claims inside the window
    pub recent: u64,
    /// Lifetime claims
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramEntry<B> {
    pub bucket: B,
    pub count: u64,
    /// Share of the histogram total, 0-100
    pub percent: f64,
}

/// Counts per bucket. Buckets with no claims are left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram<B> {
    pub total: u64,
    pub entries: Vec<HistogramEntry<B>>,
}

impl<B> Histogram<B> {
    fn from_counts(counts: Vec<(B, u64)>) -> Self {
        let total: u64 = counts.iter().map(|(_, count)| count).sum();
        let entries = counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(bucket, count)| HistogramEntry {
                bucket,
                count,
                percent: count as f64 * 100.0 / total as f64,
            })
            .collect();
        Self { total, entries }
    }
}

/// Average gap for one bucket. `average` is `None` below two claims.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketInterval<B> {
    pub bucket: B,
    pub claims: usize,
    pub average: Option<AverageInterval>,
}

/// Card metadata attached to the best claim.
#[derive(Debug, Clone, PartialEq)]
pub enum CardDetails {
    Found(CardMetadata),
    /// Lookup failed for a reason other than an outage
    Unavailable,
    /// Mazoku reported its servers as down
    ServersDown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BestClaim {
    pub claim: Claim,
    pub details: CardDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Overview(Overview),
    Best {
        window: TimeWindow,
        best: Option<BestClaim>,
    },
    Tiers(Histogram<String>),
    Prints {
        scheme: PrintScheme,
        histogram: Histogram<PrintRange>,
    },
    TierTimes(Vec<BucketInterval<String>>),
    PrintTimes {
        scheme: PrintScheme,
        buckets: Vec<BucketInterval<PrintRange>>,
    },
}

/// Compute one report.
///
/// `now` is captured by the caller once so every window check in the report
/// agrees.
pub async fn build_report<L>(
    kind: ReportKind,
    snapshot: &ClaimSnapshot,
    options: ReportOptions,
    now: DateTime<Utc>,
    lookup: &L,
) -> Report
where
    L: CardLookup + ?Sized,
{
    match kind {
        ReportKind::Overview => Report::Overview(overview(snapshot, options, now)),
        ReportKind::Best => {
            let best = match best_claim(snapshot, options, now) {
                Some(claim) => Some(BestClaim {
                    claim: claim.clone(),
                    details: enrich(claim, lookup).await,
                }),
                None => None,
            };
            Report::Best {
                window: options.recent_window,
                best,
            }
        }
        ReportKind::Tiers => Report::Tiers(tier_histogram(snapshot)),
        ReportKind::Prints => Report::Prints {
            scheme: options.print_scheme,
            histogram: print_histogram(snapshot, options),
        },
        ReportKind::TierTimes => Report::TierTimes(tier_times(snapshot, options, now)),
        ReportKind::PrintTimes => Report::PrintTimes {
            scheme: options.print_scheme,
            buckets: print_times(snapshot, options, now),
        },
    }
}

/// Claims paired with their parsed timestamp. Unparseable ones are logged and skipped.
fn timed<'a, I>(claims: I) -> Vec<(&'a Claim, DateTime<Utc>)>
where
    I: IntoIterator<Item = &'a Claim>,
{
    claims
        .into_iter()
        .filter_map(|claim| match claim.claimed_at() {
            Ok(at) => Some((claim, at)),
            Err(e) => {
                tracing::warn!(
                    card_id = %claim.card_id,
                    owner = %claim.owner,
                    "skipping claim: {}", e
                );
                None
            }
        })
        .collect()
}

/// Recent claim count against the lifetime total.
pub fn overview(snapshot: &ClaimSnapshot, options: ReportOptions, now: DateTime<Utc>) -> Overview {
    let recent = timed(snapshot.claims())
        .into_iter()
        .filter(|(_, at)| options.recent_window.contains(*at, now))
        .count() as u64;

    Overview {
        window: options.recent_window,
        recent,
        total: snapshot.total(),
    }
}

/// Most desirable claim inside the recent window.
pub fn best_claim<'a>(
    snapshot: &'a ClaimSnapshot,
    options: ReportOptions,
    now: DateTime<Utc>,
) -> Option<&'a Claim> {
    let recent = timed(snapshot.claims())
        .into_iter()
        .filter(|(_, at)| options.recent_window.contains(*at, now))
        .map(|(claim, _)| claim);
    select_best(recent, options.print_scheme)
}

/// Look up card metadata for a claim. Never fails: errors become placeholders.
pub async fn enrich<L>(claim: &Claim, lookup: &L) -> CardDetails
where
    L: CardLookup + ?Sized,
{
    match lookup.fetch_card(&claim.card_id).await {
        Ok(card) => CardDetails::Found(card),
        Err(e) if e.is_servers_unavailable() => {
            tracing::warn!(card_id = %claim.card_id, "Mazoku unavailable: {}", e);
            CardDetails::ServersDown
        }
        Err(e) => {
            tracing::warn!(card_id = %claim.card_id, "card lookup failed: {}", e);
            CardDetails::Unavailable
        }
    }
}

/// Lifetime claims per tier.
pub fn tier_histogram(snapshot: &ClaimSnapshot) -> Histogram<String> {
    let counts = snapshot
        .tier_names()
        .into_iter()
        .map(|tier| {
            let count = snapshot.total_for(&tier);
            (tier, count)
        })
        .collect();
    Histogram::from_counts(counts)
}

/// Retained claims per print range, OTHER included when present.
pub fn print_histogram(snapshot: &ClaimSnapshot, options: ReportOptions) -> Histogram<PrintRange> {
    let mut counts: Vec<(PrintRange, u64)> = PrintRange::NAMED
        .iter()
        .chain(std::iter::once(&PrintRange::Other))
        .map(|range| (*range, 0))
        .collect();

    for claim in snapshot.claims() {
        let range = PrintRange::classify(claim.print, options.print_scheme);
        if let Some(slot) = counts.iter_mut().find(|(bucket, _)| *bucket == range) {
            slot.1 += 1;
        }
    }

    Histogram::from_counts(counts)
}

/// Average claim gap per tier over the interval window.
///
/// The four base tiers are always listed; other tiers only when they hold claims.
pub fn tier_times(
    snapshot: &ClaimSnapshot,
    options: ReportOptions,
    now: DateTime<Utc>,
) -> Vec<BucketInterval<String>> {
    let mut tiers: Vec<String> = [Tier::Ct, Tier::Rt, Tier::Srt, Tier::Ssrt]
        .iter()
        .map(|tier| tier.as_str().to_string())
        .collect();
    for name in snapshot.tier_names() {
        if !tiers.contains(&name) && !snapshot.bucket(&name).is_empty() {
            tiers.push(name);
        }
    }

    tiers
        .into_iter()
        .map(|tier| {
            let stamps = window_stamps(snapshot.bucket(&tier), options.interval_window, now);
            BucketInterval {
                claims: stamps.len(),
                average: average_interval(&stamps, now),
                bucket: tier,
            }
        })
        .collect()
}

/// Average claim gap per named print range over the interval window.
pub fn print_times(
    snapshot: &ClaimSnapshot,
    options: ReportOptions,
    now: DateTime<Utc>,
) -> Vec<BucketInterval<PrintRange>> {
    let timed_claims = timed(snapshot.claims());

    PrintRange::NAMED
        .iter()
        .map(|range| {
            let stamps: Vec<DateTime<Utc>> = timed_claims
                .iter()
                .filter(|(claim, at)| {
                    PrintRange::classify(claim.print, options.print_scheme) == *range
                        && options.interval_window.contains(*at, now)
                })
                .map(|(_, at)| *at)
                .collect();
            BucketInterval {
                bucket: *range,
                claims: stamps.len(),
                average: average_interval(&stamps, now),
            }
        })
        .collect()
}

fn window_stamps(claims: &[Claim], window: TimeWindow, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    timed(claims)
        .into_iter()
        .map(|(_, at)| at)
        .filter(|at| window.contains(*at, now))
        .collect()
}
