//! Embed rendering for stats reports.

use gatebot::database::LeaderboardEntry;
use gatebot::stats::report::{BucketInterval, CardDetails, Histogram};
use gatebot::stats::{PrintRange, Report};
use poise::serenity_prelude as serenity;
use std::fmt::Display;

const STATS_COLOR: u32 = 0x9b59b6;
const ERROR_COLOR: u32 = 0xff0000;

const NO_DATA: &str = "data unavailable";

/// Build the embed for a report.
pub fn report_embed(title: &str, report: &Report) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(title)
        .description(report_description(report))
        .color(STATS_COLOR)
        .timestamp(serenity::Timestamp::now());

    if let Report::Best { best: Some(best), .. } = report {
        if let CardDetails::Found(card) = &best.details {
            if let Some(url) = &card.image_url {
                embed = embed.thumbnail(url);
            }
        }
    }

    embed
}

pub fn error_embed(description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Error")
        .description(description)
        .color(ERROR_COLOR)
}

/// Text body of a report embed.
pub fn report_description(report: &Report) -> String {
    match report {
        Report::Overview(overview) => format!(
            "🃏 **{}** claims in the {}\n📦 **{}** claims all time",
            overview.recent,
            overview.window.label(),
            overview.total
        ),
        Report::Best { window, best: None } => format!("No claims in the {}.", window.label()),
        Report::Best { window, best: Some(best) } => {
            let claim = &best.claim;
            let mut text = format!(
                "🏆 Best claim in the {}\n**{}** `{}` #{}\nClaimed by <@{}>",
                window.label(),
                claim.card_name,
                claim.tier,
                claim.print,
                claim.owner
            );
            match &best.details {
                CardDetails::Found(card) => {
                    if let Some(series) = &card.series {
                        text.push_str(&format!("\nSeries: {}", series));
                    }
                }
                CardDetails::Unavailable => text.push_str("\nCard details: data unavailable"),
                CardDetails::ServersDown => {
                    text.push_str("\n⚠️ Mazoku servers are unavailable, card details could not be loaded")
                }
            }
            text
        }
        Report::Tiers(histogram) => histogram_lines(histogram, |tier| format!("`{}`", tier)),
        Report::Prints { scheme, histogram } => histogram_lines(histogram, |range: &PrintRange| {
            format!("`{}` ({})", range, range.description(*scheme))
        }),
        Report::TierTimes(buckets) => interval_lines(buckets, |tier| format!("`{}`", tier)),
        Report::PrintTimes { scheme, buckets } => interval_lines(buckets, |range: &PrintRange| {
            format!("`{}` ({})", range, range.description(*scheme))
        }),
    }
}

fn histogram_lines<B>(histogram: &Histogram<B>, label: impl Fn(&B) -> String) -> String {
    if histogram.entries.is_empty() {
        return "No claims recorded yet.".to_string();
    }

    histogram
        .entries
        .iter()
        .map(|entry| format!("{} **{}** ({:.1}%)", label(&entry.bucket), entry.count, entry.percent))
        .collect::<Vec<_>>()
        .join("\n")
}

fn interval_lines<B>(buckets: &[BucketInterval<B>], label: impl Fn(&B) -> String) -> String {
    buckets
        .iter()
        .map(|bucket| match bucket.average {
            Some(average) => format!("{} every {}", label(&bucket.bucket), average.markdown()),
            None => format!("{} {}", label(&bucket.bucket), NO_DATA),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text body of the leaderboard embed.
pub fn leaderboard_description(entries: &[LeaderboardEntry], tier: Option<impl Display>) -> String {
    if entries.is_empty() {
        return "No claims recorded yet.".to_string();
    }

    let unit = match tier {
        Some(tier) => format!("{} claims", tier),
        None => "claims".to_string(),
    };
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| format!("{}. <@{}> **{}** {}", idx + 1, entry.owner, entry.claims, unit))
        .collect::<Vec<_>>()
        .join("\n")
}
