//! Claim quality ranking.

use super::print_range::{PrintRange, PrintScheme};
use super::Claim;

/// Whether `a` is a more desirable claim than `b`, using per-player print ranges.
///
/// Print range dominates, then tier, then the lower print number.
pub fn is_higher_quality(a: &Claim, b: &Claim) -> bool {
    is_higher_quality_in(a, b, PrintScheme::Extended)
}

/// [`is_higher_quality`] with an explicit print scheme.
pub fn is_higher_quality_in(a: &Claim, b: &Claim, scheme: PrintScheme) -> bool {
    let print_a = PrintRange::classify(a.print, scheme).rank();
    let print_b = PrintRange::classify(b.print, scheme).rank();
    if print_a != print_b {
        return print_a > print_b;
    }

    let tier_a = a.tier_rank();
    let tier_b = b.tier_rank();
    if tier_a != tier_b {
        return tier_a > tier_b;
    }

    a.print < b.print
}

/// Pick the best claim with a single scan. The first candidate seeds the scan.
pub fn select_best<'a, I>(candidates: I, scheme: PrintScheme) -> Option<&'a Claim>
where
    I: IntoIterator<Item = &'a Claim>,
{
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(current) if !is_higher_quality_in(candidate, current, scheme) => Some(current),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::claim;
    use chrono::Utc;

    #[test]
    fn test_print_range_dominates_tier() {
        let now = Utc::now();
        let sp_common = claim("CT", 5, now);
        let hp_rare = claim("SSRT", 500, now);

        assert!(is_higher_quality(&sp_common, &hp_rare));
        assert!(!is_higher_quality(&hp_rare, &sp_common));
    }

    #[test]
    fn test_tier_breaks_print_range_tie() {
        let now = Utc::now();
        let lp_srt = claim("SRT", 80, now);
        let lp_rt = claim("RT", 12, now);

        assert!(is_higher_quality(&lp_srt, &lp_rt));
        assert!(!is_higher_quality(&lp_rt, &lp_srt));
    }

    #[test]
    fn test_lower_print_breaks_full_tie() {
        let now = Utc::now();
        let a = claim("CT", 3, now);
        let b = claim("CT", 7, now);

        assert!(is_higher_quality(&a, &b));
        assert!(!is_higher_quality(&b, &a));
    }

    #[test]
    fn test_urt_and_ext_lose_to_base_tiers_in_same_range() {
        let now = Utc::now();
        let urt = claim("URT", 3, now);
        let ext = claim("EXT", 2, now);
        let ct = claim("CT", 7, now);

        assert!(!is_higher_quality(&urt, &ct));
        assert!(is_higher_quality(&ct, &urt));
        assert!(is_higher_quality(&ct, &ext));
        // Between two unranked tiers the lower print wins.
        assert!(is_higher_quality(&ext, &urt));
    }

    #[test]
    fn test_identical_claims_are_not_higher() {
        let now = Utc::now();
        let a = claim("RT", 42, now);
        assert!(!is_higher_quality(&a, &a.clone()));
    }

    #[test]
    fn test_out_of_range_print_loses_regardless_of_tier() {
        let now = Utc::now();
        let zero_print = claim("EXT", 0, now);
        let huge_print = claim("SSRT", 2500, now);
        let hp_common = claim("CT", 1999, now);

        assert!(is_higher_quality(&hp_common, &zero_print));
        assert!(is_higher_quality(&hp_common, &huge_print));
    }

    #[test]
    fn test_scheme_changes_hp_membership() {
        let now = Utc::now();
        let print_1500 = claim("SSRT", 1500, now);
        let print_3000 = claim("CT", 3000, now);

        // Both are OTHER under the compact scheme, so tier decides.
        assert!(is_higher_quality_in(&print_1500, &print_3000, PrintScheme::Compact));
        let common_1500 = claim("CT", 1500, now);
        let rare_3000 = claim("SSRT", 3000, now);
        assert!(!is_higher_quality_in(&common_1500, &rare_3000, PrintScheme::Compact));
        assert!(is_higher_quality_in(&common_1500, &rare_3000, PrintScheme::Extended));
    }

    #[test]
    fn test_select_best_is_order_independent() {
        let now = Utc::now();
        let claims = vec![
            claim("SSRT", 700, now),
            claim("CT", 9, now),
            claim("RT", 9, now),
            claim("RT", 4, now),
            claim("SRT", 150, now),
        ];

        let forward = select_best(claims.iter(), PrintScheme::Extended).unwrap();
        let backward = select_best(claims.iter().rev(), PrintScheme::Extended).unwrap();

        assert_eq!(forward, backward);
        assert_eq!(forward.tier, "RT");
        assert_eq!(forward.print, 4);
    }

    #[test]
    fn test_select_best_empty() {
        let claims: Vec<crate::stats::Claim> = Vec::new();
        assert!(select_best(claims.iter(), PrintScheme::Extended).is_none());
    }
}
