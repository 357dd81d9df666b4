//! Print-range classification.

use std::fmt;

/// Upper bound variant for the HP range.
///
/// Per-player stats count prints up to 2000 as HP, server-wide stats stop at
/// 1000. Both are kept so each report keeps its own totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintScheme {
    /// HP = 500-2000
    Extended,
    /// HP = 500-1000
    Compact,
}

impl PrintScheme {
    pub fn hp_upper(self) -> i64 {
        match self {
            PrintScheme::Extended => 2000,
            PrintScheme::Compact => 1000,
        }
    }
}

/// Named print bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrintRange {
    Sp,
    Lp,
    Mp,
    Hp,
    Other,
}

impl PrintRange {
    /// The four named ranges, rarest first.
    pub const NAMED: [PrintRange; 4] = [PrintRange::Sp, PrintRange::Lp, PrintRange::Mp, PrintRange::Hp];

    /// Bucket a print number. Total over all integers.
    pub fn classify(print: i64, scheme: PrintScheme) -> PrintRange {
        match print {
            1..=10 => PrintRange::Sp,
            11..=99 => PrintRange::Lp,
            100..=499 => PrintRange::Mp,
            p if (500..=scheme.hp_upper()).contains(&p) => PrintRange::Hp,
            _ => PrintRange::Other,
        }
    }

    /// Rarity weight: SP=4, LP=3, MP=2, HP=1, OTHER=0.
    pub fn rank(self) -> u8 {
        match self {
            PrintRange::Sp => 4,
            PrintRange::Lp => 3,
            PrintRange::Mp => 2,
            PrintRange::Hp => 1,
            PrintRange::Other => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PrintRange::Sp => "SP",
            PrintRange::Lp => "LP",
            PrintRange::Mp => "MP",
            PrintRange::Hp => "HP",
            PrintRange::Other => "OTHER",
        }
    }

    /// Human readable print span, e.g. `"11-99"`.
    pub fn description(self, scheme: PrintScheme) -> String {
        match self {
            PrintRange::Sp => "1-10".to_string(),
            PrintRange::Lp => "11-99".to_string(),
            PrintRange::Mp => "100-499".to_string(),
            PrintRange::Hp => format!("500-{}", scheme.hp_upper()),
            PrintRange::Other => "other".to_string(),
        }
    }
}

impl fmt::Display for PrintRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let scheme = PrintScheme::Extended;
        assert_eq!(PrintRange::classify(1, scheme), PrintRange::Sp);
        assert_eq!(PrintRange::classify(10, scheme), PrintRange::Sp);
        assert_eq!(PrintRange::classify(11, scheme), PrintRange::Lp);
        assert_eq!(PrintRange::classify(99, scheme), PrintRange::Lp);
        assert_eq!(PrintRange::classify(100, scheme), PrintRange::Mp);
        assert_eq!(PrintRange::classify(499, scheme), PrintRange::Mp);
        assert_eq!(PrintRange::classify(500, scheme), PrintRange::Hp);
        assert_eq!(PrintRange::classify(2000, scheme), PrintRange::Hp);
        assert_eq!(PrintRange::classify(2001, scheme), PrintRange::Other);
        assert_eq!(PrintRange::classify(0, scheme), PrintRange::Other);
        assert_eq!(PrintRange::classify(-5, scheme), PrintRange::Other);
    }

    #[test]
    fn test_compact_scheme_stops_at_1000() {
        assert_eq!(PrintRange::classify(1000, PrintScheme::Compact), PrintRange::Hp);
        assert_eq!(PrintRange::classify(1001, PrintScheme::Compact), PrintRange::Other);
        assert_eq!(PrintRange::classify(1001, PrintScheme::Extended), PrintRange::Hp);
    }

    #[test]
    fn test_named_ranges_partition_their_span() {
        for scheme in [PrintScheme::Extended, PrintScheme::Compact] {
            let mut counts = [0usize; 4];
            for print in 1..=scheme.hp_upper() {
                let range = PrintRange::classify(print, scheme);
                let idx = PrintRange::NAMED
                    .iter()
                    .position(|named| *named == range)
                    .expect("print inside the span must land in a named range");
                counts[idx] += 1;
            }
            assert_eq!(counts, [10, 89, 400, (scheme.hp_upper() - 499) as usize]);
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        for print in [-1, 0, 1, 42, 250, 777, 1500, 5000] {
            let first = PrintRange::classify(print, PrintScheme::Extended);
            let second = PrintRange::classify(print, PrintScheme::Extended);
            assert_eq!(first, second);
            assert_eq!(first.description(PrintScheme::Extended), second.description(PrintScheme::Extended));
        }
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(PrintRange::Sp.description(PrintScheme::Extended), "1-10");
        assert_eq!(PrintRange::Lp.description(PrintScheme::Extended), "11-99");
        assert_eq!(PrintRange::Mp.description(PrintScheme::Compact), "100-499");
        assert_eq!(PrintRange::Hp.description(PrintScheme::Extended), "500-2000");
        assert_eq!(PrintRange::Hp.description(PrintScheme::Compact), "500-1000");
    }

    #[test]
    fn test_rank_order() {
        let ranks: Vec<u8> = PrintRange::NAMED.iter().map(|r| r.rank()).collect();
        assert_eq!(ranks, vec![4, 3, 2, 1]);
        assert_eq!(PrintRange::Other.rank(), 0);
    }
}
