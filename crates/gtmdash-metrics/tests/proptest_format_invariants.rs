//! Property-based invariants for metric formatting and annotation.
//!
//! 1. Displayed magnitude is monotonically non-decreasing in the input.
//! 2. Values in the same order-of-magnitude band share one suffix.
//! 3. Trend classification is total and `Flat` iff the delta is zero.
//! 4. Negative values mirror their positive counterpart with a leading sign.
//! 5. Annotation never blanks a metric because of its provenance tags.

use gtmdash_metrics::{
    ConfidenceBadge, MetricRecord, MetricValue, NOT_AVAILABLE, Trend, annotate, classify_trend,
    format_value,
};
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

fn displayed_magnitude(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|ch| *ch != ',').collect();
    let (number, scale) = match cleaned.chars().last() {
        Some('K') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some('M') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some('B') => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };
    number.parse::<f64>().expect("formatted number should parse") * scale
}

fn suffix(text: &str) -> Option<char> {
    text.chars().last().filter(|ch| ch.is_ascii_alphabetic())
}

fn fmt(n: f64) -> String {
    format_value(&MetricValue::number(n))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Monotonic displayed magnitude
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn displayed_magnitude_is_monotonic(a in 0.0f64..5e11, b in 0.0f64..5e11) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo_text = fmt(lo);
        let hi_text = fmt(hi);
        prop_assert!(
            displayed_magnitude(&lo_text) <= displayed_magnitude(&hi_text),
            "format({}) = {} displayed above format({}) = {}",
            lo, lo_text, hi, hi_text
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Same band, same suffix
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn thousands_band_shares_suffix(a in 1_000.0f64..999_000.0, b in 1_000.0f64..999_000.0) {
        prop_assert_eq!(suffix(&fmt(a)), Some('K'));
        prop_assert_eq!(suffix(&fmt(a)), suffix(&fmt(b)));
    }

    #[test]
    fn millions_band_shares_suffix(a in 1e6f64..9.99e8, b in 1e6f64..9.99e8) {
        prop_assert_eq!(suffix(&fmt(a)), Some('M'));
        prop_assert_eq!(suffix(&fmt(a)), suffix(&fmt(b)));
    }

    #[test]
    fn below_thousand_has_no_suffix(a in 0.0f64..999.0) {
        prop_assert_eq!(suffix(&fmt(a)), None);
    }

    #[test]
    fn rounding_up_to_a_thousand_abbreviates(a in 999.96f64..1_000.0) {
        prop_assert_eq!(fmt(a), "1K");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Trend classification
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn trend_is_flat_iff_zero(delta in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        let trend = classify_trend(delta);
        prop_assert_eq!(trend == Trend::Flat, delta == 0.0);
        prop_assert_eq!(trend == Trend::Up, delta > 0.0);
        prop_assert_eq!(trend == Trend::Down, delta < 0.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Sign symmetry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn negative_mirrors_positive(n in 1.0f64..5e11) {
        prop_assert_eq!(fmt(-n), format!("-{}", fmt(n)));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Fault isolation in annotation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_tags_never_blank_value(
        value in 0.0f64..1e9,
        tags in prop::collection::vec("[a-zA-Z _-]{0,16}", 0..6),
    ) {
        let record = MetricRecord::new("k", "K", MetricValue::number(value)).with_sources(tags.clone());
        let annotation = annotate(&record);
        prop_assert_ne!(annotation.display_value.as_str(), NOT_AVAILABLE);
        prop_assert_eq!(annotation.sources.len(), tags.len());
        prop_assert_eq!(annotation.badge, ConfidenceBadge::None);
    }
}
