#![forbid(unsafe_code)]

//! Presentation metadata for metric records.
//!
//! [`annotate`] turns a raw [`MetricRecord`] into display-ready fields: the
//! formatted value, a trend glyph, at most one confidence badge, and the
//! ordered provenance tags. Interpretation is total. Unknown provenance tags
//! become [`ProvenanceTag::Unrecognized`] and unknown badges are dropped, so
//! a single bad string never blanks the metric.

use std::fmt;

use crate::format::{NOT_AVAILABLE, Sentiment, Trend, classify_trend, format_delta, format_value};
use crate::records::MetricRecord;

/// Upstream system a metric value originated from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProvenanceTag {
    Crm,
    Analytics,
    SearchConsole,
    Ads,
    Email,
    Social,
    ProductAnalytics,
    Manual,
    Derived,
    /// Fallback for tags the dashboard does not know. Keeps the raw string.
    Unrecognized(String),
}

impl ProvenanceTag {
    /// Interpret a collaborator tag. Case, whitespace, `_` and `-` are
    /// normalized and common vendor names are accepted as aliases.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|ch| match ch {
                '_' | ' ' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "crm" | "hubspot" | "salesforce" | "pipedrive" => Self::Crm,
            "analytics" | "analytics-platform" | "ga" | "ga4" | "google-analytics" => {
                Self::Analytics
            }
            "search-console" | "gsc" | "google-search-console" => Self::SearchConsole,
            "ads" | "ads-platform" | "google-ads" | "meta-ads" | "linkedin-ads" => Self::Ads,
            "email" | "email-platform" | "mailchimp" | "customer-io" => Self::Email,
            "social" | "social-platform" | "linkedin" | "twitter" | "x" => Self::Social,
            "product" | "product-analytics" | "mixpanel" | "amplitude" | "posthog" => {
                Self::ProductAnalytics
            }
            "manual" | "manual-entry" | "spreadsheet" => Self::Manual,
            "derived" | "calculated" | "computed" => Self::Derived,
            _ => {
                tracing::debug!(
                    target: "gtmdash.annotation",
                    tag = %raw,
                    "unrecognized provenance tag, using generic source"
                );
                Self::Unrecognized(raw.trim().to_string())
            }
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Crm => "CRM",
            Self::Analytics => "Analytics",
            Self::SearchConsole => "Search Console",
            Self::Ads => "Ads",
            Self::Email => "Email",
            Self::Social => "Social",
            Self::ProductAnalytics => "Product",
            Self::Manual => "Manual",
            Self::Derived => "Calculated",
            Self::Unrecognized(_) => "Source",
        }
    }

    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for ProvenanceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualifier indicating reduced trust in a displayed metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConfidenceBadge {
    Assumption,
    LowConfidence,
    NotApplicable,
    AdsOnly,
    LowSample,
    #[default]
    None,
}

impl ConfidenceBadge {
    /// Interpret a collaborator badge. Absent or unknown input yields `None`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::None;
        };
        let normalized: String = raw
            .trim()
            .chars()
            .map(|ch| match ch {
                '_' | ' ' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "" | "none" => Self::None,
            "assumption" | "assumed" => Self::Assumption,
            "low-confidence" | "low" => Self::LowConfidence,
            "not-applicable" | "n/a" | "na" => Self::NotApplicable,
            "ads-only" => Self::AdsOnly,
            "low-sample-n" | "low-sample" | "low-n" => Self::LowSample,
            _ => {
                tracing::debug!(
                    target: "gtmdash.annotation",
                    badge = %raw,
                    "unrecognized confidence badge, dropping"
                );
                Self::None
            }
        }
    }

    #[must_use]
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::Assumption => Some("Assumption"),
            Self::LowConfidence => Some("Low confidence"),
            Self::NotApplicable => Some("N/A"),
            Self::AdsOnly => Some("Ads only"),
            Self::LowSample => Some("Low n"),
            Self::None => None,
        }
    }

    /// Whether this badge replaces the value display with the sentinel.
    #[must_use]
    pub const fn forces_not_available(self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

/// Ordered provenance tags for one metric.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceSummary {
    tags: Vec<ProvenanceTag>,
}

impl SourceSummary {
    #[must_use]
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Self {
        Self {
            tags: raw.iter().map(|tag| ProvenanceTag::parse(tag.as_ref())).collect(),
        }
    }

    #[must_use]
    pub fn tags(&self) -> &[ProvenanceTag] {
        &self.tags
    }

    #[must_use]
    pub fn primary(&self) -> Option<&ProvenanceTag> {
        self.tags.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Compact badge text: the primary tag, plus `+N more` when there are
    /// others.
    #[must_use]
    pub fn compact(&self) -> String {
        match self.tags.as_slice() {
            [] => String::new(),
            [only] => only.label().to_string(),
            [primary, rest @ ..] => format!("{} +{} more", primary.label(), rest.len()),
        }
    }

    /// Every label, in input order.
    #[must_use]
    pub fn full(&self) -> String {
        self.tags
            .iter()
            .map(ProvenanceTag::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Display-ready fields for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub key: String,
    pub label: String,
    pub display_value: String,
    pub trend: Option<Trend>,
    /// Empty when the record carries no delta.
    pub trend_glyph: &'static str,
    pub sentiment: Sentiment,
    pub delta_text: Option<String>,
    pub badge: ConfidenceBadge,
    pub sources: SourceSummary,
}

impl Annotation {
    #[must_use]
    pub fn badge_label(&self) -> Option<&'static str> {
        self.badge.label()
    }
}

/// Derive presentation metadata for one record.
#[must_use]
pub fn annotate(record: &MetricRecord) -> Annotation {
    let badge = ConfidenceBadge::parse(record.badge.as_deref());
    let display_value = if badge.forces_not_available() {
        NOT_AVAILABLE.to_string()
    } else {
        format_value(&record.value)
    };
    let trend = record.delta.map(classify_trend);

    Annotation {
        key: record.key.clone(),
        label: record.label.clone(),
        display_value,
        trend,
        trend_glyph: trend.map_or("", Trend::glyph),
        sentiment: trend.map_or(Sentiment::Neutral, |trend| trend.sentiment(record.polarity)),
        delta_text: record.delta.map(format_delta),
        badge,
        sources: SourceSummary::parse(&record.sources),
    }
}

/// Annotate every record in order. Each record is interpreted independently.
#[must_use]
pub fn annotate_all(records: &[MetricRecord]) -> Vec<Annotation> {
    records.iter().map(annotate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{MetricValue, Polarity};

    #[test]
    fn not_applicable_overrides_numeric_value() {
        let record = MetricRecord::new("roas", "ROAS", MetricValue::number(4_200.0))
            .with_badge("not-applicable");
        let annotation = annotate(&record);
        assert_eq!(annotation.display_value, NOT_AVAILABLE);
        assert_eq!(annotation.badge, ConfidenceBadge::NotApplicable);
    }

    #[test]
    fn other_badges_keep_formatted_value() {
        let record =
            MetricRecord::new("mql", "MQLs", MetricValue::number(1_500.0)).with_badge("low_sample_n");
        let annotation = annotate(&record);
        assert_eq!(annotation.display_value, "1.5K");
        assert_eq!(annotation.badge_label(), Some("Low n"));
    }

    #[test]
    fn unknown_tag_falls_back_without_blanking_metric() {
        let record = MetricRecord::new("leads", "Leads", MetricValue::number(320.0))
            .with_sources(["HubSpot", "carrier-pigeon", "ga4"]);
        let annotation = annotate(&record);
        assert_eq!(annotation.display_value, "320");
        assert_eq!(
            annotation.sources.tags(),
            &[
                ProvenanceTag::Crm,
                ProvenanceTag::Unrecognized("carrier-pigeon".into()),
                ProvenanceTag::Analytics,
            ]
        );
        assert_eq!(annotation.sources.compact(), "CRM +2 more");
        assert_eq!(annotation.sources.full(), "CRM, Source, Analytics");
    }

    #[test]
    fn unknown_badge_is_dropped() {
        assert_eq!(ConfidenceBadge::parse(Some("vibes")), ConfidenceBadge::None);
        assert_eq!(ConfidenceBadge::parse(None), ConfidenceBadge::None);
        assert_eq!(ConfidenceBadge::parse(Some("Ads Only")), ConfidenceBadge::AdsOnly);
    }

    #[test]
    fn compact_sources_rules() {
        assert_eq!(SourceSummary::parse::<&str>(&[]).compact(), "");
        assert_eq!(SourceSummary::parse(&["gsc"]).compact(), "Search Console");
        assert_eq!(SourceSummary::parse(&["gsc", "derived"]).compact(), "Search Console +1 more");
    }

    #[test]
    fn trend_fields_follow_delta() {
        let flat = annotate(&MetricRecord::new("a", "A", MetricValue::number(1.0)).with_delta(0.0));
        assert_eq!(flat.trend, Some(Trend::Flat));
        assert_eq!(flat.trend_glyph, Trend::Flat.glyph());
        assert_eq!(flat.sentiment, Sentiment::Neutral);
        assert_eq!(flat.delta_text.as_deref(), Some("0%"));

        let cost = annotate(
            &MetricRecord::new("cac", "CAC", MetricValue::number(90.0))
                .with_delta(-12.0)
                .with_polarity(Polarity::LowerIsBetter),
        );
        assert_eq!(cost.trend, Some(Trend::Down));
        assert_eq!(cost.sentiment, Sentiment::Positive);

        let none = annotate(&MetricRecord::new("b", "B", MetricValue::missing()));
        assert_eq!(none.trend, None);
        assert_eq!(none.trend_glyph, "");
        assert_eq!(none.display_value, NOT_AVAILABLE);
    }

    #[test]
    fn annotate_all_preserves_order() {
        let records = vec![
            MetricRecord::new("one", "One", MetricValue::number(1.0)),
            MetricRecord::new("two", "Two", MetricValue::missing()).with_sources(["???"]),
            MetricRecord::new("three", "Three", MetricValue::number(3_000_000.0)),
        ];
        let annotations = annotate_all(&records);
        let keys: Vec<_> = annotations.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["one", "two", "three"]);
        assert_eq!(annotations[2].display_value, "3M");
    }
}
