#![forbid(unsafe_code)]

//! Record shapes supplied by the remote data collaborator.
//!
//! Provenance tags and confidence badges arrive as free-form strings and are
//! only interpreted by [`crate::annotation`], so one malformed tag can never
//! fail deserialization of a whole bundle. Non-string scalars are kept as
//! text; nulls and nested values are dropped.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::format::{MetricValue, Polarity, format_ratio};

/// One KPI as delivered by the collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricRecord {
    pub key: String,
    pub label: String,
    pub value: MetricValue,
    /// Signed percentage change versus the prior period.
    pub delta: Option<f64>,
    pub polarity: Polarity,
    /// Ordered provenance tags, primary first.
    #[serde(deserialize_with = "lenient_tags")]
    pub sources: Vec<String>,
    #[serde(deserialize_with = "lenient_badge")]
    pub badge: Option<String>,
}

impl MetricRecord {
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: MetricValue) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    #[must_use]
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    #[must_use]
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }
}

/// One stage of a conversion funnel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunnelStage {
    pub name: String,
    pub count: f64,
}

impl FunnelStage {
    #[must_use]
    pub fn new(name: impl Into<String>, count: f64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }

    /// Conversion rate from the previous stage into this one.
    #[must_use]
    pub fn conversion_from(&self, previous: &FunnelStage) -> String {
        format_ratio(self.count, previous.count)
    }
}

/// A KPI bundle for one reporting period.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiBundle {
    pub period: String,
    pub metrics: Vec<MetricRecord>,
    pub funnel: Vec<FunnelStage>,
}

impl KpiBundle {
    #[must_use]
    pub fn metric(&self, key: &str) -> Option<&MetricRecord> {
        self.metrics.iter().find(|metric| metric.key == key)
    }

    /// Stage-to-stage conversion labels, one per stage after the first.
    #[must_use]
    pub fn funnel_conversions(&self) -> Vec<(String, String)> {
        self.funnel
            .windows(2)
            .map(|pair| (pair[1].name.clone(), pair[1].conversion_from(&pair[0])))
            .collect()
    }
}

/// Connection status of one upstream data source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataSourceStatus {
    pub name: String,
    pub connected: bool,
    /// Unix seconds of the last completed sync.
    #[serde(default)]
    pub last_synced_at: Option<u64>,
}

impl DataSourceStatus {
    /// Human-readable sync freshness relative to `now` (unix seconds).
    ///
    /// Timestamps in the future read as "just now".
    #[must_use]
    pub fn sync_label(&self, now: u64) -> String {
        if !self.connected {
            return "Not connected".to_string();
        }
        let Some(last) = self.last_synced_at else {
            return "Never synced".to_string();
        };
        let elapsed = now.saturating_sub(last);
        match elapsed {
            0..60 => "Synced just now".to_string(),
            60..3_600 => format!("Synced {}m ago", elapsed / 60),
            3_600..86_400 => format!("Synced {}h ago", elapsed / 3_600),
            _ => format!("Synced {}d ago", elapsed / 86_400),
        }
    }
}

/// One tag or badge slot. `None` when the value carried no usable text.
struct LenientText(Option<String>);

impl<'de> Deserialize<'de> for LenientText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LenientTextVisitor)
    }
}

struct LenientTextVisitor;

impl<'de> Visitor<'de> for LenientTextVisitor {
    type Value = LenientText;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a tag string or scalar")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(LenientText(Some(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(LenientText(Some(v)))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(LenientText(Some(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(LenientText(Some(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(LenientText(Some(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(LenientText(Some(v.to_string())))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LenientText(None))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LenientText(None))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        LenientText::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(LenientText(None))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(LenientText(None))
    }
}

fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw: Option<Vec<LenientText>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|tag| tag.0)
        .collect())
}

fn lenient_badge<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(LenientText::deserialize(deserializer)?.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ValueKind;

    #[test]
    fn sync_label_buckets() {
        let mut status = DataSourceStatus {
            name: "HubSpot".into(),
            connected: true,
            last_synced_at: Some(1_000),
        };
        assert_eq!(status.sync_label(1_030), "Synced just now");
        assert_eq!(status.sync_label(1_000 + 5 * 60), "Synced 5m ago");
        assert_eq!(status.sync_label(1_000 + 3 * 3_600), "Synced 3h ago");
        assert_eq!(status.sync_label(1_000 + 2 * 86_400), "Synced 2d ago");
        assert_eq!(status.sync_label(10), "Synced just now");

        status.last_synced_at = None;
        assert_eq!(status.sync_label(5_000), "Never synced");
        status.connected = false;
        assert_eq!(status.sync_label(5_000), "Not connected");
    }

    #[test]
    fn funnel_conversions_pair_adjacent_stages() {
        let bundle = KpiBundle {
            period: "2026-Q3".into(),
            metrics: Vec::new(),
            funnel: vec![
                FunnelStage::new("Visitors", 10_000.0),
                FunnelStage::new("Leads", 500.0),
                FunnelStage::new("SQLs", 0.0),
                FunnelStage::new("Won", 0.0),
            ],
        };
        assert_eq!(
            bundle.funnel_conversions(),
            vec![
                ("Leads".to_string(), "5.0%".to_string()),
                ("SQLs".to_string(), "0.0%".to_string()),
                ("Won".to_string(), "N/A".to_string()),
            ]
        );
    }

    #[test]
    fn bundle_deserializes_with_unknown_strings_intact() {
        let json = r#"{
            "period": "2026-09",
            "metrics": [
                {"key": "pipeline", "label": "Pipeline", "value": {"value": 1250000, "unit": "$"},
                 "delta": 8.2, "sources": ["salesforce", "mystery-box"], "badge": "assumption"},
                {"key": "cac", "label": "CAC", "value": {"value": null}, "polarity": "lower_is_better"}
            ]
        }"#;
        let bundle: KpiBundle = serde_json::from_str(json).expect("bundle should parse");
        assert_eq!(bundle.metrics.len(), 2);
        let pipeline = bundle.metric("pipeline").expect("pipeline metric");
        assert_eq!(pipeline.sources, vec!["salesforce", "mystery-box"]);
        let cac = bundle.metric("cac").expect("cac metric");
        assert_eq!(cac.value.value, ValueKind::Missing);
        assert_eq!(cac.polarity, Polarity::LowerIsBetter);
        assert!(bundle.funnel.is_empty());
    }

    #[test]
    fn malformed_tags_do_not_fail_the_bundle() {
        let json = r#"{
            "metrics": [
                {"key": "good", "label": "Good", "value": {"value": 10}, "sources": ["crm"]},
                {"key": "bad", "label": "Bad", "value": {"value": 20},
                 "sources": ["crm", 42, null, {"nested": true}, false], "badge": 7},
                {"key": "null_sources", "sources": null, "badge": null}
            ]
        }"#;
        let bundle: KpiBundle = serde_json::from_str(json).expect("bundle should parse");
        assert_eq!(bundle.metrics.len(), 3);
        assert_eq!(bundle.metric("good").expect("good").sources, vec!["crm"]);
        let bad = bundle.metric("bad").expect("bad");
        assert_eq!(bad.sources, vec!["crm", "42", "false"]);
        assert_eq!(bad.badge.as_deref(), Some("7"));
        let empty = bundle.metric("null_sources").expect("null_sources");
        assert!(empty.sources.is_empty());
        assert_eq!(empty.badge, None);

        let annotation = crate::annotation::annotate(bad);
        assert_eq!(annotation.display_value, "20");
        assert_eq!(
            annotation.sources.tags()[1],
            crate::annotation::ProvenanceTag::Unrecognized("42".into())
        );
    }
}
