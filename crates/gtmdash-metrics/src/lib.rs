#![forbid(unsafe_code)]

//! Metric presentation pipeline for gtmdash.
//!
//! - [`format`]: value formatting, delta rendering, trend classification.
//! - [`annotation`]: confidence badges, provenance tags, display-ready cards.
//! - [`records`]: record shapes delivered by the remote data collaborator.

pub mod annotation;
pub mod format;
pub mod records;

pub use annotation::{
    Annotation, ConfidenceBadge, ProvenanceTag, SourceSummary, annotate, annotate_all,
};
pub use format::{
    MetricUnit, MetricValue, NOT_AVAILABLE, NumberFormat, Polarity, Sentiment, Trend, ValueKind,
    classify_trend, format_delta, format_number, format_ratio, format_value, format_value_with,
};
pub use records::{DataSourceStatus, FunnelStage, KpiBundle, MetricRecord};
