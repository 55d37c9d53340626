#![forbid(unsafe_code)]

//! Human-friendly metric value formatting and trend classification.
//!
//! Magnitudes of one thousand and above are abbreviated with `K`, `M`, and
//! `B` suffixes at a configurable precision; smaller magnitudes are rendered
//! as-is. Missing, empty, and non-finite values resolve to [`NOT_AVAILABLE`]
//! and never panic.
//!
//! # Examples
//!
//! ```
//! use gtmdash_metrics::format::{classify_trend, format_value, MetricValue, Trend};
//!
//! assert_eq!(format_value(&MetricValue::number(1_500.0)), "1.5K");
//! assert_eq!(format_value(&MetricValue::number(999.0)), "999");
//! assert_eq!(format_value(&MetricValue::missing()), "N/A");
//! assert_eq!(classify_trend(-4.2), Trend::Down);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel rendered for values that cannot be shown.
pub const NOT_AVAILABLE: &str = "N/A";

/// Abbreviation bands in ascending order.
const BANDS: &[(f64, &str)] = &[(1e3, "K"), (1e6, "M"), (1e9, "B")];

/// Raw value carried by a metric record.
///
/// Deserializes from a JSON number, string, or `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueKind {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

/// Display unit attached to a metric value.
///
/// Serialized as a plain string: `"$"` (or any single currency symbol) is a
/// currency prefix, `"%"` a percentage, `""`/`"count"` a bare count, and
/// anything else a trailing suffix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MetricUnit {
    #[default]
    Count,
    Currency(String),
    Percent,
    Suffix(String),
}

impl From<String> for MetricUnit {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "" | "count" => Self::Count,
            "%" | "percent" => Self::Percent,
            "$" | "€" | "£" | "¥" => Self::Currency(trimmed.to_string()),
            other => Self::Suffix(other.to_string()),
        }
    }
}

impl From<MetricUnit> for String {
    fn from(unit: MetricUnit) -> Self {
        match unit {
            MetricUnit::Count => String::new(),
            MetricUnit::Percent => "%".to_string(),
            MetricUnit::Currency(symbol) => symbol,
            MetricUnit::Suffix(suffix) => suffix,
        }
    }
}

/// A metric value as supplied by the data collaborator. Never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricValue {
    #[serde(default)]
    pub value: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<MetricUnit>,
}

impl MetricValue {
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self {
            value: ValueKind::Number(value),
            unit: None,
        }
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: ValueKind::Text(value.into()),
            unit: None,
        }
    }

    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unit(mut self, unit: MetricUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Numeric payload, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            ValueKind::Number(n) => Some(n),
            _ => None,
        }
    }
}

/// Formatting configuration for metric numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    /// Decimal places kept for abbreviated and fractional values.
    /// Trailing zeros are trimmed.
    pub precision: usize,
    /// Digit grouping separator for unabbreviated output.
    pub separator: char,
    /// Abbreviate magnitudes >= 1,000. When false, numbers are grouped.
    pub compact: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::compact()
    }
}

impl NumberFormat {
    /// Abbreviated output (`1.5K`) with one decimal place.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            precision: 1,
            separator: ',',
            compact: true,
        }
    }

    /// Fully grouped output (`1,500`).
    #[must_use]
    pub const fn full() -> Self {
        Self {
            precision: 1,
            separator: ',',
            compact: false,
        }
    }

    #[must_use]
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }
}

/// Format a metric value with the default compact format.
#[must_use]
pub fn format_value(value: &MetricValue) -> String {
    format_value_with(value, NumberFormat::default())
}

/// Format a metric value with an explicit number format.
#[must_use]
pub fn format_value_with(value: &MetricValue, format: NumberFormat) -> String {
    match &value.value {
        ValueKind::Missing => NOT_AVAILABLE.to_string(),
        ValueKind::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                trimmed.to_string()
            }
        }
        ValueKind::Number(n) if !n.is_finite() => NOT_AVAILABLE.to_string(),
        ValueKind::Number(n) => {
            let (negative, magnitude) = format_magnitude(*n, format);
            let sign = if negative { "-" } else { "" };
            match value.unit.as_ref().unwrap_or(&MetricUnit::Count) {
                MetricUnit::Count => format!("{sign}{magnitude}"),
                MetricUnit::Currency(symbol) => format!("{sign}{symbol}{magnitude}"),
                MetricUnit::Percent => format!("{sign}{magnitude}%"),
                MetricUnit::Suffix(suffix) => format!("{sign}{magnitude} {suffix}"),
            }
        }
    }
}

/// Format a bare number with the given format. Non-finite input yields the
/// sentinel.
#[must_use]
pub fn format_number(value: f64, format: NumberFormat) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let (negative, magnitude) = format_magnitude(value, format);
    if negative {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// Render the absolute value and report whether a minus sign is needed.
///
/// The sign is dropped when the rendered magnitude rounds to zero.
fn format_magnitude(value: f64, format: NumberFormat) -> (bool, String) {
    let abs = value.abs();

    if format.compact
        && let Some(mut band) = compact_band(abs, format.precision)
    {
        loop {
            let (threshold, suffix) = BANDS[band];
            let rounded = round_to(abs / threshold, format.precision);
            // 999_950 at one decimal would read "1000K"; promote instead.
            if rounded >= 1000.0 && band + 1 < BANDS.len() {
                band += 1;
                continue;
            }
            let text = trim_fraction(format!("{rounded:.prec$}", prec = format.precision));
            return (value < 0.0, format!("{}{suffix}", group_digits(&text, format.separator)));
        }
    }

    let rounded = round_to(abs, format.precision);
    let text = trim_fraction(format!("{rounded:.prec$}", prec = format.precision));
    (value < 0.0 && rounded != 0.0, group_digits(&text, format.separator))
}

/// Starting band for `abs`, or `None` when it renders without a suffix.
///
/// 999.96 at one decimal rounds to 1000, so it starts in the `K` band.
fn compact_band(abs: f64, precision: usize) -> Option<usize> {
    BANDS
        .iter()
        .rposition(|&(threshold, _)| abs >= threshold)
        .or_else(|| (round_to(abs, precision) >= BANDS[0].0).then_some(0))
}

fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(i32::try_from(precision).unwrap_or(i32::MAX).min(12));
    (value * factor).round() / factor
}

fn trim_fraction(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn group_digits(text: &str, separator: char) -> String {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text, None),
    };
    let digits = int_part.len();
    let mut out = String::with_capacity(text.len() + digits / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (digits - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Direction of a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// Whether an increase in a metric is good news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

/// Tone used to color a trend marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Trend {
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Flat => "–",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        }
    }

    /// Flat is always neutral, whatever the polarity.
    #[must_use]
    pub const fn sentiment(self, polarity: Polarity) -> Sentiment {
        match (self, polarity) {
            (Self::Flat, _) => Sentiment::Neutral,
            (Self::Up, Polarity::HigherIsBetter) | (Self::Down, Polarity::LowerIsBetter) => {
                Sentiment::Positive
            }
            (Self::Up, Polarity::LowerIsBetter) | (Self::Down, Polarity::HigherIsBetter) => {
                Sentiment::Negative
            }
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a signed percentage change. `NaN` is treated as flat.
#[must_use]
pub fn classify_trend(delta: f64) -> Trend {
    if delta > 0.0 {
        Trend::Up
    } else if delta < 0.0 {
        Trend::Down
    } else {
        Trend::Flat
    }
}

/// Render a signed percentage change, e.g. `+12.5%`, `-3%`, `0%`.
///
/// The sign follows [`classify_trend`], so a tiny positive delta reads `+0%`
/// rather than looking flat.
#[must_use]
pub fn format_delta(delta: f64) -> String {
    if !delta.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let magnitude = trim_fraction(format!("{:.1}", round_to(delta.abs(), 1)));
    match classify_trend(delta) {
        Trend::Up => format!("+{magnitude}%"),
        Trend::Down => format!("-{magnitude}%"),
        Trend::Flat => "0%".to_string(),
    }
}

/// Render `part / whole` as a percentage with one decimal place.
#[must_use]
pub fn format_ratio(part: f64, whole: f64) -> String {
    if whole == 0.0 || !whole.is_finite() || !part.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.1}%", part / whole * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(n: f64) -> String {
        format_value(&MetricValue::number(n))
    }

    #[test]
    fn abbreviates_thousands() {
        assert_eq!(fmt(1_500.0), "1.5K");
        assert_eq!(fmt(2_000.0), "2K");
        assert_eq!(fmt(12_340.0), "12.3K");
    }

    #[test]
    fn below_thousand_is_plain() {
        assert_eq!(fmt(999.0), "999");
        assert_eq!(fmt(0.0), "0");
        assert_eq!(fmt(12.5), "12.5");
        assert_eq!(fmt(0.333), "0.3");
    }

    #[test]
    fn boundaries_use_abbreviated_form() {
        assert_eq!(fmt(1_000.0), "1K");
        assert_eq!(fmt(1_000_000.0), "1M");
        assert_eq!(fmt(1_000_000_000.0), "1B");
    }

    #[test]
    fn rounding_promotes_to_next_band() {
        assert_eq!(fmt(999_950.0), "1M");
        assert_eq!(fmt(999.96), "1K");
        assert_eq!(fmt(-999.96), "-1K");
        assert_eq!(fmt(999.94), "999.9");
        assert_eq!(fmt(999_949.0), "999.9K");
    }

    #[test]
    fn negative_values_keep_sign() {
        assert_eq!(fmt(-1_500.0), "-1.5K");
        assert_eq!(fmt(-2_500_000.0), "-2.5M");
        assert_eq!(fmt(-42.0), "-42");
        assert_eq!(fmt(-0.01), "0");
    }

    #[test]
    fn missing_and_non_finite_are_sentinel() {
        assert_eq!(format_value(&MetricValue::missing()), NOT_AVAILABLE);
        assert_eq!(fmt(f64::NAN), NOT_AVAILABLE);
        assert_eq!(fmt(f64::INFINITY), NOT_AVAILABLE);
        assert_eq!(format_value(&MetricValue::text("   ")), NOT_AVAILABLE);
    }

    #[test]
    fn text_passes_through() {
        assert_eq!(format_value(&MetricValue::text(" Q3 ")), "Q3");
    }

    #[test]
    fn units_render_in_place() {
        let currency = MetricValue::number(-1_500.0).with_unit(MetricUnit::Currency("$".into()));
        assert_eq!(format_value(&currency), "-$1.5K");
        let pct = MetricValue::number(12.5).with_unit(MetricUnit::Percent);
        assert_eq!(format_value(&pct), "12.5%");
        let days = MetricValue::number(3.25).with_unit(MetricUnit::Suffix("days".into()));
        assert_eq!(format_value(&days), "3.3 days");
    }

    #[test]
    fn full_format_groups_digits() {
        assert_eq!(format_number(1_234_567.0, NumberFormat::full()), "1,234,567");
        assert_eq!(
            format_number(1_234.5, NumberFormat::full().with_separator('.')),
            "1.234.5"
        );
        assert_eq!(format_number(-1_000.0, NumberFormat::full()), "-1,000");
    }

    #[test]
    fn precision_is_configurable() {
        let two = NumberFormat::compact().with_precision(2);
        assert_eq!(format_number(1_536.0, two), "1.54K");
        let zero = NumberFormat::compact().with_precision(0);
        assert_eq!(format_number(1_536.0, zero), "2K");
    }

    #[test]
    fn trend_classification() {
        assert_eq!(classify_trend(3.0), Trend::Up);
        assert_eq!(classify_trend(-0.5), Trend::Down);
        assert_eq!(classify_trend(0.0), Trend::Flat);
        assert_eq!(classify_trend(-0.0), Trend::Flat);
        assert_eq!(classify_trend(f64::NAN), Trend::Flat);
    }

    #[test]
    fn flat_has_distinct_glyph_and_neutral_tone() {
        assert_ne!(Trend::Flat.glyph(), Trend::Up.glyph());
        assert_eq!(Trend::Flat.sentiment(Polarity::HigherIsBetter), Sentiment::Neutral);
        assert_eq!(Trend::Down.sentiment(Polarity::LowerIsBetter), Sentiment::Positive);
        assert_eq!(Trend::Up.sentiment(Polarity::LowerIsBetter), Sentiment::Negative);
    }

    #[test]
    fn delta_rendering() {
        assert_eq!(format_delta(12.5), "+12.5%");
        assert_eq!(format_delta(-3.0), "-3%");
        assert_eq!(format_delta(0.0), "0%");
        assert_eq!(format_delta(0.01), "+0%");
        assert_eq!(format_delta(f64::NAN), NOT_AVAILABLE);
    }

    #[test]
    fn ratio_rendering() {
        assert_eq!(format_ratio(25.0, 200.0), "12.5%");
        assert_eq!(format_ratio(1.0, 0.0), NOT_AVAILABLE);
    }

    #[test]
    fn unit_string_conversions() {
        assert_eq!(MetricUnit::from("$".to_string()), MetricUnit::Currency("$".into()));
        assert_eq!(MetricUnit::from("%".to_string()), MetricUnit::Percent);
        assert_eq!(MetricUnit::from(String::new()), MetricUnit::Count);
        assert_eq!(MetricUnit::from("days".to_string()), MetricUnit::Suffix("days".into()));
    }

    #[test]
    fn value_deserializes_from_json_shapes() {
        let number: MetricValue = serde_json::from_str(r#"{"value": 1500, "unit": "$"}"#)
            .expect("number value");
        assert_eq!(number.as_number(), Some(1500.0));
        assert_eq!(number.unit, Some(MetricUnit::Currency("$".into())));

        let missing: MetricValue = serde_json::from_str(r#"{"value": null}"#).expect("null value");
        assert_eq!(missing.value, ValueKind::Missing);

        let absent: MetricValue = serde_json::from_str("{}").expect("absent value");
        assert_eq!(absent.value, ValueKind::Missing);

        let text: MetricValue = serde_json::from_str(r#"{"value": "Q3"}"#).expect("text value");
        assert_eq!(text.value, ValueKind::Text("Q3".into()));
    }
}
