//! Domain types decoded from the news service.
//!
//! Articles are immutable once fetched and replaced wholesale on refresh, so
//! they carry no interior mutability. Decoding is lenient where the service
//! is known to be loose: naive timestamps, empty strings for absent summaries,
//! and free-form sentiment labels.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Server-reported article counts keyed by category name.
///
/// Ordered by name regardless of the key order on the wire, so the sidebar is
/// stable across service versions.
pub type CategoryCounts = BTreeMap<String, u64>;

/// Sentiment label attached to an article by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Parse a service label. Unknown or empty labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

/// A single news item as served by `GET /api/news`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub published: DateTime<Utc>,
    #[serde(default)]
    pub link: String,
    #[serde(default, deserialize_with = "deserialize_sentiment")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub ai_summary: Option<String>,
    /// Feed-provided summary, usually raw HTML.
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub summary: Option<String>,
}

/// Parse an ISO-8601 timestamp, with or without an offset.
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw:?}")))
}

pub(crate) fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw:?}"))),
    }
}

fn deserialize_sentiment<'de, D>(deserializer: D) -> Result<Option<Sentiment>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(Sentiment::from_label))
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_parse_naive_timestamp_as_utc() {
        let ts = parse_timestamp("2024-03-05T14:30:00").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 3, 5));
        assert_eq!((ts.hour(), ts.minute()), (14, 30));
    }

    #[test]
    fn test_parse_timestamp_with_fraction_and_offset() {
        let naive = parse_timestamp("2024-03-05T14:30:00.123456").unwrap();
        assert_eq!(naive.second(), 0);

        let offset = parse_timestamp("2024-03-05T16:30:00+02:00").unwrap();
        assert_eq!(offset.hour(), 14);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_sentiment_labels() {
        assert_eq!(Sentiment::from_label("POSITIVE"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_label(" negative "), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_label("neutral"), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::from_label("label_2"), None);
        assert_eq!(Sentiment::from_label(""), None);
    }

    #[test]
    fn test_article_decodes_service_shape() {
        let value = json!({
            "id": "5d41402abc4b2a76b9719d911017c592",
            "title": "New Transformer-based Language Model Released",
            "summary": "<p>Raw summary</p>",
            "link": "https://example.com/a",
            "published": "2024-03-05T14:30:00",
            "source": "AI News",
            "content": "Raw summary",
            "ai_summary": "",
            "sentiment": "Positive"
        });

        let article: Article = serde_json::from_value(value).unwrap();
        assert_eq!(article.source, "AI News");
        assert_eq!(article.sentiment, Some(Sentiment::Positive));
        assert_eq!(article.ai_summary, None);
        assert_eq!(article.summary.as_deref(), Some("<p>Raw summary</p>"));
    }

    #[test]
    fn test_article_missing_optional_fields() {
        let value = json!({
            "id": "a1",
            "title": "Bare",
            "published": "2024-03-05T14:30:00Z"
        });

        let article: Article = serde_json::from_value(value).unwrap();
        assert!(article.content.is_empty());
        assert!(article.sentiment.is_none());
        assert!(article.ai_summary.is_none());
    }

    #[test]
    fn test_article_bad_timestamp_fails() {
        let value = json!({
            "id": "a1",
            "title": "Bad",
            "published": "not a date"
        });

        let err = serde_json::from_value::<Article>(value).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }
}
