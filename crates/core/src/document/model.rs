use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::id::DocumentId;

/// One entry of the remote store's documents overview.
///
/// The local copy is a read-only projection: it is only ever replaced
/// wholesale by a refresh or dropped by an optimistic delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// `None` when the store sent no usable timestamp.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Remaining overview fields (version, ingestion status, metadata, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Document {
    pub fn new(id: DocumentId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            created_at: Some(created_at),
            extra: serde_json::Map::new(),
        }
    }

    /// Display date, `M/D/YYYY` of the UTC calendar day, or empty when the
    /// timestamp is unknown. Presentation only.
    pub fn formatted_date(&self) -> String {
        self.created_at
            .map(|ts| ts.format("%-m/%-d/%Y").to_string())
            .unwrap_or_default()
    }

    /// Case-insensitive substring match on the title.
    pub fn title_matches(&self, needle_lowercase: &str) -> bool {
        needle_lowercase.is_empty() || self.title.to_lowercase().contains(needle_lowercase)
    }
}

/// Envelope returned by `GET documents_overview`.
///
/// Entries that do not decode (no usable id, wrong shape) are skipped with a
/// warning so that one bad row does not hide the rest of the listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentsOverview {
    #[serde(default, deserialize_with = "skip_undecodable")]
    pub results: Vec<Document>,
}

fn skip_undecodable<'de, D>(deserializer: D) -> Result<Vec<Document>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Document>(entry) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping undecodable overview entry");
                None
            }
        })
        .collect())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept RFC 3339 timestamps as well as naive ISO timestamps, which are
/// taken to be UTC. Null, non-string or unparseable values become `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => parse_timestamp(&raw),
        _ => None,
    })
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
