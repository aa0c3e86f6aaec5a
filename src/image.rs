use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One archived image as returned by the backend.
///
/// Field names follow the backend's JSON. Fields the view does not know
/// about are kept in `extra` and written back as they came. Timestamps are
/// always written back as epoch seconds.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ImageRecord {
    #[serde(rename = "Id", default)]
    pub id: i64,
    #[serde(rename = "Checksum", default)]
    pub checksum: String,
    #[serde(rename = "Fileid", default)]
    pub file_id: String,
    #[serde(rename = "Filename", default)]
    pub filename: String,
    #[serde(rename = "Text", default)]
    pub text: String,
    #[serde(rename = "Comment", default)]
    pub comment: String,
    #[serde(rename = "ScanDate", default, deserialize_with = "epoch_seconds")]
    pub scan_date: i64,
    #[serde(rename = "AddDate", default, deserialize_with = "epoch_seconds")]
    pub add_date: i64,
    #[serde(rename = "InterpretDate", default, deserialize_with = "epoch_seconds")]
    pub interpret_date: i64,
    #[serde(rename = "OrigImg", default, skip_serializing_if = "Option::is_none")]
    pub orig_img: Option<String>,
    #[serde(rename = "CleanImg", default, skip_serializing_if = "Option::is_none")]
    pub clean_img: Option<String>,
    #[serde(rename = "ThumbImg", default, skip_serializing_if = "Option::is_none")]
    pub thumb_img: Option<String>,

    // View-owned state, never sent back to the backend.
    #[serde(rename = "showImg", default)]
    pub show_img: bool,
    #[serde(rename = "procURL", default, skip_serializing_if = "Option::is_none")]
    pub proc_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Paging metadata reported next to a result list. Display only.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PageInfo {
    #[serde(rename = "Offset", default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(rename = "Count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(rename = "Limit", default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(rename = "ResultCount", default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<i64>,
    #[serde(rename = "SinceIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub since_ids: Vec<i64>,
}

/// Accepts integer epoch seconds or an RFC 3339 string.
///
/// The backend's zero time (`0001-01-01T00:00:00Z`) ends up far below zero,
/// which the date helper already treats as "no timestamp".
fn epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(i64),
        Float(f64),
        Text(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(secs),
        Raw::Float(secs) => Ok(secs as i64),
        Raw::Text(text) if text.is_empty() => Ok(0),
        Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.timestamp())
            .map_err(serde::de::Error::custom),
        Raw::Null(()) => Ok(0),
    }
}
