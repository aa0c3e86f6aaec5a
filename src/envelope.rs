//! Response envelopes of the two backend versions.
//!
//! v1 answers with a flat page object, v2 wraps its payload in a
//! `{ status, data }` envelope. Both are reduced to a [`ListOutcome`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::image::{ImageRecord, PageInfo};

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageList {
    pub images: Vec<ImageRecord>,
    pub page: Option<PageInfo>,
}

/// What a 2xx response meant for the view.
#[derive(Debug, Clone, PartialEq)]
pub enum ListOutcome {
    Success(ImageList),
    /// The envelope carried a status other than `"success"`.
    Failure(String),
}

#[derive(Deserialize)]
struct PagedImages {
    #[serde(rename = "Images", default)]
    images: Option<Vec<ImageRecord>>,
    #[serde(flatten)]
    page: PageInfo,
}

impl From<PagedImages> for ImageList {
    fn from(paged: PagedImages) -> Self {
        ImageList {
            images: paged.images.unwrap_or_default(),
            page: Some(paged.page),
        }
    }
}

#[derive(Deserialize)]
struct StatusEnvelope {
    status: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnvelopeData {
    Records(Vec<ImageRecord>),
    Paged(PagedImages),
}

/// `{ "Images": [...], "Offset", "Count", "Limit" }`
pub fn parse_v1(body: &[u8]) -> Result<ListOutcome, AppError> {
    let paged: PagedImages = serde_json::from_slice(body)?;
    Ok(ListOutcome::Success(paged.into()))
}

/// `{ "status": "success", "data": [...] }`, where `data` may also be the
/// backend's paged object.
pub fn parse_v2(body: &[u8]) -> Result<ListOutcome, AppError> {
    let envelope: StatusEnvelope = serde_json::from_slice(body)?;
    if envelope.status != STATUS_SUCCESS {
        return Ok(ListOutcome::Failure(envelope.status));
    }

    let list = match envelope.data {
        Value::Null => ImageList::default(),
        data => match serde_json::from_value(data)? {
            EnvelopeData::Records(images) => ImageList { images, page: None },
            EnvelopeData::Paged(paged) => paged.into(),
        },
    };
    Ok(ListOutcome::Success(list))
}

/// Pulls a human-readable message out of a failed response body.
///
/// Looks at `error`, then the jsend `message`, then the raw text, then the
/// HTTP reason phrase.
pub fn error_message(status: u16, reason: Option<&str>, body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(Value::String(message)) = map.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    match reason {
        Some(reason) => reason.to_string(),
        None => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn v2_success_with_plain_list() {
        let outcome = parse_v2(&bytes(json!({
            "status": "success",
            "data": [{ "Id": 1 }, { "Id": 2 }]
        })))
        .unwrap();

        let ListOutcome::Success(list) = outcome else {
            panic!("expected success");
        };
        let ids: Vec<i64> = list.images.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(list.page, None);
    }

    #[test]
    fn v2_success_with_paged_payload() {
        let outcome = parse_v2(&bytes(json!({
            "status": "success",
            "data": {
                "ResultCount": 41,
                "SinceIDs": [0, 20, 40],
                "Count": 1,
                "Images": [{ "Id": 40, "Filename": "last.jpg" }]
            }
        })))
        .unwrap();

        let ListOutcome::Success(list) = outcome else {
            panic!("expected success");
        };
        assert_eq!(list.images.len(), 1);
        assert_eq!(list.images[0].filename, "last.jpg");
        let page = list.page.unwrap();
        assert_eq!(page.result_count, Some(41));
        assert_eq!(page.since_ids, vec![0, 20, 40]);
    }

    #[test]
    fn v2_success_without_data_is_an_empty_list() {
        let outcome = parse_v2(&bytes(json!({ "status": "success" }))).unwrap();
        assert_eq!(outcome, ListOutcome::Success(ImageList::default()));
    }

    #[test]
    fn v2_other_status_is_a_failure() {
        let outcome = parse_v2(&bytes(json!({ "status": "partial", "data": [] }))).unwrap();
        assert_eq!(outcome, ListOutcome::Failure("partial".into()));

        // jsend "fail" carries arbitrary data, which must not break parsing
        let outcome = parse_v2(&bytes(json!({ "status": "fail", "data": { "q": "invalid" } }))).unwrap();
        assert_eq!(outcome, ListOutcome::Failure("fail".into()));
    }

    #[test]
    fn v2_rejects_a_body_without_status() {
        assert!(parse_v2(&bytes(json!({ "data": [] }))).is_err());
    }

    #[test]
    fn v1_flat_page() {
        let outcome = parse_v1(&bytes(json!({
            "Images": [{ "Id": 3, "Fileid": "f3" }],
            "Offset": 20,
            "Count": 1,
            "Limit": 20
        })))
        .unwrap();

        let ListOutcome::Success(list) = outcome else {
            panic!("expected success");
        };
        assert_eq!(list.images[0].file_id, "f3");
        let page = list.page.unwrap();
        assert_eq!(page.offset, Some(20));
        assert_eq!(page.limit, Some(20));
    }

    #[test]
    fn v1_null_images() {
        let outcome = parse_v1(&bytes(json!({ "Images": null, "Count": 0 }))).unwrap();
        let ListOutcome::Success(list) = outcome else {
            panic!("expected success");
        };
        assert!(list.images.is_empty());
    }

    #[test]
    fn error_message_sources() {
        assert_eq!(error_message(504, None, &bytes(json!({ "error": "timeout" }))), "timeout");
        assert_eq!(
            error_message(400, None, &bytes(json!({ "status": "error", "message": "Invalid image ID from URL" }))),
            "Invalid image ID from URL"
        );
        assert_eq!(error_message(502, Some("Bad Gateway"), b"upstream died\n"), "upstream died");
        assert_eq!(error_message(503, Some("Service Unavailable"), b""), "Service Unavailable");
        assert_eq!(error_message(599, None, b""), "HTTP 599");
    }
}
