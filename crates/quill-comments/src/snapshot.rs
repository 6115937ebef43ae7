//! Versioned JSON encoding of the comment map.
//!
//! Current layout (version 1):
//!
//! ```text
//! { "version": 1, "posts": { "<post id>": [ <comment>, ... ] } }
//! ```
//!
//! Version 0 is the legacy layout: the bare post map with no envelope. It is
//! accepted on read and rewritten as version 1 on the next save.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CommentError, CommentResult};
use crate::model::CommentMap;

/// Schema version written by [`encode`].
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    posts: &'a CommentMap,
}

#[derive(Deserialize)]
struct Envelope {
    posts: CommentMap,
}

/// Result of decoding a persisted snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub comments: CommentMap,
    /// Schema version the snapshot was written with.
    pub source_version: u32,
}

impl Decoded {
    /// Whether the snapshot should be rewritten in the current layout.
    pub fn needs_migration(&self) -> bool {
        self.source_version < SCHEMA_VERSION
    }
}

/// Serialize `comments` in the current layout.
pub fn encode(comments: &CommentMap) -> CommentResult<String> {
    serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        posts: comments,
    })
    .map_err(|e| CommentError::Serialization(e.to_string()))
}

/// Parse a persisted snapshot in any supported layout.
///
/// Anything that is not a JSON object (including `null`) is malformed
/// ([`CommentError::Decode`]). An object from a newer schema yields
/// [`CommentError::UnsupportedVersion`], and an object whose contents do not
/// match this schema yields [`CommentError::Incompatible`], so callers can
/// avoid discarding data they cannot read.
pub fn decode(text: &str) -> CommentResult<Decoded> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CommentError::Decode(e.to_string()))?;
    let Value::Object(object) = &value else {
        return Err(CommentError::Decode(format!(
            "expected a JSON object, found {}",
            kind_of(&value)
        )));
    };

    let version = object.get("version").and_then(Value::as_u64);

    match version {
        None | Some(0) => {
            let comments: CommentMap =
                serde_json::from_value(value).map_err(incompatible)?;
            Ok(Decoded {
                comments,
                source_version: 0,
            })
        }
        Some(v) if v == u64::from(SCHEMA_VERSION) => {
            let envelope: Envelope =
                serde_json::from_value(value).map_err(incompatible)?;
            Ok(Decoded {
                comments: envelope.posts,
                source_version: SCHEMA_VERSION,
            })
        }
        Some(found) => Err(CommentError::UnsupportedVersion {
            found,
            supported: SCHEMA_VERSION,
        }),
    }
}

fn incompatible(e: serde_json::Error) -> CommentError {
    CommentError::Incompatible(e.to_string())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed;
    use chrono::{TimeZone, Utc};

    fn sample() -> CommentMap {
        seed(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn encode_writes_envelope() {
        let text = encode(&sample()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["posts"].is_object());
    }

    #[test]
    fn decode_current_layout() {
        let map = sample();
        let decoded = decode(&encode(&map).unwrap()).unwrap();
        assert_eq!(decoded.comments, map);
        assert_eq!(decoded.source_version, SCHEMA_VERSION);
        assert!(!decoded.needs_migration());
    }

    #[test]
    fn decode_legacy_bare_map() {
        let map = sample();
        let legacy = serde_json::to_string(&map).unwrap();
        let decoded = decode(&legacy).unwrap();
        assert_eq!(decoded.comments, map);
        assert_eq!(decoded.source_version, 0);
        assert!(decoded.needs_migration());
    }

    #[test]
    fn decode_empty_object_is_empty_legacy_map() {
        let decoded = decode("{}").unwrap();
        assert!(decoded.comments.is_empty());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode("not json {"), Err(CommentError::Decode(_))));
    }

    #[test]
    fn decode_rejects_null_and_non_objects() {
        for text in ["null", "[]", "\"x\"", "3"] {
            assert!(
                matches!(decode(text), Err(CommentError::Decode(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn decode_reports_wrong_shape_as_incompatible() {
        let text = r#"{"version":1,"posts":{"1":[{"id":"c1"}]}}"#;
        assert!(matches!(decode(text), Err(CommentError::Incompatible(_))));
    }

    #[test]
    fn decode_reports_unknown_post_type_as_incompatible() {
        let text = encode(&sample())
            .unwrap()
            .replacen("\"postType\":\"feed\"", "\"postType\":\"story\"", 1);
        assert!(text.contains("story"));
        assert!(matches!(decode(&text), Err(CommentError::Incompatible(_))));

        let legacy = serde_json::to_string(&sample())
            .unwrap()
            .replacen("\"postType\":\"feed\"", "\"postType\":\"story\"", 1);
        assert!(matches!(decode(&legacy), Err(CommentError::Incompatible(_))));
    }

    #[test]
    fn decode_rejects_newer_version() {
        let err = decode(r#"{"version":7,"posts":{}}"#).unwrap_err();
        assert_eq!(
            err,
            CommentError::UnsupportedVersion {
                found: 7,
                supported: SCHEMA_VERSION
            }
        );
    }
}
