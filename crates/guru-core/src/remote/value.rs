//! Conversion between Firestore typed values and plain JSON
//!
//! Firestore wraps every value in a single-key object naming its type
//! (`{"stringValue": "x"}`, `{"mapValue": {"fields": {...}}}`). Articles are
//! serialised to plain JSON with serde first and then wrapped, so the field
//! names stay identical to the local cache representation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{RemoteError, RemoteResult};
use crate::models::{Article, ServerTimestamp};

pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// A document as returned by the REST API
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Full resource name; the last segment is the document id
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Wrap a plain JSON value in Firestore's typed representation
pub fn to_firestore(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(to_firestore).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": wrap_fields(map) } }),
    }
}

/// Unwrap a Firestore typed value into plain JSON
///
/// Timestamps, references and bytes become strings.
pub fn from_firestore(value: &Value) -> Result<Value, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| format!("expected typed value, found {}", value))?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| "empty typed value".to_string())?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" | "bytesValue"
        | "referenceValue" | "geoPointValue" => Ok(inner.clone()),
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| format!("bad integerValue '{}': {}", s, e)),
            other => Ok(other.clone()),
        },
        "arrayValue" => inner
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(from_firestore).collect::<Result<Vec<_>, _>>())
            .unwrap_or_else(|| Ok(Vec::new()))
            .map(Value::Array),
        "mapValue" => {
            let empty = Map::new();
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .unwrap_or(&empty);
            unwrap_fields(fields).map(Value::Object)
        }
        other => Err(format!("unsupported value type '{}'", other)),
    }
}

fn wrap_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), to_firestore(v)))
        .collect()
}

fn unwrap_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, String> {
    fields
        .iter()
        .map(|(k, v)| from_firestore(v).map(|plain| (k.clone(), plain)))
        .collect()
}

/// Document fields for an article write
///
/// `id` lives in the document name and is not stored as a field. Server
/// timestamps are written through transforms, so only an already confirmed
/// `createdAt` is sent as a value.
pub fn encode_article(article: &Article) -> RemoteResult<Map<String, Value>> {
    let plain = serde_json::to_value(article).map_err(|e| RemoteError::InvalidDocument {
        name: article.id.clone(),
        details: e.to_string(),
    })?;

    let mut map = match plain {
        Value::Object(map) => map,
        _ => {
            return Err(RemoteError::InvalidDocument {
                name: article.id.clone(),
                details: "article did not serialise to an object".to_string(),
            })
        }
    };
    map.remove("id");
    map.remove(CREATED_AT);
    map.remove(UPDATED_AT);

    let mut fields = wrap_fields(&map);
    if let Some(created) = article.created_at.confirmed() {
        fields.insert(
            CREATED_AT.to_string(),
            json!({ "timestampValue": created.to_rfc3339() }),
        );
    }
    Ok(fields)
}

/// Rebuild an article from a stored document
pub fn decode_article(document: &Document) -> RemoteResult<Article> {
    let invalid = |details: String| RemoteError::InvalidDocument {
        name: document.name.clone(),
        details,
    };

    let mut plain = unwrap_fields(&document.fields).map_err(invalid)?;
    let created_at = take_timestamp(&mut plain, CREATED_AT);
    let updated_at = take_timestamp(&mut plain, UPDATED_AT);
    plain.insert("id".to_string(), Value::String(document.id().to_string()));

    let mut article: Article =
        serde_json::from_value(Value::Object(plain)).map_err(|e| invalid(e.to_string()))?;
    article.created_at = created_at;
    article.updated_at = updated_at;
    Ok(article)
}

fn take_timestamp(plain: &mut Map<String, Value>, key: &str) -> ServerTimestamp {
    plain
        .remove(key)
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|at| ServerTimestamp::Confirmed(at.with_timezone(&Utc)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Intel};
    use chrono::TimeZone;

    #[test]
    fn test_scalar_wrapping() {
        assert_eq!(to_firestore(&json!("x")), json!({ "stringValue": "x" }));
        assert_eq!(to_firestore(&json!(true)), json!({ "booleanValue": true }));
        assert_eq!(to_firestore(&json!(42)), json!({ "integerValue": "42" }));
        assert_eq!(to_firestore(&json!(null)), json!({ "nullValue": null }));
    }

    #[test]
    fn test_nested_unwrapping() {
        let typed = json!({
            "mapValue": { "fields": {
                "tags": { "arrayValue": { "values": [ { "stringValue": "a" } ] } },
                "count": { "integerValue": "3" },
                "empty": { "arrayValue": {} }
            }}
        });
        assert_eq!(
            from_firestore(&typed).unwrap(),
            json!({ "tags": ["a"], "count": 3, "empty": [] })
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(from_firestore(&json!({ "weirdValue": 1 })).is_err());
        assert!(from_firestore(&json!("bare")).is_err());
    }

    #[test]
    fn test_encode_article_omits_id_and_pending_timestamps() {
        let mut article = Article::with_id("art-1", "Kyoto Nights");
        article.created_at = ServerTimestamp::Pending;
        article.updated_at = ServerTimestamp::Pending;

        let fields = encode_article(&article).unwrap();
        assert!(!fields.contains_key("id"));
        assert!(!fields.contains_key(CREATED_AT));
        assert!(!fields.contains_key(UPDATED_AT));
        assert_eq!(fields["title"], json!({ "stringValue": "Kyoto Nights" }));
        assert_eq!(fields["slug"], json!({ "stringValue": "kyoto-nights" }));
    }

    #[test]
    fn test_encode_article_keeps_confirmed_creation_time() {
        let mut article = Article::with_id("art-1", "Kyoto Nights");
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        article.created_at = ServerTimestamp::Confirmed(created);

        let fields = encode_article(&article).unwrap();
        assert_eq!(
            fields[CREATED_AT],
            json!({ "timestampValue": created.to_rfc3339() })
        );
    }

    #[test]
    fn test_decode_document() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/articles/art-7",
            "fields": {
                "title": { "stringValue": "Fjords at Dawn" },
                "slug": { "stringValue": "fjords-at-dawn" },
                "category": { "stringValue": "Nordic States" },
                "location": { "stringValue": "BERGEN, NORWAY" },
                "published": { "booleanValue": false },
                "intel": { "mapValue": { "fields": {
                    "bestTime": { "stringValue": "June" },
                    "budget": { "stringValue": "High" },
                    "mustTry": { "stringValue": "Brunost" }
                }}},
                "createdAt": { "timestampValue": "2024-05-01T08:30:00.123456Z" },
                "updatedAt": { "timestampValue": "2024-05-02T10:00:00Z" }
            }
        }))
        .unwrap();

        let article = decode_article(&document).unwrap();
        assert_eq!(article.id, "art-7");
        assert_eq!(article.category, Category::Nordic);
        assert_eq!(article.published, Some(false));
        assert_eq!(
            article.intel,
            Some(Intel {
                best_time: "June".to_string(),
                budget: "High".to_string(),
                must_try: "Brunost".to_string(),
                vibe: None,
            })
        );
        assert_eq!(
            article.updated_at,
            ServerTimestamp::Confirmed(Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap())
        );
        assert!(article.created_at.confirmed().is_some());
    }

    #[test]
    fn test_decode_without_title_is_invalid() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/articles/broken",
            "fields": { "slug": { "stringValue": "broken" } }
        }))
        .unwrap();
        assert!(matches!(
            decode_article(&document),
            Err(RemoteError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_document_id() {
        let document = Document {
            name: "projects/p/databases/(default)/documents/articles/amalfi-cloud".to_string(),
            fields: Map::new(),
        };
        assert_eq!(document.id(), "amalfi-cloud");
    }
}
