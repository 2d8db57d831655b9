//! Request and response payloads, and the media types that carry their schemas.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// One entry of a `content` map. Only the schema is read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    /// Swagger 2.0 keeps the body schema directly on the response.
    pub schema: Option<SchemaOrRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RequestBody),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}

impl RequestBody {
    pub fn body_schema(&self) -> Option<&SchemaOrRef> {
        content_schema(&self.content)
    }
}

impl Response {
    /// JSON content wins over other content, which wins over the 2.0 `schema`.
    pub fn body_schema(&self) -> Option<&SchemaOrRef> {
        content_schema(&self.content).or(self.schema.as_ref())
    }
}

/// The schema under `application/json` (parameters such as `charset` are
/// ignored), else the first media type declaring one.
pub fn content_schema(content: &IndexMap<String, MediaType>) -> Option<&SchemaOrRef> {
    let mut fallback = None;
    for (key, entry) in content {
        let Some(schema) = entry.schema.as_ref() else {
            continue;
        };
        if is_json(key) {
            return Some(schema);
        }
        fallback.get_or_insert(schema);
    }
    fallback
}

fn is_json(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}
