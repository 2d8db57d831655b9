//! Case-insensitive field names.
//!
//! API documents in the wild spell keywords as `OperationId`, `Paths` or
//! `INFO`. Before typed deserialization the raw JSON tree is walked and every
//! keyword key is rewritten to its canonical spelling. Keys that name user
//! data (paths, property names, response codes, media types) are kept as-is.

use serde_json::{Map, Value};

/// Canonical spellings of every keyword the schema model reads.
const KEYWORDS: &[&str] = &[
    "$ref",
    "additionalProperties",
    "allOf",
    "anyOf",
    "basePath",
    "bearerFormat",
    "callbacks",
    "collectionFormat",
    "components",
    "consumes",
    "contact",
    "content",
    "default",
    "definitions",
    "delete",
    "deprecated",
    "description",
    "discriminator",
    "email",
    "encoding",
    "enum",
    "example",
    "examples",
    "externalDocs",
    "flows",
    "format",
    "get",
    "head",
    "headers",
    "host",
    "in",
    "info",
    "items",
    "license",
    "links",
    "mapping",
    "name",
    "nullable",
    "oneOf",
    "openIdConnectUrl",
    "openapi",
    "operationId",
    "options",
    "parameters",
    "patch",
    "paths",
    "post",
    "produces",
    "properties",
    "propertyName",
    "put",
    "readOnly",
    "requestBodies",
    "requestBody",
    "required",
    "responses",
    "schema",
    "schemas",
    "scheme",
    "schemes",
    "security",
    "securityDefinitions",
    "securitySchemes",
    "servers",
    "summary",
    "swagger",
    "tags",
    "title",
    "trace",
    "type",
    "url",
    "variables",
    "version",
    "writeOnly",
];

/// Keys whose value is a map from user-chosen names to keyword objects.
const USER_MAPS: &[&str] = &[
    "content",
    "definitions",
    "encoding",
    "headers",
    "paths",
    "properties",
    "requestBodies",
    "responses",
    "schemas",
    "securityDefinitions",
    "securitySchemes",
    "variables",
];

/// User maps that may also carry `x-` extension entries, which are dropped.
const EXTENSIBLE_MAPS: &[&str] = &["paths", "responses"];

/// Keys whose value is user data and must not be touched at all.
const OPAQUE: &[&str] = &[
    "callbacks",
    "default",
    "enum",
    "example",
    "examples",
    "links",
    "mapping",
    "required",
    "schemes",
    "security",
];

#[derive(Clone, Copy)]
enum Position {
    /// An object whose keys are keywords.
    Node,
    /// An object whose keys are user names and whose values are nodes.
    UserMap { extensible: bool },
}

/// Rewrite every keyword key in `root` to its canonical spelling.
pub fn fold_keys(root: Value) -> Value {
    fold(root, Position::Node)
}

/// Look up the canonical spelling of a keyword, ignoring ASCII case.
pub fn canonical_key(key: &str) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .copied()
        .find(|keyword| keyword.eq_ignore_ascii_case(key))
}

fn fold(value: Value, position: Position) -> Value {
    match value {
        Value::Object(map) => Value::Object(match position {
            Position::Node => fold_node(map),
            Position::UserMap { extensible } => map
                .into_iter()
                .filter(|(key, _)| !(extensible && is_extension(key)))
                .map(|(key, value)| (key, fold(value, Position::Node)))
                .collect(),
        }),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| fold(item, position))
                .collect(),
        ),
        other => other,
    }
}

fn fold_node(map: Map<String, Value>) -> Map<String, Value> {
    let mut folded = Map::with_capacity(map.len());
    for (key, value) in map {
        if is_extension(&key) {
            folded.insert(key, value);
            continue;
        }
        let Some(canonical) = canonical_key(&key) else {
            folded.insert(key, fold(value, Position::Node));
            continue;
        };
        let value = if OPAQUE.contains(&canonical) {
            value
        } else if USER_MAPS.contains(&canonical) || is_parameter_map(canonical, &value) {
            let extensible = EXTENSIBLE_MAPS.contains(&canonical);
            fold(value, Position::UserMap { extensible })
        } else {
            fold(value, Position::Node)
        };
        if folded.insert(canonical.to_string(), value).is_some() {
            log::debug!("key '{key}' replaced an earlier spelling of '{canonical}'");
        }
    }
    folded
}

fn is_extension(key: &str) -> bool {
    key.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("x-"))
}

/// `parameters` is a list on operations but a named map at the document
/// root and under `components`.
fn is_parameter_map(canonical: &str, value: &Value) -> bool {
    canonical == "parameters" && value.is_object()
}
