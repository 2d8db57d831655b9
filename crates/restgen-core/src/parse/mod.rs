pub mod casing;
pub mod loader;
pub mod operation;
pub mod parameter;
pub mod payload;
pub mod ref_resolve;
pub mod schema;
pub mod security;
pub mod server;
pub mod spec;

use crate::error::ParseError;
use spec::Document;

pub use loader::Loader;

pub const RULE_VERSION_MISSING: &str =
    "Document must specify either 'openapi' or 'swagger' version";
pub const RULE_VERSION_AMBIGUOUS: &str =
    "Document must not specify both 'openapi' and 'swagger' versions";
pub const RULE_INFO_TITLE: &str = "Document must have an 'info' section with a title";
pub const RULE_PATHS: &str = "Document must have at least one path defined";

/// Parse a Swagger 2.0 or OpenAPI 3.x JSON document.
///
/// Keyword field names are matched case-insensitively. Structural rules are
/// checked after deserialization and every violation is reported.
pub fn parse(input: &[u8]) -> Result<Document, ParseError> {
    let text = std::str::from_utf8(input)
        .map_err(|e| ParseError::MalformedInput(format!("input is not valid UTF-8: {e}")))?;
    parse_str(text)
}

/// Parse a document from text. See [`parse`].
pub fn parse_str(text: &str) -> Result<Document, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ParseError::MalformedInput("input is empty".to_string()));
    }

    let raw: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| ParseError::MalformedInput(format!("input is not valid JSON: {e}")))?;
    if !raw.is_object() {
        return Err(ParseError::MalformedInput(
            "document root must be a JSON object".to_string(),
        ));
    }

    let doc: Document = serde_json::from_value(casing::fold_keys(raw)).map_err(|e| {
        ParseError::MalformedInput(format!("document does not match the expected shape: {e}"))
    })?;
    validate(&doc)?;

    log::debug!(
        "parsed '{}' ({} paths, version {})",
        doc.title(),
        doc.paths.len(),
        doc.version().unwrap_or("?")
    );
    Ok(doc)
}

/// Whether [`parse`] would succeed on `input`.
pub fn can_parse(input: &[u8]) -> bool {
    parse(input).is_ok()
}

/// Check the structural rules a document must satisfy.
pub fn validate(doc: &Document) -> Result<(), ParseError> {
    let mut violations = Vec::new();

    let has_openapi = doc.openapi.as_deref().is_some_and(|v| !v.trim().is_empty());
    let has_swagger = doc.swagger.as_deref().is_some_and(|v| !v.trim().is_empty());
    match (has_openapi, has_swagger) {
        (false, false) => violations.push(RULE_VERSION_MISSING.to_string()),
        (true, true) => violations.push(RULE_VERSION_AMBIGUOUS.to_string()),
        _ => {}
    }

    if doc.title().trim().is_empty() {
        violations.push(RULE_INFO_TITLE.to_string());
    }

    if doc.paths.is_empty() {
        violations.push(RULE_PATHS.to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ParseError::InvalidDocument(violations))
    }
}
