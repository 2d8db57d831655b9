use std::path::Path;

use reqwest::Url;

use super::{parse, parse_str};
use super::spec::Document;
use crate::error::{LoadError, ParseError};

/// What a loader input string turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Inline JSON document text.
    Json,
    /// An absolute http(s) URL.
    Url(Url),
    /// An existing filesystem path.
    Path,
}

/// Loads API documents from inline JSON, http(s) URLs, or files.
///
/// Fetching is the only asynchronous step. A load is cancelled by dropping
/// its future; parsing only starts once the whole body has been read, so a
/// cancelled load never yields a partial document.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    client: reqwest::Client,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Detect the kind of `input` and load it.
    ///
    /// Probes, in order: JSON brackets, http(s) URL, existing path.
    pub async fn load(&self, input: &str) -> Result<Document, LoadError> {
        match detect(input).await? {
            InputKind::Json => Ok(parse_str(input)?),
            InputKind::Url(url) => self.fetch_url(url).await,
            InputKind::Path => self.load_file(input.trim()).await,
        }
    }

    /// Whether [`Loader::load`] would succeed on `input`.
    pub async fn can_load(&self, input: &str) -> bool {
        self.load(input).await.is_ok()
    }

    /// Fetch a document over http(s) and parse it.
    pub async fn load_url(&self, url: &str) -> Result<Document, LoadError> {
        let parsed = Url::parse(url.trim()).map_err(|e| unavailable(url, e))?;
        if !is_http(&parsed) {
            return Err(unavailable(
                url,
                format!("unsupported URL scheme '{}'", parsed.scheme()),
            ));
        }
        self.fetch_url(parsed).await
    }

    /// Read a document from disk and parse it.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<Document, LoadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| unavailable(&path.display().to_string(), e))?;
        log::debug!("read {} bytes from {}", bytes.len(), path.display());
        Ok(parse(&bytes)?)
    }

    async fn fetch_url(&self, url: Url) -> Result<Document, LoadError> {
        let location = url.to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| unavailable(&location, e))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| unavailable(&location, e))?;
        log::debug!("fetched {} bytes from {location}", bytes.len());
        Ok(parse(&bytes)?)
    }
}

/// Classify a loader input. Fails only when the input matches no kind.
pub async fn detect(input: &str) -> Result<InputKind, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::MalformedInput("input is empty".to_string()));
    }
    if looks_like_json(trimmed) {
        return Ok(InputKind::Json);
    }
    if let Some(url) = Url::parse(trimmed).ok().filter(is_http) {
        return Ok(InputKind::Url(url));
    }
    if tokio::fs::try_exists(trimmed).await.unwrap_or(false) {
        return Ok(InputKind::Path);
    }
    Err(ParseError::MalformedInput(format!(
        "input is neither JSON text, an http(s) URL, nor an existing file: {}",
        abbreviate(trimmed)
    )))
}

fn looks_like_json(text: &str) -> bool {
    (text.starts_with('{') && text.ends_with('}')) || (text.starts_with('[') && text.ends_with(']'))
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn unavailable(
    location: &str,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> LoadError {
    LoadError::SourceUnavailable {
        location: location.to_string(),
        source: source.into(),
    }
}

fn abbreviate(text: &str) -> String {
    match text.char_indices().nth(80) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_detect_json() {
        assert_eq!(detect("  {\"a\": 1}  ").await.unwrap(), InputKind::Json);
        assert_eq!(detect("[]").await.unwrap(), InputKind::Json);
    }

    #[tokio::test]
    async fn test_detect_url() {
        match detect("https://example.com/openapi.json").await.unwrap() {
            InputKind::Url(url) => assert_eq!(url.host_str(), Some("example.com")),
            other => panic!("expected URL, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_detect_rejects_other_schemes_and_garbage() {
        assert!(detect("ftp://example.com/spec.json").await.is_err());
        assert!(detect("definitely not a document").await.is_err());
        assert!(detect("   ").await.is_err());
    }

    #[test]
    fn test_abbreviate() {
        let long = "x".repeat(100);
        assert_eq!(abbreviate(&long).len(), 83);
        assert_eq!(abbreviate("short"), "short");
    }
}
