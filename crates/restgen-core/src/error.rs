use thiserror::Error;

/// Boxed cause of a failed fetch.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ParseError {
    /// The input is empty, not UTF-8, not JSON, or not shaped like an API document.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The document deserialized but violates one or more structural rules.
    #[error("Invalid Swagger document: {}", .0.join(", "))]
    InvalidDocument(Vec<String>),
}

impl ParseError {
    /// The violated rules, when this is a validation failure.
    pub fn violations(&self) -> &[String] {
        match self {
            ParseError::InvalidDocument(rules) => rules,
            ParseError::MalformedInput(_) => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read API document from {location}: {source}")]
    SourceUnavailable {
        location: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid generator configuration: {}", .0.join(", "))]
    Invalid(Vec<String>),

    #[error("failed to parse configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("circular reference detected: {0}")]
    CircularRef(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to render template {template}: {source}")]
    Render {
        template: String,
        #[source]
        source: BoxError,
    },
}
