use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default name of the generated client type.
pub const DEFAULT_CLIENT_NAME: &str = "ApiClient";

/// Caller-supplied settings for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Namespace of the generated code. Surrounding whitespace is ignored.
    pub namespace_name: String,
    pub client_name: String,
    pub authentication: AuthenticationConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace_name: String::new(),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            authentication: AuthenticationConfig::default(),
        }
    }
}

/// How the generated client authenticates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticationConfig {
    #[serde(rename = "type")]
    pub kind: AuthKind,
    pub location: AuthLocation,
    /// Header or query parameter name carrying the credential.
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthKind {
    #[default]
    None,
    ApiKey,
    Bearer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthLocation {
    #[default]
    None,
    Header,
    Query,
}

impl GeneratorConfig {
    pub fn new(namespace_name: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            namespace_name: namespace_name.into(),
            client_name: client_name.into(),
            authentication: AuthenticationConfig::default(),
        }
    }

    pub fn with_authentication(mut self, authentication: AuthenticationConfig) -> Self {
        self.authentication = authentication;
        self
    }

    /// Parse a configuration record from JSON. Missing keys take their defaults.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Trimmed namespace name.
    pub fn namespace(&self) -> &str {
        self.namespace_name.trim()
    }

    /// Trimmed client name, falling back to [`DEFAULT_CLIENT_NAME`] when blank.
    pub fn client(&self) -> &str {
        match self.client_name.trim() {
            "" => DEFAULT_CLIENT_NAME,
            name => name,
        }
    }

    pub fn has_authentication(&self) -> bool {
        self.authentication.kind != AuthKind::None
    }

    /// Check the authentication rules, reporting every violation at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let auth = &self.authentication;
        let mut violations = Vec::new();
        if auth.kind != AuthKind::None {
            if auth.name.trim().is_empty() {
                violations.push(
                    "Authentication name must be specified when authentication is enabled"
                        .to_string(),
                );
            }
            if auth.kind == AuthKind::ApiKey && auth.location == AuthLocation::None {
                violations.push(
                    "Authentication location must be specified for API Key authentication"
                        .to_string(),
                );
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(violations))
        }
    }
}

impl AuthenticationConfig {
    pub fn bearer(name: impl Into<String>) -> Self {
        Self {
            kind: AuthKind::Bearer,
            location: AuthLocation::Header,
            name: name.into(),
        }
    }

    pub fn api_key(location: AuthLocation, name: impl Into<String>) -> Self {
        Self {
            kind: AuthKind::ApiKey,
            location,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.client(), "ApiClient");
        assert_eq!(config.namespace(), "");
        assert_eq!(config.authentication.kind, AuthKind::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_camel_case() {
        let config = GeneratorConfig::from_json(
            r#"{
                "namespaceName": "  Petstore.Client  ",
                "clientName": "PetstoreClient",
                "authentication": { "type": "apiKey", "location": "query", "name": "api_key" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.namespace(), "Petstore.Client");
        assert_eq!(config.client(), "PetstoreClient");
        assert_eq!(config.authentication.kind, AuthKind::ApiKey);
        assert_eq!(config.authentication.location, AuthLocation::Query);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = GeneratorConfig::from_json(r#"{"namespaceName": "Acme"}"#).unwrap();
        assert_eq!(config.client(), "ApiClient");
        assert_eq!(config.authentication, AuthenticationConfig::default());
    }

    #[test]
    fn test_blank_client_name_falls_back() {
        let config = GeneratorConfig::new("Acme", "   ");
        assert_eq!(config.client(), "ApiClient");
    }

    #[test]
    fn test_validate_reports_every_violation() {
        let config = GeneratorConfig::default().with_authentication(AuthenticationConfig {
            kind: AuthKind::ApiKey,
            location: AuthLocation::None,
            name: "   ".to_string(),
        });
        match config.validate() {
            Err(ConfigError::Invalid(violations)) => {
                assert_eq!(violations.len(), 2);
                assert!(violations[0].contains("name"));
                assert!(violations[1].contains("location"));
            }
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_bearer_needs_no_location() {
        let mut auth = AuthenticationConfig::bearer("Authorization");
        auth.location = AuthLocation::None;
        let config = GeneratorConfig::default().with_authentication(auth);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bearer_without_name_is_invalid() {
        let config =
            GeneratorConfig::default().with_authentication(AuthenticationConfig::bearer(""));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Authentication name must be specified"));
    }
}
