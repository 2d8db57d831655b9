use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operation::PathItem;
use super::parameter::ParameterOrRef;
use super::payload::{RequestBodyOrRef, ResponseOrRef};
use super::schema::SchemaOrRef;
use super::security::SecurityScheme;
use super::server::Server;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: String,
    pub description: Option<String>,
}

/// OpenAPI 3 reusable definitions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Components {
    pub schemas: IndexMap<String, SchemaOrRef>,
    pub responses: IndexMap<String, ResponseOrRef>,
    pub parameters: IndexMap<String, ParameterOrRef>,
    pub request_bodies: IndexMap<String, RequestBodyOrRef>,
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

/// A parsed Swagger 2.0 or OpenAPI 3.x document.
///
/// Both dialects share one shape: 3.x keeps reusable parts under
/// `components`, 2.0 keeps them at the root (`definitions`, `parameters`,
/// `responses`, `securityDefinitions`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub openapi: Option<String>,
    pub swagger: Option<String>,
    pub info: Option<Info>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default)]
    pub servers: Vec<Server>,
    pub host: Option<String>,
    pub base_path: Option<String>,
    #[serde(default)]
    pub schemes: Vec<String>,

    pub components: Option<Components>,
    #[serde(default)]
    pub definitions: IndexMap<String, SchemaOrRef>,
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterOrRef>,
    #[serde(default)]
    pub responses: IndexMap<String, ResponseOrRef>,
    #[serde(default)]
    pub security_definitions: IndexMap<String, SecurityScheme>,
}

impl Document {
    /// `openapi` when set, else `swagger`.
    pub fn version(&self) -> Option<&str> {
        non_blank(self.openapi.as_deref()).or(non_blank(self.swagger.as_deref()))
    }

    pub fn is_swagger2(&self) -> bool {
        matches!(
            (non_blank(self.openapi.as_deref()), non_blank(self.swagger.as_deref())),
            (None, Some(_))
        )
    }

    pub fn title(&self) -> &str {
        self.info.as_ref().map_or("", |info| &info.title)
    }

    /// Named schemas of both dialects, `components.schemas` first.
    pub fn schemas(&self) -> impl Iterator<Item = (&String, &SchemaOrRef)> {
        let components = self.components.as_ref().map(|c| &c.schemas);
        components.into_iter().flatten().chain(&self.definitions)
    }

    pub fn schema_named(&self, name: &str) -> Option<&SchemaOrRef> {
        self.schemas().find_map(|(key, schema)| (key == name).then_some(schema))
    }

    pub fn security_schemes(&self) -> impl Iterator<Item = (&String, &SecurityScheme)> {
        let components = self.components.as_ref().map(|c| &c.security_schemes);
        components.into_iter().flatten().chain(&self.security_definitions)
    }

    /// Where requests go, or an empty string when the document doesn't say.
    ///
    /// 3.x uses the first server with variable defaults filled in. 2.0
    /// builds `{scheme}://{host}{basePath}`, taking the first listed scheme
    /// and https when none is listed.
    pub fn base_url(&self) -> String {
        if let Some(server) = self.servers.first() {
            return server.resolved_url();
        }
        let base_path = self.base_path.as_deref().unwrap_or_default();
        let Some(host) = non_blank(self.host.as_deref()) else {
            return base_path.to_string();
        };
        let scheme = self.schemes.first().map_or("https", String::as_str);
        format!("{scheme}://{host}{base_path}")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
