use serde::{Deserialize, Serialize};

use super::schema::{Schema, SchemaOrRef, TypeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    /// 2.0 request payload.
    Body,
    FormData,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<SchemaOrRef>,

    // 2.0 non-body parameters describe their type inline
    #[serde(rename = "type")]
    pub inline_type: Option<TypeSet>,
    pub format: Option<String>,
    pub items: Option<Box<SchemaOrRef>>,
}

impl Parameter {
    /// `schema` when present, otherwise a schema built from the 2.0 inline
    /// `type`, `format` and `items`.
    pub fn effective_schema(&self) -> Option<SchemaOrRef> {
        if let Some(schema) = &self.schema {
            return Some(schema.clone());
        }
        let inline = Schema {
            schema_type: Some(self.inline_type.clone()?),
            format: self.format.clone(),
            items: self.items.clone(),
            ..Schema::default()
        };
        Some(inline.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}
