use std::fmt;

use serde::Serialize;

use super::operations::Method;
use super::schemas::Model;
use crate::config::{AuthKind, AuthLocation};

/// Everything a generator needs to emit a typed client, independent of the
/// target language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeModel {
    pub namespace: String,
    pub client_name: String,
    pub base_url: String,
    pub authentication: Authentication,
    pub models: Vec<Model>,
    pub methods: Vec<Method>,
    /// Named non-object schemas, so references to them can be rendered as
    /// their target type.
    pub aliases: Vec<TypeAlias>,
}

impl CodeModel {
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn alias(&self, name: &str) -> Option<&TypeAlias> {
        self.aliases.iter().find(|a| a.name == name)
    }
}

/// Authentication wiring for the generated client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Authentication {
    pub kind: AuthKind,
    pub location: AuthLocation,
    pub name: String,
}

/// A named schema that is not an object (primitive, array, enum, or a bare
/// reference to another schema).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeAlias {
    pub name: String,
    pub target: IrType,
    pub description: Option<String>,
}

/// A language-neutral type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum IrType {
    String,
    DateTime,
    Uuid,
    Int32,
    Int64,
    Float,
    Double,
    Decimal,
    Boolean,
    List(Box<IrType>),
    /// Reference to a named model or alias (PascalCase).
    Ref(String),
    /// Open/untyped placeholder for anything unresolved.
    Any,
}

impl IrType {
    pub fn list_of(inner: IrType) -> Self {
        IrType::List(Box::new(inner))
    }

    /// Name of the referenced schema, looking through lists.
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            IrType::Ref(name) => Some(name),
            IrType::List(inner) => inner.referenced_name(),
            _ => None,
        }
    }
}

/// A name with the casing variants generators need pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
