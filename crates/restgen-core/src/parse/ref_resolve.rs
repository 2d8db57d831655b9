use std::collections::HashSet;

use super::parameter::{Parameter, ParameterOrRef};
use super::payload::{RequestBody, RequestBodyOrRef, Response, ResponseOrRef};
use super::schema::{Schema, SchemaOrRef};
use super::spec::Document;
use crate::error::ResolveError;

/// Section of the document a local `$ref` points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSection {
    Schemas,
    Parameters,
    Responses,
    RequestBodies,
}

/// Looks up intra-document `$ref` targets by name.
///
/// Both OpenAPI 3 (`#/components/schemas/Pet`) and Swagger 2.0
/// (`#/definitions/Pet`, `#/parameters/limit`) pointers are understood.
/// Chains of references are followed; a chain that loops back on itself
/// is reported as [`ResolveError::CircularRef`].
pub struct RefLookup<'a> {
    doc: &'a Document,
}

impl<'a> RefLookup<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    /// Resolve a schema reference to its name and inline definition.
    pub fn schema(&self, ref_path: &str) -> Result<(String, &'a Schema), ResolveError> {
        let mut seen = HashSet::new();
        let mut current = ref_path.to_string();
        loop {
            if !seen.insert(current.clone()) {
                return Err(ResolveError::CircularRef(ref_path.to_string()));
            }
            let (section, name) = split_ref(&current)?;
            if section != RefSection::Schemas {
                return Err(ResolveError::InvalidRefFormat(current));
            }
            match self.doc.schema_named(&name) {
                Some(SchemaOrRef::Schema(schema)) => return Ok((name, &**schema)),
                Some(SchemaOrRef::Ref { ref_path: next }) => current = next.clone(),
                None => return Err(ResolveError::RefTargetNotFound(current)),
            }
        }
    }

    pub fn parameter(&self, ref_path: &str) -> Result<&'a Parameter, ResolveError> {
        self.follow(ref_path, RefSection::Parameters, |name| {
            self.doc
                .components
                .as_ref()
                .and_then(|c| c.parameters.get(name))
                .or_else(|| self.doc.parameters.get(name))
                .map(|p| match p {
                    ParameterOrRef::Parameter(param) => Ok(param),
                    ParameterOrRef::Ref { ref_path } => Err(ref_path.as_str()),
                })
        })
    }

    pub fn request_body(&self, ref_path: &str) -> Result<&'a RequestBody, ResolveError> {
        self.follow(ref_path, RefSection::RequestBodies, |name| {
            self.doc
                .components
                .as_ref()
                .and_then(|c| c.request_bodies.get(name))
                .map(|rb| match rb {
                    RequestBodyOrRef::RequestBody(body) => Ok(body),
                    RequestBodyOrRef::Ref { ref_path } => Err(ref_path.as_str()),
                })
        })
    }

    pub fn response(&self, ref_path: &str) -> Result<&'a Response, ResolveError> {
        self.follow(ref_path, RefSection::Responses, |name| {
            self.doc
                .components
                .as_ref()
                .and_then(|c| c.responses.get(name))
                .or_else(|| self.doc.responses.get(name))
                .map(|r| match r {
                    ResponseOrRef::Response(resp) => Ok(resp),
                    ResponseOrRef::Ref { ref_path } => Err(ref_path.as_str()),
                })
        })
    }

    /// Follow a chain of references within one section. `get` returns
    /// `Ok(target)` for an inline definition or `Err(next_ref)` for another hop.
    fn follow<T>(
        &self,
        ref_path: &str,
        expected: RefSection,
        get: impl Fn(&str) -> Option<Result<&'a T, &'a str>>,
    ) -> Result<&'a T, ResolveError> {
        let mut seen = HashSet::new();
        let mut current = ref_path.to_string();
        loop {
            if !seen.insert(current.clone()) {
                return Err(ResolveError::CircularRef(ref_path.to_string()));
            }
            let (section, name) = split_ref(&current)?;
            if section != expected {
                return Err(ResolveError::InvalidRefFormat(current));
            }
            match get(&name) {
                Some(Ok(target)) => return Ok(target),
                Some(Err(next)) => current = next.to_string(),
                None => return Err(ResolveError::RefTargetNotFound(current)),
            }
        }
    }
}

/// Split a local `$ref` into its section and decoded target name.
pub fn split_ref(ref_path: &str) -> Result<(RefSection, String), ResolveError> {
    let invalid = || ResolveError::InvalidRefFormat(ref_path.to_string());
    let pointer = ref_path.strip_prefix("#/").ok_or_else(invalid)?;
    let pointer = pointer.strip_prefix("components/").unwrap_or(pointer);
    let (section, name) = pointer.split_once('/').ok_or_else(invalid)?;
    let section = match section {
        "schemas" | "definitions" => RefSection::Schemas,
        "parameters" => RefSection::Parameters,
        "responses" => RefSection::Responses,
        "requestBodies" => RefSection::RequestBodies,
        _ => return Err(invalid()),
    };
    if name.is_empty() || name.contains('/') {
        return Err(invalid());
    }
    Ok((section, decode_pointer_token(name)))
}

/// The final segment of a `$ref`, decoded. Works for any pointer shape,
/// including ones [`split_ref`] rejects.
pub fn ref_name(ref_path: &str) -> String {
    let last = ref_path.rsplit('/').next().unwrap_or(ref_path);
    decode_pointer_token(last)
}

fn decode_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}
