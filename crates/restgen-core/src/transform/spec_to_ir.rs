use indexmap::IndexMap;

use crate::config::GeneratorConfig;
use crate::error::ConfigError;
use crate::ir::*;
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{self as doc_param, ParameterOrRef};
use crate::parse::payload::{RequestBodyOrRef, ResponseOrRef};
use crate::parse::ref_resolve::RefLookup;
use crate::parse::spec::Document;

use super::name_normalizer::{method_name_from_route, normalize_name};
use super::schema_resolver::{SchemaConverter, map_type};

/// Bound name of a 3.x request body parameter.
pub const REQUEST_BODY_NAME: &str = "request";

/// Convert a parsed document into the code model.
///
/// The configuration is validated first; beyond that, conversion never
/// fails. Unresolvable types degrade to [`IrType::Any`] and unsupported
/// constructs are skipped with a log line.
pub fn convert(doc: &Document, config: &GeneratorConfig) -> Result<CodeModel, ConfigError> {
    config.validate()?;

    let (models, aliases) = SchemaConverter::new(doc).convert_all();
    let methods = convert_methods(doc);
    report_security_schemes(doc, config);

    log::debug!(
        "converted '{}': {} models, {} aliases, {} methods",
        doc.title(),
        models.len(),
        aliases.len(),
        methods.len()
    );

    let auth = &config.authentication;
    Ok(CodeModel {
        namespace: config.namespace().to_string(),
        client_name: config.client().to_string(),
        base_url: doc.base_url(),
        authentication: Authentication {
            kind: auth.kind,
            location: auth.location,
            name: auth.name.trim().to_string(),
        },
        models,
        methods,
        aliases,
    })
}

fn convert_methods(doc: &Document) -> Vec<Method> {
    let lookup = RefLookup::new(doc);
    let mut methods = Vec::new();
    for (path, item) in &doc.paths {
        collect_methods(&lookup, path, item, &mut methods);
    }
    methods
}

fn collect_methods(lookup: &RefLookup<'_>, path: &str, item: &PathItem, out: &mut Vec<Method>) {
    for (verb, op) in item.operations() {
        let Some(http_method) = HttpMethod::from_verb(verb) else {
            continue;
        };
        out.push(build_method(lookup, http_method, verb, path, item, op));
    }
}

fn build_method(
    lookup: &RefLookup<'_>,
    http_method: HttpMethod,
    verb: &str,
    path: &str,
    item: &PathItem,
    op: &Operation,
) -> Method {
    let name = op
        .operation_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .unwrap_or_else(|| method_name_from_route(verb, path));

    let mut parameters = Vec::new();
    let mut request_body = None;
    for param in merged_parameters(lookup, &item.parameters, &op.parameters) {
        let location = match param.location {
            doc_param::ParameterLocation::Path => ParameterLocation::Path,
            doc_param::ParameterLocation::Query => ParameterLocation::Query,
            doc_param::ParameterLocation::Header => ParameterLocation::Header,
            doc_param::ParameterLocation::Body => {
                request_body = Some(body_parameter(
                    &param.name,
                    param.effective_schema().as_ref().map_or(IrType::Any, map_type),
                    param.required,
                    param.description.clone(),
                ));
                continue;
            }
            other => {
                log::debug!("{name}: skipping {other:?} parameter '{}'", param.name);
                continue;
            }
        };
        parameters.push(Parameter {
            name: normalize_name(&param.name),
            location,
            param_type: param
                .effective_schema()
                .as_ref()
                .map_or(IrType::Any, map_type),
            required: param.required || location == ParameterLocation::Path,
            description: param.description.clone(),
        });
    }

    if let Some(body) = &op.request_body {
        let resolved = match body {
            RequestBodyOrRef::RequestBody(body) => Some(body),
            RequestBodyOrRef::Ref { ref_path } => lookup
                .request_body(ref_path)
                .map_err(|e| log::warn!("{name}: request body {ref_path}: {e}"))
                .ok(),
        };
        if let Some(body) = resolved.filter(|b| !b.content.is_empty()) {
            request_body = Some(body_parameter(
                REQUEST_BODY_NAME,
                body.body_schema().map_or(IrType::Any, map_type),
                body.required,
                body.description.clone(),
            ));
        }
    }

    let summary = [&op.summary, &op.description]
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
        .cloned();

    Method {
        response_type: response_type(lookup, &name, op),
        name,
        http_method,
        path: path.to_string(),
        summary,
        parameters,
        request_body,
        deprecated: op.deprecated,
    }
}

/// Path-level parameters followed by operation parameters. An operation
/// parameter with the same name and location replaces the path-level one
/// in place.
fn merged_parameters<'a>(
    lookup: &RefLookup<'a>,
    shared: &'a [ParameterOrRef],
    own: &'a [ParameterOrRef],
) -> Vec<&'a doc_param::Parameter> {
    let mut merged: IndexMap<(String, doc_param::ParameterLocation), &'a doc_param::Parameter> =
        IndexMap::new();
    for param in shared.iter().chain(own) {
        let resolved = match param {
            ParameterOrRef::Parameter(p) => p,
            ParameterOrRef::Ref { ref_path } => match lookup.parameter(ref_path) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("skipping parameter {ref_path}: {e}");
                    continue;
                }
            },
        };
        merged.insert((resolved.name.clone(), resolved.location), resolved);
    }
    merged.into_values().collect()
}

fn body_parameter(
    name: &str,
    body_type: IrType,
    required: bool,
    description: Option<String>,
) -> Parameter {
    Parameter {
        name: normalize_name(name),
        location: ParameterLocation::Body,
        param_type: body_type,
        required,
        description,
    }
}

/// Type of the first 2xx response that carries a body schema, or the
/// untyped placeholder.
fn response_type(lookup: &RefLookup<'_>, method_name: &str, op: &Operation) -> IrType {
    for (status, response) in &op.responses {
        if !status.starts_with('2') {
            continue;
        }
        let response = match response {
            ResponseOrRef::Response(r) => r,
            ResponseOrRef::Ref { ref_path } => match lookup.response(ref_path) {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("{method_name}: response {status} {ref_path}: {e}");
                    continue;
                }
            },
        };
        if let Some(schema) = response.body_schema() {
            return map_type(schema);
        }
    }
    IrType::Any
}

fn report_security_schemes(doc: &Document, config: &GeneratorConfig) {
    if config.has_authentication() {
        return;
    }
    for (name, scheme) in doc.security_schemes() {
        log::debug!(
            "security scheme '{name}' ({scheme}) is declared but no authentication is configured"
        );
    }
}
