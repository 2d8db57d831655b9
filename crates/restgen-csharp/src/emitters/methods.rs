use std::collections::HashSet;

use minijinja::{Value, context};
use restgen_core::ir::{CodeModel, Method, Parameter, ParameterLocation};

use crate::identifiers::{
    NameScope, RESERVED_LOCALS, local_identifier, method_identifier, string_literal,
};
use crate::type_mapper::TypeMapper;

use super::{Names, doc_lines};

/// Members of the generated client that an operation must not shadow.
const RESERVED_MEMBERS: &[&str] = &[
    "AddQueryParameter",
    "CreateJsonContent",
    "Equals",
    "FormatValue",
    "GetHashCode",
    "GetType",
    "MemberwiseClone",
    "SendRequestAsync",
    "ToString",
];

/// A parameter bound to its C# local name and type.
struct Bound<'a> {
    param: &'a Parameter,
    local: String,
    ty: String,
}

impl Bound<'_> {
    fn optional(&self) -> bool {
        !self.param.required
    }

    fn declaration(&self) -> String {
        if self.optional() {
            format!("{}? {} = null", self.ty, self.local)
        } else {
            format!("{} {}", self.ty, self.local)
        }
    }
}

/// Build the per-method render contexts shared by the interface and the
/// client, with unique method names.
pub fn build_methods(model: &CodeModel, names: &Names, types: &TypeMapper) -> Vec<Value> {
    let mut seen = HashSet::new();
    model
        .methods
        .iter()
        .map(|method| {
            let bound = bind_parameters(method, types);
            let base = method_name(method, names);
            let signature_key: Vec<String> = signature_order(&bound)
                .map(|b| b.ty.clone())
                .collect();
            let signature_key = signature_key.join(",");

            let mut name = base.clone();
            let mut n = 2;
            while !seen.insert(format!("{name}({signature_key})")) {
                name = format!("{base}{n}");
                n += 1;
            }
            if name != base {
                log::debug!("renamed duplicate method '{base}' to '{name}'");
            }
            method_ctx(method, &name, &bound, types)
        })
        .collect()
}

fn method_name(method: &Method, names: &Names) -> String {
    let name = method_identifier(&method.name);
    if RESERVED_MEMBERS.contains(&name.as_str()) || name == names.client || name == names.interface
    {
        format!("{name}Operation")
    } else {
        name
    }
}

fn bind_parameters<'a>(method: &'a Method, types: &TypeMapper) -> Vec<Bound<'a>> {
    let mut scope = NameScope::with_reserved(RESERVED_LOCALS.iter().copied());
    method
        .parameters
        .iter()
        .chain(method.request_body.as_ref())
        .map(|param| Bound {
            param,
            local: scope.claim(&local_identifier(&param.name.camel_case)),
            ty: types.render(&param.param_type),
        })
        .collect()
}

/// Required parameters first, then optional ones, each in declaration order.
fn signature_order<'b, 'a>(bound: &'b [Bound<'a>]) -> impl Iterator<Item = &'b Bound<'a>> {
    bound
        .iter()
        .filter(|b| !b.optional())
        .chain(bound.iter().filter(|b| b.optional()))
}

fn method_ctx(method: &Method, name: &str, bound: &[Bound<'_>], types: &TypeMapper) -> Value {
    let mut signature: Vec<String> = signature_order(bound).map(Bound::declaration).collect();
    signature.push("CancellationToken cancellationToken = default".to_string());

    let in_location = |location: ParameterLocation| {
        bound
            .iter()
            .filter(move |b| b.param.location == location)
            .map(|b| {
                context! {
                    key => string_literal(&b.param.name.original),
                    local => b.local.clone(),
                    optional => b.optional(),
                }
            })
            .collect::<Vec<_>>()
    };

    let body = bound
        .iter()
        .find(|b| b.param.location == ParameterLocation::Body)
        .map(|b| {
            context! {
                local => b.local.clone(),
                optional => b.optional(),
            }
        });

    let param_docs: Vec<Value> = signature_order(bound)
        .filter_map(|b| {
            let text = doc_lines(b.param.description.as_deref()).join(" ");
            (!text.is_empty()).then(|| {
                context! {
                    name => b.local.trim_start_matches('@').to_string(),
                    text => text,
                }
            })
        })
        .collect();

    context! {
        name => name,
        http_method => method.http_method.pascal(),
        return_type => types.render(&method.response_type),
        signature => signature.join(", "),
        url => url_expression(&method.path, bound),
        query => in_location(ParameterLocation::Query),
        headers => in_location(ParameterLocation::Header),
        body => body,
        summary => doc_lines(method.summary.as_deref()),
        param_docs => param_docs,
        deprecated => method.deprecated,
    }
}

/// A C# string expression for the request path relative to the base
/// address. Placeholders bound to a path parameter are replaced by the
/// escaped parameter value; unknown placeholders stay literal.
fn url_expression(path: &str, bound: &[Bound<'_>]) -> String {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = path.trim_start_matches('/');

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let placeholder = &rest[start + 1..start + len];
        let param = bound.iter().find(|b| {
            b.param.location == ParameterLocation::Path && b.param.name.original == placeholder
        });
        match param {
            Some(b) => {
                literal.push_str(&rest[..start]);
                if !literal.is_empty() {
                    parts.push(string_literal(&literal));
                    literal.clear();
                }
                parts.push(format!("Uri.EscapeDataString(FormatValue({}))", b.local));
            }
            None => literal.push_str(&rest[..=start + len]),
        }
        rest = &rest[start + len + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(string_literal(&literal));
    }
    if parts.is_empty() {
        "\"\"".to_string()
    } else {
        parts.join(" + ")
    }
}
