use minijinja::{Value, context};
use restgen_core::GeneratorError;
use restgen_core::config::{AuthKind, AuthLocation};
use restgen_core::ir::{Authentication, CodeModel};

use crate::identifiers::string_literal;

use super::{Names, render};

/// Emit `{Client}.cs`: the `HttpClient`-backed implementation of the
/// client interface.
pub fn emit_client(
    model: &CodeModel,
    names: &Names,
    methods: &[Value],
) -> Result<String, GeneratorError> {
    render(
        "client.cs.j2",
        include_str!("../../templates/client.cs.j2"),
        context! {
            namespace => names.namespace.clone(),
            client_name => names.client.clone(),
            interface_name => names.interface.clone(),
            base_url => base_address(&model.base_url),
            auth => auth_ctx(&model.authentication),
            methods => methods,
        },
    )
}

/// The default base address as a C# literal, with a trailing slash so that
/// relative request paths append to it. Relative server URLs give no default.
fn base_address(base_url: &str) -> Option<String> {
    let base_url = base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        if !base_url.is_empty() {
            log::debug!("base URL '{base_url}' is not absolute; no default base address");
        }
        return None;
    }
    if base_url.ends_with('/') {
        Some(string_literal(base_url))
    } else {
        Some(string_literal(&format!("{base_url}/")))
    }
}

fn auth_ctx(auth: &Authentication) -> Value {
    let mode = match (auth.kind, auth.location) {
        (AuthKind::None, _) => "none",
        (AuthKind::Bearer, _) => "bearer",
        (AuthKind::ApiKey, AuthLocation::Query) => "query",
        (AuthKind::ApiKey, AuthLocation::Header) => "header",
        (AuthKind::ApiKey, AuthLocation::None) => {
            log::warn!("API key without a location; sending it as a header");
            "header"
        }
    };
    context! {
        enabled => mode != "none",
        mode => mode,
        name => string_literal(&auth.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_address() {
        assert_eq!(
            base_address("https://api.example.com/v1").as_deref(),
            Some("\"https://api.example.com/v1/\"")
        );
        assert_eq!(
            base_address("http://localhost:8080/").as_deref(),
            Some("\"http://localhost:8080/\"")
        );
        assert_eq!(base_address("/api"), None);
        assert_eq!(base_address(""), None);
    }

    #[test]
    fn test_auth_modes() {
        let mode = |kind, location| {
            let ctx = auth_ctx(&Authentication {
                kind,
                location,
                name: "X-Api-Key".to_string(),
            });
            ctx.get_attr("mode").unwrap().to_string()
        };
        assert_eq!(mode(AuthKind::None, AuthLocation::None), "none");
        assert_eq!(mode(AuthKind::Bearer, AuthLocation::None), "bearer");
        assert_eq!(mode(AuthKind::ApiKey, AuthLocation::Header), "header");
        assert_eq!(mode(AuthKind::ApiKey, AuthLocation::Query), "query");
    }
}
