pub mod client;
pub mod interface;
pub mod methods;
pub mod models;

use minijinja::{Environment, Value};
use restgen_core::GeneratorError;
use restgen_core::ir::CodeModel;

use crate::identifiers::{
    RESERVED_TYPE_NAMES, escape_keyword, escape_xml, is_identifier, pascal_identifier,
    type_identifier,
};

/// Type names shared by the three generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    pub namespace: String,
    pub client: String,
    pub interface: String,
}

impl Names {
    /// An empty namespace falls back to the client name.
    pub fn new(model: &CodeModel) -> Self {
        let client = client_identifier(model.client_name.trim());
        let namespace = model.namespace.trim();
        let namespace = if namespace.is_empty() {
            client.clone()
        } else {
            namespace
                .split('.')
                .filter(|segment| !segment.trim().is_empty())
                .map(namespace_segment)
                .collect::<Vec<_>>()
                .join(".")
        };
        Self {
            interface: format!("I{client}"),
            namespace,
            client,
        }
    }
}

/// The client type and its interface must not shadow a framework type or
/// the `Models` namespace, whose file is `Models.cs`.
fn client_identifier(raw: &str) -> String {
    let base = type_identifier(raw, "ApiClient");
    let clashes = |name: &str| {
        RESERVED_TYPE_NAMES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(name))
            || RESERVED_TYPE_NAMES.contains(&format!("I{name}").as_str())
    };
    if !clashes(&base) {
        return base;
    }
    let mut client = format!("{base}Client");
    let mut n = 2;
    while clashes(&client) {
        client = format!("{base}Client{n}");
        n += 1;
    }
    log::debug!("client name '{base}' clashes with a generated type, using '{client}'");
    client
}

fn namespace_segment(segment: &str) -> String {
    let segment = segment.trim();
    if is_identifier(segment) {
        escape_keyword(segment.to_string())
    } else {
        pascal_identifier(segment, "Generated")
    }
}

/// Escape text for an XML doc comment.
fn doc_escape(value: String) -> String {
    escape_xml(&value)
}

/// Render one template with the shared environment settings.
fn render(name: &'static str, source: &'static str, ctx: Value) -> Result<String, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("doc_escape", doc_escape);
    env.add_template(name, source)
        .map_err(|e| render_error(name, e))?;
    let tmpl = env.get_template(name).map_err(|e| render_error(name, e))?;
    tmpl.render(ctx).map_err(|e| render_error(name, e))
}

fn render_error(template: &str, source: minijinja::Error) -> GeneratorError {
    GeneratorError::Render {
        template: template.to_string(),
        source: Box::new(source),
    }
}

/// Non-empty, trimmed lines of a description, for a `<summary>` block.
fn doc_lines(text: Option<&str>) -> Vec<String> {
    text.map(|t| {
        t.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
