use std::collections::HashSet;

use restgen_core::transform::name_normalizer::{to_pascal_case, wire_name};

/// C# reserved keywords. A local or parameter named after one is escaped with `@`.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "await", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Framework type names the generated files refer to unqualified. A model
/// with one of these names would make those references ambiguous.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "ArgumentException",
    "ArgumentNullException",
    "Array",
    "Attribute",
    "AuthenticationHeaderValue",
    "CancellationToken",
    "Convert",
    "CultureInfo",
    "DateTime",
    "DateTimeOffset",
    "Encoding",
    "Enumerable",
    "Exception",
    "Guid",
    "HttpClient",
    "HttpContent",
    "HttpMethod",
    "HttpRequestMessage",
    "HttpResponseMessage",
    "IEnumerable",
    "IFormattable",
    "JsonDerivedType",
    "JsonIgnore",
    "JsonIgnoreCondition",
    "JsonNamingPolicy",
    "JsonPolymorphic",
    "JsonPropertyName",
    "JsonSerializer",
    "JsonSerializerOptions",
    "List",
    "Models",
    "Nullable",
    "Object",
    "Obsolete",
    "String",
    "StringContent",
    "System",
    "Task",
    "Type",
    "Uri",
    "UriKind",
];

/// Locals the generated method bodies declare themselves.
pub const RESERVED_LOCALS: &[&str] = &["cancellationToken", "httpRequest", "queryParts", "requestUrl"];

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Whether `name` is a plain ASCII C# identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A type name: kept verbatim when it is already a valid identifier,
/// PascalCased otherwise.
pub fn type_identifier(name: &str, fallback: &str) -> String {
    if is_identifier(name) && !is_keyword(name) {
        name.to_string()
    } else {
        pascal_identifier(name, fallback)
    }
}

/// A PascalCase type or member identifier. Falls back to `fallback` when the
/// name has no usable characters.
pub fn pascal_identifier(name: &str, fallback: &str) -> String {
    let pascal = to_pascal_case(name);
    if pascal.is_empty() {
        fallback.to_string()
    } else if pascal.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{pascal}")
    } else {
        pascal
    }
}

/// Method identifier: the name verbatim when it is already a valid
/// identifier, otherwise its PascalCase form.
pub fn method_identifier(name: &str) -> String {
    if is_identifier(name) {
        escape_keyword(name.to_string())
    } else {
        pascal_identifier(name, "Operation")
    }
}

/// camelCase identifier for a parameter or local.
pub fn local_identifier(name: &str) -> String {
    let camel = if is_identifier(name) {
        lower_first(name)
    } else {
        wire_name(&to_pascal_case(name))
    };
    let camel = if camel.is_empty() {
        "value".to_string()
    } else if camel.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{camel}")
    } else {
        camel
    };
    escape_keyword(camel)
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub fn escape_keyword(name: String) -> String {
    if is_keyword(&name) {
        format!("@{name}")
    } else {
        name
    }
}

/// Hands out unique identifiers within one declaration space.
#[derive(Debug, Default)]
pub struct NameScope {
    used: HashSet<String>,
}

impl NameScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reserved<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            used: reserved.into_iter().map(String::from).collect(),
        }
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.used.contains(unescaped(name))
    }

    /// Claim `name`, or `name2`, `name3`, ... if it is taken.
    pub fn claim(&mut self, name: &str) -> String {
        let mut candidate = name.to_string();
        let mut n = 2;
        while self.is_taken(&candidate) {
            candidate = format!("{name}{n}");
            n += 1;
        }
        self.used.insert(unescaped(&candidate).to_string());
        candidate
    }
}

fn unescaped(name: &str) -> &str {
    name.strip_prefix('@').unwrap_or(name)
}

/// A C# regular string literal, quotes included.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape text for an XML doc comment.
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
