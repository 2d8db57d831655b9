use heck::ToLowerCamelCase;

use crate::ir::NormalizedName;

/// PascalCase an arbitrary name.
///
/// The input is split on every run of characters outside `[A-Za-z0-9]`; each
/// word has its first character upper-cased and the rest kept verbatim.
pub fn to_pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// The camelCase wire name of an identifier.
pub fn wire_name(identifier: &str) -> String {
    identifier.to_lower_camel_case()
}

/// Create a `NormalizedName` from an arbitrary string.
pub fn normalize_name(name: &str) -> NormalizedName {
    let pascal_case = to_pascal_case(name);
    let camel_case = wire_name(&pascal_case);
    NormalizedName {
        original: name.to_string(),
        pascal_case,
        camel_case,
    }
}

/// Derive a method name from the HTTP verb and path template.
///
/// Examples:
/// - `GET /pets` → `GetPets`
/// - `POST /pets` → `CreatePets`
/// - `GET /pets/{petId}` → `GetPets`
/// - `PATCH /store/order-items/{id}` → `UpdateStoreOrderItems`
/// - `OPTIONS /pets` → `OptionsPets`
pub fn method_name_from_route(verb: &str, path: &str) -> String {
    let prefix = match verb.to_ascii_lowercase().as_str() {
        "get" => "Get".to_string(),
        "post" => "Create".to_string(),
        "put" | "patch" => "Update".to_string(),
        "delete" => "Delete".to_string(),
        other => to_pascal_case(other),
    };

    let resource: String = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .map(to_pascal_case)
        .collect();

    prefix + &resource
}
