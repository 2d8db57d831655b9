use minijinja::{Value, context};
use restgen_core::GeneratorError;

use super::{Names, render};

/// Emit `I{Client}.cs`: the client interface, one declaration per method.
pub fn emit_interface(names: &Names, methods: &[Value]) -> Result<String, GeneratorError> {
    render(
        "interface.cs.j2",
        include_str!("../../templates/interface.cs.j2"),
        context! {
            namespace => names.namespace.clone(),
            interface_name => names.interface.clone(),
            client_name => names.client.clone(),
            methods => methods,
        },
    )
}
