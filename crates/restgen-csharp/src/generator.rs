use restgen_core::ir::CodeModel;
use restgen_core::{CodeGenerator, GeneratedFile, GeneratorError};

use crate::emitters::{self, Names};
use crate::type_mapper::TypeMapper;

/// Name of the generated models file.
pub const MODELS_FILE: &str = "Models.cs";

/// C# typed-client generator.
///
/// Always produces three files: `I{Client}.cs`, `{Client}.cs` and
/// `Models.cs`, even for an empty model.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpGenerator;

impl CodeGenerator for CSharpGenerator {
    fn generate(&self, model: &CodeModel) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let names = Names::new(model);
        let types = TypeMapper::new(model, &[names.client.as_str(), names.interface.as_str()]);
        let methods = emitters::methods::build_methods(model, &names, &types);

        log::debug!(
            "generating {} in namespace {} ({} methods)",
            names.client,
            names.namespace,
            methods.len()
        );

        Ok(vec![
            GeneratedFile {
                path: format!("{}.cs", names.interface),
                content: emitters::interface::emit_interface(&names, &methods)?,
            },
            GeneratedFile {
                path: format!("{}.cs", names.client),
                content: emitters::client::emit_client(model, &names, &methods)?,
            },
            GeneratedFile {
                path: MODELS_FILE.to_string(),
                content: emitters::models::emit_models(model, &names, &types)?,
            },
        ])
    }
}
