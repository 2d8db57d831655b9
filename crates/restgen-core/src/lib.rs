pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

use indexmap::IndexMap;

pub use error::GeneratorError;

/// A generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that render source files from a code model.
pub trait CodeGenerator {
    fn generate(&self, model: &ir::CodeModel) -> Result<Vec<GeneratedFile>, GeneratorError>;
}

/// Run a generator and collect its output as a file-name → file-text mapping,
/// in emission order.
pub fn generate_all<G: CodeGenerator + ?Sized>(
    generator: &G,
    model: &ir::CodeModel,
) -> Result<IndexMap<String, String>, GeneratorError> {
    Ok(generator
        .generate(model)?
        .into_iter()
        .map(|file| (file.path, file.content))
        .collect())
}
