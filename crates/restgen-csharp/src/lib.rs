pub mod emitters;
pub mod generator;
pub mod identifiers;
pub mod type_mapper;

use indexmap::IndexMap;
use restgen_core::config::GeneratorConfig;
use restgen_core::error::{ConfigError, ParseError};
use restgen_core::{GeneratorError, generate_all, parse, transform};
use thiserror::Error;

pub use generator::{CSharpGenerator, MODELS_FILE};

/// Any failure of the end-to-end pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generate(#[from] GeneratorError),
}

/// Parse an API document, convert it and render the C# client.
///
/// Returns file name → file text for `I{Client}.cs`, `{Client}.cs` and
/// `Models.cs`, in that order.
pub fn generate(
    input: &[u8],
    config: &GeneratorConfig,
) -> Result<IndexMap<String, String>, PipelineError> {
    let doc = parse::parse(input)?;
    let model = transform::convert(&doc, config)?;
    Ok(generate_all(&CSharpGenerator, &model)?)
}
