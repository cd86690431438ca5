//! Tree-sitter based Go declaration parsing for rawdog.
//!
//! [`declarations`] turns source text into a declaration tree, [`resolver`]
//! classifies type expressions, and [`builder`] assembles the structural
//! model consumed by the synthesizers.

pub mod builder;
pub mod declarations;
pub mod error;
pub mod resolver;
pub mod treesitter;

pub use builder::{BuildOptions, build_model};
pub use declarations::{SourceFile, TypeExpr, parse_source};
pub use error::ParseError;

use rawdog_core::error::ModelError;
use rawdog_core::model::FileModel;

/// Errors from [`parse_model`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Parse source text and build its structural model in one step.
pub fn parse_model(source: &str, options: &BuildOptions) -> Result<FileModel, LoadError> {
    let file = parse_source(source)?;
    Ok(build_model(&file, options)?)
}
