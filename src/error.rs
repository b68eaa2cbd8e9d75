//! Pipeline error.

use crate::frontend::{parser::ParseError, resolver::Diagnostics};

/// An error reported by any stage of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source is not a syntactically valid program.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// The program parsed but is not semantically valid.
    #[error("{0}")]
    Resolve(#[from] Diagnostics),
    /// Writing the rendered output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T = ()> = std::result::Result<T, Error>;
