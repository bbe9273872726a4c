//! Error types for codec operations

use thiserror::Error;

/// Errors raised while parsing or producing file contents
///
/// Public entry points convert these into [`spatialconv_core::Error::Parse`].
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("OBJ: {0}")]
    Obj(#[from] obj::ObjError),

    #[error("{0}")]
    Invalid(String),

    #[error("PLY: {0}")]
    Ply(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CodecError> for spatialconv_core::Error {
    fn from(error: CodecError) -> Self {
        spatialconv_core::Error::Parse(error.to_string())
    }
}
