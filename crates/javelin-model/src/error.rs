use std::path::PathBuf;

use crate::Name;

pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors produced while loading foreign declarations.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read declarations file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid declarations json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid type signature: {0}")]
    InvalidSignature(String),

    #[error("class {class} is nested in unknown class {outer}")]
    UnknownOuterClass { class: Name, outer: Name },

    #[error("class {0} is declared more than once")]
    DuplicateClass(Name),
}

/// The class graph loops back onto `class` through its supertypes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("inheritance cycle through {class}")]
pub struct InheritanceCycle {
    pub class: Name,
}
