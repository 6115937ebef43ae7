use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("identifier must not be empty")]
    EmptyId,

    #[error("invalid character {ch:?} in identifier {id:?}")]
    InvalidIdChar { id: String, ch: char },

    #[error("unknown post type: {0}")]
    UnknownPostType(String),
}
