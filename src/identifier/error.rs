//! Errors raised while rendering entity identifiers.
//!
//! These are scoped to one result row. They never invalidate the shared
//! metadata graph.

use crate::core::ModelError;
use thiserror::Error;

pub type IdentifierResult<T> = Result<T, IdentifierError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum IdentifierError {
    #[error("Getter not found for {0}")]
    GetterNotFound(String),

    #[error("Key value missing in row: {0}")]
    KeyValueMissing(String),

    #[error("Invalid key value: {0}")]
    InvalidValue(String),

    #[error("Entity type '{0}' has no key")]
    NoKey(String),

    #[error("Unable to create id for entity: {0}")]
    Malformed(String),

    #[error("Mapping error for key property: {0}")]
    Mapping(#[from] ModelError),
}
