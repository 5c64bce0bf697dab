use thiserror::Error;

/// Errors raised while resolving the metadata graph.
///
/// All of these are mapping defects detected at startup. They are `Clone`
/// because a failed resolution is cached and handed back unchanged on every
/// later call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Type '{0}' not found in the persistence model")]
    TypeNotFound(String),

    #[error("Relationship '{0}': target type '{1}' not found in the persistence model")]
    TargetTypeNotFound(String, String),

    #[error("Relationship '{0}': no relationship '{1}' found at the target type")]
    MappedByNotFound(String, String),

    #[error("Type '{0}' is not an entity type")]
    NotAnEntity(String),

    #[error("Entity type '{0}' has no key")]
    MissingKey(String),

    #[error("Type '{0}' is defined more than once")]
    DuplicateType(String),

    #[error("Name '{1}' is used more than once in type '{0}'")]
    DuplicateName(String, String),

    #[error("Property '{1}' not found in type '{0}'")]
    PropertyNotFound(String, String),

    #[error("Cyclic resolution of '{0}'")]
    CyclicResolution(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    pub(crate) fn embedded_key(owner: &str) -> Self {
        Self::NotSupported(format!("{owner}: embedded keys unsupported"))
    }

    pub(crate) fn implicit_columns(relationship: &str) -> Self {
        Self::NotSupported(format!(
            "Relationship {relationship}: only one implicit column name supported"
        ))
    }
}
