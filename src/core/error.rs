use thiserror::Error;

/// Error raised by the repository layer.
///
/// Every variant carries a stable numeric code (see [`RepoError::code`]) so
/// callers can translate failures into their own presentation (HTTP status,
/// CLI exit code) without parsing message strings.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Invalid operation on a read-only connection")]
    ReadOnlyViolation,

    #[error("Entity not found")]
    EntityNotFound,

    #[error("The field '{0}' must be filled")]
    RequiredField(&'static str),

    #[error("Field '{field}' does not resolve on entity '{entity}'")]
    FieldResolution {
        entity: &'static str,
        field: String,
    },

    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl RepoError {
    /// Stable numeric code for each failure kind.
    pub fn code(&self) -> u32 {
        match self {
            Self::ReadOnlyViolation => 1001,
            Self::EntityNotFound => 1002,
            Self::RequiredField(_) => 1003,
            Self::FieldResolution { .. } => 1004,
            Self::Mapping(_) => 1005,
            Self::Lock(_) => 1006,
        }
    }
}

pub type Result<T> = std::result::Result<T, RepoError>;

impl<T> From<std::sync::PoisonError<T>> for RepoError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Lock(err.to_string())
    }
}
