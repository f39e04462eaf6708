use thiserror::Error;

/// Errors surfaced by the data layer and the admin console.
///
/// `Display` is the message shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
