use thiserror::Error;

/// Failure taxonomy shared by the server boundary and the client store.
///
/// The server maps each variant onto an HTTP status via [`status_code`];
/// the client maps HTTP statuses and transport failures back into the same
/// variants. `Conflict` is reserved and currently unused. `Transport` only
/// originates on the client side.
///
/// [`status_code`]: PodcastError::status_code
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PodcastError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid PIN for this podcast")]
    InvalidPin,
    #[error("No podcast found with that ID")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Internal(String),
}

impl PodcastError {
    pub fn validation(message: impl Into<String>) -> Self {
        PodcastError::Validation(message.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            PodcastError::Validation(_) => 400,
            PodcastError::InvalidPin => 403,
            PodcastError::NotFound => 404,
            PodcastError::Conflict(_) => 409,
            PodcastError::Transport(_) | PodcastError::Internal(_) => 500,
        }
    }
}
