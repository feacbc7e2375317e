use std::io;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid username or password. Please try again.")]
    InvalidCredentials,

    #[error("Username already exists. Please choose a different one.")]
    DuplicateUser(String),

    #[error("Event not found.")]
    EventNotFound(String),

    #[error("No account named {0}.")]
    UnknownUser(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Could not encode document: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Could not decode document: {0}")]
    Deserialize(#[from] ron::error::SpannedError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl Error {
    /// Errors a user can act on, as opposed to failures of the store itself.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::InvalidCredentials
                | Error::DuplicateUser(_)
                | Error::EventNotFound(_)
                | Error::InvalidInput(_)
        )
    }
}
