use axum::{
    http::{header::InvalidHeaderValue, header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::{config::ConfigError, session::expired_cookie};

#[derive(Error, Debug)]
pub enum AppError {
    /// Carries the cookie to set, `None` forgets the session.
    #[error("Login required")]
    AuthRequired(Option<HeaderValue>),

    #[error("Store error: {0}")]
    Store(occasio::Error),

    #[error("Session encoding failed: {0}")]
    Session(#[from] serde_json::Error),

    #[error("Invalid header: {0}")]
    Header(#[from] InvalidHeaderValue),

    #[error("Worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<occasio::Error> for AppError {
    fn from(e: occasio::Error) -> Self {
        match e {
            // The session outlived its account.
            occasio::Error::UnknownUser(user) => {
                warn!(%user, "Session names an unknown user");
                AppError::AuthRequired(None)
            }
            e => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::AuthRequired(cookie) => {
                let cookie = cookie.unwrap_or_else(expired_cookie);
                ([(SET_COOKIE, cookie)], Redirect::to("/login")).into_response()
            }
            e => {
                error!("Request failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Failures before the server accepts connections.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not open document store: {0}")]
    Store(#[from] occasio::Error),

    #[error("Invalid session key: {0}")]
    SessionKey(String),

    #[error("Server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
