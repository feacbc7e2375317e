use std::sync::Arc;

use occasio::{auth::Authenticator, models::Database};
use tracing::info;

use crate::{
    config::Config,
    error::{AppError, StartupError},
    session::SessionSigner,
};

pub type SharedState = Arc<State>;

pub struct State {
    pub db: Database,
    pub auth: Authenticator,
    pub signer: SessionSigner,
}

impl State {
    pub fn new(config: &Config) -> Result<SharedState, StartupError> {
        info!("Opening document store at {}", config.db_path.display());
        let db = Database::new(&config.db_path)?;
        let signer = SessionSigner::new(config.secret_key.as_bytes())
            .map_err(|e| StartupError::SessionKey(e.to_string()))?;

        Ok(Self::with_parts(db, Authenticator::default(), signer))
    }

    pub fn with_parts(db: Database, auth: Authenticator, signer: SessionSigner) -> SharedState {
        Arc::new(Self { db, auth, signer })
    }

    /// Runs store work off the async workers. Document I/O and password hashing both
    /// block.
    pub async fn run<T, F>(self: &Arc<Self>, work: F) -> Result<occasio::Result<T>, AppError>
    where
        F: FnOnce(&State) -> occasio::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        Ok(tokio::task::spawn_blocking(move || work(&state)).await?)
    }
}
