//! The web front of [`occasio`]: a small site where people register, publish events
//! to a shared feed and RSVP to them.
//!
//! # Routes
//!
//! | Route | |
//! |---|---|
//! | `GET /` | welcome page, or the feed when logged in |
//! | `GET, POST /login` | log in |
//! | `GET, POST /register` | create an account |
//! | `GET /logout` | forget the session |
//! | `GET /home_feed?search=` | all events, optionally filtered by title |
//! | `GET, POST /create_event` | publish an event |
//! | `GET, POST /rsvp/{event_id}` | look at an event, RSVP to it |
//! | `GET /rsvped_events` | events you RSVP'd to |
//!
//! Everything except the first four routes requires a session and redirects to
//! `/login` without one.
//!
//! # Configuration
//!
//! Read from the environment, a `.env` file is honored by the binary.
//!
//! - `SECRET_KEY` (required) signs session cookies
//! - `OCCASIO_DB_PATH` document store directory, default `db`
//! - `OCCASIO_HOST` / `OCCASIO_PORT` bind address, default `127.0.0.1:5000`
//! - `RUST_LOG` log filter
//!
//! # Running
//!
//! ```sh
//! SECRET_KEY=$(openssl rand -hex 32) RUST_LOG=info cargo run
//! ```

use axum::{routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod pages;
pub mod routes;
pub mod session;
pub mod state;

use config::Config;
use error::StartupError;
use routes::{
    create_event_form, create_event_submit, home, home_feed, login_form, login_submit, logout,
    register_form, register_submit, rsvp_page, rsvp_submit, rsvped_events,
};
use state::{SharedState, State};

pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login_form).post(login_submit))
        .route("/register", get(register_form).post(register_submit))
        .route("/logout", get(logout))
        .route("/home_feed", get(home_feed))
        .route("/create_event", get(create_event_form).post(create_event_submit))
        .route("/rsvp/{event_id}", get(rsvp_page).post(rsvp_submit))
        .route("/rsvped_events", get(rsvped_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<(), StartupError> {
    info!("Initializing state...");
    let state = State::new(&config)?;

    let address = config.address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
