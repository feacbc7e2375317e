//! Signed, client-side sessions.
//!
//! The whole [`Session`] travels in one cookie, formatted as
//! `"{payload_b64}.{hmac_b64}"` where the payload is the session as JSON and the
//! HMAC-SHA256 is keyed with the configured secret. A cookie that fails verification
//! is ignored, which leaves the request logged out.
//!
//! The cookie has no `Max-Age`, so browsers drop it when they close.

use axum::{
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderValue,
    },
    response::{IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use occasio::models::UserId;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::convert::Infallible;
use tracing::{debug, warn};

use crate::{error::AppError, state::SharedState};

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "occasio_session";
const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";
/// Older notices are dropped past this, the cookie must stay small.
const MAX_FLASHES: usize = 4;
const LOGIN_REQUIRED: &str = "You need to be logged in to do that.";

#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
}

impl SessionSigner {
    pub fn new(secret: &[u8]) -> Result<Self, hmac::digest::InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret)?,
        })
    }

    pub fn encode(&self, session: &Session) -> Result<String, serde_json::Error> {
        let payload = serde_json::to_vec(session)?;
        let mut mac = self.mac.clone();
        mac.update(&payload);

        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
        ))
    }

    /// Verifies the signature in constant time before looking at the payload.
    pub fn decode(&self, value: &str) -> Option<Session> {
        let (payload_b64, sig_b64) = value.split_once('.')?;
        let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
        let signature = URL_SAFE_NO_PAD.decode(sig_b64).ok()?;

        let mut mac = self.mac.clone();
        mac.update(&payload);
        if mac.verify_slice(&signature).is_err() {
            debug!("Rejected session cookie with a bad signature");
            return None;
        }
        serde_json::from_slice(&payload).ok()
    }
}

/// Request-scoped session state: who is logged in and the notices queued for the
/// next rendered page.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<UserId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    flashes: Vec<String>,
}

impl Session {
    pub fn from_parts(parts: &Parts, signer: &SessionSigner) -> Self {
        session_cookie(parts)
            .and_then(|value| signer.decode(value))
            .unwrap_or_default()
    }

    pub fn username(&self) -> Option<&UserId> {
        self.username.as_ref()
    }
    pub fn sign_in(&mut self, user: UserId) {
        self.username = Some(user);
    }
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flashes.push(message.into());
        if self.flashes.len() > MAX_FLASHES {
            let excess = self.flashes.len() - MAX_FLASHES;
            self.flashes.drain(..excess);
        }
    }
    pub fn take_flashes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flashes)
    }

    pub fn cookie(&self, signer: &SessionSigner) -> Result<HeaderValue, AppError> {
        let cookie = format!(
            "{SESSION_COOKIE}={}; {COOKIE_ATTRIBUTES}",
            signer.encode(self)?
        );
        Ok(HeaderValue::from_str(&cookie)?)
    }

    /// Attaches the session cookie to `body`.
    pub fn respond(
        self,
        signer: &SessionSigner,
        body: impl IntoResponse,
    ) -> Result<Response, AppError> {
        let cookie = self.cookie(signer)?;
        Ok(([(SET_COOKIE, cookie)], body).into_response())
    }
    pub fn redirect(self, signer: &SessionSigner, to: &str) -> Result<Response, AppError> {
        self.respond(signer, Redirect::to(to))
    }
}

/// A `Set-Cookie` value that makes the browser forget the session.
pub fn expired_cookie() -> HeaderValue {
    HeaderValue::from_static("occasio_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn session_cookie(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then_some(value)
        })
}

impl FromRequestParts<SharedState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Session::from_parts(parts, &state.signer))
    }
}

/// A session with an existing account behind it. Extracting it is the gate in front
/// of every protected route.
pub struct LoggedIn {
    pub user: UserId,
    pub session: Session,
}

impl FromRequestParts<SharedState> for LoggedIn {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_parts(parts, &state.signer);
        let Some(user) = session.username.clone() else {
            return Err(login_required(&state.signer));
        };

        let lookup = user.clone();
        let exists = state
            .run(move |s| s.db.fetch_user(&lookup).map(|found| found.is_some()))
            .await??;
        if !exists {
            warn!(%user, "Session names an unknown user");
            return Err(login_required(&state.signer));
        }
        Ok(LoggedIn { user, session })
    }
}

/// Sends the browser to `/login` with a fresh, anonymous session carrying a notice.
fn login_required(signer: &SessionSigner) -> AppError {
    let mut session = Session::default();
    session.flash(LOGIN_REQUIRED);
    match session.cookie(signer) {
        Ok(cookie) => AppError::AuthRequired(Some(cookie)),
        Err(e) => e,
    }
}
