// Shared helpers for driving the router like a browser would.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Method, Request, StatusCode,
    },
    response::Response,
    Router,
};
use occasio::{
    auth::{Authenticator, Params},
    models::Database,
};
use occasio_web::{
    app,
    session::SessionSigner,
    state::{SharedState, State},
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

pub fn test_state() -> (TempDir, SharedState) {
    let dir = TempDir::new().unwrap();
    let db = Database::new(dir.path()).unwrap();
    let auth = Authenticator::new(Params::new(1024, 1, 1, None).unwrap());
    let signer = SessionSigner::new(SECRET).unwrap();
    (dir, State::with_parts(db, auth, signer))
}

/// A client that keeps the session cookie between requests.
pub struct Browser {
    app: Router,
    pub cookie: Option<String>,
}

impl Browser {
    pub fn new(state: &SharedState) -> Self {
        Self {
            app: app(state.clone()),
            cookie: None,
        }
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> Response {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(COOKIE, cookie.parse().unwrap());
        }
        let response = self.app.clone().oneshot(request).await.unwrap();
        if let Some(set) = response.headers().get(SET_COOKIE) {
            let pair = set.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        response
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, uri: &str, form: &str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Registers and logs in, leaving the browser with a live session.
    pub async fn sign_up(&mut self, username: &str, password: &str) {
        let form = format!("username={username}&password={password}");
        let response = self.post("/register", &form).await;
        assert_eq!(location(&response), "/login");
        let response = self.post("/login", &form).await;
        assert_eq!(location(&response), "/home_feed");
    }

    pub async fn page(&mut self, uri: &str) -> String {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        body_text(response).await
    }
}

pub fn location(response: &Response) -> &str {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
