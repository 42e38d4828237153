//! Credential handshake performed once before any worker starts.
use crate::error::SetupError;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const API_KEY_HEADER: &str = "x-api-key";

const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub enum Credentials {
    /// Username/password posted as JSON to a login endpoint, which answers with a session cookie.
    /// Cookies that apply to the login URL are kept.
    Login {
        url: Url,
        username: String,
        password: String,
    },
    /// Pre-shared key sent in the `X-API-KEY` header.
    ApiKey(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Login { url, username, .. } => f
                .debug_struct("Login")
                .field("url", &url.as_str())
                .field("username", username)
                .finish_non_exhaustive(),
            Credentials::ApiKey(_) => f.write_str("ApiKey(..)"),
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Read-only credential context shared by every worker of a run.
///
/// The captured credentials are baked into the client's default headers, so requests never
/// change them.
#[derive(Clone, Debug)]
pub struct Session {
    client: Client,
}

impl Session {
    #[instrument(name = "auth", skip_all)]
    pub async fn establish(credentials: &Credentials) -> Result<Session, SetupError> {
        let headers = match credentials {
            Credentials::Login {
                url,
                username,
                password,
            } => login(url, username, password).await?,
            Credentials::ApiKey(key) => {
                let mut value = HeaderValue::from_str(key)?;
                value.set_sensitive(true);
                let mut headers = HeaderMap::new();
                headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
                headers
            }
        };

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(SetupError::Client)?;
        Ok(Session { client })
    }

    /// Client carrying the session credentials. Cheap to clone.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

async fn login(url: &Url, username: &str, password: &str) -> Result<HeaderMap, SetupError> {
    let jar = Arc::new(Jar::default());
    let client = Client::builder()
        .cookie_provider(jar.clone())
        .timeout(LOGIN_TIMEOUT)
        .build()
        .map_err(SetupError::Client)?;

    let res = client
        .post(url.clone())
        .json(&LoginRequest { username, password })
        .send()
        .await
        .map_err(SetupError::Login)?;

    let status = res.status();
    if !status.is_success() {
        return Err(SetupError::LoginRejected(status));
    }
    info!("Logged in as {username}");

    let mut headers = HeaderMap::new();
    match jar.cookies(url) {
        Some(mut cookies) => {
            debug!("Captured session cookies");
            cookies.set_sensitive(true);
            headers.insert(COOKIE, cookies);
        }
        None => warn!("Login succeeded but no session cookie was set"),
    }
    Ok(headers)
}
