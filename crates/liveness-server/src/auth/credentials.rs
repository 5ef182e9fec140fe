//! Operator credentials and their extraction from requests.
//!
//! Two carriers are accepted:
//! - `Authorization: Basic <base64(user:pass)>`
//! - cookies `username` / `password`, as issued by `POST /login`
//!
//! When an `Authorization` header is present it is the only carrier considered.
//! Cookie values are base64url (no padding), so any secret fits the cookie grammar.

use std::fmt;

use anyhow::bail;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;

pub const USERNAME_COOKIE: &str = "username";
pub const PASSWORD_COOKIE: &str = "password";

pub const USER_ENV: &str = "FACE_AUTH_USER";
pub const PASS_ENV: &str = "FACE_AUTH_PASS";

/// The single principal allowed to use guarded routes.
#[derive(Clone, PartialEq, Eq)]
pub struct OperatorCredentials {
    username: String,
    password: String,
}

impl OperatorCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> anyhow::Result<Self> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() {
            bail!("{USER_ENV} must be set to a non-empty value");
        }
        if password.is_empty() {
            bail!("{PASS_ENV} must be set to a non-empty value");
        }

        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for OperatorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credentials carried by one request.
#[derive(Clone, PartialEq, Eq)]
pub struct PresentedCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for PresentedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentedCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl PresentedCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        match headers.get(AUTHORIZATION) {
            Some(value) => Self::from_basic(value),
            None => Self::from_cookies(headers),
        }
    }

    fn from_basic(value: &HeaderValue) -> Option<Self> {
        let value = value.to_str().ok()?;
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Self::new(username, password))
    }

    fn from_cookies(headers: &HeaderMap) -> Option<Self> {
        let mut username = None;
        let mut password = None;

        for pair in headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
        {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            match name {
                USERNAME_COOKIE => username = decode_cookie(value),
                PASSWORD_COOKIE => password = decode_cookie(value),
                _ => {}
            }
        }

        Some(Self::new(username?, password?))
    }
}

fn decode_cookie(value: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(value.trim_matches('"')).ok()?;
    String::from_utf8(bytes).ok()
}

fn encode_cookie(name: &str, value: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        name,
        URL_SAFE_NO_PAD.encode(value)
    )
}

/// `Set-Cookie` values that let a browser pass the cookie check afterwards.
pub fn session_cookies(credentials: &PresentedCredentials) -> [String; 2] {
    [
        encode_cookie(USERNAME_COOKIE, &credentials.username),
        encode_cookie(PASSWORD_COOKIE, &credentials.password),
    ]
}
