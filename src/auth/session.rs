use std::collections::HashMap;

use actix_web::cookie::{Cookie, CookieJar, Key, SameSite};
use actix_web::{HttpRequest, HttpResponseBuilder};
use thiserror::Error;

pub const SESSION_COOKIE: &str = "session";
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq)]
#[error("SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes, got {0}")]
pub struct SessionKeyError(usize);

/// Derives the cookie encryption key. Without a secret a random key is
/// generated, so sessions do not survive a restart.
pub fn session_key(secret: Option<&str>) -> Result<Key, SessionKeyError> {
    match secret {
        Some(secret) if secret.len() < MIN_SECRET_LEN => Err(SessionKeyError(secret.len())),
        Some(secret) => Ok(Key::derive_from(secret.as_bytes())),
        None => {
            log::warn!("SESSION_SECRET is not set; using a random per-process session key");
            Ok(Key::generate())
        }
    }
}

/// Key/value view over the encrypted session cookie.
///
/// Reads never fail: a missing, tampered or unreadable cookie is an empty
/// session. Writes are persisted into the jar straight away and reach the
/// client once [`SessionStorage::apply`] copies them onto a response.
pub struct SessionStorage {
    key: Key,
    jar: CookieJar,
    items: HashMap<String, String>,
}

impl SessionStorage {
    pub fn from_request(req: &HttpRequest, key: &Key) -> Self {
        let mut jar = CookieJar::new();
        if let Some(cookie) = req.cookie(SESSION_COOKIE) {
            jar.add_original(cookie);
        }

        let items = jar
            .private(key)
            .get(SESSION_COOKIE)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default();

        Self {
            key: key.clone(),
            jar,
            items,
        }
    }

    /// Returns the stored value, or an empty string when absent.
    pub fn get_item(&self, key: &str) -> String {
        self.items.get(key).cloned().unwrap_or_default()
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) {
        self.items.insert(key.to_string(), value.into());
        self.save();
    }

    fn save(&mut self) {
        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("failed to save session: {e}");
                return;
            }
        };
        let cookie = Cookie::build(SESSION_COOKIE, payload)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish();
        self.jar.private_mut(&self.key).add(cookie);
    }

    /// Copies pending cookie changes onto the response.
    pub fn apply(&self, response: &mut HttpResponseBuilder) {
        for cookie in self.jar.delta() {
            response.cookie(cookie.clone());
        }
    }
}
