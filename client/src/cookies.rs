//! Session cookie store
//!
//! In-memory stand-in for the browser cookie jar the original UI used.
//! The token flow only reads from it; an external auth flow writes the
//! `token` cookie. Writes overwrite same-name cookies, and erasing a
//! cookie stores an already-expired entry rather than removing it, so
//! the observable contract (read returns `None`) matches either way.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Name of the cookie carrying the opaque drive-authorization token.
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredCookie {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

/// A session-scoped cookie store. Thread-safe; cheap to share behind an
/// `Arc`.
#[derive(Debug, Default)]
pub struct CookieStore {
    cookies: Mutex<HashMap<String, StoredCookie>>,
}

impl CookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cookie, overwriting any existing cookie of the same name.
    /// With a TTL the cookie expires that far in the future; without one
    /// it lives for the rest of the session.
    pub fn create(&self, name: &str, value: &str, ttl: Option<Duration>) {
        let cookie = StoredCookie {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.cookies
            .lock()
            .expect("cookie store poisoned")
            .insert(name.to_string(), cookie);
    }

    /// Read a cookie's value, or `None` when it was never set, was
    /// erased, or has expired.
    pub fn read(&self, name: &str) -> Option<String> {
        let cookies = self.cookies.lock().expect("cookie store poisoned");
        let cookie = cookies.get(name)?;
        if cookie.is_expired(Instant::now()) {
            return None;
        }
        Some(cookie.value.clone())
    }

    /// Erase a cookie by storing one that is already expired.
    pub fn erase(&self, name: &str) {
        let cookie = StoredCookie {
            value: String::new(),
            expires_at: Some(Instant::now()),
        };
        self.cookies
            .lock()
            .expect("cookie store poisoned")
            .insert(name.to_string(), cookie);
    }
}
