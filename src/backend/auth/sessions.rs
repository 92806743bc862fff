/**
 * Server-Side Sessions
 *
 * This module keeps browser sessions in memory. A session is identified by
 * an opaque ID carried in the session cookie, and owns a CSRF token that is
 * exposed to scripts through the `XSRF-TOKEN` cookie.
 *
 * # Lifecycle
 *
 * - `start` creates an anonymous session
 * - `regenerate` moves the session data to a new ID and rotates the CSRF token
 * - `login` binds the session to a user
 * - `invalidate` drops the session data and issues a fresh, empty session
 * - `prune_expired` removes sessions idle for longer than the lifetime
 *
 * Sessions idle for longer than the configured lifetime are treated as
 * absent when loaded.
 */

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use axum::http::header::InvalidHeaderValue;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::tokens::random_string;
use crate::shared::AppConfig;

/// Name of the script-readable CSRF cookie
pub const CSRF_COOKIE: &str = "XSRF-TOKEN";

/// Length of session IDs and CSRF tokens
pub const SESSION_ID_LENGTH: usize = 40;

/// Data stored per session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    /// Authenticated user, if any
    pub user_id: Option<Uuid>,
    /// Current CSRF token
    pub csrf_token: String,
    /// Last time the session was loaded or written
    pub last_activity: DateTime<Utc>,
}

/// A session together with its ID
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub data: SessionData,
}

/// In-memory session store shared by all handlers
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    cookie_name: String,
    lifetime: Duration,
    secure: bool,
}

impl SessionStore {
    pub fn new(cookie_name: impl Into<String>, lifetime_minutes: u32, secure: bool) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            cookie_name: cookie_name.into(),
            lifetime: Duration::minutes(i64::from(lifetime_minutes)),
            secure,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.session_cookie.clone(),
            config.session_lifetime_minutes,
            config.secure_cookies,
        )
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Create and store an anonymous session
    pub async fn start(&self) -> Result<Session, getrandom::Error> {
        let session = Session {
            id: random_string(SESSION_ID_LENGTH)?,
            data: SessionData {
                user_id: None,
                csrf_token: random_string(SESSION_ID_LENGTH)?,
                last_activity: Utc::now(),
            },
        };
        self.save(&session).await;
        Ok(session)
    }

    /// Load a live session, refreshing its activity time
    pub async fn load(&self, id: &str) -> Option<Session> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let data = sessions.get_mut(id)?;
        if now - data.last_activity > self.lifetime {
            tracing::debug!("Session expired");
            sessions.remove(id);
            return None;
        }

        data.last_activity = now;
        Some(Session {
            id: id.to_string(),
            data: data.clone(),
        })
    }

    /// Load the session named by the request cookies, or start a new one
    pub async fn load_or_start(&self, headers: &HeaderMap) -> Result<Session, getrandom::Error> {
        if let Some(id) = session_id_from_headers(headers, &self.cookie_name) {
            if let Some(session) = self.load(&id).await {
                return Ok(session);
            }
        }
        self.start().await
    }

    /// Move the session to a new ID and rotate its CSRF token
    pub async fn regenerate(&self, session: &Session) -> Result<Session, getrandom::Error> {
        let regenerated = Session {
            id: random_string(SESSION_ID_LENGTH)?,
            data: SessionData {
                user_id: session.data.user_id,
                csrf_token: random_string(SESSION_ID_LENGTH)?,
                last_activity: Utc::now(),
            },
        };

        let mut sessions = self.sessions.write().await;
        sessions.remove(&session.id);
        sessions.insert(regenerated.id.clone(), regenerated.data.clone());

        Ok(regenerated)
    }

    /// Bind the session to a user
    pub async fn login(&self, session: &mut Session, user_id: Uuid) {
        session.data.user_id = Some(user_id);
        session.data.last_activity = Utc::now();
        self.save(session).await;
    }

    /// Drop the session data and return a fresh anonymous session
    pub async fn invalidate(&self, session: &Session) -> Result<Session, getrandom::Error> {
        self.sessions.write().await.remove(&session.id);
        self.start().await
    }

    /// Issue a new CSRF token for the session
    pub async fn regenerate_token(&self, session: &mut Session) -> Result<(), getrandom::Error> {
        session.data.csrf_token = random_string(SESSION_ID_LENGTH)?;
        self.save(session).await;
        Ok(())
    }

    /// Remove sessions idle for longer than the lifetime
    pub async fn prune_expired(&self) -> usize {
        let cutoff = Utc::now() - self.lifetime;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, data| data.last_activity >= cutoff);
        before - sessions.len()
    }

    /// `Set-Cookie` values for the session cookie and the CSRF cookie
    pub fn cookie_headers(&self, session: &Session) -> Result<[HeaderValue; 2], InvalidHeaderValue> {
        let max_age = self.lifetime.num_seconds();
        let secure = if self.secure { "; Secure" } else { "" };

        let session_cookie = HeaderValue::from_str(&format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax{}",
            self.cookie_name, session.id, max_age, secure
        ))?;
        let csrf_cookie = HeaderValue::from_str(&format!(
            "{}={}; Max-Age={}; Path=/; SameSite=Lax{}",
            CSRF_COOKIE, session.data.csrf_token, max_age, secure
        ))?;

        Ok([session_cookie, csrf_cookie])
    }

    async fn save(&self, session: &Session) {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.data.clone());
    }
}

/// Read a cookie value from the request headers
pub fn session_id_from_headers(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
