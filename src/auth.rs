// Guest authentication backed by the session store
// Demo-account sign in, simulated sign up and password reset, and the signed-in
// gate the booking flow checks before payment steps.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::session::{deadline_after, SessionStore};

// Storage key the persisted session lives under
pub const SESSION_KEY: &str = "talek_user_session";

const MIN_PASSWORD_LEN: usize = 6;

// Accounts accepted by sign_in: (id, email, password, display name)
const DEMO_ACCOUNTS: [(&str, &str, &str, &str); 2] = [
    ("1", "demo@talekbushcamp.com", "demo123", "Demo User"),
    ("2", "guest@example.com", "password", "Guest User"),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,

    #[error("Session error: {0}")]
    Session(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// What actually gets serialized into the store. The expiry travels with the
// record so a stale session is rejected even if the store kept it around.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    user: User,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    // Artificial latency for the simulated auth calls; zero in tests
    pub latency: Duration,
    // Session lifetime, one week by default
    pub session_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
            session_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

// Signed-in check the booking flow depends on, kept narrow so tests can stub it
pub trait AuthGate: Send + Sync {
    fn is_signed_in(&self) -> bool;
}

pub struct AuthService {
    store: Arc<dyn SessionStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn SessionStore>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    // The signed-in user, if the persisted session is present and still valid.
    // Corrupt or expired records are cleared on sight.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.store.get(SESSION_KEY)?;
        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) if record.expires_at > Utc::now() => Some(record.user),
            Ok(_) => {
                self.store.remove(SESSION_KEY);
                None
            }
            Err(err) => {
                warn!(error = %err, "discarding unreadable session record");
                self.store.remove(SESSION_KEY);
                None
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        sleep(self.config.latency).await;

        let account = DEMO_ACCOUNTS
            .iter()
            .find(|(_, acc_email, acc_password, _)| *acc_email == email && *acc_password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let user = User {
            id: account.0.to_string(),
            email: account.1.to_string(),
            name: account.3.to_string(),
            created_at: Utc::now(),
        };
        self.persist_session(&user)?;
        info!(user_id = %user.id, "user signed in");
        Ok(user)
    }

    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        sleep(self.config.latency).await;

        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }

        let user = User {
            id: random_user_id(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.persist_session(&user)?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    // Simulated reset email; always succeeds for a well-formed request
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        sleep(self.config.latency).await;
        info!(%email, "password reset email sent");
        Ok(())
    }

    pub fn sign_out(&self) {
        self.store.remove(SESSION_KEY);
        info!("user signed out");
    }

    fn persist_session(&self, user: &User) -> Result<(), AuthError> {
        let record = SessionRecord {
            user: user.clone(),
            expires_at: deadline_after(self.config.session_ttl),
        };
        let raw =
            serde_json::to_string(&record).map_err(|err| AuthError::Session(err.to_string()))?;
        self.store.put(SESSION_KEY, raw, self.config.session_ttl);
        Ok(())
    }
}

impl AuthGate for AuthService {
    fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }
}

// Short random identifier for registered users, nine lowercase base-36 chars
fn random_user_id() -> String {
    const ID_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..9)
        .map(|_| ID_CHARS[rng.gen_range(0..ID_CHARS.len())] as char)
        .collect()
}
