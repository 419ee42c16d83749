use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::{UserError, UserResult};

/// How long a login may take between redirect and callback
pub const STATE_TTL: Duration = Duration::from_secs(600);

/// Pending login, keyed by its CSRF state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthState {
    pub pkce_verifier: String,
}

/// In-process store of pending OAuth logins
///
/// Each state can be consumed once. Expired entries are swept on every
/// insert. Pending logins do not survive a restart and are not shared
/// between replicas.
#[derive(Debug, Clone)]
pub struct OAuthStateStore {
    entries: Arc<Mutex<HashMap<String, (OAuthState, Instant)>>>,
    ttl: Duration,
}

impl OAuthStateStore {
    pub fn new() -> Self {
        Self::with_ttl(STATE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn store(&self, state: String, pending: OAuthState) -> UserResult<()> {
        let mut entries = self.lock()?;
        let now = Instant::now();
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(state, (pending, now + self.ttl));
        Ok(())
    }

    /// Remove and return the pending login; unknown, reused and expired
    /// states are all rejected the same way
    pub fn consume(&self, state: &str) -> UserResult<OAuthState> {
        let mut entries = self.lock()?;
        match entries.remove(state) {
            Some((pending, expires_at)) if expires_at > Instant::now() => Ok(pending),
            _ => Err(UserError::OAuth("Invalid or expired OAuth state".to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> UserResult<std::sync::MutexGuard<'_, HashMap<String, (OAuthState, Instant)>>> {
        self.entries
            .lock()
            .map_err(|_| UserError::Internal("OAuth state store poisoned".to_string()))
    }
}

impl Default for OAuthStateStore {
    fn default() -> Self {
        Self::new()
    }
}
