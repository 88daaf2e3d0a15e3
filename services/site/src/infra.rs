use axum::http::{header, HeaderMap};
use carbon_intake::workflows::eligibility::{
    InMemorySessionStore, SessionStore, StoreError, API_RESPONSE_KEY, ELIGIBILITY_DATA_KEY,
};
use carbon_intake::workflows::scoring::AnalysisProxy;
use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// Cookie carrying the visitor's session id.
pub(crate) const SESSION_COOKIE: &str = "sessao";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared state behind the page handlers.
#[derive(Clone)]
pub(crate) struct SiteState {
    pub(crate) proxy: Arc<AnalysisProxy>,
    pub(crate) sessions: SessionRegistry,
}

struct SessionEntry {
    store: InMemorySessionStore,
    last_seen: DateTime<Utc>,
}

/// Per-visitor session stores, dropped once idle for longer than the configured TTL.
#[derive(Clone)]
pub(crate) struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
    idle_ttl: Duration,
}

/// Marks one session's submission as running until dropped.
pub(crate) struct SubmissionGuard {
    id: Uuid,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&self.id);
        }
    }
}

impl SessionRegistry {
    pub(crate) fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            idle_ttl,
        }
    }

    /// Claim the single submission slot of session `id`. `None` while another is running.
    pub(crate) fn begin_submission(&self, id: Uuid) -> Result<Option<SubmissionGuard>, StoreError> {
        let mut in_flight = self
            .in_flight
            .lock()
            .map_err(|_| StoreError::Unavailable("submission registry mutex poisoned".to_string()))?;
        if !in_flight.insert(id) {
            return Ok(None);
        }
        Ok(Some(SubmissionGuard {
            id,
            in_flight: Arc::clone(&self.in_flight),
        }))
    }

    /// Move an accepted analysis into the visitor's session, opening one if needed.
    pub(crate) fn adopt(
        &self,
        id: Option<Uuid>,
        accepted: &InMemorySessionStore,
    ) -> Result<Uuid, StoreError> {
        let (id, store) = self.open(id)?;
        for key in [API_RESPONSE_KEY, ELIGIBILITY_DATA_KEY] {
            if let Some(value) = accepted.get(key)? {
                store.set(key, value)?;
            }
        }
        Ok(id)
    }

    /// Store for `id`, or a fresh session when the id is unknown or expired.
    pub(crate) fn open(
        &self,
        id: Option<Uuid>,
    ) -> Result<(Uuid, InMemorySessionStore), StoreError> {
        self.open_at(id, Utc::now())
    }

    pub(crate) fn open_at(
        &self,
        id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<(Uuid, InMemorySessionStore), StoreError> {
        let mut guard = self.lock()?;
        self.purge_idle(&mut guard, now);

        if let Some(id) = id {
            if let Some(entry) = guard.get_mut(&id) {
                entry.last_seen = now;
                return Ok((id, entry.store.clone()));
            }
        }

        let id = Uuid::new_v4();
        let store = InMemorySessionStore::new();
        guard.insert(
            id,
            SessionEntry {
                store: store.clone(),
                last_seen: now,
            },
        );
        debug!(session = %id, active = guard.len(), "opened visitor session");
        Ok((id, store))
    }

    /// Store for an existing, unexpired session. Never creates one.
    pub(crate) fn existing(&self, id: Option<Uuid>) -> Result<Option<InMemorySessionStore>, StoreError> {
        self.existing_at(id, Utc::now())
    }

    pub(crate) fn existing_at(
        &self,
        id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Option<InMemorySessionStore>, StoreError> {
        let mut guard = self.lock()?;
        self.purge_idle(&mut guard, now);

        let entry = match id {
            Some(id) => guard.get_mut(&id),
            None => None,
        };
        let Some(entry) = entry else {
            return Ok(None);
        };
        entry.last_seen = now;
        Ok(Some(entry.store.clone()))
    }

    #[cfg(test)]
    pub(crate) fn active(&self) -> usize {
        self.sessions.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, SessionEntry>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("session registry mutex poisoned".to_string()))
    }

    fn purge_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_seen <= self.idle_ttl);
        let purged = before - sessions.len();
        if purged > 0 {
            debug!(purged, "expired idle visitor sessions");
        }
    }
}

/// Session id from the request's `Cookie` header, if present and well-formed.
pub(crate) fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub(crate) fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reopening_a_session_returns_the_same_store() {
        let registry = SessionRegistry::new(Duration::minutes(30));
        let (id, store) = registry.open(None).expect("session opens");
        store
            .set(API_RESPONSE_KEY, "{}".to_string())
            .expect("store writable");

        let (same_id, same_store) = registry.open(Some(id)).expect("session reopens");
        assert_eq!(same_id, id);
        assert_eq!(
            same_store.get(API_RESPONSE_KEY).expect("readable").as_deref(),
            Some("{}")
        );
        assert_eq!(registry.active(), 1);
    }

    #[test]
    fn unknown_ids_get_a_fresh_session() {
        let registry = SessionRegistry::new(Duration::minutes(30));
        let stale = Uuid::new_v4();
        let (id, store) = registry.open(Some(stale)).expect("session opens");
        assert_ne!(id, stale);
        assert!(store.is_empty());
        assert!(registry.existing(Some(stale)).expect("readable").is_none());
    }

    #[test]
    fn idle_sessions_expire_after_ttl() {
        let registry = SessionRegistry::new(Duration::minutes(30));
        let start = Utc::now();
        let (id, _) = registry.open_at(None, start).expect("session opens");

        let within = start + Duration::minutes(29);
        assert!(registry
            .existing_at(Some(id), within)
            .expect("readable")
            .is_some());

        // last access moved to `within`, so expiry is measured from there
        let expired = within + Duration::minutes(31);
        assert!(registry
            .existing_at(Some(id), expired)
            .expect("readable")
            .is_none());
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn adopting_copies_the_accepted_analysis() {
        let registry = SessionRegistry::new(Duration::minutes(30));
        let accepted = InMemorySessionStore::new();
        accepted
            .set(API_RESPONSE_KEY, "{\"ok\":true}".to_string())
            .expect("store writable");
        accepted
            .set(ELIGIBILITY_DATA_KEY, "{}".to_string())
            .expect("store writable");

        let id = registry.adopt(None, &accepted).expect("session opens");
        let store = registry
            .existing(Some(id))
            .expect("readable")
            .expect("session exists");
        assert_eq!(store.len(), 2);

        let again = registry.adopt(Some(id), &accepted).expect("session reopens");
        assert_eq!(again, id);
        assert_eq!(registry.active(), 1);
    }

    #[test]
    fn one_submission_per_session_at_a_time() {
        let registry = SessionRegistry::new(Duration::minutes(30));
        let id = Uuid::new_v4();

        let guard = registry.begin_submission(id).expect("lock available");
        assert!(guard.is_some());
        assert!(registry.begin_submission(id).expect("lock available").is_none());
        assert!(registry
            .begin_submission(Uuid::new_v4())
            .expect("lock available")
            .is_some());

        drop(guard);
        assert!(registry.begin_submission(id).expect("lock available").is_some());
    }

    #[test]
    fn session_cookie_is_read_among_others() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("tema=escuro; {SESSION_COOKIE}={id}"))
                .expect("valid header"),
        );
        assert_eq!(session_id(&headers), Some(id));

        let mut garbled = HeaderMap::new();
        garbled.insert(header::COOKIE, HeaderValue::from_static("sessao=nao-e-uuid"));
        assert_eq!(session_id(&garbled), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn cookie_round_trips_through_header_parsing() {
        let id = Uuid::new_v4();
        let cookie = session_cookie(id);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(cookie.split(';').next().expect("pair")).expect("valid header"),
        );
        assert_eq!(session_id(&headers), Some(id));
    }
}
