//! Session middleware configuration and session-stored values.
//!
//! Sessions live in memory: they only hold the visitor's cart ID, UI panel
//! state and lookup scope, all of which are cheap to lose on restart. The
//! store is a `moka` cache that drops each record when its expiry passes.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::{
    Expiry as SessionExpiry, Session, SessionManagerLayer, SessionStore, session_store,
};
use uuid::Uuid;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "orchard_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Upper bound on concurrently stored sessions.
const MAX_SESSIONS: u64 = 100_000;

/// Keys for values stored in the session.
pub mod keys {
    /// Shopify cart ID.
    pub const CART_ID: &str = "cart_id";

    /// Open/closed state of the cart aside and contact slide-over.
    pub const PANELS: &str = "panels";

    /// Random per-visitor prefix for variant lookup instances.
    pub const LOOKUP_SCOPE: &str = "lookup_scope";
}

/// In-memory session store that evicts records once they expire.
#[derive(Debug, Clone)]
pub struct SessionCache {
    records: Cache<Id, Record>,
}

impl SessionCache {
    /// Create a store holding at most `max_sessions` records.
    #[must_use]
    pub fn new(max_sessions: u64) -> Self {
        let records = Cache::builder()
            .max_capacity(max_sessions)
            .expire_after(RecordExpiry)
            .build();

        Self { records }
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(MAX_SESSIONS)
    }
}

#[async_trait]
impl SessionStore for SessionCache {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        // Regenerate the ID on collision
        while !self
            .records
            .entry(record.id)
            .or_insert(record.clone())
            .await
            .is_fresh()
        {
            record.id = Id::default();
        }
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .records
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.invalidate(session_id).await;
        Ok(())
    }
}

/// Expires each cached record at its own `expiry_date`.
struct RecordExpiry;

impl RecordExpiry {
    fn remaining(record: &Record) -> Duration {
        Duration::try_from(record.expiry_date - OffsetDateTime::now_utc())
            .unwrap_or(Duration::ZERO)
    }
}

impl Expiry<Id, Record> for RecordExpiry {
    fn expire_after_create(
        &self,
        _id: &Id,
        record: &Record,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Self::remaining(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(Self::remaining(record))
    }
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<SessionCache> {
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(SessionCache::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(SessionExpiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Get the cart ID from the session.
pub async fn cart_id(session: &Session) -> Option<String> {
    session.get::<String>(keys::CART_ID).await.ok().flatten()
}

/// Set the cart ID in the session.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn set_cart_id(
    session: &Session,
    cart_id: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART_ID, cart_id).await
}

/// The visitor's variant lookup scope, created on first use.
///
/// # Errors
///
/// Returns an error if the session store rejects the read or write.
pub async fn lookup_scope(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(scope) = session.get::<String>(keys::LOOKUP_SCOPE).await? {
        return Ok(scope);
    }

    let scope = Uuid::new_v4().simple().to_string();
    session.insert(keys::LOOKUP_SCOPE, &scope).await?;
    Ok(scope)
}

/// Forget the cart ID (e.g. when Shopify no longer knows the cart).
pub async fn clear_cart_id(session: &Session) {
    if let Err(e) = session.remove::<String>(keys::CART_ID).await {
        tracing::warn!(error = %e, "Failed to clear cart ID from session");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time::Duration as TimeDuration;

    use super::*;

    async fn record_count(store: &SessionCache) -> u64 {
        store.records.run_pending_tasks().await;
        store.records.entry_count()
    }

    fn record(expires_in: TimeDuration) -> Record {
        Record {
            id: Id::default(),
            data: Default::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = SessionCache::default();
        let mut active = record(TimeDuration::minutes(30));
        store.create(&mut active).await.unwrap();

        assert_eq!(store.load(&active.id).await.unwrap(), Some(active.clone()));

        store.delete(&active.id).await.unwrap();
        assert_eq!(store.load(&active.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_records_are_evicted() {
        let store = SessionCache::default();
        let mut active = record(TimeDuration::minutes(30));
        let mut expired = record(TimeDuration::seconds(-1));
        store.create(&mut active).await.unwrap();
        store.create(&mut expired).await.unwrap();

        assert_eq!(store.load(&expired.id).await.unwrap(), None);
        assert_eq!(record_count(&store).await, 1);
    }

    #[tokio::test]
    async fn test_create_regenerates_colliding_id() {
        let store = SessionCache::default();
        let mut first = record(TimeDuration::minutes(30));
        store.create(&mut first).await.unwrap();

        let mut second = record(TimeDuration::minutes(30));
        second.id = first.id;
        store.create(&mut second).await.unwrap();

        assert_ne!(second.id, first.id);
        assert_eq!(record_count(&store).await, 2);
    }
}
