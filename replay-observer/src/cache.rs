// Copyright (C) 2026 StarHuntingGames
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::error::ObserverError;

/// Key/value store holding viewer session pointers and the cached upstream
/// version.
///
/// There is deliberately no increment-and-fetch: a poll reads the pointer and
/// writes it back in two steps.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// True when the key exists and has not expired.
    async fn has(&self, key: &str) -> Result<bool, ObserverError>;

    async fn get(&self, key: &str) -> Result<Option<String>, ObserverError>;

    /// Stores `value`; `ttl_seconds` must be positive when given, `None`
    /// keeps the entry until the backend evicts it.
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<i64>,
    ) -> Result<(), ObserverError>;

    /// Whether values written here can be read back later.
    fn persists(&self) -> bool {
        true
    }
}

pub fn validate_ttl(ttl_seconds: Option<i64>) -> Result<Option<i64>, ObserverError> {
    match ttl_seconds {
        Some(ttl) if ttl <= 0 => Err(ObserverError::InvalidCacheTtl(ttl)),
        other => Ok(other),
    }
}

/// Cache that remembers nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSessionCache;

#[async_trait]
impl SessionCache for NullSessionCache {
    async fn has(&self, _key: &str) -> Result<bool, ObserverError> {
        Ok(false)
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, ObserverError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &str,
        _value: &str,
        ttl_seconds: Option<i64>,
    ) -> Result<(), ObserverError> {
        validate_ttl(ttl_seconds)?;
        Ok(())
    }

    fn persists(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// In-process cache; expired entries are hidden on read and overwritten on
/// the next write of the same key.
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    async fn live_value(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    async fn store(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<(), ObserverError> {
        let ttl_seconds = validate_ttl(ttl_seconds)?;
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: ttl_seconds.and_then(|ttl| expiry(now, ttl)),
        };
        self.entries.lock().await.insert(key.to_string(), entry);
        Ok(())
    }
}

/// A TTL too large to represent as a timestamp never expires.
fn expiry(now: DateTime<Utc>, ttl_seconds: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(ttl_seconds).and_then(|ttl| now.checked_add_signed(ttl))
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn has(&self, key: &str) -> Result<bool, ObserverError> {
        Ok(self.live_value(key, Utc::now()).await.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ObserverError> {
        Ok(self.live_value(key, Utc::now()).await)
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<i64>,
    ) -> Result<(), ObserverError> {
        self.store(key, value, ttl_seconds, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_cache_round_trips_live_values() {
        let cache = MemorySessionCache::new();
        cache.set("k", "3", Some(60)).await.unwrap();

        assert!(cache.has("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("3"));
        assert!(!cache.has("other").await.unwrap());
        assert_eq!(cache.get("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_cache_hides_expired_entries() {
        let cache = MemorySessionCache::new();
        let written_at = Utc::now() - Duration::seconds(120);
        cache.store("k", "3", Some(60), written_at).await.unwrap();

        assert!(!cache.has("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_cache_without_ttl_never_expires() {
        let cache = MemorySessionCache::new();
        let written_at = Utc::now() - Duration::days(365);
        cache.store("k", "v", None, written_at).await.unwrap();

        assert!(cache.has("k").await.unwrap());
    }

    #[tokio::test]
    async fn memory_cache_treats_huge_ttl_as_no_expiry() {
        let cache = MemorySessionCache::new();
        cache.set("max", "1", Some(i64::MAX)).await.unwrap();
        cache.set("millis", "2", Some(i64::MAX / 1000)).await.unwrap();

        assert_eq!(cache.get("max").await.unwrap().as_deref(), Some("1"));
        assert_eq!(cache.get("millis").await.unwrap().as_deref(), Some("2"));
        assert_eq!(expiry(Utc::now(), i64::MAX), None);
        assert!(expiry(Utc::now(), 60).is_some());
    }

    #[tokio::test]
    async fn memory_cache_overwrite_replaces_value_and_ttl() {
        let cache = MemorySessionCache::new();
        let written_at = Utc::now() - Duration::seconds(120);
        cache.store("k", "1", Some(60), written_at).await.unwrap();
        cache.set("k", "2", Some(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn negative_ttl_is_rejected() {
        let cache = MemorySessionCache::new();
        let error = cache.set("k", "v", Some(-1)).await.unwrap_err();

        assert!(matches!(error, ObserverError::InvalidCacheTtl(-1)));
        assert!(!cache.has("k").await.unwrap());
    }

    #[tokio::test]
    async fn zero_ttl_is_rejected_by_every_backend() {
        assert!(matches!(
            MemorySessionCache::new().set("k", "v", Some(0)).await,
            Err(ObserverError::InvalidCacheTtl(0))
        ));
        assert!(matches!(
            NullSessionCache.set("k", "v", Some(0)).await,
            Err(ObserverError::InvalidCacheTtl(0))
        ));
    }

    #[tokio::test]
    async fn null_cache_forgets_everything() {
        let cache = NullSessionCache;
        cache.set("k", "v", Some(10)).await.unwrap();

        assert!(!cache.has("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(!cache.persists());
        assert!(MemorySessionCache::new().persists());
    }
}
