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

use std::{path::PathBuf, sync::Arc};

use observer_common::{
    ChunkId, DEFAULT_CACHE_NAMESPACE, GameId, GameMetadata, KeyframeId, LastChunkInfo,
    SESSION_TTL_SECONDS, VERSION_TTL_SECONDS,
};
use tracing::warn;

use crate::{
    auth::is_authorized,
    cache::SessionCache,
    error::ObserverError,
    layout::{Artifact, ReplayDirectory},
    progression::advance,
    sink::{ObserverEvent, ObserverSink},
    version::VersionSource,
};

#[derive(Debug, Clone)]
pub struct ObserverSettings {
    /// Prefix of every cache key written by the observer.
    pub cache_namespace: String,
    /// Refuse `Accept`-carrying clients and polls without a prior metadata fetch.
    pub strict_auth: bool,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            cache_namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            strict_auth: false,
        }
    }
}

/// Outcome of a `getLastChunkInfo` poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkPoll {
    Ready(LastChunkInfo),
    /// Strict mode and the viewer never fetched the game metadata.
    Rejected,
}

/// Serves recorded games to spectator clients.
///
/// Each viewer of a game owns a chunk pointer in the session cache. Fetching
/// the metadata resets it to zero and every poll moves it one chunk forward.
/// The read and the write of a poll are separate cache calls, so two
/// simultaneous polls of the same viewer can both read the same pointer and
/// the last write wins.
pub struct ReplayObserver {
    replays: ReplayDirectory,
    cache: Arc<dyn SessionCache>,
    versions: Arc<dyn VersionSource>,
    sink: Option<Arc<dyn ObserverSink>>,
    settings: ObserverSettings,
}

impl ReplayObserver {
    pub fn new(
        replays: ReplayDirectory,
        cache: Arc<dyn SessionCache>,
        versions: Arc<dyn VersionSource>,
        sink: Option<Arc<dyn ObserverSink>>,
        settings: ObserverSettings,
    ) -> Result<Self, ObserverError> {
        if settings.strict_auth && !cache.persists() {
            return Err(ObserverError::StrictModeWithoutCache);
        }

        Ok(Self {
            replays,
            cache,
            versions,
            sink,
            settings,
        })
    }

    pub fn settings(&self) -> &ObserverSettings {
        &self.settings
    }

    pub fn is_authorized(&self, accept_header_present: bool) -> bool {
        is_authorized(accept_header_present, self.settings.strict_auth)
    }

    pub fn session_key(&self, game_id: GameId, viewer: &str) -> String {
        format!(
            "{}.{}.ip.{}.chunk_infos.try",
            self.settings.cache_namespace, game_id, viewer
        )
    }

    fn version_key(&self) -> String {
        format!("{}.version", self.settings.cache_namespace)
    }

    /// Upstream spectator version, cached for a day. The version is fetched
    /// and cached before the caller is checked.
    pub async fn version(&self, accept_header_present: bool) -> Result<String, ObserverError> {
        let key = self.version_key();
        let cached = if self.cache.has(&key).await? {
            self.cache.get(&key).await?
        } else {
            None
        };

        let version = match cached {
            Some(version) => version,
            None => {
                let version = self
                    .versions
                    .fetch_version()
                    .await
                    .ok_or(ObserverError::Timeout)?;
                self.cache
                    .set(&key, &version, Some(VERSION_TTL_SECONDS))
                    .await?;
                version
            }
        };

        if !self.is_authorized(accept_header_present) {
            return Err(ObserverError::Unauthorized);
        }

        Ok(version)
    }

    /// Starts (or restarts) the viewer's session at chunk zero and returns
    /// the recorded metadata.
    pub async fn game_metadata(
        &self,
        region: &str,
        game_id: GameId,
        viewer: &str,
    ) -> Result<GameMetadata, ObserverError> {
        let key = self.session_key(game_id, viewer);
        self.cache.set(&key, "0", Some(SESSION_TTL_SECONDS)).await?;

        match self.replays.load_metadata(region, game_id).await {
            Ok(metadata) => {
                self.report(ObserverEvent::MetadataServed {
                    region: region.to_string(),
                    game_id,
                });
                Ok(metadata)
            }
            Err(error) => {
                if error.is_not_found() {
                    self.report(ObserverEvent::MetadataMissing {
                        region: region.to_string(),
                        game_id,
                    });
                }
                Err(error)
            }
        }
    }

    /// Moves the viewer's pointer one chunk forward and answers with what the
    /// client should load next.
    pub async fn poll_last_chunk_info(
        &self,
        region: &str,
        game_id: GameId,
        viewer: &str,
    ) -> Result<ChunkPoll, ObserverError> {
        let key = self.session_key(game_id, viewer);
        if self.settings.strict_auth && !self.cache.has(&key).await? {
            self.report(ObserverEvent::PollRejected {
                region: region.to_string(),
                game_id,
            });
            return Ok(ChunkPoll::Rejected);
        }

        let session_chunk_id = self.read_pointer(&key).await?.saturating_add(1);
        self.cache
            .set(&key, &session_chunk_id.to_string(), Some(SESSION_TTL_SECONDS))
            .await?;

        let outcome = match self.replays.load_metadata(region, game_id).await {
            Ok(metadata) => advance(&metadata, session_chunk_id),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(info) => {
                self.report(ObserverEvent::ChunkInfoServed {
                    region: region.to_string(),
                    game_id,
                    session_chunk_id,
                    chunk_id: info.chunk_id,
                    key_frame_id: info.key_frame_id,
                });
                Ok(ChunkPoll::Ready(info))
            }
            Err(error) => {
                self.report(ObserverEvent::ChunkInfoFailed {
                    region: region.to_string(),
                    game_id,
                    session_chunk_id,
                    reason: error.to_string(),
                });
                Err(error)
            }
        }
    }

    pub async fn chunk_path(
        &self,
        region: &str,
        game_id: GameId,
        chunk_id: ChunkId,
    ) -> Result<PathBuf, ObserverError> {
        self.locate(region, game_id, Artifact::Chunk(chunk_id)).await
    }

    pub async fn keyframe_path(
        &self,
        region: &str,
        game_id: GameId,
        keyframe_id: KeyframeId,
    ) -> Result<PathBuf, ObserverError> {
        self.locate(region, game_id, Artifact::Keyframe(keyframe_id))
            .await
    }

    pub async fn end_stats_path(
        &self,
        region: &str,
        game_id: GameId,
    ) -> Result<PathBuf, ObserverError> {
        self.locate(region, game_id, Artifact::EndStats).await
    }

    /// Bytes of an artifact, read after the same lookup as the `*_path` calls.
    pub async fn artifact_content(
        &self,
        region: &str,
        game_id: GameId,
        artifact: Artifact,
    ) -> Result<Vec<u8>, ObserverError> {
        let path = self.locate(region, game_id, artifact).await?;
        Ok(tokio::fs::read(path).await?)
    }

    async fn locate(
        &self,
        region: &str,
        game_id: GameId,
        artifact: Artifact,
    ) -> Result<PathBuf, ObserverError> {
        match self.replays.locate(region, game_id, artifact).await {
            Ok(path) => {
                self.report(ObserverEvent::ArtifactServed {
                    region: region.to_string(),
                    game_id,
                    artifact,
                });
                Ok(path)
            }
            Err(error) => {
                if error.is_not_found() {
                    self.report(ObserverEvent::ArtifactMissing {
                        region: region.to_string(),
                        game_id,
                        artifact,
                    });
                }
                Err(error)
            }
        }
    }

    async fn read_pointer(&self, key: &str) -> Result<ChunkId, ObserverError> {
        let Some(raw) = self.cache.get(key).await? else {
            return Ok(0);
        };

        match raw.trim().parse::<ChunkId>() {
            Ok(chunk_id) => Ok(chunk_id),
            Err(error) => {
                warn!(key = %key, value = %raw, error = %error, "unreadable chunk pointer, restarting at zero");
                Ok(0)
            }
        }
    }

    fn report(&self, event: ObserverEvent) {
        if let Some(sink) = self.sink.as_ref() {
            sink.record(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::{MemorySessionCache, NullSessionCache},
        error::KeyframeMiss,
        test_support::{GAME_ID, REGION, ReplayFixture},
    };
    use async_trait::async_trait;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    const VIEWER: &str = "203.0.113.7";

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<ObserverEvent>>,
    }

    impl ObserverSink for RecordingSink {
        fn record(&self, event: &ObserverEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    struct StaticVersionSource {
        version: Option<String>,
        calls: AtomicUsize,
    }

    impl StaticVersionSource {
        fn answering(version: Option<&str>) -> Self {
            Self {
                version: version.map(str::to_string),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VersionSource for StaticVersionSource {
        async fn fetch_version(&self) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.version.clone()
        }
    }

    /// Memory cache counting writes.
    #[derive(Default)]
    struct CountingCache {
        inner: MemorySessionCache,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl SessionCache for CountingCache {
        async fn has(&self, key: &str) -> Result<bool, ObserverError> {
            self.inner.has(key).await
        }

        async fn get(&self, key: &str) -> Result<Option<String>, ObserverError> {
            self.inner.get(key).await
        }

        async fn set(
            &self,
            key: &str,
            value: &str,
            ttl_seconds: Option<i64>,
        ) -> Result<(), ObserverError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value, ttl_seconds).await
        }
    }

    /// Memory cache whose reads wait until two readers have read.
    struct LockstepCache {
        inner: MemorySessionCache,
        readers: tokio::sync::Barrier,
    }

    #[async_trait]
    impl SessionCache for LockstepCache {
        async fn has(&self, key: &str) -> Result<bool, ObserverError> {
            self.inner.has(key).await
        }

        async fn get(&self, key: &str) -> Result<Option<String>, ObserverError> {
            let value = self.inner.get(key).await;
            self.readers.wait().await;
            value
        }

        async fn set(
            &self,
            key: &str,
            value: &str,
            ttl_seconds: Option<i64>,
        ) -> Result<(), ObserverError> {
            self.inner.set(key, value, ttl_seconds).await
        }
    }

    struct Harness {
        fixture: ReplayFixture,
        cache: Arc<CountingCache>,
        versions: Arc<StaticVersionSource>,
        sink: Arc<RecordingSink>,
        observer: ReplayObserver,
    }

    fn harness(strict_auth: bool) -> Harness {
        harness_with_version(strict_auth, Some("1.82.89"))
    }

    fn harness_with_version(strict_auth: bool, version: Option<&str>) -> Harness {
        let fixture = ReplayFixture::new();
        let cache = Arc::new(CountingCache::default());
        let versions = Arc::new(StaticVersionSource::answering(version));
        let sink = Arc::new(RecordingSink::default());
        let observer = ReplayObserver::new(
            fixture.replays(),
            cache.clone(),
            versions.clone(),
            Some(sink.clone()),
            ObserverSettings {
                strict_auth,
                ..ObserverSettings::default()
            },
        )
        .unwrap();

        Harness {
            fixture,
            cache,
            versions,
            sink,
            observer,
        }
    }

    impl Harness {
        async fn pointer(&self) -> Option<String> {
            let key = self.observer.session_key(GAME_ID, VIEWER);
            self.cache.inner.get(&key).await.unwrap()
        }

        fn events(&self) -> Vec<ObserverEvent> {
            self.sink.events.lock().unwrap().clone()
        }

        async fn poll(&self) -> ChunkPoll {
            self.observer
                .poll_last_chunk_info(REGION, GAME_ID, VIEWER)
                .await
                .unwrap()
        }
    }

    fn ready(poll: ChunkPoll) -> LastChunkInfo {
        match poll {
            ChunkPoll::Ready(info) => info,
            ChunkPoll::Rejected => panic!("poll was rejected"),
        }
    }

    #[test]
    fn session_key_follows_namespace_convention() {
        let h = harness(false);
        assert_eq!(
            h.observer.session_key(GAME_ID, VIEWER),
            "elogank.replay.observer.1234567890.ip.203.0.113.7.chunk_infos.try"
        );
    }

    #[test]
    fn strict_mode_needs_a_persistent_cache() {
        let fixture = ReplayFixture::new();
        let result = ReplayObserver::new(
            fixture.replays(),
            Arc::new(NullSessionCache),
            Arc::new(StaticVersionSource::answering(Some("1"))),
            None,
            ObserverSettings {
                strict_auth: true,
                ..ObserverSettings::default()
            },
        );
        assert!(matches!(result, Err(ObserverError::StrictModeWithoutCache)));
    }

    #[tokio::test]
    async fn version_is_fetched_once_then_cached() {
        let h = harness(false);

        assert_eq!(h.observer.version(false).await.unwrap(), "1.82.89");
        assert_eq!(h.observer.version(false).await.unwrap(), "1.82.89");
        assert_eq!(h.versions.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            h.cache
                .inner
                .get("elogank.replay.observer.version")
                .await
                .unwrap()
                .as_deref(),
            Some("1.82.89")
        );
    }

    #[tokio::test]
    async fn version_upstream_failure_is_timeout() {
        let h = harness_with_version(false, None);

        let error = h.observer.version(false).await.unwrap_err();
        assert!(matches!(error, ObserverError::Timeout));
        assert_eq!(h.cache.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn version_refuses_accept_header_in_strict_mode() {
        let h = harness(true);

        let error = h.observer.version(true).await.unwrap_err();
        assert!(matches!(error, ObserverError::Unauthorized));
        assert_eq!(h.observer.version(false).await.unwrap(), "1.82.89");
    }

    #[tokio::test]
    async fn version_allows_accept_header_when_lenient() {
        let h = harness(false);
        assert_eq!(h.observer.version(true).await.unwrap(), "1.82.89");
    }

    #[tokio::test]
    async fn metadata_fetch_starts_session_at_zero() {
        let h = harness(false);

        let metadata = h
            .observer
            .game_metadata(REGION, GAME_ID, VIEWER)
            .await
            .unwrap();

        assert_eq!(metadata.last_chunk_id, 50);
        assert_eq!(h.pointer().await.as_deref(), Some("0"));
        assert_eq!(
            h.events(),
            vec![ObserverEvent::MetadataServed {
                region: REGION.to_string(),
                game_id: GAME_ID,
            }]
        );
    }

    #[tokio::test]
    async fn metadata_of_unknown_game_is_folder_not_found() {
        let h = harness(false);

        let error = h
            .observer
            .game_metadata(REGION, 9876543210, VIEWER)
            .await
            .unwrap_err();

        assert!(matches!(error, ObserverError::FolderNotFound { .. }));
        assert_eq!(
            h.events(),
            vec![ObserverEvent::MetadataMissing {
                region: REGION.to_string(),
                game_id: 9876543210,
            }]
        );
    }

    #[tokio::test]
    async fn polls_walk_the_viewer_through_the_game() {
        let h = harness(false);
        h.observer
            .game_metadata(REGION, GAME_ID, VIEWER)
            .await
            .unwrap();

        for _ in 1..=12 {
            let info = ready(h.poll().await);
            assert_eq!(info.chunk_id, 14);
            assert_eq!(info.next_chunk_id, 14);
        }

        let info = ready(h.poll().await);
        assert_eq!(info.chunk_id, 14);
        assert_eq!(info.next_chunk_id, 50);
        assert_eq!(h.pointer().await.as_deref(), Some("13"));

        let info = ready(h.poll().await);
        assert_eq!(info.chunk_id, 14);
        assert_eq!(info.key_frame_id, 1);
        assert_eq!(info.next_available_chunk, 30_000);
        assert_eq!(h.pointer().await.as_deref(), Some("14"));

        assert_eq!(
            h.events().last(),
            Some(&ObserverEvent::ChunkInfoServed {
                region: REGION.to_string(),
                game_id: GAME_ID,
                session_chunk_id: 14,
                chunk_id: 14,
                key_frame_id: 1,
            })
        );
    }

    #[tokio::test]
    async fn metadata_fetch_restarts_a_running_session() {
        let h = harness(false);
        h.observer
            .game_metadata(REGION, GAME_ID, VIEWER)
            .await
            .unwrap();
        for _ in 0..30 {
            h.poll().await;
        }

        h.observer
            .game_metadata(REGION, GAME_ID, VIEWER)
            .await
            .unwrap();
        assert_eq!(h.pointer().await.as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn strict_poll_without_session_is_rejected_without_writing() {
        let h = harness(true);

        assert_eq!(h.poll().await, ChunkPoll::Rejected);
        assert_eq!(h.cache.writes.load(Ordering::SeqCst), 0);
        assert_eq!(h.pointer().await, None);
        assert_eq!(
            h.events(),
            vec![ObserverEvent::PollRejected {
                region: REGION.to_string(),
                game_id: GAME_ID,
            }]
        );
    }

    #[tokio::test]
    async fn strict_poll_after_metadata_is_served() {
        let h = harness(true);
        h.observer
            .game_metadata(REGION, GAME_ID, VIEWER)
            .await
            .unwrap();

        assert!(matches!(h.poll().await, ChunkPoll::Ready(_)));
        assert_eq!(h.pointer().await.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn lenient_poll_without_session_starts_at_one() {
        let h = harness(false);

        ready(h.poll().await);
        assert_eq!(h.pointer().await.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn unreadable_pointer_restarts_at_zero() {
        let h = harness(false);
        let key = h.observer.session_key(GAME_ID, VIEWER);
        h.cache.inner.set(&key, "garbage", Some(60)).await.unwrap();

        ready(h.poll().await);
        assert_eq!(h.pointer().await.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn pointer_is_persisted_before_the_answer_is_computed() {
        let h = harness(false);
        h.fixture.write_file("metas.json", b"{ broken");

        let error = h
            .observer
            .poll_last_chunk_info(REGION, GAME_ID, VIEWER)
            .await
            .unwrap_err();

        assert!(matches!(error, ObserverError::MalformedMetadata { .. }));
        assert_eq!(h.pointer().await.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn poll_failure_is_reported_to_sink() {
        let h = harness(false);

        let error = h
            .observer
            .poll_last_chunk_info(REGION, 9876543210, VIEWER)
            .await
            .unwrap_err();

        assert!(matches!(error, ObserverError::FolderNotFound { .. }));
        assert!(matches!(
            h.events().as_slice(),
            [ObserverEvent::ChunkInfoFailed {
                game_id: 9876543210,
                session_chunk_id: 1,
                ..
            }]
        ));
    }

    #[tokio::test]
    async fn poll_without_covering_keyframe_is_keyframe_not_found() {
        let h = harness(false);
        h.fixture.write_file(
            "metas.json",
            br#"{"firstChunkId": 1, "startGameChunkId": 2, "endStartupChunkId": 0,
                 "lastChunkId": 10, "pendingAvailableKeyFrameInfo": [{"id": 1, "nextChunkId": 5}]}"#,
        );

        let error = h
            .observer
            .poll_last_chunk_info(REGION, GAME_ID, VIEWER)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ObserverError::KeyframeNotFound(KeyframeMiss::Chunk(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_polls_of_one_viewer_lose_an_update() {
        // The pointer is read and written in two steps: both polls read 0,
        // both write 1 and both are answered for the same chunk.
        let fixture = ReplayFixture::new();
        let cache = Arc::new(LockstepCache {
            inner: MemorySessionCache::new(),
            readers: tokio::sync::Barrier::new(2),
        });
        let observer = ReplayObserver::new(
            fixture.replays(),
            cache.clone(),
            Arc::new(StaticVersionSource::answering(Some("1"))),
            None,
            ObserverSettings::default(),
        )
        .unwrap();
        observer
            .game_metadata(REGION, GAME_ID, VIEWER)
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            observer.poll_last_chunk_info(REGION, GAME_ID, VIEWER),
            observer.poll_last_chunk_info(REGION, GAME_ID, VIEWER),
        );

        assert_eq!(first.unwrap(), second.unwrap());
        let key = observer.session_key(GAME_ID, VIEWER);
        assert_eq!(cache.inner.get(&key).await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn artifacts_are_located_and_reported() {
        let h = harness(false);

        let chunk = h.observer.chunk_path(REGION, GAME_ID, 14).await.unwrap();
        assert!(chunk.ends_with("chunks/14"));
        let keyframe = h.observer.keyframe_path(REGION, GAME_ID, 1).await.unwrap();
        assert!(keyframe.ends_with("keyframes/1"));
        let end_stats = h.observer.end_stats_path(REGION, GAME_ID).await.unwrap();
        assert!(end_stats.ends_with("endstats"));

        assert_eq!(
            h.events(),
            vec![
                ObserverEvent::ArtifactServed {
                    region: REGION.to_string(),
                    game_id: GAME_ID,
                    artifact: Artifact::Chunk(14),
                },
                ObserverEvent::ArtifactServed {
                    region: REGION.to_string(),
                    game_id: GAME_ID,
                    artifact: Artifact::Keyframe(1),
                },
                ObserverEvent::ArtifactServed {
                    region: REGION.to_string(),
                    game_id: GAME_ID,
                    artifact: Artifact::EndStats,
                },
            ]
        );
    }

    #[tokio::test]
    async fn missing_artifacts_are_reported_then_propagated() {
        let h = harness(false);

        assert!(matches!(
            h.observer.chunk_path(REGION, GAME_ID, 404).await,
            Err(ObserverError::ChunkNotFound { chunk_id: 404, .. })
        ));
        assert!(matches!(
            h.observer.keyframe_path(REGION, GAME_ID, 404).await,
            Err(ObserverError::KeyframeNotFound(_))
        ));
        assert!(matches!(
            h.observer.end_stats_path(REGION, 9876543210).await,
            Err(ObserverError::EndStatsNotFound { .. })
        ));

        assert_eq!(
            h.events(),
            vec![
                ObserverEvent::ArtifactMissing {
                    region: REGION.to_string(),
                    game_id: GAME_ID,
                    artifact: Artifact::Chunk(404),
                },
                ObserverEvent::ArtifactMissing {
                    region: REGION.to_string(),
                    game_id: GAME_ID,
                    artifact: Artifact::Keyframe(404),
                },
                ObserverEvent::ArtifactMissing {
                    region: REGION.to_string(),
                    game_id: 9876543210,
                    artifact: Artifact::EndStats,
                },
            ]
        );
    }

    #[tokio::test]
    async fn artifact_content_reads_file_bytes() {
        let h = harness(false);
        h.fixture.write_file("chunks/21", b"chunk twenty-one");

        let bytes = h
            .observer
            .artifact_content(REGION, GAME_ID, Artifact::Chunk(21))
            .await
            .unwrap();
        assert_eq!(bytes, b"chunk twenty-one");
    }

    #[tokio::test]
    async fn observer_runs_without_a_sink() {
        let fixture = ReplayFixture::new();
        let observer = ReplayObserver::new(
            fixture.replays(),
            Arc::new(MemorySessionCache::new()),
            Arc::new(StaticVersionSource::answering(Some("1"))),
            None,
            ObserverSettings::default(),
        )
        .unwrap();

        assert!(observer.chunk_path(REGION, GAME_ID, 404).await.is_err());
        assert!(matches!(
            observer
                .poll_last_chunk_info(REGION, GAME_ID, VIEWER)
                .await
                .unwrap(),
            ChunkPoll::Ready(_)
        ));
    }
}
