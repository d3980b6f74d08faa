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

use std::{
    fmt,
    path::{Path, PathBuf},
};

use observer_common::{
    CHUNKS_DIR_NAME, ChunkId, END_STATS_FILE_NAME, GameId, GameMetadata, KEYFRAMES_DIR_NAME,
    KeyframeId, METADATA_FILE_NAME,
};

use crate::error::{KeyframeMiss, ObserverError};

/// A downloadable file of a recorded game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Chunk(ChunkId),
    Keyframe(KeyframeId),
    EndStats,
}

impl Artifact {
    fn relative_path(&self) -> PathBuf {
        match self {
            Self::Chunk(chunk_id) => Path::new(CHUNKS_DIR_NAME).join(chunk_id.to_string()),
            Self::Keyframe(keyframe_id) => {
                Path::new(KEYFRAMES_DIR_NAME).join(keyframe_id.to_string())
            }
            Self::EndStats => PathBuf::from(END_STATS_FILE_NAME),
        }
    }

    fn not_found(&self, game_id: GameId) -> ObserverError {
        match *self {
            Self::Chunk(chunk_id) => ObserverError::ChunkNotFound { game_id, chunk_id },
            Self::Keyframe(keyframe_id) => ObserverError::KeyframeNotFound(KeyframeMiss::Artifact {
                game_id,
                keyframe_id,
            }),
            Self::EndStats => ObserverError::EndStatsNotFound { game_id },
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunk(chunk_id) => write!(f, "chunk #{chunk_id}"),
            Self::Keyframe(keyframe_id) => write!(f, "keyframe #{keyframe_id}"),
            Self::EndStats => f.write_str("endstats"),
        }
    }
}

/// Recorded games laid out as
/// `<root>/<region>/<d0d1>/<d2>/<d3>/<gameId>/`, where `d0..d3` are the first
/// four digits of the game id. The three shard levels keep any single
/// directory from holding every game of a region.
#[derive(Debug, Clone)]
pub struct ReplayDirectory {
    root: PathBuf,
}

impl ReplayDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one game, or `None` when the region or id cannot name one.
    pub fn game_dir(&self, region: &str, game_id: GameId) -> Option<PathBuf> {
        if !is_valid_region(region) {
            return None;
        }

        let digits = game_id.to_string();
        let shards = digits.get(0..2).zip(digits.get(2..3)).zip(digits.get(3..4));
        let ((top, middle), bottom) = shards?;

        Some(
            self.root
                .join(region)
                .join(top)
                .join(middle)
                .join(bottom)
                .join(&digits),
        )
    }

    pub async fn load_metadata(
        &self,
        region: &str,
        game_id: GameId,
    ) -> Result<GameMetadata, ObserverError> {
        let folder_not_found = || ObserverError::FolderNotFound {
            region: region.to_string(),
            game_id,
        };

        let game_dir = self.game_dir(region, game_id).ok_or_else(folder_not_found)?;
        if !is_dir(&game_dir).await {
            return Err(folder_not_found());
        }

        let raw = tokio::fs::read(game_dir.join(METADATA_FILE_NAME)).await?;
        serde_json::from_slice(&raw)
            .map_err(|source| ObserverError::MalformedMetadata { game_id, source })
    }

    /// Path of an existing artifact file. Content is never inspected.
    pub async fn locate(
        &self,
        region: &str,
        game_id: GameId,
        artifact: Artifact,
    ) -> Result<PathBuf, ObserverError> {
        let path = self
            .game_dir(region, game_id)
            .map(|game_dir| game_dir.join(artifact.relative_path()))
            .ok_or_else(|| artifact.not_found(game_id))?;

        if is_file(&path).await {
            Ok(path)
        } else {
            Err(artifact.not_found(game_id))
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
}

fn is_valid_region(region: &str) -> bool {
    !region.is_empty()
        && region
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}
