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

use std::fmt;

use observer_common::{ChunkId, GameId, KeyframeId};
use thiserror::Error;

/// A keyframe that could not be produced: either no keyframe covers a chunk,
/// or the keyframe file itself is absent from the replay directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframeMiss {
    Chunk(ChunkId),
    Artifact {
        game_id: GameId,
        keyframe_id: KeyframeId,
    },
}

impl fmt::Display for KeyframeMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunk(chunk_id) => write!(f, "no keyframe found for chunk #{chunk_id}"),
            Self::Artifact {
                game_id,
                keyframe_id,
            } => write!(
                f,
                "the keyframe #{keyframe_id} of game #{game_id} is not found"
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("the replay folder of game #{game_id} ({region}) is not found, the replay will be disabled")]
    FolderNotFound { region: String, game_id: GameId },
    #[error("the metadata of game #{game_id} is malformed: {source}")]
    MalformedMetadata {
        game_id: GameId,
        #[source]
        source: serde_json::Error,
    },
    #[error("the chunk #{chunk_id} of game #{game_id} is not found")]
    ChunkNotFound { game_id: GameId, chunk_id: ChunkId },
    #[error("{0}")]
    KeyframeNotFound(KeyframeMiss),
    #[error("the end of game stats of game #{game_id} are not found")]
    EndStatsNotFound { game_id: GameId },
    #[error("unauthorized user access")]
    Unauthorized,
    #[error("the upstream spectator server has timed out")]
    Timeout,
    #[error("cache ttl must be a positive number of seconds, got {0}")]
    InvalidCacheTtl(i64),
    #[error("strict authorization cannot run without a persistent session cache")]
    StrictModeWithoutCache,
    #[error("session cache backend failed: {0}")]
    Cache(String),
    #[error("replay store i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ObserverError {
    /// True for the "requested record is absent" family that callers usually
    /// answer by disabling further polling for the game.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FolderNotFound { .. }
                | Self::ChunkNotFound { .. }
                | Self::KeyframeNotFound(_)
                | Self::EndStatsNotFound { .. }
        )
    }
}
