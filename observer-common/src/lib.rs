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

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_CACHE_NAMESPACE: &str = "elogank.replay.observer";
pub const METADATA_FILE_NAME: &str = "metas.json";
pub const CHUNKS_DIR_NAME: &str = "chunks";
pub const KEYFRAMES_DIR_NAME: &str = "keyframes";
pub const END_STATS_FILE_NAME: &str = "endstats";

/// Lifetime of a viewer session pointer and of the cached upstream version.
pub const SESSION_TTL_SECONDS: i64 = 86_400;
pub const VERSION_TTL_SECONDS: i64 = 86_400;

pub const CHUNK_DURATION_MS: u64 = 30_000;
pub const STARTUP_POLL_DELAY_MS: u64 = 30_000;
pub const STEADY_POLL_DELAY_MS: u64 = 100;
pub const END_OF_GAME_POLL_DELAY_MS: u64 = 90_000;

/// Chunks after the first one during which the client is still warming up.
pub const WARM_UP_CHUNKS: ChunkId = 6;

/// Distance between the end of the startup chunks and the first playable chunk.
pub const STARTUP_ALIGNMENT_OFFSET: ChunkId = 2;

pub type GameId = u64;
pub type ChunkId = i64;
pub type KeyframeId = i64;

/// One entry of `pendingAvailableKeyFrameInfo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeInfo {
    pub id: KeyframeId,
    pub next_chunk_id: ChunkId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KeyframeInfo {
    pub fn new(id: KeyframeId, next_chunk_id: ChunkId) -> Self {
        Self {
            id,
            next_chunk_id,
            extra: Map::new(),
        }
    }
}

/// The recorded `metas.json` document of a game.
///
/// Only the chunk boundaries and keyframe list are interpreted; every other
/// field is carried through untouched so the spectator client receives the
/// record exactly as it was stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameMetadata {
    pub first_chunk_id: ChunkId,
    pub start_game_chunk_id: ChunkId,
    pub end_startup_chunk_id: ChunkId,
    pub last_chunk_id: ChunkId,
    /// Zero until the game has ended upstream.
    #[serde(default)]
    pub end_game_chunk_id: ChunkId,
    #[serde(rename = "pendingAvailableKeyFrameInfo", default)]
    pub keyframe_info: Vec<KeyframeInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response body of `getLastChunkInfo`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LastChunkInfo {
    pub chunk_id: ChunkId,
    pub next_chunk_id: ChunkId,
    pub key_frame_id: KeyframeId,
    /// Milliseconds the client should wait before polling again.
    pub next_available_chunk: u64,
    pub end_startup_chunk_id: ChunkId,
    pub start_game_chunk_id: ChunkId,
    pub end_game_chunk_id: ChunkId,
    pub duration: u64,
}

/// Replace `${VAR_NAME}` patterns in a string with values from environment variables.
/// Unknown or unset variables are replaced with an empty string.
pub fn expand_env_vars(input: &str) -> String {
    let Ok(re) = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}") else {
        return input.to_string();
    };
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_default()
    })
    .into_owned()
}
