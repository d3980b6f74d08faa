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

use observer_common::{ChunkId, GameMetadata, KeyframeId};

use crate::error::{KeyframeMiss, ObserverError};

/// Finds the keyframe a viewer must load before decoding `chunk_id`.
///
/// A keyframe matches the chunk equal to its `nextChunkId`. When no keyframe
/// starts exactly at `chunk_id`, the nearest preceding one is used, since
/// chunks decode forward from the last keyframe. At each candidate chunk the
/// first matching entry in stored order wins.
pub fn resolve_keyframe(
    metadata: &GameMetadata,
    chunk_id: ChunkId,
) -> Result<KeyframeId, ObserverError> {
    let not_found = || ObserverError::KeyframeNotFound(KeyframeMiss::Chunk(chunk_id));

    let bounds = metadata
        .keyframe_info
        .iter()
        .map(|keyframe| keyframe.next_chunk_id)
        .fold(None, |bounds: Option<(ChunkId, ChunkId)>, next| match bounds {
            Some((low, high)) => Some((low.min(next), high.max(next))),
            None => Some((next, next)),
        });
    let Some((floor, ceiling)) = bounds else {
        return Err(not_found());
    };

    // Nothing above the highest keyframe boundary can match, so the walk
    // starts there and is bounded by the keyframe span.
    let mut candidate = chunk_id.min(ceiling);
    while candidate >= floor {
        if let Some(keyframe) = metadata
            .keyframe_info
            .iter()
            .find(|keyframe| keyframe.next_chunk_id == candidate)
        {
            return Ok(keyframe.id);
        }
        candidate -= 1;
    }

    Err(not_found())
}
