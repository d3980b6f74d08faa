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

use observer_common::{
    CHUNK_DURATION_MS, ChunkId, END_OF_GAME_POLL_DELAY_MS, GameMetadata, LastChunkInfo,
    STARTUP_ALIGNMENT_OFFSET, STARTUP_POLL_DELAY_MS, STEADY_POLL_DELAY_MS, WARM_UP_CHUNKS,
};

use crate::{error::ObserverError, keyframe::resolve_keyframe};

/// The chunk a viewer starts loading from.
///
/// Some recordings report a `firstChunkId` sitting right after the startup
/// chunks; the client never starts loading such a game unless it is moved to
/// just after the game start chunk instead.
pub fn effective_first_chunk(metadata: &GameMetadata) -> ChunkId {
    let first_chunk_id = metadata.first_chunk_id;
    if metadata
        .end_startup_chunk_id
        .saturating_add(STARTUP_ALIGNMENT_OFFSET)
        == first_chunk_id
    {
        metadata
            .start_game_chunk_id
            .saturating_add(STARTUP_ALIGNMENT_OFFSET)
    } else {
        first_chunk_id
    }
}

/// Computes the `getLastChunkInfo` answer for a viewer whose session pointer
/// has just moved to `requested_chunk_id`.
///
/// Pure: the same metadata and pointer always give the same answer. The only
/// failure is a chunk no keyframe covers.
pub fn advance(
    metadata: &GameMetadata,
    requested_chunk_id: ChunkId,
) -> Result<LastChunkInfo, ObserverError> {
    let first_chunk_id = effective_first_chunk(metadata);
    let start_game_chunk_id = metadata.start_game_chunk_id;
    let last_chunk_id = metadata.last_chunk_id;

    // Loading phase until the pointer passes the game start.
    let mut info = LastChunkInfo {
        chunk_id: first_chunk_id,
        next_chunk_id: first_chunk_id,
        key_frame_id: resolve_keyframe(metadata, first_chunk_id)?,
        next_available_chunk: STARTUP_POLL_DELAY_MS,
        end_startup_chunk_id: metadata.end_startup_chunk_id,
        start_game_chunk_id,
        end_game_chunk_id: 0,
        duration: CHUNK_DURATION_MS,
    };

    let mut requested_chunk_id = requested_chunk_id;
    if first_chunk_id != start_game_chunk_id
        && requested_chunk_id == start_game_chunk_id.saturating_add(1)
    {
        requested_chunk_id = first_chunk_id;
    }

    if requested_chunk_id > start_game_chunk_id {
        info.key_frame_id = resolve_keyframe(metadata, requested_chunk_id)?;
        requested_chunk_id = requested_chunk_id.min(last_chunk_id);

        info.chunk_id = requested_chunk_id;
        info.next_chunk_id = last_chunk_id;
        info.next_available_chunk =
            if requested_chunk_id <= first_chunk_id.saturating_add(WARM_UP_CHUNKS) {
                STARTUP_POLL_DELAY_MS
            } else {
                STEADY_POLL_DELAY_MS
            };
    }

    if requested_chunk_id == last_chunk_id {
        info.next_available_chunk = END_OF_GAME_POLL_DELAY_MS;
        info.end_game_chunk_id = metadata.end_game_chunk_id;
    }

    Ok(info)
}
