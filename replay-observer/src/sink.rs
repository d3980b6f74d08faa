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

use observer_common::{ChunkId, GameId, KeyframeId};
use tracing::{info, warn};

use crate::layout::Artifact;

/// Something the observer did for a viewer, reported with the identifiers
/// needed to diagnose it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    MetadataServed {
        region: String,
        game_id: GameId,
    },
    MetadataMissing {
        region: String,
        game_id: GameId,
    },
    ChunkInfoServed {
        region: String,
        game_id: GameId,
        session_chunk_id: ChunkId,
        chunk_id: ChunkId,
        key_frame_id: KeyframeId,
    },
    ChunkInfoFailed {
        region: String,
        game_id: GameId,
        session_chunk_id: ChunkId,
        reason: String,
    },
    /// Strict mode refused a poll from a viewer that never fetched metadata.
    PollRejected {
        region: String,
        game_id: GameId,
    },
    ArtifactServed {
        region: String,
        game_id: GameId,
        artifact: Artifact,
    },
    ArtifactMissing {
        region: String,
        game_id: GameId,
        artifact: Artifact,
    },
}

pub trait ObserverSink: Send + Sync {
    fn record(&self, event: &ObserverEvent);
}

/// Sink writing every event as a `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ObserverSink for TracingSink {
    fn record(&self, event: &ObserverEvent) {
        match event {
            ObserverEvent::MetadataServed { region, game_id } => {
                info!(%region, game_id, "game metadata served");
            }
            ObserverEvent::MetadataMissing { region, game_id } => {
                warn!(%region, game_id, "game metadata not found");
            }
            ObserverEvent::ChunkInfoServed {
                region,
                game_id,
                session_chunk_id,
                chunk_id,
                key_frame_id,
            } => {
                info!(
                    %region,
                    game_id,
                    session_chunk_id,
                    chunk_id,
                    key_frame_id,
                    "last chunk info served"
                );
            }
            ObserverEvent::ChunkInfoFailed {
                region,
                game_id,
                session_chunk_id,
                reason,
            } => {
                warn!(%region, game_id, session_chunk_id, %reason, "last chunk info failed");
            }
            ObserverEvent::PollRejected { region, game_id } => {
                warn!(
                    %region,
                    game_id,
                    "poll rejected: no cached chunk pointer for this viewer"
                );
            }
            ObserverEvent::ArtifactServed {
                region,
                game_id,
                artifact,
            } => {
                info!(%region, game_id, %artifact, "artifact served");
            }
            ObserverEvent::ArtifactMissing {
                region,
                game_id,
                artifact,
            } => {
                warn!(%region, game_id, %artifact, "artifact not found");
            }
        }
    }
}
