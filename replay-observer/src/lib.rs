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

//! Spectator replay observer: serves recorded games to the game client and
//! paces each viewer through the recording chunk by chunk.

pub mod auth;
pub mod cache;
pub mod error;
pub mod keyframe;
pub mod layout;
pub mod observer;
pub mod progression;
pub mod sink;
pub mod version;

pub use auth::is_authorized;
pub use cache::{MemorySessionCache, NullSessionCache, SessionCache, validate_ttl};
pub use error::{KeyframeMiss, ObserverError};
pub use keyframe::resolve_keyframe;
pub use layout::{Artifact, ReplayDirectory};
pub use observer::{ChunkPoll, ObserverSettings, ReplayObserver};
pub use progression::{advance, effective_first_chunk};
pub use sink::{ObserverEvent, ObserverSink, TracingSink};
pub use version::{HttpVersionSource, VersionSource};
