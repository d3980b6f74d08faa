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

/// Tells the real game client apart from browsers and leechers.
///
/// The game client never sends an `Accept` header, so in strict mode any
/// request carrying one is refused. This is a heuristic, not a security
/// boundary.
pub fn is_authorized(accept_header_present: bool, strict_mode: bool) -> bool {
    !strict_mode || !accept_header_present
}
