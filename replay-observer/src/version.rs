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

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

pub const VERSION_PATH: &str = "/observer-mode/rest/consumer/version";

/// Where the spectator protocol version string comes from.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// `None` when the upstream could not answer in time.
    async fn fetch_version(&self) -> Option<String>;
}

/// Asks the upstream spectator server for its version.
#[derive(Clone)]
pub struct HttpVersionSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVersionSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), VERSION_PATH)
    }
}

#[async_trait]
impl VersionSource for HttpVersionSource {
    async fn fetch_version(&self) -> Option<String> {
        let url = self.endpoint();
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(url = %url, error = %error, "upstream version request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "upstream version request returned an error");
            return None;
        }

        match response.text().await {
            Ok(body) if !body.trim().is_empty() => Some(body.trim().to_string()),
            Ok(_) => {
                warn!(url = %url, "upstream version response was empty");
                None
            }
            Err(error) => {
                warn!(url = %url, error = %error, "failed to read upstream version response");
                None
            }
        }
    }
}
