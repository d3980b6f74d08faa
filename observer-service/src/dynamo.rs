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

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{Client as DynamoClient, types::AttributeValue};
use chrono::Utc;
use replay_observer::{ObserverError, SessionCache, validate_ttl};
use tracing::info;

const KEY_ATTRIBUTE: &str = "cache_key";
const VALUE_ATTRIBUTE: &str = "value";
/// Epoch seconds; configure it as the table's TTL attribute so DynamoDB
/// eventually deletes expired items.
const EXPIRES_AT_ATTRIBUTE: &str = "expires_at";

/// Session cache kept in a DynamoDB table shared by every observer instance.
///
/// DynamoDB deletes expired items lazily, so reads also check `expires_at`.
#[derive(Clone)]
pub struct DynamoSessionCache {
    client: DynamoClient,
    table_name: String,
}

impl DynamoSessionCache {
    pub async fn from_env(table_name: String) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Ok(endpoint) = std::env::var("DYNAMODB_ENDPOINT") {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        info!(table_name = %table_name, "observer DynamoDB session cache enabled");
        Self {
            client: DynamoClient::new(&config),
            table_name,
        }
    }
}

#[async_trait]
impl SessionCache for DynamoSessionCache {
    async fn has(&self, key: &str) -> Result<bool, ObserverError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ObserverError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, AttributeValue::S(key.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|error| ObserverError::Cache(format!("DynamoDB get_item failed: {error:?}")))?;

        Ok(output
            .item()
            .and_then(|item| live_value(item, Utc::now().timestamp())))
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<i64>,
    ) -> Result<(), ObserverError> {
        let ttl_seconds = validate_ttl(ttl_seconds)?;
        let item = build_item(key, value, ttl_seconds, Utc::now().timestamp());

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|error| ObserverError::Cache(format!("DynamoDB put_item failed: {error:?}")))?;
        Ok(())
    }
}

fn build_item(
    key: &str,
    value: &str,
    ttl_seconds: Option<i64>,
    now: i64,
) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(
        KEY_ATTRIBUTE.to_string(),
        AttributeValue::S(key.to_string()),
    );
    item.insert(
        VALUE_ATTRIBUTE.to_string(),
        AttributeValue::S(value.to_string()),
    );
    if let Some(ttl) = ttl_seconds {
        item.insert(
            EXPIRES_AT_ATTRIBUTE.to_string(),
            AttributeValue::N(now.saturating_add(ttl).to_string()),
        );
    }
    item
}

fn live_value(item: &HashMap<String, AttributeValue>, now: i64) -> Option<String> {
    let expired = item
        .get(EXPIRES_AT_ATTRIBUTE)
        .and_then(|value| value.as_n().ok())
        .and_then(|value| value.parse::<i64>().ok())
        .is_some_and(|expires_at| expires_at <= now);
    if expired {
        return None;
    }

    item.get(VALUE_ATTRIBUTE)
        .and_then(|value| value.as_s().ok())
        .cloned()
}
