// Home Assistant history client
use crate::application::history_source::{HistoryBatch, HistorySource};
use crate::domain::sample::HistoryPoint;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("history request returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed history response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One state change. With `minimal_response` only the first entry of each
/// entity list carries the entity id.
#[derive(Debug, Deserialize)]
struct StateChange {
    #[serde(default)]
    entity_id: Option<String>,
    state: String,
    #[serde(default)]
    last_changed: Option<DateTime<Utc>>,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct HomeAssistantHistory {
    host: String,
    token: String,
    client: reqwest::Client,
}

impl HomeAssistantHistory {
    pub fn new(host: String, token: String) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    fn build_history_url(
        &self,
        entity_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> String {
        format!(
            "{}/api/history/period/{}?filter_entity_id={}&end_time={}&minimal_response&no_attributes&significant_changes_only=0",
            self.host,
            urlencoding::encode(&timestamp(start)),
            urlencoding::encode(&entity_ids.join(",")),
            urlencoding::encode(&timestamp(end)),
        )
    }

    async fn execute(&self, url: &str) -> Result<String, HistoryError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(HistoryError::Status { status, body });
        }
        Ok(body)
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Group the per-entity lists by entity id. Lists without an id are skipped.
fn decode_history(body: &str) -> Result<HistoryBatch, HistoryError> {
    let lists: Vec<Vec<StateChange>> = serde_json::from_str(body)?;
    let mut batch = HistoryBatch::new();

    for changes in lists {
        let Some(entity_id) = changes.iter().find_map(|c| c.entity_id.clone()) else {
            tracing::debug!("Skipping history list without an entity id");
            continue;
        };

        let points = changes.into_iter().filter_map(|change| {
            let at = change.last_changed.or(change.last_updated)?;
            Some(HistoryPoint::new(at, change.state))
        });
        batch.entry(entity_id).or_default().extend(points);
    }

    Ok(batch)
}

#[async_trait]
impl HistorySource for HomeAssistantHistory {
    async fn fetch_history(
        &self,
        entity_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HistoryBatch> {
        if entity_ids.is_empty() {
            return Ok(HistoryBatch::new());
        }

        let url = self.build_history_url(entity_ids, start, end);
        tracing::debug!("Requesting history for {} entities", entity_ids.len());

        let body = self
            .execute(&url)
            .await
            .context("Failed to fetch Home Assistant history")?;
        let batch = decode_history(&body).context("Failed to parse Home Assistant history")?;

        tracing::debug!(
            "Received {} points across {} entities",
            batch.values().map(Vec::len).sum::<usize>(),
            batch.len()
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_build_history_url() {
        let client = HomeAssistantHistory::new("http://ha.local:8123/".into(), "token".into());
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let url = client.build_history_url(
            &["sensor.outdoor_temp".to_string(), "sensor.wind_speed".to_string()],
            start,
            end,
        );

        assert_eq!(
            url,
            "http://ha.local:8123/api/history/period/2024-03-01T00%3A00%3A00Z\
             ?filter_entity_id=sensor.outdoor_temp%2Csensor.wind_speed\
             &end_time=2024-03-01T12%3A00%3A00Z\
             &minimal_response&no_attributes&significant_changes_only=0"
        );
    }

    #[test]
    fn test_decode_minimal_response() {
        let body = r#"[
            [
                {"entity_id": "sensor.outdoor_temp", "state": "61.2", "last_changed": "2024-03-01T00:00:00+00:00", "last_updated": "2024-03-01T00:00:00+00:00"},
                {"state": "unavailable", "last_changed": "2024-03-01T00:05:00.123456+00:00"},
                {"state": "62.0", "last_changed": "2024-03-01T00:10:00+00:00"}
            ],
            [
                {"entity_id": "sensor.wind_speed", "state": "4.1", "last_updated": "2024-03-01T00:00:00Z"}
            ],
            []
        ]"#;

        let batch = decode_history(body).unwrap();
        assert_eq!(batch.len(), 2);

        let temp = &batch["sensor.outdoor_temp"];
        assert_eq!(temp.len(), 3);
        assert_eq!(temp[1].state, "unavailable");
        assert_eq!(temp[2].timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 0, 10, 0).unwrap());
        assert_eq!(batch["sensor.wind_speed"][0].state, "4.1");
    }

    #[test]
    fn test_decode_rejects_malformed_body() {
        assert!(matches!(
            decode_history(r#"{"message": "401: Unauthorized"}"#),
            Err(HistoryError::Decode(_))
        ));
    }
}
