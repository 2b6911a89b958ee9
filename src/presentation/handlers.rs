// HTTP request handlers
use crate::application::error::ConsoleError;
use crate::domain::console::ConsoleSnapshot;
use crate::domain::geometry::{Plot, TrendChart};
use crate::infrastructure::event_stream::snapshot_stream_response;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct StateUpdate {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Hosts push either a single state or a batch
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StatePayload {
    One(StateUpdate),
    Many(Vec<StateUpdate>),
}

impl StatePayload {
    fn into_updates(self) -> Vec<StateUpdate> {
        match self {
            StatePayload::One(update) => vec![update],
            StatePayload::Many(updates) => updates,
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = match self {
            ConsoleError::UnknownChannel(_) => StatusCode::NOT_FOUND,
            ConsoleError::ChannelDisabled(_) | ConsoleError::NoHistory(_) => StatusCode::CONFLICT,
            ConsoleError::Stopped => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Latest console frame
pub async fn get_console(State(state): State<Arc<AppState>>) -> Json<ConsoleSnapshot> {
    Json(state.console.snapshot().as_ref().clone())
}

/// Live console frames as server-sent events
pub async fn stream_console(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    snapshot_stream_response(state.console.subscribe())
}

/// Inbound push of current entity states
pub async fn push_states(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StatePayload>,
) -> Result<StatusCode, ConsoleError> {
    for update in payload.into_updates() {
        state
            .console
            .update(update.entity_id, update.state, update.unit)
            .await?;
    }
    Ok(StatusCode::ACCEPTED)
}

pub async fn start_console(State(state): State<Arc<AppState>>) -> Result<StatusCode, ConsoleError> {
    state.console.start().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn stop_console(State(state): State<Arc<AppState>>) -> Result<StatusCode, ConsoleError> {
    state.console.stop().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Open a channel's trend view
pub async fn select_channel(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConsoleSnapshot>, ConsoleError> {
    state.console.select(id).await?;
    Ok(Json(state.console.snapshot().as_ref().clone()))
}

pub async fn interact(State(state): State<Arc<AppState>>) -> Result<StatusCode, ConsoleError> {
    state.console.interact().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn close_trend(State(state): State<Arc<AppState>>) -> Result<StatusCode, ConsoleError> {
    state.console.close().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Full trend chart for any history channel, open or not
pub async fn channel_trend(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Plot<TrendChart>>, ConsoleError> {
    Ok(Json(state.console.trend(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_payload_accepts_single_and_batch() {
        let one: StatePayload = serde_json::from_str(
            r#"{"entity_id": "sensor.outdoor_temp", "state": "71.3", "unit": "°F"}"#,
        )
        .unwrap();
        let updates = one.into_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].unit.as_deref(), Some("°F"));

        let many: StatePayload = serde_json::from_str(
            r#"[{"entity_id": "sensor.a", "state": "1"}, {"entity_id": "sensor.b", "state": "unknown"}]"#,
        )
        .unwrap();
        let updates = many.into_updates();
        assert_eq!(updates.len(), 2);
        assert!(updates[1].unit.is_none());
    }

    #[test]
    fn test_console_error_status_codes() {
        let status = |e: ConsoleError| e.into_response().status();
        assert_eq!(status(ConsoleError::UnknownChannel("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(ConsoleError::ChannelDisabled("x".into())), StatusCode::CONFLICT);
        assert_eq!(status(ConsoleError::NoHistory("x".into())), StatusCode::CONFLICT);
        assert_eq!(status(ConsoleError::Stopped), StatusCode::SERVICE_UNAVAILABLE);
    }
}
