/// Gateway bridge event routes
///
/// Each route takes one event and answers with the deliveries the bridge
/// should perform, in order.
use crate::{
    error::{Result, ServerError},
    inbound::{InteractionEvent, MessageEvent},
    render::Delivery,
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use cadence_core::EngineEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    pub deliveries: Vec<Delivery>,
}

impl From<Vec<Delivery>> for EventResponse {
    fn from(deliveries: Vec<Delivery>) -> Self {
        Self { deliveries }
    }
}

fn reject(rejection: JsonRejection) -> ServerError {
    ServerError::BadRequest(rejection.body_text())
}

/// POST /api/events/message - A chat message was posted
pub async fn message(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<MessageEvent>, JsonRejection>,
) -> Result<Json<EventResponse>> {
    let Json(event) = payload.map_err(reject)?;
    let deliveries = app_state.controller.handle_message(event).await;
    Ok(Json(deliveries.into()))
}

/// POST /api/events/interaction - A button was pressed
pub async fn interaction(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<InteractionEvent>, JsonRejection>,
) -> Result<Json<EventResponse>> {
    let Json(event) = payload.map_err(reject)?;
    let deliveries = app_state.controller.handle_interaction(event).await;
    Ok(Json(deliveries.into()))
}

/// POST /api/events/engine - The audio node reported a player or node event
pub async fn engine(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<EngineEvent>, JsonRejection>,
) -> Result<Json<EventResponse>> {
    let Json(event) = payload.map_err(reject)?;
    let deliveries = app_state.controller.handle_engine_event(event).await;
    Ok(Json(deliveries.into()))
}
