//! Messaging gateway — the Twilio WhatsApp webhook plus status endpoints.
//!
//! Inbound text is lower-cased and handed to the [`SurveyManager`]; the reply
//! goes back synchronously as TwiML. Processing failures become a bare 500.

pub mod initial;
pub mod twiml;

pub use initial::spawn_initial_prompt;

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::Deserialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::survey::SurveyManager;

/// Plain-text answer for `GET /whatsapp`.
pub const WEBHOOK_EXPLAINER: &str = "This endpoint receives WhatsApp messages from Twilio. \
     Configure it as the incoming-message webhook (HTTP POST) for your WhatsApp sender.";

/// Shared state for gateway routes.
#[derive(Clone)]
pub struct GatewayState {
    pub survey: Arc<SurveyManager>,
}

/// Fields we read from Twilio's form-encoded webhook. Everything else is
/// ignored.
#[derive(Debug, Default, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "Body", default)]
    pub body: Option<String>,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
}

/// Build the gateway router.
pub fn gateway_routes(survey: Arc<SurveyManager>) -> Router {
    let state = GatewayState { survey };

    Router::new()
        .route("/whatsapp", get(webhook_info).post(webhook_message))
        .route("/health", get(health))
        .route("/api/survey/status", get(survey_status))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Webhook ─────────────────────────────────────────────────────────────

/// GET /whatsapp
async fn webhook_info() -> &'static str {
    WEBHOOK_EXPLAINER
}

/// POST /whatsapp
///
/// A body that fails to decode is treated as an empty message.
async fn webhook_message(
    State(state): State<GatewayState>,
    form: Result<Form<InboundMessage>, FormRejection>,
) -> Response {
    let inbound = match form {
        Ok(Form(inbound)) => inbound,
        Err(rejection) => {
            debug!(%rejection, "Unreadable webhook body, treating as empty message");
            InboundMessage::default()
        }
    };
    let text = normalize_text(inbound.body.as_deref());

    info!(
        from = inbound.from.as_deref().unwrap_or("unknown"),
        len = text.len(),
        "WhatsApp message received"
    );

    match state.survey.process_message(&text).await {
        Ok(reply) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, twiml::TWIML_CONTENT_TYPE)],
            twiml::message_response(&reply.into_text()),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to process WhatsApp message");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn normalize_text(body: Option<&str>) -> String {
    body.unwrap_or_default().trim().to_lowercase()
}

// ── Status ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "ring-coach"
    }))
}

/// GET /api/survey/status
async fn survey_status(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(state.survey.status().await)
}
