//! Chat-platform webhooks: events, interactive actions, slash commands.
//!
//! The platform expects an acknowledgment within seconds, so every handler
//! answers before any directory or external-API work; dispatch runs in a
//! detached task and is fire-and-forget from the platform's perspective.

use std::sync::Arc;

use {
    axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
    },
    secrecy::ExposeSecret,
    tracing::{debug, warn},
};

use {
    textline_relay::Relay,
    textline_slack::{InboundEvent, PushPayload, SlashCommand, parse_interaction, verify_signature},
};

use crate::state::AppState;

fn verified(state: &AppState, headers: &HeaderMap, body: &str) -> bool {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    verify_signature(
        state.signing_secret.expose_secret(),
        &header("x-slack-request-timestamp"),
        body,
        &header("x-slack-signature"),
    )
}

fn form_field(body: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(body.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// `POST /slack/events`: Events API callbacks.
pub async fn events_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !verified(&state, &headers, &body) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let payload: serde_json::Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "malformed event payload");
            return StatusCode::BAD_REQUEST.into_response();
        },
    };

    match PushPayload::parse(&payload) {
        // The handshake is the one payload answered with content.
        PushPayload::UrlVerification { challenge } => challenge.into_response(),
        PushPayload::EventCallback { event } => {
            let relay = Arc::clone(&state.relay);
            tokio::spawn(async move { dispatch_event(relay, event).await });
            StatusCode::OK.into_response()
        },
        PushPayload::Unknown { kind } => {
            debug!(kind, "ignoring unknown push payload");
            StatusCode::OK.into_response()
        },
    }
}

async fn dispatch_event(relay: Arc<Relay>, event: InboundEvent) {
    match event {
        InboundEvent::Message {
            channel_id,
            text,
            subtype,
        } => {
            relay
                .on_channel_message(&channel_id, &text, subtype.as_deref())
                .await;
        },
        InboundEvent::ChannelRename { channel_id, name } => {
            relay.on_channel_rename(&channel_id, &name).await;
        },
        InboundEvent::ReactionAdded {
            channel_id,
            item_ts,
            item_type,
            reaction,
        } => {
            relay
                .on_reaction(&channel_id, &item_ts, &item_type, &reaction)
                .await;
        },
        InboundEvent::Unknown { kind } => debug!(kind, "ignoring unknown event"),
    }
}

/// `POST /slack/actions`: interactivity payloads (button clicks, message
/// actions).
pub async fn actions_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !verified(&state, &headers, &body) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let Some(payload) = form_field(&body, "payload") else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    match parse_interaction(&payload) {
        Ok(action) => {
            let relay = Arc::clone(&state.relay);
            tokio::spawn(async move { relay.on_operator_action(action).await });
        },
        // Ack regardless: a payload we cannot read is not the platform's
        // problem to retry.
        Err(e) => warn!(error = %e, "undispatchable interaction"),
    }
    StatusCode::OK.into_response()
}

/// `POST /slack/commands`: slash commands.
pub async fn commands_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if !verified(&state, &headers, &body) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let field = |name: &str| form_field(&body, name).unwrap_or_default();
    let command = SlashCommand::parse(&field("command"), &field("channel_id"), &field("text"));

    let relay = Arc::clone(&state.relay);
    tokio::spawn(async move {
        match command {
            SlashCommand::Respond { channel_id } => {
                if let Err(e) = relay.open_response_picker(&channel_id).await {
                    warn!(channel_id, error = %e, "response picker failed");
                }
            },
            SlashCommand::Chat { channel_id, text } => {
                relay.chat_command(&channel_id, &text).await;
            },
            SlashCommand::Unknown { command } => debug!(command, "ignoring unknown command"),
        }
    });

    StatusCode::OK.into_response()
}
