//! Inbound SMS webhook.

use {
    axum::{Form, extract::State, http::StatusCode},
    serde::Deserialize,
};

use crate::state::AppState;

/// Form body posted by the SMS transport for each inbound message.
#[derive(Debug, Deserialize)]
pub struct InboundSms {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Body", default)]
    pub body: String,
}

/// `POST /twilio`: relay one inbound SMS into its channel.
///
/// The transport retries on failure-shaped responses, so this always answers
/// 200 with an empty body; relay errors are logged and dropped internally.
pub async fn inbound_sms_handler(
    State(state): State<AppState>,
    Form(sms): Form<InboundSms>,
) -> StatusCode {
    state.relay.on_inbound_sms(&sms.from, &sms.to, &sms.body).await;
    StatusCode::OK
}
