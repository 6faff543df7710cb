use std::sync::Arc;

use {
    axum::{
        Router,
        routing::{get, post},
    },
    tokio::net::TcpListener,
    tracing::{debug, info},
};

use {
    textline_directory::SqliteDirectory,
    textline_relay::{BridgeIdentity, Relay},
    textline_slack::SlackApi,
    textline_twilio::TwilioApi,
};

use crate::{
    config::Config,
    slack_routes::{actions_handler, commands_handler, events_handler},
    state::AppState,
    trigger_routes::trigger_handler,
    twilio_routes::inbound_sms_handler,
};

/// Build the bridge router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping_handler))
        .route("/twilio", post(inbound_sms_handler))
        .route("/api/trigger", post(trigger_handler))
        .route("/slack/events", post(events_handler))
        .route("/slack/actions", post(actions_handler))
        .route("/slack/commands", post(commands_handler))
        .with_state(state)
}

/// Wire the clients and serve the HTTP surface until shutdown.
pub async fn start(config: Config) -> anyhow::Result<()> {
    let directory = Arc::new(SqliteDirectory::connect(&config.database_path).await?);
    let chat = Arc::new(SlackApi::new(
        config.slack_bot_token.clone(),
        config.slack_user_token.clone(),
    )?);
    let sms = Arc::new(TwilioApi::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
    )?);

    let relay = Arc::new(Relay::new(
        directory,
        chat,
        sms,
        BridgeIdentity {
            user_id: config.slack_bot_user_id.clone(),
            bot_id: config.slack_bot_id.clone(),
        },
        config.trigger_api_token.clone(),
    ));

    let state = AppState {
        relay,
        signing_secret: config.slack_signing_secret.clone(),
    };

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(port = config.port, "bridge listening");
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}

async fn ping_handler() -> &'static str {
    debug!("ping");
    "pong"
}
