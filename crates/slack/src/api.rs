//! Minimal Slack Web API wrapper.
//!
//! Channel management runs under the workspace user token (private channels
//! the bot could not create itself); relay posts and picker messages run
//! under the bot token.

use std::time::Duration;

use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, de::DeserializeOwned},
    serde_json::json,
};

use textline_relay::{ChannelHandle, ChatApi, ChatPost, HistoryMessage, PickerItem};

use crate::{
    blocks,
    error::{Error, Result},
};

const API_BASE: &str = "https://slack.com/api";

/// Request-scoped timeout for every Web API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelEnvelope {
    ok: bool,
    error: Option<String>,
    channel: Option<ChannelObject>,
}

#[derive(Debug, Deserialize)]
struct ChannelObject {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    messages: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    ts: String,
    #[serde(default)]
    text: String,
    subtype: Option<String>,
    bot_id: Option<String>,
}

fn ensure_ok(ok: bool, error: Option<String>) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::api(error.unwrap_or_else(|| "unknown".into())))
    }
}

pub struct SlackApi {
    client: reqwest::Client,
    bot_token: Secret<String>,
    user_token: Secret<String>,
}

impl SlackApi {
    pub fn new(bot_token: Secret<String>, user_token: Secret<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::from_transport)?;
        Ok(Self {
            client,
            bot_token,
            user_token,
        })
    }

    async fn post_api<T: DeserializeOwned>(
        &self,
        method: &str,
        token: &Secret<String>,
        body: &serde_json::Value,
    ) -> Result<T> {
        let resp = self
            .client
            .post(format!("{API_BASE}/{method}"))
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(Error::from_transport)?;
        resp.json().await.map_err(Error::from_transport)
    }

    async fn send_message(&self, body: serde_json::Value, token: &Secret<String>) -> Result<()> {
        let parsed: ApiEnvelope = self.post_api("chat.postMessage", token, &body).await?;
        ensure_ok(parsed.ok, parsed.error)
    }
}

#[async_trait]
impl ChatApi for SlackApi {
    async fn create_channel(&self, name: &str) -> anyhow::Result<ChannelHandle> {
        let body = json!({ "name": name, "is_private": true });
        let parsed: ChannelEnvelope = self
            .post_api("conversations.create", &self.user_token, &body)
            .await?;
        ensure_ok(parsed.ok, parsed.error)?;
        let channel = parsed
            .channel
            .ok_or_else(|| Error::Payload("conversations.create returned no channel".into()))?;
        Ok(ChannelHandle {
            id: channel.id,
            name: channel.name,
        })
    }

    async fn invite(&self, channel_id: &str, user_id: &str) -> anyhow::Result<()> {
        let body = json!({ "channel": channel_id, "users": user_id });
        let parsed: ApiEnvelope = self
            .post_api("conversations.invite", &self.user_token, &body)
            .await?;
        Ok(ensure_ok(parsed.ok, parsed.error)?)
    }

    async fn post_message(&self, post: &ChatPost) -> anyhow::Result<()> {
        let mut body = json!({ "channel": post.channel_id, "text": post.text });
        if let Some(ref username) = post.username {
            body["username"] = json!(username);
        }
        if let Some(ref icon_url) = post.icon_url {
            body["icon_url"] = json!(icon_url);
        }
        Ok(self.send_message(body, &self.bot_token).await?)
    }

    async fn post_as_operator(&self, channel_id: &str, text: &str) -> anyhow::Result<()> {
        let body = json!({ "channel": channel_id, "text": text, "as_user": true });
        Ok(self.send_message(body, &self.user_token).await?)
    }

    async fn post_picker(&self, channel_id: &str, items: &[PickerItem]) -> anyhow::Result<()> {
        let body = json!({
            "channel": channel_id,
            "blocks": blocks::response_picker(items),
        });
        Ok(self.send_message(body, &self.bot_token).await?)
    }

    async fn delete_message(&self, channel_id: &str, ts: &str) -> anyhow::Result<()> {
        let body = json!({ "channel": channel_id, "ts": ts });
        let parsed: ApiEnvelope = self.post_api("chat.delete", &self.bot_token, &body).await?;
        Ok(ensure_ok(parsed.ok, parsed.error)?)
    }

    async fn history(&self, channel_id: &str) -> anyhow::Result<Vec<HistoryMessage>> {
        let resp = self
            .client
            .get(format!("{API_BASE}/conversations.history"))
            .bearer_auth(self.user_token.expose_secret())
            .query(&[("channel", channel_id)])
            .send()
            .await
            .map_err(Error::from_transport)?;
        let parsed: HistoryEnvelope = resp.json().await.map_err(Error::from_transport)?;
        ensure_ok(parsed.ok, parsed.error)?;

        Ok(parsed
            .messages
            .into_iter()
            .map(|m| HistoryMessage {
                ts: m.ts,
                text: m.text,
                subtype: m.subtype,
                bot_id: m.bot_id,
            })
            .collect())
    }
}
