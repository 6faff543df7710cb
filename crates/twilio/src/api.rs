//! Twilio Messages REST client.

use std::time::Duration;

use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
};

use textline_relay::SmsGateway;

use crate::error::{Error, Result};

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Request-scoped timeout for every Messages API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TwilioApi {
    client: reqwest::Client,
    account_sid: String,
    auth_token: Secret<String>,
}

impl TwilioApi {
    pub fn new(account_sid: String, auth_token: Secret<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::from_transport)?;
        Ok(Self {
            client,
            account_sid,
            auth_token,
        })
    }

    fn messages_url(&self) -> String {
        format!("{API_BASE}/Accounts/{}/Messages.json", self.account_sid)
    }

    async fn create_message(&self, from: &str, to: &str, body: &str) -> Result<()> {
        let form = [("From", from), ("To", to), ("Body", body)];
        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&form)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SmsGateway for TwilioApi {
    async fn send(&self, from: &str, to: &str, body: &str) -> anyhow::Result<()> {
        Ok(self.create_message(from, to, body).await?)
    }
}
