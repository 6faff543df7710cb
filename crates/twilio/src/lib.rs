//! Twilio surface of the bridge: the Messages REST client.

pub mod api;
pub mod error;

pub use {
    api::TwilioApi,
    error::{Error, Result},
};
