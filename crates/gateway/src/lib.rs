//! HTTP surface of the bridge: webhook endpoints, configuration, and wiring.

pub mod config;
pub mod server;
pub mod slack_routes;
pub mod state;
pub mod trigger_routes;
pub mod twilio_routes;

pub use {config::Config, server::build_app, state::AppState};
