#![allow(dead_code)]

use std::time::Duration;
use winston_env::{LogglyTransportOptions, MapEnv, SlackWebhookTransportOptions};

pub fn env(vars: &[(&str, &str)]) -> MapEnv {
    vars.iter().copied().collect()
}

pub fn loggly_options(token: Option<&str>) -> LogglyTransportOptions {
    LogglyTransportOptions::new(
        Some("acme".to_string()),
        token.map(str::to_string),
        "info".to_string(),
    )
}

pub fn slack_options(webhook_url: String, channel: Option<&str>) -> SlackWebhookTransportOptions {
    SlackWebhookTransportOptions::new(webhook_url, channel.map(str::to_string), None, None)
        .expect("webhook url is not empty")
}

/// Long enough that only an explicit flush or a full batch triggers a send.
pub const NEVER: Duration = Duration::from_secs(3600);
