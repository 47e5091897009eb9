use crate::error::{Result, TransportError};
use crate::logger_levels::LoggerLevels;
use crate::transport_config::SlackWebhookTransportOptions;
use logform::LogInfo;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;
use winston_transport::Transport;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts each accepted entry to a Slack incoming webhook.
pub struct SlackWebhookTransport {
    options: SlackWebhookTransportOptions,
    levels: LoggerLevels,
    client: Client,
}

impl SlackWebhookTransport {
    pub fn new(options: SlackWebhookTransportOptions) -> Result<Self> {
        Self::builder(options).build()
    }

    pub fn builder(options: SlackWebhookTransportOptions) -> SlackWebhookTransportBuilder {
        SlackWebhookTransportBuilder::new(options)
    }

    pub fn options(&self) -> &SlackWebhookTransportOptions {
        &self.options
    }

    pub fn level(&self) -> &str {
        &self.options.level
    }

    /// The message body for `info`. Metadata, if any, is appended to the
    /// text as a JSON code block.
    pub fn payload(&self, info: &LogInfo) -> Result<Value> {
        let mut text = format!("{}: {}", info.level, info.message);
        if !info.meta.is_empty() {
            let meta = serde_json::to_string_pretty(&info.meta)?;
            text.push_str(&format!("\n```{}```", meta));
        }

        let mut payload = json!({
            "text": text,
            "username": self.options.username,
            "icon_url": self.options.icon_url,
        });
        if let Some(channel) = &self.options.channel {
            payload["channel"] = json!(channel);
        }
        Ok(payload)
    }

    fn send(&self, payload: &Value) -> Result<()> {
        let response = self
            .client
            .post(&self.options.webhook_url)
            .json(payload)
            .send()?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status {
                service: "Slack",
                status,
                body: response.text().unwrap_or_default(),
            })
        }
    }
}

impl Transport<LogInfo> for SlackWebhookTransport {
    fn log(&self, info: LogInfo) {
        if !self.levels.is_enabled(&self.options.level, &info.level) {
            return;
        }

        if let Err(e) = self.payload(&info).and_then(|payload| self.send(&payload)) {
            log::warn!("[winston_env] failed to send Slack notification: {}", e);
        }
    }

    fn flush(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

pub struct SlackWebhookTransportBuilder {
    options: SlackWebhookTransportOptions,
    timeout: Duration,
}

impl SlackWebhookTransportBuilder {
    pub fn new(options: SlackWebhookTransportOptions) -> Self {
        Self {
            options,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<SlackWebhookTransport> {
        let client = Client::builder().timeout(self.timeout).build()?;

        Ok(SlackWebhookTransport {
            options: self.options,
            levels: LoggerLevels::default(),
            client,
        })
    }
}
