use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tag attached to every event sent to Loggly.
pub const LOGGLY_TAG: &str = "glee2-backend";
pub const DEFAULT_LOGGLY_LEVEL: &str = "info";

pub const SLACK_LEVEL: &str = "error";
pub const DEFAULT_SLACK_USERNAME: &str = "Logger";
pub const DEFAULT_SLACK_ICON_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/3/37/Emblem-important-red.svg/500px-Emblem-important-red.svg.png";

/// Settings for the Loggly bulk transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogglyTransportOptions {
    pub subdomain: Option<String>,
    pub token: Option<String>,
    pub tags: BTreeSet<String>,
    pub level: String,
    pub is_bulk: bool,
    pub json: bool,
}

impl LogglyTransportOptions {
    /// Options with the fixed tag set, bulk mode and JSON payloads.
    pub fn new(subdomain: Option<String>, token: Option<String>, level: String) -> Self {
        LogglyTransportOptions {
            subdomain,
            token,
            tags: BTreeSet::from([LOGGLY_TAG.to_string()]),
            level,
            is_bulk: true,
            json: true,
        }
    }

    /// Tags in the form the Loggly endpoints expect in their path.
    pub fn tag_path(&self) -> String {
        self.tags.iter().cloned().collect::<Vec<_>>().join(",")
    }
}

/// Settings for the Slack webhook transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackWebhookTransportOptions {
    pub level: String,
    pub webhook_url: String,
    pub channel: Option<String>,
    pub username: String,
    pub icon_url: String,
}

impl SlackWebhookTransportOptions {
    /// Returns `None` when `webhook_url` is empty; the transport needs one to
    /// post anywhere.
    pub fn new(
        webhook_url: String,
        channel: Option<String>,
        username: Option<String>,
        icon_url: Option<String>,
    ) -> Option<Self> {
        if webhook_url.is_empty() {
            return None;
        }

        Some(SlackWebhookTransportOptions {
            level: SLACK_LEVEL.to_string(),
            webhook_url,
            channel,
            username: username
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_SLACK_USERNAME.to_string()),
            icon_url: icon_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_SLACK_ICON_URL.to_string()),
        })
    }
}

/// One configured outbound transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportConfig {
    Loggly(LogglyTransportOptions),
    SlackWebhook(SlackWebhookTransportOptions),
}

impl TransportConfig {
    pub fn level(&self) -> &str {
        match self {
            TransportConfig::Loggly(options) => &options.level,
            TransportConfig::SlackWebhook(options) => &options.level,
        }
    }
}

impl From<LogglyTransportOptions> for TransportConfig {
    fn from(options: LogglyTransportOptions) -> Self {
        TransportConfig::Loggly(options)
    }
}

impl From<SlackWebhookTransportOptions> for TransportConfig {
    fn from(options: SlackWebhookTransportOptions) -> Self {
        TransportConfig::SlackWebhook(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loggly_options_fixed_fields() {
        let options = LogglyTransportOptions::new(None, None, "warn".into());

        assert_eq!(options.tags, BTreeSet::from([LOGGLY_TAG.to_string()]));
        assert!(options.is_bulk);
        assert!(options.json);
        assert_eq!(options.tag_path(), "glee2-backend");
    }

    #[test]
    fn test_slack_options_require_webhook() {
        assert!(SlackWebhookTransportOptions::new(String::new(), None, None, None).is_none());
    }

    #[test]
    fn test_slack_options_defaults() {
        let options =
            SlackWebhookTransportOptions::new("https://hooks.example/x".into(), None, None, None)
                .unwrap();

        assert_eq!(options.level, "error");
        assert_eq!(options.username, DEFAULT_SLACK_USERNAME);
        assert_eq!(options.icon_url, DEFAULT_SLACK_ICON_URL);
        assert_eq!(options.channel, None);
    }

    #[test]
    fn test_transport_config_serializes_with_kind_tag() {
        let config: TransportConfig = LogglyTransportOptions::new(
            Some("acme".into()),
            Some("tok123".into()),
            "info".into(),
        )
        .into();

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["kind"], "loggly");
        assert_eq!(value["subdomain"], "acme");
        assert_eq!(value["tags"], serde_json::json!(["glee2-backend"]));

        let back: TransportConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, config);
    }
}
