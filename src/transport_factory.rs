use crate::env_source::{EnvSource, ProcessEnv};
use crate::transport_config::{
    LogglyTransportOptions, SlackWebhookTransportOptions, TransportConfig, DEFAULT_LOGGLY_LEVEL,
};

pub const LOGGLY_SUBDOMAIN: &str = "LOGGLY_SUBDOMAIN";
pub const LOGGLY_TOKEN: &str = "LOGGLY_TOKEN";
pub const LOGGLY_LEVEL: &str = "LOGGLY_LEVEL";
pub const SLACK_LOGGER_WEBHOOK: &str = "SLACK_LOGGER_WEBHOOK";
pub const SLACK_LOGGER_CHANNEL: &str = "SLACK_LOGGER_CHANNEL";
pub const SLACK_LOGGER_USERNAME: &str = "SLACK_LOGGER_USERNAME";
pub const SLACK_LOGGER_ICON_URL: &str = "SLACK_LOGGER_ICON_URL";

/// Builds transport settings from environment variables.
///
/// Every call reads the source again; nothing is cached. None of the
/// builders validate credentials: a missing Loggly token still yields
/// options, and the transport reports the problem when it tries to send.
#[derive(Debug, Clone, Default)]
pub struct TransportFactory<E = ProcessEnv> {
    env: E,
}

impl TransportFactory<ProcessEnv> {
    /// A factory over the process environment, primed from `.env` if present.
    pub fn from_env() -> Self {
        TransportFactory::new(ProcessEnv::with_dotenv())
    }
}

impl<E: EnvSource> TransportFactory<E> {
    pub fn new(env: E) -> Self {
        TransportFactory { env }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Loggly bulk options. Always present.
    pub fn loggly_options(&self) -> LogglyTransportOptions {
        LogglyTransportOptions::new(
            self.env.var(LOGGLY_SUBDOMAIN),
            self.env.var(LOGGLY_TOKEN),
            self.env
                .non_empty_var(LOGGLY_LEVEL)
                .unwrap_or_else(|| DEFAULT_LOGGLY_LEVEL.to_string()),
        )
    }

    /// Slack webhook options, or `None` when no webhook URL is configured.
    pub fn slack_webhook_options(&self) -> Option<SlackWebhookTransportOptions> {
        let webhook_url = self.env.non_empty_var(SLACK_LOGGER_WEBHOOK)?;

        SlackWebhookTransportOptions::new(
            webhook_url,
            self.env.var(SLACK_LOGGER_CHANNEL),
            self.env.var(SLACK_LOGGER_USERNAME),
            self.env.var(SLACK_LOGGER_ICON_URL),
        )
    }

    /// All configured transports, Loggly first.
    pub fn transport_configs(&self) -> Vec<TransportConfig> {
        let mut configs = vec![TransportConfig::Loggly(self.loggly_options())];
        if let Some(slack) = self.slack_webhook_options() {
            configs.push(TransportConfig::SlackWebhook(slack));
        }
        configs
    }
}
