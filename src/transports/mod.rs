mod loggly;
mod slack_webhook;

use crate::env_source::EnvSource;
use crate::error::Result;
use crate::transport_config::TransportConfig;
use crate::transport_factory::TransportFactory;
use logform::LogInfo;
use std::sync::Arc;

pub use loggly::{LogglyTransport, LogglyTransportBuilder};
pub use slack_webhook::{SlackWebhookTransport, SlackWebhookTransportBuilder};
pub use winston_transport::Transport;

pub type SharedTransport = Arc<dyn Transport<LogInfo> + Send + Sync>;

impl TransportConfig {
    /// Builds the transport these options describe with its default tunables.
    pub fn into_transport(self) -> Result<SharedTransport> {
        let transport: SharedTransport = match self {
            TransportConfig::Loggly(options) => Arc::new(LogglyTransport::new(options)?),
            TransportConfig::SlackWebhook(options) => {
                Arc::new(SlackWebhookTransport::new(options)?)
            }
        };
        Ok(transport)
    }
}

/// Every transport the environment configures, paired with its minimum
/// level so the logger can filter per transport.
pub fn build_transports<E: EnvSource>(
    factory: &TransportFactory<E>,
) -> Result<Vec<(String, SharedTransport)>> {
    factory
        .transport_configs()
        .into_iter()
        .map(|config| {
            let level = config.level().to_string();
            Ok((level, config.into_transport()?))
        })
        .collect()
}
