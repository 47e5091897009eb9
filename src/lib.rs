mod env_source;
mod error;
mod logger_levels;
mod transport_config;
mod transport_factory;
pub mod transports;

pub use env_source::{EnvSource, MapEnv, ProcessEnv};
pub use error::{Result, TransportError};
pub use logform as format;
pub use logger_levels::LoggerLevels;
pub use transport_config::{
    LogglyTransportOptions, SlackWebhookTransportOptions, TransportConfig, DEFAULT_LOGGLY_LEVEL,
    DEFAULT_SLACK_ICON_URL, DEFAULT_SLACK_USERNAME, LOGGLY_TAG, SLACK_LEVEL,
};
pub use transport_factory::*;
pub use transports::build_transports;
