pub mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, EmailConfig, LogFormat, LoggingConfig, ServerConfig, StorageConfig,
};
