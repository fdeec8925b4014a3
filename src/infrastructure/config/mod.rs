mod settings;

pub use settings::{
    ApiConfig, AttemptLogConfig, DatabaseConfig, LogConfig, OtelConfig, PluginConfig,
    ServerConfig, Settings,
};
