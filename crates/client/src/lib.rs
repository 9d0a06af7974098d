pub mod config;
mod http;
pub mod remote;

pub use config::{ClientConfig, ConfigError};
pub use http::TasksClient;
pub use remote::{ApiError, RemoteTasks};
