use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    File(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
