use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid store URL \"{raw}\": {reason}")]
    InvalidStoreUrl { raw: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
