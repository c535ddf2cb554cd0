//! Error types for the advisor.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Risk tolerance outside conservative / moderate / aggressive.
    #[error("Invalid risk profile: '{value}' (expected conservative, moderate or aggressive)")]
    InvalidProfile { value: String },

    #[error("Unknown asset class: '{value}'")]
    UnknownAssetClass { value: String },

    /// Holding value is negative, NaN or infinite.
    #[error("Invalid holding for {asset}: {value}")]
    InvalidHolding { asset: String, value: f64 },

    #[error("Portfolio is empty")]
    EmptyPortfolio,

    #[error("Could not read investor profile: {message}")]
    ProfileParse { message: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Market data request failed: {message}")]
    MarketData { message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AdvisorError {
    pub fn invalid_profile(value: impl Into<String>) -> Self {
        Self::InvalidProfile {
            value: value.into(),
        }
    }

    pub fn unknown_asset_class(value: impl Into<String>) -> Self {
        Self::UnknownAssetClass {
            value: value.into(),
        }
    }

    pub fn profile_parse(message: impl Into<String>) -> Self {
        Self::ProfileParse {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn market_data(message: impl Into<String>) -> Self {
        Self::MarketData {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_profile_message_names_the_value() {
        let err = AdvisorError::invalid_profile("yolo");
        assert!(err.to_string().contains("'yolo'"));
    }
}
