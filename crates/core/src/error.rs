//! Error types for badgewatch

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BadgewatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connect username or API key missing")]
    MissingCredentials,

    #[error("RetroAchievements API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No recent games found for {0}")]
    NoRecentGames(String),

    #[error("Asset error: {0}")]
    Asset(String),
}

pub type Result<T> = std::result::Result<T, BadgewatchError>;
