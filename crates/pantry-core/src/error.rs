//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PantryError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("WEATHER/{0}")]
    Weather(String),

    #[error("CATALOG/{0}")]
    Catalog(String),

    #[error("CONFIG/{0}")]
    Config(String),

    #[error("INTERNAL/{0}")]
    Internal(String),
}

impl PantryError {
    /// Short machine code for the variant, used in logs and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized => "AUTH",
            Self::Weather(_) => "WEATHER",
            Self::Catalog(_) => "CATALOG",
            Self::Config(_) => "CONFIG",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<serde_yaml::Error> for PantryError {
    fn from(err: serde_yaml::Error) -> Self {
        PantryError::Catalog(err.to_string())
    }
}
