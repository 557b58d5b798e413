use thiserror::Error;

use coinsift_features::FeatureError;
use coinsift_screen::ScreenError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] coinsift_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Screen(ScreenError::Config { .. }) => 2,
            // The whole universe enumeration failed; nothing was screened.
            Self::Screen(ScreenError::UniverseUnavailable(_)) => 7,
            Self::Feature(_) => 2,
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
