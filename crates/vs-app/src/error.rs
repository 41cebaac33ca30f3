use thiserror::Error;
use vs_veo::VeoError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Why a generation job did not produce a playable video.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Failed to submit video request: {0}")]
    Submission(#[source] VeoError),

    #[error("Failed while waiting for video: {0}")]
    Poll(#[source] VeoError),

    #[error("No video URL returned from API")]
    MissingResult,
}

impl GenerateError {
    pub fn is_invalid_credential(&self) -> bool {
        match self {
            Self::Submission(e) | Self::Poll(e) => e.is_invalid_credential(),
            Self::EmptyPrompt | Self::MissingResult => false,
        }
    }
}
