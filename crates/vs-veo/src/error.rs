/// Message the API returns when the key no longer resolves to a project
/// with access to the model.
pub const ENTITY_NOT_FOUND: &str = "Requested entity was not found";

/// Errors from the Veo REST layer.
#[derive(Debug, thiserror::Error)]
pub enum VeoError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Veo API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The operation finished but carries an error status.
    #[error("Video generation failed ({code}): {message}")]
    Operation { code: i32, message: String },

    /// No key has been selected yet.
    #[error("No API key selected")]
    MissingApiKey,
}

impl VeoError {
    /// True when the error means the selected key is no longer usable and
    /// the user should pick another one.
    pub fn is_invalid_credential(&self) -> bool {
        match self {
            Self::Api { body, .. } => body.contains(ENTITY_NOT_FOUND),
            Self::Operation { message, .. } => message.contains(ENTITY_NOT_FOUND),
            Self::MissingApiKey => true,
            Self::Request(_) => false,
        }
    }
}
