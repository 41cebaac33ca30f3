//! Client for the Veo video-generation API.
//!
//! Video generation is a long-running operation: [`VideoApi::submit`]
//! returns an [`Operation`] handle that is re-fetched with
//! [`VideoApi::poll`] until it reports `done`.

pub mod api;
pub mod credential;
pub mod error;
pub mod operation;

pub use api::{VeoApi, VideoApi, VideoRequest, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use credential::ApiKey;
pub use error::VeoError;
pub use operation::Operation;
