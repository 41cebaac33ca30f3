pub mod error;
pub mod ledger;
mod options;
mod post;
mod request;

pub use ledger::Ledger;
pub use options::{AspectRatio, Platform, Resolution};
pub use post::{Post, PostId, PostStatus};
pub use request::GenerationRequest;
