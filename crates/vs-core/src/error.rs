use thiserror::Error;

use crate::post::PostStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("No post with id {0}")]
    PostNotFound(String),

    #[error("Post {0} already exists")]
    DuplicatePost(String),

    #[error("Post {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: PostStatus,
        to: PostStatus,
    },

    #[error("Unknown {kind}: '{value}'")]
    UnknownOption { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
