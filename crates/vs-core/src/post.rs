use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::options::{AspectRatio, Platform, Resolution};
use crate::request::GenerationRequest;

pub type PostId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Generating,
    Draft,
    Posted,
    Failed,
}

impl PostStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Generating)
    }

    /// Edges of the post lifecycle. Removal is handled by the ledger and is
    /// allowed from every state.
    pub fn can_transition_to(&self, next: PostStatus) -> bool {
        matches!(
            (self, next),
            (Self::Generating, Self::Draft)
                | (Self::Generating, Self::Failed)
                | (Self::Draft, Self::Posted)
        )
    }

    pub fn icon(&self) -> &str {
        match self {
            Self::Generating => "⚡",
            Self::Draft => "📝",
            Self::Posted => "✅",
            Self::Failed => "❌",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Generating => "generating",
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One generation request and where it is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    /// Playable media reference, empty until the job resolves.
    #[serde(default)]
    pub url: String,
    pub prompt: String,
    #[serde(default)]
    pub caption: String,
    pub status: PostStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub resolution: Resolution,
}

impl Post {
    pub fn new_id() -> PostId {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// A fresh entry for a just-submitted request.
    pub fn generating(id: PostId, request: &GenerationRequest, created_at: DateTime<Utc>) -> Self {
        // Keep only what survives the millisecond wire format.
        let created_at = DateTime::from_timestamp_millis(created_at.timestamp_millis()).unwrap_or(created_at);

        Self {
            id,
            url: String::new(),
            prompt: request.prompt.clone(),
            caption: request.caption.clone(),
            status: PostStatus::Generating,
            created_at,
            platform: None,
            aspect_ratio: request.aspect_ratio,
            resolution: request.resolution,
        }
    }

    pub fn short_id(&self) -> &str {
        let end = self.id.char_indices().nth(8).map(|(i, _)| i).unwrap_or(self.id.len());
        &self.id[..end]
    }
}
