use vs_core::PostId;

/// Reports sent from a running generation job back to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum GenEvent {
    Progress {
        post_id: PostId,
        message: String,
    },
    Completed {
        post_id: PostId,
        url: String,
    },
    Failed {
        post_id: PostId,
        error: String,
    },
}

impl GenEvent {
    pub fn post_id(&self) -> &str {
        match self {
            Self::Progress { post_id, .. }
            | Self::Completed { post_id, .. }
            | Self::Failed { post_id, .. } => post_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}
