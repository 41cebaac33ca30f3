use log::{info, warn};
use vs_core::{AspectRatio, GenerationRequest, Ledger, Platform, Post, PostId, Resolution};

pub const CONNECTING_MESSAGE: &str = "Connecting to Gemini Veo...";

/// The generation form as the user has filled it in so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub prompt: String,
    pub caption: String,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
}

impl FormState {
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest::new(self.prompt.clone())
            .with_caption(self.caption.clone())
            .with_aspect_ratio(self.aspect_ratio)
            .with_resolution(self.resolution)
    }
}

/// Everything the front-end shows, owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub ledger: Ledger,
    pub form: FormState,
    /// Jobs submitted and not yet reported back.
    pub in_flight: usize,
    /// Transient progress line for the running job.
    pub status_message: String,
    pub error: Option<String>,
    pub has_api_key: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PromptChanged(String),
    CaptionChanged(String),
    AspectRatioChanged(AspectRatio),
    ResolutionChanged(Resolution),
    KeySelected(bool),

    GenerationStarted(Post),
    GenerationProgress(String),
    GenerationSucceeded { post_id: PostId, url: String },
    GenerationFailed { post_id: PostId, error: String },

    Posted { post_id: PostId, platform: Option<Platform> },
    Removed(PostId),
    /// Fail posts a previous run left in `generating`.
    StaleJobsFailed,
    PersistFailed(String),
}

impl Action {
    /// Whether applying this action can change the ledger, which then has
    /// to be written back to storage.
    pub fn touches_ledger(&self) -> bool {
        matches!(
            self,
            Self::GenerationStarted(_)
                | Self::GenerationSucceeded { .. }
                | Self::GenerationFailed { .. }
                | Self::Posted { .. }
                | Self::Removed(_)
                | Self::StaleJobsFailed
        )
    }
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            ..Default::default()
        }
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight > 0
    }

    /// Produce the next state. Actions that do not fit the current state
    /// (a completion for a post that was deleted, posting a failed video)
    /// are logged and leave the ledger untouched.
    #[must_use]
    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::PromptChanged(prompt) => self.form.prompt = prompt,
            Action::CaptionChanged(caption) => self.form.caption = caption,
            Action::AspectRatioChanged(aspect_ratio) => self.form.aspect_ratio = aspect_ratio,
            Action::ResolutionChanged(resolution) => self.form.resolution = resolution,
            Action::KeySelected(selected) => self.has_api_key = selected,

            Action::GenerationStarted(post) => {
                if let Err(e) = self.ledger.insert(post) {
                    warn!("Not starting generation: {e}");
                    return self;
                }
                self.in_flight += 1;
                self.error = None;
                self.status_message = CONNECTING_MESSAGE.to_string();
            }
            Action::GenerationProgress(message) => {
                if self.is_generating() {
                    self.status_message = message;
                }
            }
            Action::GenerationSucceeded { post_id, url } => {
                match self.ledger.complete(&post_id, url) {
                    Ok(_) => {
                        self.form.prompt.clear();
                        self.form.caption.clear();
                    }
                    Err(e) => warn!("Dropping finished video: {e}"),
                }
                self.finish_job();
            }
            Action::GenerationFailed { post_id, error } => {
                if let Err(e) = self.ledger.fail(&post_id) {
                    warn!("Dropping failure report: {e}");
                }
                self.error = Some(error);
                self.finish_job();
            }

            Action::Posted { post_id, platform } => {
                if let Err(e) = self.ledger.mark_posted(&post_id, platform) {
                    warn!("Cannot post video: {e}");
                }
            }
            Action::Removed(post_id) => {
                if self.ledger.remove(&post_id).is_none() {
                    warn!("Nothing to remove for {post_id}");
                }
            }
            Action::StaleJobsFailed => {
                for id in self.ledger.fail_stale() {
                    info!("Marked interrupted job {id} as failed");
                }
            }
            Action::PersistFailed(error) => self.error = Some(error),
        }

        self
    }

    fn finish_job(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.status_message.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use vs_core::PostStatus;

    use super::*;

    fn started(id: &str, prompt: &str) -> Action {
        let created = DateTime::from_timestamp_millis(1_000).unwrap();
        Action::GenerationStarted(Post::generating(id.into(), &GenerationRequest::new(prompt), created))
    }

    fn state_with_form(prompt: &str) -> AppState {
        AppState::default()
            .apply(Action::PromptChanged(prompt.into()))
            .apply(Action::CaptionChanged("caption".into()))
    }

    #[test]
    fn test_form_builds_request() {
        let state = state_with_form("sunset over mountains")
            .apply(Action::AspectRatioChanged(AspectRatio::Portrait))
            .apply(Action::ResolutionChanged(Resolution::FullHd));

        let req = state.form.request();
        assert_eq!(req.prompt, "sunset over mountains");
        assert_eq!(req.caption, "caption");
        assert_eq!(req.aspect_ratio, AspectRatio::Portrait);
        assert_eq!(req.resolution, Resolution::FullHd);
    }

    #[test]
    fn test_start_inserts_generating_post_at_head() {
        let state = AppState::default()
            .apply(started("a", "first"))
            .apply(started("b", "second"));

        let posts = state.ledger.posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "b");
        assert_eq!(posts[0].status, PostStatus::Generating);
        assert_eq!(state.in_flight, 2);
        assert_eq!(state.status_message, CONNECTING_MESSAGE);
    }

    #[test]
    fn test_start_clears_previous_error() {
        let mut state = AppState::default();
        state.error = Some("old".into());
        let state = state.apply(started("a", "p"));
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_success_moves_to_draft_and_clears_form() {
        let state = state_with_form("p")
            .apply(started("a", "p"))
            .apply(Action::GenerationProgress("Applying neural textures...".into()))
            .apply(Action::GenerationSucceeded {
                post_id: "a".into(),
                url: "https://example/video1&key=k".into(),
            });

        let post = state.ledger.get("a").unwrap();
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.url, "https://example/video1&key=k");
        assert_eq!(state.form.prompt, "");
        assert_eq!(state.form.caption, "");
        assert!(!state.is_generating());
        assert_eq!(state.status_message, "");
    }

    #[test]
    fn test_failure_keeps_form_and_sets_error() {
        let state = state_with_form("p")
            .apply(started("a", "p"))
            .apply(Action::GenerationFailed {
                post_id: "a".into(),
                error: "No video URL returned from API".into(),
            });

        assert_eq!(state.ledger.get("a").unwrap().status, PostStatus::Failed);
        assert_eq!(state.error.as_deref(), Some("No video URL returned from API"));
        assert_eq!(state.form.prompt, "p");
        assert_eq!(state.status_message, "");
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn test_concurrent_jobs_update_their_own_entries() {
        let state = AppState::default()
            .apply(started("a", "one"))
            .apply(started("b", "two"))
            .apply(Action::GenerationFailed {
                post_id: "a".into(),
                error: "boom".into(),
            })
            .apply(Action::GenerationSucceeded {
                post_id: "b".into(),
                url: "u".into(),
            });

        assert_eq!(state.ledger.get("a").unwrap().status, PostStatus::Failed);
        assert_eq!(state.ledger.get("a").unwrap().url, "");
        assert_eq!(state.ledger.get("b").unwrap().status, PostStatus::Draft);
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn test_completion_after_removal_is_dropped() {
        let state = AppState::default()
            .apply(started("a", "p"))
            .apply(Action::Removed("a".into()))
            .apply(Action::GenerationSucceeded {
                post_id: "a".into(),
                url: "u".into(),
            });

        assert!(state.ledger.is_empty());
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn test_terminal_states_never_return_to_generating() {
        let state = AppState::default()
            .apply(started("a", "p"))
            .apply(Action::GenerationFailed {
                post_id: "a".into(),
                error: "e".into(),
            })
            .apply(Action::GenerationSucceeded {
                post_id: "a".into(),
                url: "u".into(),
            })
            .apply(Action::Posted {
                post_id: "a".into(),
                platform: None,
            });

        assert_eq!(state.ledger.get("a").unwrap().status, PostStatus::Failed);
    }

    #[test]
    fn test_progress_ignored_when_idle() {
        let state = AppState::default().apply(Action::GenerationProgress("late".into()));
        assert_eq!(state.status_message, "");
    }

    #[test]
    fn test_stale_jobs_fail() {
        let state = AppState::default()
            .apply(started("a", "p"))
            .apply(Action::StaleJobsFailed);
        assert_eq!(state.ledger.get("a").unwrap().status, PostStatus::Failed);
    }

    #[test]
    fn test_ledger_actions_are_flagged_for_persistence() {
        assert!(started("a", "p").touches_ledger());
        assert!(Action::Removed("a".into()).touches_ledger());
        assert!(!Action::PromptChanged("p".into()).touches_ledger());
        assert!(!Action::GenerationProgress("m".into()).touches_ledger());
    }
}
