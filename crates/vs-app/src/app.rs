use std::ops::ControlFlow;

use chrono::Utc;
use log::{debug, error, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use vs_core::{GenerationRequest, Platform, Post, PostId, PostStatus};

use crate::events::GenEvent;
use crate::generator::Generator;
use crate::state::{Action, AppState};
use crate::ui::{parse_command, Frontend, UiEvent, HELP};

pub const POSTED_NOTICE: &str = "Simulated: Video has been 'posted' to your linked accounts!";
pub const DELETE_PROMPT: &str = "Delete this video?";

/// Owns the app state and is the only place it changes. Generation jobs run
/// as separate tasks and report back through `GenEvent`s.
pub struct App {
    state: AppState,
    generator: Generator,
    frontend: Box<dyn Frontend>,
    events_tx: UnboundedSender<GenEvent>,
    events_rx: UnboundedReceiver<GenEvent>,
}

impl App {
    pub fn new(generator: Generator, frontend: Box<dyn Frontend>) -> Self {
        let ledger = generator.load_posts();
        info!("Loaded {} videos", ledger.len());

        let has_stale = ledger.posts().iter().any(|p| p.status.is_active());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            state: AppState::new(ledger),
            generator,
            frontend,
            events_tx,
            events_rx,
        };

        // Their poll loops died with the previous process
        if has_stale {
            app.dispatch(Action::StaleJobsFailed);
        }

        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn dispatch(&mut self, action: Action) {
        let persist = action.touches_ledger();
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(action);

        if persist {
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.generator.save_posts(&self.state.ledger) {
            error!("Failed to save videos: {e:#}");
            let state = std::mem::take(&mut self.state);
            self.state = state.apply(Action::PersistFailed(format!("Failed to save videos: {e}")));
        }
    }

    pub async fn check_api_key(&mut self) {
        let selected = self.generator.key_selector().has_selected_key().await;
        self.dispatch(Action::KeySelected(selected));
    }

    /// Open the key selector and assume it worked; a bad key shows up as a
    /// rejected request later.
    pub async fn open_key_selector(&mut self) {
        if let Err(e) = self.generator.key_selector().open_select_key().await {
            warn!("Key selection did not complete: {e:#}");
        }
        self.dispatch(Action::KeySelected(true));
    }

    /// Start generating a video for `request`.
    ///
    /// The post is in the ledger, marked `generating`, by the time this
    /// returns. Returns `None` without touching anything for an empty prompt.
    pub async fn submit(&mut self, request: GenerationRequest) -> Option<PostId> {
        if let Err(e) = request.validate() {
            debug!("Ignoring submit: {e}");
            return None;
        }

        if !self.state.has_api_key {
            self.open_key_selector().await;
        }

        let post_id = Post::new_id();
        let post = Post::generating(post_id.clone(), &request, Utc::now());
        self.dispatch(Action::GenerationStarted(post));

        if !self.state.ledger.contains(&post_id) {
            return None;
        }

        self.spawn_generation(post_id.clone(), request);
        Some(post_id)
    }

    pub async fn submit_form(&mut self) -> Option<PostId> {
        let request = self.state.form.request();
        self.submit(request).await
    }

    fn spawn_generation(&self, post_id: PostId, request: GenerationRequest) {
        let service = self.generator.service();
        let events_tx = self.events_tx.clone();

        tokio::spawn(async move {
            let progress_tx = events_tx.clone();
            let progress_id = post_id.clone();
            let on_progress = move |message: String| {
                let _ = progress_tx.send(GenEvent::Progress {
                    post_id: progress_id.clone(),
                    message,
                });
            };

            let result = service
                .generate(&request.prompt, request.aspect_ratio, request.resolution, Some(&on_progress))
                .await;

            let event = match result {
                Ok(url) => GenEvent::Completed { post_id, url },
                Err(e) => {
                    error!("Video generation for {post_id} failed: {e}");
                    GenEvent::Failed {
                        post_id,
                        error: e.to_string(),
                    }
                }
            };
            let _ = events_tx.send(event);
        });
    }

    pub fn on_gen_event(&mut self, event: GenEvent) {
        debug!("Job {} reported {:?}", event.post_id(), event);
        match event {
            GenEvent::Progress { message, .. } => {
                self.frontend.show_status(&message);
                self.dispatch(Action::GenerationProgress(message));
            }
            GenEvent::Completed { post_id, url } => {
                info!("Video {post_id} is ready");
                self.dispatch(Action::GenerationSucceeded { post_id, url });
                self.frontend.render(&self.state);
            }
            GenEvent::Failed { post_id, error } => {
                self.dispatch(Action::GenerationFailed { post_id, error });
                self.frontend.render(&self.state);
            }
        }
    }

    /// Process job reports until nothing is generating.
    pub async fn settle(&mut self) {
        while self.state.is_generating() {
            match self.events_rx.recv().await {
                Some(event) => self.on_gen_event(event),
                None => break,
            }
        }
    }

    /// `draft -> posted` (simulated). Returns whether the post ends up posted.
    pub fn mark_posted(&mut self, post_id: &str, platform: Option<Platform>) -> bool {
        if !self.state.ledger.contains(post_id) {
            return false;
        }

        self.dispatch(Action::Posted {
            post_id: post_id.to_string(),
            platform,
        });

        let posted = self
            .state
            .ledger
            .get(post_id)
            .is_some_and(|p| p.status == PostStatus::Posted);

        if posted {
            self.frontend.alert(POSTED_NOTICE);
        }
        posted
    }

    /// Delete a post after the user confirms. Returns whether it was removed.
    pub async fn remove(&mut self, post_id: &str) -> bool {
        if !self.state.ledger.contains(post_id) {
            return false;
        }
        if !self.frontend.confirm(DELETE_PROMPT).await {
            return false;
        }

        self.dispatch(Action::Removed(post_id.to_string()));
        true
    }

    fn resolve_id(&mut self, id: &str) -> Option<String> {
        let resolved = self.state.ledger.resolve_id(id).map(str::to_string);
        if resolved.is_none() {
            self.frontend.alert(&format!("No video matches '{id}'"));
        }
        resolved
    }

    pub async fn on_ui_event(&mut self, event: UiEvent) -> ControlFlow<()> {
        match event {
            UiEvent::PromptChanged(prompt) => self.dispatch(Action::PromptChanged(prompt)),
            UiEvent::CaptionChanged(caption) => self.dispatch(Action::CaptionChanged(caption)),
            UiEvent::AspectRatioChanged(ratio) => self.dispatch(Action::AspectRatioChanged(ratio)),
            UiEvent::ResolutionChanged(res) => self.dispatch(Action::ResolutionChanged(res)),
            UiEvent::Generate(prompt) => {
                if let Some(prompt) = prompt {
                    self.dispatch(Action::PromptChanged(prompt));
                }
                if self.submit_form().await.is_none() {
                    self.frontend.alert("Enter a prompt first");
                }
            }
            UiEvent::Post { id, platform } => {
                if let Some(id) = self.resolve_id(&id) {
                    if !self.mark_posted(&id, platform) {
                        self.frontend.alert("Only finished drafts can be posted");
                    }
                }
            }
            UiEvent::Remove(id) => {
                if let Some(id) = self.resolve_id(&id) {
                    self.remove(&id).await;
                }
            }
            UiEvent::List => {}
            UiEvent::SelectKey => self.open_key_selector().await,
            UiEvent::Help => {
                self.frontend.alert(HELP);
                return ControlFlow::Continue(());
            }
            UiEvent::Quit => return ControlFlow::Break(()),
        }

        self.frontend.render(&self.state);
        ControlFlow::Continue(())
    }

    /// Drive the app until the user quits, or until input closes and every
    /// running job has reported back.
    pub async fn run(mut self) -> anyhow::Result<()> {
        self.check_api_key().await;
        self.frontend.render(&self.state);

        let mut input_open = true;
        loop {
            tokio::select! {
                line = self.frontend.next_input(), if input_open => match line? {
                    Some(line) => match parse_command(&line) {
                        Ok(Some(event)) => {
                            if self.on_ui_event(event).await.is_break() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => self.frontend.alert(&e.to_string()),
                    },
                    None => {
                        input_open = false;
                        if !self.state.is_generating() {
                            break;
                        }
                        info!("Input closed, waiting for {} job(s)", self.state.in_flight);
                    }
                },
                Some(event) = self.events_rx.recv() => {
                    let terminal = event.is_terminal();
                    self.on_gen_event(event);
                    if terminal && !input_open && !self.state.is_generating() {
                        break;
                    }
                }
            }
        }

        if self.state.is_generating() {
            warn!("Quitting with {} job(s) still running", self.state.in_flight);
        }
        Ok(())
    }
}
