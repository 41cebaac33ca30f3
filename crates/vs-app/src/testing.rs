//! Fakes for the collaborators the controller and video service talk to.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vs_veo::{Operation, VeoError, VideoApi, VideoRequest};

use crate::generator::key::KeySelector;
use crate::state::AppState;
use crate::ui::Frontend;

const OPERATION_NAME: &str = "models/veo-test/operations/op1";

/// Returns a fixed submit result, then hands out poll results in order.
pub struct ScriptedApi {
    submit_result: Mutex<Option<Result<Operation, VeoError>>>,
    polls: Mutex<VecDeque<Result<Operation, VeoError>>>,
    submitted: Mutex<Vec<VideoRequest>>,
    poll_count: AtomicUsize,
}

impl ScriptedApi {
    pub fn new(submit: Result<Operation, VeoError>, polls: Vec<Result<Operation, VeoError>>) -> Self {
        Self {
            submit_result: Mutex::new(Some(submit)),
            polls: Mutex::new(polls.into()),
            submitted: Mutex::new(Vec::new()),
            poll_count: AtomicUsize::new(0),
        }
    }

    /// Pending on submit, pending for `pending_polls` polls, then done with `uri`.
    pub fn completing_after(pending_polls: usize, uri: &str) -> Self {
        let completed = Operation::completed(OPERATION_NAME, uri);
        if pending_polls == 0 {
            return Self::new(Ok(completed), vec![]);
        }

        let mut polls: Vec<_> = (0..pending_polls)
            .map(|_| Ok(Operation::pending(OPERATION_NAME)))
            .collect();
        polls.push(Ok(completed));
        Self::new(Ok(Operation::pending(OPERATION_NAME)), polls)
    }

    pub fn submitted(&self) -> Vec<VideoRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.poll_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoApi for ScriptedApi {
    async fn submit(&self, request: &VideoRequest) -> Result<Operation, VeoError> {
        self.submitted.lock().unwrap().push(request.clone());
        self.submit_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Operation::pending(OPERATION_NAME)))
    }

    async fn poll(&self, operation: &Operation) -> Result<Operation, VeoError> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Operation::completed(operation.name.clone(), "https://example/late")))
    }
}

/// Counts selections; optionally fails them.
#[derive(Default)]
pub struct FakeKeySelector {
    has_key: bool,
    fail: bool,
    opened: AtomicUsize,
}

impl FakeKeySelector {
    pub fn with_key() -> Self {
        Self {
            has_key: true,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeySelector for FakeKeySelector {
    async fn has_selected_key(&self) -> bool {
        self.has_key
    }

    async fn open_select_key(&self) -> anyhow::Result<()> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("no key available");
        }
        Ok(())
    }
}

/// What a scripted front-end has shown, shared with the test body.
#[derive(Default)]
pub struct Screen {
    pub alerts: Vec<String>,
    pub confirms: Vec<String>,
    pub statuses: Vec<String>,
    pub renders: usize,
}

/// Feeds queued input lines and confirmation answers.
pub struct ScriptedFrontend {
    inputs: VecDeque<String>,
    answers: VecDeque<bool>,
    screen: Arc<Mutex<Screen>>,
}

impl ScriptedFrontend {
    pub fn new() -> (Self, Arc<Mutex<Screen>>) {
        let screen = Arc::new(Mutex::new(Screen::default()));
        let frontend = Self {
            inputs: VecDeque::new(),
            answers: VecDeque::new(),
            screen: screen.clone(),
        };
        (frontend, screen)
    }

    pub fn with_inputs<I: IntoIterator<Item = &'static str>>(mut self, inputs: I) -> Self {
        self.inputs.extend(inputs.into_iter().map(String::from));
        self
    }

    pub fn with_answers<I: IntoIterator<Item = bool>>(mut self, answers: I) -> Self {
        self.answers.extend(answers);
        self
    }
}

#[async_trait]
impl Frontend for ScriptedFrontend {
    async fn next_input(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.inputs.pop_front())
    }

    async fn confirm(&mut self, message: &str) -> bool {
        self.screen.lock().unwrap().confirms.push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.screen.lock().unwrap().alerts.push(message.to_string());
    }

    fn show_status(&mut self, message: &str) {
        self.screen.lock().unwrap().statuses.push(message.to_string());
    }

    fn render(&mut self, _state: &AppState) {
        self.screen.lock().unwrap().renders += 1;
    }
}
