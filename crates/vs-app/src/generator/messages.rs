use std::sync::atomic::{AtomicUsize, Ordering};

use rand::seq::IndexedRandom;

/// Shown while waiting on the remote job.
pub const GENERATION_MESSAGES: [&str; 5] = [
    "Synthesizing high-quality frames...",
    "Applying neural textures...",
    "Rendering lighting and shadows...",
    "Polishing final sequence...",
    "Optimizing video compression...",
];

/// Source of the cosmetic status line emitted on each poll.
pub trait ProgressMessages: Send + Sync {
    fn next_message(&self) -> String;
}

/// Uniform random pick from [`GENERATION_MESSAGES`].
#[derive(Debug, Default)]
pub struct RandomMessages;

impl ProgressMessages for RandomMessages {
    fn next_message(&self) -> String {
        GENERATION_MESSAGES
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(GENERATION_MESSAGES[0])
            .to_string()
    }
}

/// Cycles through a fixed list in order.
#[derive(Debug)]
pub struct SequenceMessages {
    messages: Vec<String>,
    next: AtomicUsize,
}

impl SequenceMessages {
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl ProgressMessages for SequenceMessages {
    fn next_message(&self) -> String {
        if self.messages.is_empty() {
            return String::new();
        }
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.messages[i % self.messages.len()].clone()
    }
}
