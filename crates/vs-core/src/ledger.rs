use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::options::Platform;
use crate::post::{Post, PostStatus};

/// Ordered list of posts, newest first.
///
/// All mutations go through id lookups so that several jobs finishing in any
/// order only ever touch their own entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    posts: Vec<Post>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Resolve a full id or an unambiguous id prefix.
    pub fn resolve_id(&self, prefix: &str) -> Option<&str> {
        if let Some(post) = self.get(prefix) {
            return Some(&post.id);
        }

        let mut matches = self.posts.iter().filter(|p| p.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(post), None) if !prefix.is_empty() => Some(&post.id),
            _ => None,
        }
    }

    /// Insert at the head.
    pub fn insert(&mut self, post: Post) -> Result<()> {
        if self.contains(&post.id) {
            return Err(Error::DuplicatePost(post.id));
        }
        self.posts.insert(0, post);
        Ok(())
    }

    /// `generating -> draft`, recording the playable reference.
    pub fn complete(&mut self, id: &str, url: impl Into<String>) -> Result<&Post> {
        let post = self.transition(id, PostStatus::Draft)?;
        post.url = url.into();
        Ok(&*post)
    }

    /// `generating -> failed`
    pub fn fail(&mut self, id: &str) -> Result<&Post> {
        let post = self.transition(id, PostStatus::Failed)?;
        Ok(&*post)
    }

    /// `draft -> posted`. Calling it on an already posted entry changes nothing.
    pub fn mark_posted(&mut self, id: &str, platform: Option<Platform>) -> Result<&Post> {
        let post = self.find_mut(id)?;
        if post.status != PostStatus::Posted {
            check_transition(post, PostStatus::Posted)?;
            post.status = PostStatus::Posted;
        }
        if platform.is_some() {
            post.platform = platform;
        }
        Ok(&*post)
    }

    /// Allowed from every state.
    pub fn remove(&mut self, id: &str) -> Option<Post> {
        let idx = self.posts.iter().position(|p| p.id == id)?;
        Some(self.posts.remove(idx))
    }

    /// Move entries left `generating` by a previous process to `failed`.
    /// Returns the ids that were changed.
    pub fn fail_stale(&mut self) -> Vec<String> {
        self.posts
            .iter_mut()
            .filter(|p| p.status.is_active())
            .map(|p| {
                p.status = PostStatus::Failed;
                p.id.clone()
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Post> {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::PostNotFound(id.to_string()))
    }

    fn transition(&mut self, id: &str, next: PostStatus) -> Result<&mut Post> {
        let post = self.find_mut(id)?;
        check_transition(post, next)?;
        post.status = next;
        Ok(post)
    }
}

fn check_transition(post: &Post, next: PostStatus) -> Result<()> {
    if post.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(Error::InvalidTransition {
            id: post.id.clone(),
            from: post.status,
            to: next,
        })
    }
}
