use std::fmt::{self, Write};

use vs_core::{AspectRatio, Post, PostStatus, Resolution};

use crate::state::AppState;

pub fn render_post(post: &Post) -> String {
    let mut out = String::new();

    let _ = write!(
        out,
        "{} [{}] {:<10} {} {}  {}",
        post.status.icon(),
        post.short_id(),
        post.status.label(),
        post.aspect_ratio,
        post.resolution,
        post.created_at.format("%Y-%m-%d %H:%M"),
    );
    if let Some(platform) = post.platform {
        let _ = write!(out, "  on {platform}");
    }

    let _ = write!(out, "\n    \"{}\"", post.prompt);
    if !post.caption.is_empty() {
        let _ = write!(out, "\n    caption: {}", post.caption);
    }
    match post.status {
        PostStatus::Generating => out.push_str("\n    rendering..."),
        PostStatus::Failed => out.push_str("\n    generation failed"),
        PostStatus::Draft | PostStatus::Posted => {
            let _ = write!(out, "\n    {}", post.url);
        }
    }

    out
}

pub fn render_state(state: &AppState) -> String {
    let mut out = String::from("── VeloStream ──\n");

    let form = &state.form;
    let _ = writeln!(
        out,
        "prompt: {}\ncaption: {}\nformat: {} ({})  quality: {} ({})",
        if form.prompt.is_empty() { "<empty>" } else { form.prompt.as_str() },
        if form.caption.is_empty() { "<empty>" } else { form.caption.as_str() },
        form.aspect_ratio.name(),
        choices(AspectRatio::all()),
        form.resolution.name(),
        choices(Resolution::all()),
    );
    if !state.has_api_key {
        out.push_str("API key: not selected (type 'key')\n");
    }
    if state.is_generating() {
        let _ = writeln!(out, "generating {} video(s)... {}", state.in_flight, state.status_message);
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "error: {error}");
    }

    out.push('\n');
    if state.ledger.is_empty() {
        out.push_str("No videos yet. Type 'generate <prompt>' to create one.\n");
    } else {
        for post in state.ledger.posts() {
            out.push_str(&render_post(post));
            out.push('\n');
        }
    }

    out
}

fn choices<T: fmt::Display>(options: impl IntoIterator<Item = T>) -> String {
    options
        .into_iter()
        .map(|o| o.to_string())
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use vs_core::{GenerationRequest, Ledger, Platform};

    use super::*;

    fn post() -> Post {
        let created = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let req = GenerationRequest::new("sunset over mountains").with_caption("golden");
        Post::generating("0123456789abcdef".into(), &req, created)
    }

    #[test]
    fn test_generating_post() {
        let text = render_post(&post());
        assert!(text.starts_with("⚡ [01234567] generating"));
        assert!(text.contains("16:9 720p"));
        assert!(text.contains("\"sunset over mountains\""));
        assert!(text.contains("caption: golden"));
        assert!(text.contains("rendering..."));
    }

    #[test]
    fn test_posted_post_shows_url_and_platform() {
        let mut ledger = Ledger::from_posts(vec![post()]);
        ledger.complete("0123456789abcdef", "https://example/v&key=k").unwrap();
        ledger.mark_posted("0123456789abcdef", Some(Platform::Instagram)).unwrap();

        let text = render_post(&ledger.posts()[0]);
        assert!(text.contains("posted"));
        assert!(text.contains("on Instagram"));
        assert!(text.contains("https://example/v&key=k"));
    }

    #[test]
    fn test_empty_state() {
        let text = render_state(&AppState::default());
        assert!(text.contains("No videos yet"));
        assert!(text.contains("API key: not selected"));
        assert!(text.contains("format: Landscape (16:9) (16:9|9:16)"));
        assert!(text.contains("quality: 720p HD (720p|1080p)"));
    }

    #[test]
    fn test_state_with_error_and_posts() {
        let mut state = AppState::new(Ledger::from_posts(vec![post()]));
        state.error = Some("No video URL returned from API".into());
        state.has_api_key = true;

        let text = render_state(&state);
        assert!(text.contains("error: No video URL returned from API"));
        assert!(text.contains("[01234567]"));
        assert!(!text.contains("API key"));
    }
}
