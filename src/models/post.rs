use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A single generated short-form post: body text plus hashtags.
///
/// Produced by the provider and replaced wholesale on edit; tags are stored
/// without the leading `#`, which is re-added only at render/export time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Main text content, roughly 20-80 characters
    pub content: String,
    /// Hashtags without the `#` marker
    pub tags: Vec<String>,
    /// English scene description used to drive image/video generation
    #[serde(
        default,
        rename = "visualPrompt",
        skip_serializing_if = "Option::is_none"
    )]
    pub visual_prompt: Option<String>,
}

impl Post {
    pub fn new(content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            content: content.into(),
            tags,
            visual_prompt: None,
        }
    }

    /// The exact text that gets copied or published: content, blank line,
    /// then `#`-prefixed tags joined by spaces.
    pub fn full_text(&self) -> String {
        if self.tags.is_empty() {
            return self.content.clone();
        }
        let hashtags = self
            .tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{}\n\n{}", self.content, hashtags)
    }
}

/// A post the user committed to a future publish time. Session-local,
/// immutable after creation, deleted only by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledPost {
    #[serde(flatten)]
    pub post: Post,
    /// Unique within the session, never reused
    pub id: String,
    /// Free-form local time, e.g. "2025-03-10 09:00"
    pub scheduled_time: String,
    pub created_at: DateTime<Local>,
}

/// Normalize raw tag input: split on whitespace and commas, strip any
/// leading `#`, drop empty tokens.
pub fn normalize_tags(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .map(|t| t.trim_start_matches('#'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
