//! Session post store
//!
//! Owns the generated post list and the user's schedule for one session.
//! Every operation is synchronous and atomic from the caller's perspective;
//! nothing here suspends.

use chrono::Local;
use tracing::debug;

use crate::models::{normalize_tags, Post, ScheduledPost};

/// Ticket handed out per generation attempt. Results are applied only when
/// the ticket is still the newest one, so a stale in-flight response can
/// never overwrite a newer result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

/// In-memory view-model for the current session.
#[derive(Debug, Default)]
pub struct PostStore {
    posts: Vec<Post>,
    scheduled: Vec<ScheduledPost>,
    search_query: String,
    generation_seq: u64,
    schedule_counter: u64,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn scheduled(&self) -> &[ScheduledPost] {
        &self.scheduled
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Discard the previous list wholesale and reset the active search query.
    pub fn replace_all(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.search_query.clear();
    }

    /// Start a generation attempt; the returned ticket supersedes all
    /// earlier ones.
    pub fn begin_generation(&mut self) -> GenerationTicket {
        self.generation_seq += 1;
        GenerationTicket(self.generation_seq)
    }

    /// Apply results for `ticket`. Returns whether they were applied; results
    /// for a superseded ticket are discarded.
    pub fn apply_generation(&mut self, ticket: GenerationTicket, posts: Vec<Post>) -> bool {
        if ticket.0 != self.generation_seq {
            debug!(
                "Discarding stale generation result (ticket {} < {})",
                ticket.0, self.generation_seq
            );
            return false;
        }
        self.replace_all(posts);
        true
    }

    fn matches(post: &Post, query_lower: &str) -> bool {
        query_lower.is_empty()
            || post.content.to_lowercase().contains(query_lower)
            || post
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(query_lower))
    }

    /// Case-insensitive substring match against content or any tag. An empty
    /// query matches everything. Never mutates the underlying list.
    pub fn filter(&self, query: &str) -> Vec<&Post> {
        let query = query.to_lowercase();
        self.posts
            .iter()
            .filter(|post| Self::matches(post, &query))
            .collect()
    }

    /// [`filter`](Self::filter) with the stored search query.
    pub fn filtered(&self) -> Vec<&Post> {
        self.filter(&self.search_query)
    }

    /// Indices of the posts the stored search query matches, in list order.
    pub fn filtered_indices(&self) -> Vec<usize> {
        let query = self.search_query.to_lowercase();
        self.posts
            .iter()
            .enumerate()
            .filter(|(_, post)| Self::matches(post, &query))
            .map(|(i, _)| i)
            .collect()
    }

    /// Commit a post to the schedule. Clones the post, assigns a unique
    /// time-based id and creation stamp, prepends to the schedule list.
    /// The source post is never mutated.
    pub fn schedule(&mut self, index: usize, time: &str) -> Option<&ScheduledPost> {
        let post = self.posts.get(index)?.clone();
        self.schedule_counter += 1;
        let scheduled = ScheduledPost {
            post,
            id: format!(
                "{}-{}",
                Local::now().timestamp_millis(),
                self.schedule_counter
            ),
            scheduled_time: time.to_string(),
            created_at: Local::now(),
        };
        self.scheduled.insert(0, scheduled);
        self.scheduled.first()
    }

    /// Remove a scheduled post by id. No-op if absent; returns whether
    /// anything was removed.
    pub fn unschedule(&mut self, id: &str) -> bool {
        let before = self.scheduled.len();
        self.scheduled.retain(|p| p.id != id);
        self.scheduled.len() != before
    }

    /// Wholesale replacement of content and tags at `index`. Raw tag input is
    /// normalized: split on whitespace/commas, markers stripped, empties
    /// dropped. Returns whether the index existed.
    pub fn edit_post(&mut self, index: usize, content: &str, raw_tags: &str) -> bool {
        let Some(post) = self.posts.get_mut(index) else {
            return false;
        };
        post.content = content.to_string();
        post.tags = normalize_tags(raw_tags);
        true
    }
}
