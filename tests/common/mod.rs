//! Common test utilities

use async_trait::async_trait;
use std::sync::Mutex;

use threadsmith::core::{GenerationRequest, Provider, Visual};
use threadsmith::error::GeminiError;
use threadsmith::models::{ImageStyle, Mood, Post, Scene};

/// Provider double: returns canned posts and visuals, records the last
/// instruction it was asked to fulfil.
pub struct FakeProvider {
    posts: Vec<Post>,
    visual: Option<Visual>,
    fail_with_auth: bool,
    last_instruction: Mutex<Option<String>>,
}

impl FakeProvider {
    pub fn returning(posts: Vec<Post>) -> Self {
        Self {
            posts,
            visual: None,
            fail_with_auth: false,
            last_instruction: Mutex::new(None),
        }
    }

    pub fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = Some(visual);
        self
    }

    pub fn rejecting_credential() -> Self {
        Self {
            posts: Vec::new(),
            visual: None,
            fail_with_auth: true,
            last_instruction: Mutex::new(None),
        }
    }

    pub fn last_instruction(&self) -> Option<String> {
        self.last_instruction.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn generate_posts(&self, request: &GenerationRequest) -> Result<Vec<Post>, GeminiError> {
        *self.last_instruction.lock().unwrap() = Some(request.instruction.clone());
        if self.fail_with_auth {
            return Err(GeminiError::Auth("Requested entity was not found.".to_string()));
        }
        Ok(self.posts.clone())
    }

    async fn generate_visual(
        &self,
        _prompt: &str,
        _mood: Mood,
        _scene: Scene,
        _style: ImageStyle,
    ) -> Result<Option<Visual>, GeminiError> {
        if self.fail_with_auth {
            return Err(GeminiError::Auth("Requested entity was not found.".to_string()));
        }
        Ok(self.visual.clone())
    }
}

/// One-post fixture used by the end-to-end scenarios
pub fn tired_worker_post() -> Post {
    Post::new("上班好累", vec!["社畜".to_string()])
}
