//! Per-post card state machine
//!
//! Pure interaction state for one rendered post: view/edit mode, the image
//! panel, and cosmetic engagement counters. All transitions are synchronous;
//! the session loop performs any I/O (clipboard, browser, provider calls)
//! around them.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use rand::Rng;

use crate::core::gemini::Visual;
use crate::models::Post;

/// External compose endpoint; the formatted text rides along percent-encoded.
pub const COMPOSE_ENDPOINT: &str = "https://www.threads.net/intent/post";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardState {
    Viewing,
    Editing {
        draft_content: String,
        draft_tags: String,
    },
}

/// Orthogonal image-panel state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePanel {
    Closed,
    Open,
    Displaying(Visual),
}

/// Cosmetic engagement counters, randomly seeded on first render. Toggles
/// behave as booleans with a ±1 count adjustment and carry no external
/// effect.
#[derive(Debug, Clone)]
pub struct Engagement {
    base_likes: u32,
    base_reposts: u32,
    base_comments: u32,
    pub liked: bool,
    pub reposted: bool,
}

impl Engagement {
    pub fn seeded(rng: &mut impl Rng) -> Self {
        Self {
            base_likes: rng.gen_range(12..462),
            base_reposts: rng.gen_range(0..120),
            base_comments: rng.gen_range(0..60),
            liked: false,
            reposted: false,
        }
    }

    pub fn likes(&self) -> u32 {
        self.base_likes + self.liked as u32
    }

    pub fn reposts(&self) -> u32 {
        self.base_reposts + self.reposted as u32
    }

    pub fn comments(&self) -> u32 {
        self.base_comments
    }
}

/// Interactive state for one post card.
#[derive(Debug, Clone)]
pub struct CardController {
    state: CardState,
    image_panel: ImagePanel,
    engagement: Engagement,
}

impl CardController {
    pub fn new() -> Self {
        Self::with_rng(&mut rand::thread_rng())
    }

    pub fn with_rng(rng: &mut impl Rng) -> Self {
        Self {
            state: CardState::Viewing,
            image_panel: ImagePanel::Closed,
            engagement: Engagement::seeded(rng),
        }
    }

    pub fn state(&self) -> &CardState {
        &self.state
    }

    pub fn image_panel(&self) -> &ImagePanel {
        &self.image_panel
    }

    pub fn engagement(&self) -> &Engagement {
        &self.engagement
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, CardState::Editing { .. })
    }

    /// Enter edit mode with drafts seeded from the post. Forces the image
    /// panel closed. Rejected while already editing.
    pub fn start_edit(&mut self, post: &Post) -> bool {
        if self.is_editing() {
            return false;
        }
        self.state = CardState::Editing {
            draft_content: post.content.clone(),
            draft_tags: post.tags.join(" "),
        };
        self.image_panel = ImagePanel::Closed;
        true
    }

    /// Replace the drafts while editing.
    pub fn set_draft(&mut self, content: impl Into<String>, tags: impl Into<String>) -> bool {
        match &mut self.state {
            CardState::Editing {
                draft_content,
                draft_tags,
            } => {
                *draft_content = content.into();
                *draft_tags = tags.into();
                true
            }
            CardState::Viewing => false,
        }
    }

    /// Leave edit mode, handing the drafts back for the store commit.
    pub fn save_edit(&mut self) -> Option<(String, String)> {
        match std::mem::replace(&mut self.state, CardState::Viewing) {
            CardState::Editing {
                draft_content,
                draft_tags,
            } => Some((draft_content, draft_tags)),
            CardState::Viewing => None,
        }
    }

    /// Leave edit mode discarding the drafts.
    pub fn cancel_edit(&mut self) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.state = CardState::Viewing;
        true
    }

    /// Open or close the image panel. Only available while viewing; closing
    /// from `Displaying` drops the result.
    pub fn toggle_image_panel(&mut self) -> bool {
        if self.is_editing() {
            return false;
        }
        self.image_panel = match self.image_panel {
            ImagePanel::Closed => ImagePanel::Open,
            ImagePanel::Open | ImagePanel::Displaying(_) => ImagePanel::Closed,
        };
        true
    }

    /// A generation succeeded while the panel was open.
    pub fn image_generated(&mut self, visual: Visual) -> bool {
        if self.image_panel != ImagePanel::Open {
            return false;
        }
        self.image_panel = ImagePanel::Displaying(visual);
        true
    }

    /// Clear the displayed result and return to the open panel so a new
    /// generation can start.
    pub fn regenerate(&mut self) -> bool {
        if !matches!(self.image_panel, ImagePanel::Displaying(_)) {
            return false;
        }
        self.image_panel = ImagePanel::Open;
        true
    }

    pub fn toggle_like(&mut self) -> u32 {
        self.engagement.liked = !self.engagement.liked;
        self.engagement.likes()
    }

    pub fn toggle_repost(&mut self) -> u32 {
        self.engagement.reposted = !self.engagement.reposted;
        self.engagement.reposts()
    }
}

impl Default for CardController {
    fn default() -> Self {
        Self::new()
    }
}

/// Compose URL for publishing: the full formatted text percent-encoded as
/// the `text` query parameter.
pub fn compose_url(post: &Post) -> String {
    format!(
        "{}?text={}",
        COMPOSE_ENDPOINT,
        utf8_percent_encode(&post.full_text(), NON_ALPHANUMERIC)
    )
}
