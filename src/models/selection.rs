use serde::{Deserialize, Serialize};

/// Upper bound on user-selected keywords per generation
pub const MAX_KEYWORDS: usize = 5;

/// Mood baseline for generated posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Cynical,
    Chill,
    Emo,
    Funny,
    Motivational,
    Nonsense,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Cynical,
        Mood::Chill,
        Mood::Emo,
        Mood::Funny,
        Mood::Motivational,
        Mood::Nonsense,
    ];

    /// Display label, also the literal fed into the prompt
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Cynical => "厭世吐槽",
            Mood::Chill => "Chill 放鬆",
            Mood::Emo => "深夜 Emo",
            Mood::Funny => "幽默搞笑",
            Mood::Motivational => "正能量/雞湯",
            Mood::Nonsense => "純廢文",
        }
    }
}

/// Life scene the posts should revolve around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    #[default]
    Work,
    Relationship,
    Daily,
    Weekend,
    Trending,
}

impl Scene {
    pub const ALL: [Scene; 5] = [
        Scene::Work,
        Scene::Relationship,
        Scene::Daily,
        Scene::Weekend,
        Scene::Trending,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Scene::Work => "職場社畜",
            Scene::Relationship => "感情生活",
            Scene::Daily => "日常生活",
            Scene::Weekend => "週末假期",
            Scene::Trending => "時事跟風",
        }
    }
}

/// Visual aesthetic for image/video generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ImageStyle {
    #[default]
    Default,
    Animated,
    Japanese,
    Korean,
    Realistic,
    Illustration,
    Cyberpunk,
    Vintage,
}

impl ImageStyle {
    pub const ALL: [ImageStyle; 8] = [
        ImageStyle::Default,
        ImageStyle::Animated,
        ImageStyle::Japanese,
        ImageStyle::Korean,
        ImageStyle::Realistic,
        ImageStyle::Illustration,
        ImageStyle::Cyberpunk,
        ImageStyle::Vintage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ImageStyle::Default => "預設氛圍",
            ImageStyle::Animated => "動態迷因 (GIF)",
            ImageStyle::Japanese => "日系空氣感",
            ImageStyle::Korean => "韓系奶油",
            ImageStyle::Realistic => "超寫實攝影",
            ImageStyle::Illustration => "溫馨插畫",
            ImageStyle::Cyberpunk => "賽博龐克",
            ImageStyle::Vintage => "復古底片",
        }
    }
}

/// Text model tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelVersion {
    /// Fast default tier
    #[default]
    Flash,
    /// Higher-quality, slower tier
    Pro,
}

impl ModelVersion {
    pub const ALL: [ModelVersion; 2] = [ModelVersion::Flash, ModelVersion::Pro];

    /// Provider-side model identifier
    pub fn model_id(&self) -> &'static str {
        match self {
            ModelVersion::Flash => "gemini-2.5-flash",
            ModelVersion::Pro => "gemini-2.5-pro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelVersion::Flash => "Flash (快速)",
            ModelVersion::Pro => "Pro (高品質)",
        }
    }
}

/// Active selector state: one value each, replaced wholesale on user input.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub mood: Mood,
    pub scene: Scene,
    pub model: ModelVersion,
    keywords: Vec<String>,
}

impl Selection {
    pub fn new(mood: Mood, scene: Scene, model: ModelVersion) -> Self {
        Self {
            mood,
            scene,
            model,
            keywords: Vec::new(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Add a keyword. Keywords are case-sensitive as typed, unique, non-empty,
    /// and capped at [`MAX_KEYWORDS`].
    pub fn add_keyword(&mut self, keyword: &str) -> Result<(), SelectionError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(SelectionError::EmptyKeyword);
        }
        if self.keywords.iter().any(|k| k == keyword) {
            return Err(SelectionError::DuplicateKeyword(keyword.to_string()));
        }
        if self.keywords.len() >= MAX_KEYWORDS {
            return Err(SelectionError::TooManyKeywords { max: MAX_KEYWORDS });
        }
        self.keywords.push(keyword.to_string());
        Ok(())
    }

    /// Remove a keyword by exact match. Returns whether it was present.
    pub fn remove_keyword(&mut self, keyword: &str) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        self.keywords.len() != before
    }

    pub fn clear_keywords(&mut self) {
        self.keywords.clear();
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Keyword must not be empty")]
    EmptyKeyword,

    #[error("Keyword already selected: {0}")]
    DuplicateKeyword(String),

    #[error("At most {max} keywords allowed")]
    TooManyKeywords { max: usize },
}
