use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration loaded from threadsmith.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Provider endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used for static image generation
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Model used for animated (video) generation
    #[serde(default = "default_video_model")]
    pub video_model: String,
    /// Timeout in seconds for API requests
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_model: default_image_model(),
            video_model: default_video_model(),
            timeout_seconds: default_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl GeminiConfig {
    /// Read the credential from the configured environment variable.
    /// Empty values count as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_video_model() -> String {
    "veo-3.1-fast-generate-preview".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

/// Text generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Posts per generation, 4 or 8
    #[serde(default = "default_post_count")]
    pub post_count: usize,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Lower bound of the content length band (characters)
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,
    /// Upper bound of the content length band (characters)
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    /// Minimum hashtags per post
    #[serde(default = "default_min_tags")]
    pub min_tags: usize,
    /// Maximum hashtags per post
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
    /// Request an English visual prompt per post
    #[serde(default = "default_visual_prompts")]
    pub visual_prompts: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            post_count: default_post_count(),
            temperature: default_temperature(),
            min_content_chars: default_min_content_chars(),
            max_content_chars: default_max_content_chars(),
            min_tags: default_min_tags(),
            max_tags: default_max_tags(),
            visual_prompts: default_visual_prompts(),
        }
    }
}

fn default_post_count() -> usize {
    4
}

fn default_temperature() -> f32 {
    1.2
}

fn default_min_content_chars() -> usize {
    20
}

fn default_max_content_chars() -> usize {
    80
}

fn default_min_tags() -> usize {
    1
}

fn default_max_tags() -> usize {
    3
}

fn default_visual_prompts() -> bool {
    true
}

/// Video generation and polling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Seconds between operation polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Upper bound on polls before giving up
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    #[serde(default = "default_resolution")]
    pub resolution: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    /// Where fetched videos are written; system temp dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_dir: Option<PathBuf>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
            resolution: default_resolution(),
            aspect_ratio: default_aspect_ratio(),
            media_dir: None,
        }
    }
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_poll_attempts() -> u32 {
    60
}

fn default_resolution() -> String {
    "720p".to_string()
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

/// Local behavior toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Copy actions write to the system clipboard
    #[serde(default = "default_clipboard")]
    pub clipboard: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            clipboard: default_clipboard(),
        }
    }
}

fn default_clipboard() -> bool {
    true
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(path.clone(), e))?;
        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Try to load config from threadsmith.toml in the given directory
    pub fn load_from_dir(dir: &PathBuf) -> Result<Self, ConfigError> {
        let config_path = dir.join("threadsmith.toml");
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.post_count != 4 && self.generation.post_count != 8 {
            return Err(ConfigError::InvalidValue(format!(
                "generation.post_count must be 4 or 8, got {}",
                self.generation.post_count
            )));
        }
        if self.generation.min_content_chars >= self.generation.max_content_chars {
            return Err(ConfigError::InvalidValue(
                "generation content band must satisfy min < max".to_string(),
            ));
        }
        Ok(())
    }

    /// Merge CLI overrides into the config
    pub fn with_overrides(mut self, post_count: Option<usize>, timeout: Option<u64>) -> Self {
        if let Some(n) = post_count {
            self.generation.post_count = n;
        }
        if let Some(t) = timeout {
            self.gemini.timeout_seconds = t;
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.gemini.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.generation.post_count, 4);
        assert_eq!(config.generation.min_content_chars, 20);
        assert_eq!(config.generation.max_content_chars, 80);
        assert_eq!(config.video.poll_interval_seconds, 5);
        assert_eq!(config.video.max_poll_attempts, 60);
        assert!(config.behavior.clipboard);
    }

    #[test]
    fn test_config_with_overrides() {
        let config = Config::default().with_overrides(Some(8), Some(300));
        assert_eq!(config.generation.post_count, 8);
        assert_eq!(config.gemini.timeout_seconds, 300);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
[gemini]
base_url = "http://localhost:9999/v1beta"
timeout_seconds = 30

[generation]
post_count = 8

[video]
poll_interval_seconds = 1
max_poll_attempts = 3

[behavior]
clipboard = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gemini.base_url, "http://localhost:9999/v1beta");
        assert_eq!(config.gemini.timeout_seconds, 30);
        assert_eq!(config.generation.post_count, 8);
        assert_eq!(config.generation.temperature, 1.2); // default
        assert_eq!(config.video.max_poll_attempts, 3);
        assert!(!config.behavior.clipboard);
    }

    #[test]
    fn test_validate_rejects_odd_post_count() {
        let mut config = Config::default();
        config.generation.post_count = 5;
        assert!(config.validate().is_err());
        config.generation.post_count = 8;
        assert!(config.validate().is_ok());
    }
}
