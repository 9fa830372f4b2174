//! Gemini API client
//!
//! One client instance is constructed at startup from config plus the
//! resolved credential and passed by reference to every call site. Text
//! generation is a single request/response with a declared JSON schema;
//! static images are a single call whose first inline-data part becomes a
//! data URI; animated visuals go through a long-running operation that is
//! polled on a bounded schedule.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::prompt::GenerationRequest;
use crate::core::styles::effective_modifier;
use crate::error::GeminiError;
use crate::models::{GeminiConfig, ImageStyle, Mood, Post, Scene, VideoConfig};

/// Provider seam: the session loop and commands talk to this trait so tests
/// can substitute a fake without touching the network.
#[async_trait]
pub trait Provider {
    /// Generate a batch of posts. Zero parsed items is an empty result, not
    /// an error.
    async fn generate_posts(&self, request: &GenerationRequest) -> Result<Vec<Post>, GeminiError>;

    /// Generate an image or animated visual for one post. `None` means the
    /// provider returned no visual payload.
    async fn generate_visual(
        &self,
        prompt: &str,
        mood: Mood,
        scene: Scene,
        style: ImageStyle,
    ) -> Result<Option<Visual>, GeminiError>;
}

/// A generated visual, locally addressable so the credential never appears
/// in anything user-facing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visual {
    /// Inline image as received: MIME type plus base64 payload
    Image { mime_type: String, data: String },
    /// Video fetched to a local media file
    Video { path: PathBuf },
}

impl Visual {
    /// Data URI for inline embedding; `None` for videos.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            Visual::Image { mime_type, data } => Some(format!("data:{};base64,{}", mime_type, data)),
            Visual::Video { .. } => None,
        }
    }

    /// Write the visual under `dir` and return the file path. Videos are
    /// already on disk and are returned as-is.
    pub fn save(&self, dir: &Path) -> std::io::Result<PathBuf> {
        match self {
            Visual::Image { mime_type, data } => {
                let ext = match mime_type.as_str() {
                    "image/jpeg" => "jpg",
                    "image/webp" => "webp",
                    _ => "png",
                };
                let bytes = BASE64_STANDARD.decode(data).map_err(|e| {
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
                })?;
                let path = dir.join(format!(
                    "threadsmith-{}.{}",
                    chrono::Local::now().timestamp_millis(),
                    ext
                ));
                std::fs::write(&path, bytes)?;
                Ok(path)
            }
            Visual::Video { path } => Ok(path.clone()),
        }
    }
}

/// Bounded poll cadence for long-running video operations.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollSchedule {
    pub fn from_config(config: &VideoConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_seconds),
            max_attempts: config.max_poll_attempts,
        }
    }

    /// Delay before the next poll, or `None` once the allowed attempts are
    /// used up.
    pub fn next_delay(&self, completed_attempts: u32) -> Option<Duration> {
        if completed_attempts < self.max_attempts {
            Some(self.interval)
        } else {
            None
        }
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    video: VideoConfig,
    api_key: String,
}

impl GeminiClient {
    /// Create a new client with the given configuration and credential.
    pub fn new(
        config: GeminiConfig,
        video: VideoConfig,
        api_key: String,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GeminiError::Provider {
                status: None,
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            config,
            video,
            api_key,
        })
    }

    fn model_url(&self, model: &str, verb: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.config.base_url, model, verb, self.api_key
        )
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, GeminiError> {
        let response = self.client.post(url).json(body).send().await.map_err(|e| {
            if e.is_connect() {
                GeminiError::ConnectionRefused(format!(
                    "Could not reach {}. Check the network connection.",
                    self.config.base_url
                ))
            } else if e.is_timeout() {
                GeminiError::Timeout(self.config.timeout_seconds)
            } else {
                GeminiError::from(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), &body_text));
        }

        response.json::<R>().await.map_err(|e| GeminiError::Provider {
            status: None,
            message: format!("Failed to parse provider response: {}", e),
        })
    }

    async fn generate_image(
        &self,
        prompt: &str,
        mood: Mood,
        scene: Scene,
        style: ImageStyle,
    ) -> Result<Option<Visual>, GeminiError> {
        let enriched = enrich_visual_prompt(prompt, mood, scene, style);
        debug!("Requesting image from {}", self.config.image_model);

        // The image model accepts neither responseMimeType nor responseSchema
        let request = GenerateContentBody {
            contents: vec![Content::user_text(enriched)],
            system_instruction: None,
            generation_config: None,
        };

        let url = self.model_url(&self.config.image_model, "generateContent");
        let response: GenerateContentResponse = self.post_json(&url, &request).await?;

        Ok(find_inline_image(&response))
    }

    async fn generate_animated(
        &self,
        prompt: &str,
        mood: Mood,
        scene: Scene,
    ) -> Result<Option<Visual>, GeminiError> {
        let video_prompt = format!(
            "Cinematic, looping motion, high quality, {} vibe, {} setting. {}",
            mood.label(),
            scene.label(),
            prompt
        );

        let request = VideoGenerationBody {
            instances: vec![VideoInstance {
                prompt: video_prompt,
            }],
            parameters: VideoParameters {
                number_of_videos: 1,
                resolution: self.video.resolution.clone(),
                aspect_ratio: self.video.aspect_ratio.clone(),
            },
        };

        let url = self.model_url(&self.config.video_model, "predictLongRunning");
        let mut operation: VideoOperation = self.post_json(&url, &request).await?;
        info!("Started video operation {}", operation.name);

        let schedule = PollSchedule::from_config(&self.video);
        let mut attempts = 0u32;
        while !operation.done {
            match schedule.next_delay(attempts) {
                Some(delay) => tokio::time::sleep(delay).await,
                None => return Err(GeminiError::PollExhausted { attempts }),
            }
            attempts += 1;
            operation = self.poll_operation(&operation.name).await?;
            debug!("Poll {}: done={}", attempts, operation.done);
        }

        let uri = operation
            .response
            .and_then(|r| r.generated_videos.into_iter().next())
            .and_then(|v| v.video)
            .and_then(|f| f.uri);

        let Some(uri) = uri else {
            return Ok(None);
        };

        let path = self.fetch_video(&uri).await?;
        Ok(Some(Visual::Video { path }))
    }

    async fn poll_operation(&self, name: &str) -> Result<VideoOperation, GeminiError> {
        let url = format!("{}/{}?key={}", self.config.base_url, name, self.api_key);
        let response = self.client.get(&url).send().await.map_err(GeminiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), &body_text));
        }

        response
            .json::<VideoOperation>()
            .await
            .map_err(|e| GeminiError::Provider {
                status: None,
                message: format!("Failed to parse operation status: {}", e),
            })
    }

    /// Download the finished video. The credential rides along as a query
    /// parameter on the fetch and ends up nowhere near the returned path.
    async fn fetch_video(&self, uri: &str) -> Result<PathBuf, GeminiError> {
        let url = format!("{}&key={}", uri, self.api_key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeminiError::VideoFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeminiError::VideoFetch(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeminiError::VideoFetch(e.to_string()))?;

        let dir = self
            .video
            .media_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&dir)
            .map_err(|e| GeminiError::VideoFetch(format!("media dir: {}", e)))?;
        let path = dir.join(format!(
            "threadsmith-{}.mp4",
            chrono::Local::now().timestamp_millis()
        ));
        std::fs::write(&path, &bytes).map_err(|e| GeminiError::VideoFetch(e.to_string()))?;
        info!("Saved video to {}", path.display());
        Ok(path)
    }
}

#[async_trait]
impl Provider for GeminiClient {
    async fn generate_posts(&self, request: &GenerationRequest) -> Result<Vec<Post>, GeminiError> {
        let body = GenerateContentBody {
            contents: vec![Content::user_text(request.instruction.clone())],
            system_instruction: Some(Content::system_text(request.system_instruction.clone())),
            generation_config: Some(GenerationConfigPayload {
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema.clone(),
                temperature: request.temperature,
            }),
        };

        let url = self.model_url(&request.model_id, "generateContent");
        debug!("Sending generation request to model {}", request.model_id);

        let response: GenerateContentResponse = self.post_json(&url, &body).await?;
        let text = first_text_part(&response).unwrap_or_default();
        let posts = parse_posts_payload(&text)?;
        info!("Parsed {} posts from provider", posts.len());
        Ok(posts)
    }

    async fn generate_visual(
        &self,
        prompt: &str,
        mood: Mood,
        scene: Scene,
        style: ImageStyle,
    ) -> Result<Option<Visual>, GeminiError> {
        match style {
            ImageStyle::Animated => self.generate_animated(prompt, mood, scene).await,
            _ => self.generate_image(prompt, mood, scene, style).await,
        }
    }
}

/// Wrap a visual prompt with scene context, the effective style modifier and
/// the fixed requirements block.
pub fn enrich_visual_prompt(prompt: &str, mood: Mood, scene: Scene, style: ImageStyle) -> String {
    format!(
        "畫面描述：{}。\n場景背景：{}。\n{}\n\n通用要求：\n\
         1. 若畫面中出現文字（如招牌、螢幕、手寫筆記），必須是繁體中文。\n\
         2. 視覺元素應貼近亞洲/台灣現代生活日常。\n\
         3. 圖片比例為 1:1 (Instagram/Threads 風格)。\n",
        prompt,
        scene.label(),
        effective_modifier(style, mood),
    )
}

/// Strictly parse the provider's text payload against the declared schema:
/// a JSON array of post objects. An empty payload or empty array is a valid
/// zero-item result.
pub fn parse_posts_payload(text: &str) -> Result<Vec<Post>, GeminiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<Post>>(trimmed)
        .map_err(|e| GeminiError::SchemaMismatch(e.to_string()))
}

/// Classify a non-success HTTP status. The provider reports an invalid or
/// missing key as 404 ("entity not found") on the model path; 401/403 get
/// the same recovery, so they fold into `Auth`.
pub fn map_status_error(status: u16, body: &str) -> GeminiError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{}: {}", status_text, msg)
            }
        })
        .unwrap_or_else(|_| body.to_string());

    match status {
        401 | 403 | 404 => GeminiError::Auth(message),
        _ => {
            warn!("Provider returned HTTP {}: {}", status, message);
            GeminiError::Provider {
                status: Some(status),
                message,
            }
        }
    }
}

fn first_text_part(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|part| part.text.clone())
}

fn find_inline_image(response: &GenerateContentResponse) -> Option<Visual> {
    response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|part| {
            part.inline_data.as_ref().map(|inline| Visual::Image {
                mime_type: inline.mime_type.clone(),
                data: inline.data.clone(),
            })
        })
}

// Wire types

#[derive(Debug, Serialize)]
struct GenerateContentBody {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfigPayload>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<PartPayload>,
}

impl Content {
    fn user_text(text: String) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![PartPayload { text }],
        }
    }

    fn system_text(text: String) -> Self {
        Self {
            role: "system".to_string(),
            parts: vec![PartPayload { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct PartPayload {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfigPayload {
    response_mime_type: String,
    response_schema: serde_json::Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "inlineData")]
    inline_data: Option<InlineDataResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataResponse {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct VideoGenerationBody {
    instances: Vec<VideoInstance>,
    parameters: VideoParameters,
}

#[derive(Debug, Serialize)]
struct VideoInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoParameters {
    number_of_videos: u32,
    resolution: String,
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
struct VideoOperation {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<VideoOperationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoOperationResult {
    #[serde(default)]
    generated_videos: Vec<GeneratedVideo>,
}

#[derive(Debug, Deserialize)]
struct GeneratedVideo {
    #[serde(default)]
    video: Option<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    #[serde(default)]
    uri: Option<String>,
}
