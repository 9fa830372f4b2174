use chrono::Local;
use std::path::PathBuf;
use tracing::info;

use crate::core::{build_generation_request, CardController, GeminiClient, Provider};
use crate::error::{GeminiError, Result, ThreadsmithError};
use crate::models::{Config, ModelVersion, Mood, Post, Scene, Selection};

/// Options for the one-shot generate command
pub struct GenerateOptions {
    pub mood: Mood,
    pub scene: Scene,
    pub model: ModelVersion,
    /// Up to five keywords, each used verbatim at least once
    pub keywords: Vec<String>,
    /// Override generation.post_count (4 or 8)
    pub count: Option<usize>,
    /// Override the request timeout in seconds
    pub timeout: Option<u64>,
    /// Print the prompt and schema without calling the provider
    pub dry_run: bool,
    /// Emit the raw post list as JSON instead of cards
    pub json: bool,
}

/// Build the prompt from the selectors, call the provider once, render the
/// results.
pub async fn run_generate(project_root: &PathBuf, options: GenerateOptions) -> Result<()> {
    let config =
        Config::load_from_dir(project_root)?.with_overrides(options.count, options.timeout);
    config.validate()?;

    let mut selection = Selection::new(options.mood, options.scene, options.model);
    for keyword in &options.keywords {
        selection.add_keyword(keyword)?;
    }

    let request = build_generation_request(&selection, &Local::now(), &config.generation);

    if options.dry_run {
        println!("=== DRY RUN ===\n");
        println!("Model: {}\n", request.model_id);
        println!("{}", request.instruction);
        println!(
            "Response schema:\n{}",
            serde_json::to_string_pretty(&request.response_schema).unwrap_or_default()
        );
        println!("\nRun without --dry-run to call the provider.");
        return Ok(());
    }

    let api_key = config.gemini.api_key().ok_or_else(|| {
        ThreadsmithError::Gemini(GeminiError::Auth(format!(
            "set the {} environment variable, or use `threadsmith session` to enter a key",
            config.gemini.api_key_env
        )))
    })?;

    let client = GeminiClient::new(config.gemini.clone(), config.video.clone(), api_key)?;
    info!(
        "Generating {} posts ({} / {})",
        config.generation.post_count,
        selection.mood.label(),
        selection.scene.label()
    );

    let posts = client
        .generate_posts(&request)
        .await
        .map_err(ThreadsmithError::from)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&posts).unwrap_or_default());
        return Ok(());
    }

    if posts.is_empty() {
        println!("沒有生成任何貼文，請稍後再試。");
        return Ok(());
    }

    for post in &posts {
        let card = CardController::new();
        println!("{}", render_card(post, &card));
    }
    println!("{} 則貼文生成完成。", posts.len());
    Ok(())
}

/// Terminal rendition of one post card.
pub fn render_card(post: &Post, card: &CardController) -> String {
    let mut out = String::new();
    out.push_str("────────────────────────────────────────\n");
    out.push_str("daily_murmur · 剛剛\n\n");
    out.push_str(&post.content);
    out.push('\n');

    if !post.tags.is_empty() {
        let hashtags = post
            .tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ");
        out.push('\n');
        out.push_str(&hashtags);
        out.push('\n');
    }

    if let Some(visual_prompt) = &post.visual_prompt {
        out.push_str(&format!("\n[視覺提示] {}\n", visual_prompt));
    }

    let engagement = card.engagement();
    out.push_str(&format!(
        "\n❤ {}   ↺ {}   💬 {}\n",
        engagement.likes(),
        engagement.reposts(),
        engagement.comments()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_render_card_shows_content_tags_and_counters() {
        let mut post = Post::new("上班好累", vec!["社畜".to_string()]);
        post.visual_prompt = Some("a tired office worker at dawn".to_string());
        let card = CardController::with_rng(&mut StdRng::seed_from_u64(1));

        let text = render_card(&post, &card);
        assert!(text.contains("上班好累"));
        assert!(text.contains("#社畜"));
        assert!(text.contains("[視覺提示] a tired office worker at dawn"));
        assert!(text.contains('❤'));
    }

    #[test]
    fn test_render_card_without_tags_or_visual() {
        let post = Post::new("純廢文", vec![]);
        let card = CardController::with_rng(&mut StdRng::seed_from_u64(1));
        let text = render_card(&post, &card);
        assert!(text.contains("純廢文"));
        assert!(!text.contains('#'));
        assert!(!text.contains("視覺提示"));
    }
}
