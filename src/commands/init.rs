use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::error::Result;

const DEFAULT_CONFIG: &str = r#"# threadsmith configuration

[gemini]
# base_url = "https://generativelanguage.googleapis.com/v1beta"
# image_model = "gemini-2.5-flash-image"
# video_model = "veo-3.1-fast-generate-preview"
# timeout_seconds = 120
# Environment variable holding the API key
# api_key_env = "GEMINI_API_KEY"

[generation]
# Posts per generation: 4 or 8
# post_count = 4
# temperature = 1.2
# min_content_chars = 20
# max_content_chars = 80
# min_tags = 1
# max_tags = 3
# visual_prompts = true

[video]
# poll_interval_seconds = 5
# max_poll_attempts = 60
# resolution = "720p"
# aspect_ratio = "16:9"
# media_dir = "media"

[behavior]
# clipboard = true
"#;

/// Write a commented starter threadsmith.toml. Existing files are left
/// untouched.
pub fn init_project(project_root: &PathBuf) -> Result<()> {
    let config_path = project_root.join("threadsmith.toml");
    if config_path.exists() {
        println!("threadsmith.toml already exists, leaving it as is.");
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)?;
    info!("Created {}", config_path.display());
    println!("Created threadsmith.toml");
    println!("Set your API key: export GEMINI_API_KEY=...");
    Ok(())
}
