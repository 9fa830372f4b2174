use chrono::Local;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::commands::generate::render_card;
use crate::core::{
    build_generation_request, compose_url, scene_placeholder, CardController, GeminiClient,
    ImagePanel, Provider, Visual,
};
use crate::error::{GeminiError, Result, ThreadsmithError};
use crate::models::{Config, ImageStyle, ModelVersion, Mood, Scene, Selection, MAX_KEYWORDS};

/// Interactive session state: selectors, the post store, and one card
/// controller per rendered post. Generic over the provider so tests drive it
/// with a fake.
pub struct Session<P: Provider> {
    provider: P,
    config: Config,
    selection: Selection,
    store: crate::core::PostStore,
    cards: Vec<CardController>,
}

impl<P: Provider> Session<P> {
    pub fn new(config: Config, provider: P) -> Self {
        Self {
            provider,
            config,
            selection: Selection::default(),
            store: crate::core::PostStore::new(),
            cards: Vec::new(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn store(&self) -> &crate::core::PostStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut crate::core::PostStore {
        &mut self.store
    }

    pub fn card(&self, index: usize) -> Option<&CardController> {
        self.cards.get(index)
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut CardController> {
        self.cards.get_mut(index)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Swap in a fresh provider, e.g. after re-entering the credential.
    pub fn replace_provider(&mut self, provider: P) {
        self.provider = provider;
    }

    /// One generation round-trip: build the prompt from current selectors,
    /// call the provider, apply the results under a staleness ticket.
    /// Returns how many posts are now rendered.
    pub async fn generate(&mut self) -> std::result::Result<usize, GeminiError> {
        let request =
            build_generation_request(&self.selection, &Local::now(), &self.config.generation);
        let ticket = self.store.begin_generation();

        let posts = self.provider.generate_posts(&request).await?;
        let count = posts.len();
        if self.store.apply_generation(ticket, posts) {
            self.cards = (0..count).map(|_| CardController::new()).collect();
        }
        Ok(count)
    }

    /// Commit the card's drafts back into the store. Returns whether an edit
    /// was actually committed.
    pub fn commit_edit(&mut self, index: usize) -> bool {
        let Some(card) = self.cards.get_mut(index) else {
            return false;
        };
        match card.save_edit() {
            Some((content, tags)) => self.store.edit_post(index, &content, &tags),
            None => false,
        }
    }

    /// Request a visual for one card. Opens the panel if needed, clears a
    /// previous result, and displays the new one. Returns whether a visual
    /// is now displayed.
    pub async fn request_visual(
        &mut self,
        index: usize,
        style: ImageStyle,
    ) -> std::result::Result<bool, GeminiError> {
        let Some(post) = self.store.posts().get(index) else {
            return Ok(false);
        };
        let prompt = post
            .visual_prompt
            .clone()
            .unwrap_or_else(|| post.content.clone());
        let mood = self.selection.mood;
        let scene = self.selection.scene;

        {
            let Some(card) = self.cards.get_mut(index) else {
                return Ok(false);
            };
            if matches!(card.image_panel(), ImagePanel::Displaying(_)) {
                card.regenerate();
            }
            if *card.image_panel() == ImagePanel::Closed {
                card.toggle_image_panel();
            }
        }

        let visual = self.provider.generate_visual(&prompt, mood, scene, style).await?;

        match (self.cards.get_mut(index), visual) {
            (Some(card), Some(v)) => Ok(card.image_generated(v)),
            _ => Ok(false),
        }
    }

    /// Fully formatted text for copy, or `None` for a bad index.
    pub fn copy_text(&self, index: usize) -> Option<String> {
        self.store.posts().get(index).map(|p| p.full_text())
    }

    /// Compose link for publishing, or `None` for a bad index.
    pub fn publish_url(&self, index: usize) -> Option<String> {
        self.store.posts().get(index).map(compose_url)
    }

    fn media_dir(&self) -> PathBuf {
        self.config
            .video
            .media_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Entry point for `threadsmith session`.
pub async fn run_session(project_root: &PathBuf) -> Result<()> {
    let config = Config::load_from_dir(project_root)?;

    let api_key = match config.gemini.api_key() {
        Some(key) => key,
        None => prompt_for_api_key(&config)?,
    };

    let client = GeminiClient::new(config.gemini.clone(), config.video.clone(), api_key)?;
    let mut session = Session::new(config, client);
    info!("Interactive session started");
    run_loop(&mut session).await
}

/// Credential-selection flow: the key is missing or rejected, ask for a new
/// one instead of crashing.
fn prompt_for_api_key(config: &Config) -> Result<String> {
    println!(
        "未偵測到 API 金鑰（環境變數 {} 未設定）。",
        config.gemini.api_key_env
    );
    let key: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("請輸入 Gemini API 金鑰")
        .interact()
        .map_err(ui_err)?;
    Ok(key)
}

fn ui_err(err: dialoguer::Error) -> ThreadsmithError {
    match err {
        dialoguer::Error::IO(io) => ThreadsmithError::Io(io),
    }
}

async fn run_loop(session: &mut Session<GeminiClient>) -> Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        println!();
        print_status(session);

        let choice = Select::with_theme(&theme)
            .with_prompt("Threads 靈感生成器")
            .items(&[
                "✨ 生成靈感",
                "心情基調",
                "應用場景",
                "模型版本",
                "關鍵字",
                "瀏覽貼文",
                "搜尋貼文",
                "排程清單",
                "離開",
            ])
            .default(0)
            .interact()
            .map_err(ui_err)?;

        match choice {
            0 => generate_step(session).await?,
            1 => {
                let labels: Vec<&str> = Mood::ALL.iter().map(|m| m.label()).collect();
                let picked = Select::with_theme(&theme)
                    .with_prompt("心情基調")
                    .items(&labels)
                    .default(0)
                    .interact()
                    .map_err(ui_err)?;
                session.selection_mut().mood = Mood::ALL[picked];
            }
            2 => {
                let labels: Vec<&str> = Scene::ALL.iter().map(|s| s.label()).collect();
                let picked = Select::with_theme(&theme)
                    .with_prompt("應用場景")
                    .items(&labels)
                    .default(0)
                    .interact()
                    .map_err(ui_err)?;
                session.selection_mut().scene = Scene::ALL[picked];
            }
            3 => {
                let labels: Vec<&str> = ModelVersion::ALL.iter().map(|m| m.label()).collect();
                let picked = Select::with_theme(&theme)
                    .with_prompt("模型版本")
                    .items(&labels)
                    .default(0)
                    .interact()
                    .map_err(ui_err)?;
                session.selection_mut().model = ModelVersion::ALL[picked];
            }
            4 => keywords_step(session)?,
            5 => browse_step(session).await?,
            6 => {
                let query: String = Input::with_theme(&theme)
                    .with_prompt("搜尋關鍵字或標籤（留空顯示全部）")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(ui_err)?;
                session.store_mut().set_search_query(query);
                let hits = session.store().filtered().len();
                println!("符合 {} / {} 則。", hits, session.store().posts().len());
            }
            7 => schedule_list_step(session)?,
            _ => break,
        }
    }
    Ok(())
}

fn print_status<P: Provider>(session: &Session<P>) {
    let selection = session.selection();
    let keywords = if selection.keywords().is_empty() {
        "無".to_string()
    } else {
        selection.keywords().join("、")
    };
    println!(
        "目前設定：{} / {} / {}｜關鍵字：{}｜貼文 {} 則｜排程 {} 筆",
        selection.mood.label(),
        selection.scene.label(),
        selection.model.label(),
        keywords,
        session.store().posts().len(),
        session.store().scheduled().len()
    );
}

async fn generate_step(session: &mut Session<GeminiClient>) -> Result<()> {
    println!("思考廢文中...");
    match session.generate().await {
        Ok(0) => println!("沒有生成任何貼文，請稍後再試。"),
        Ok(count) => println!("生成 {} 則貼文。", count),
        Err(err) if err.is_auth() => {
            warn!("Credential rejected: {}", err);
            println!("{}", err.user_notice());
            // Re-enter the key and rebuild the client; the session survives.
            let key = prompt_for_api_key(&session.config)?;
            let client = GeminiClient::new(
                session.config.gemini.clone(),
                session.config.video.clone(),
                key,
            )?;
            session.replace_provider(client);
        }
        Err(err) => {
            warn!("Generation failed: {}", err);
            println!("{}", err.user_notice());
        }
    }
    Ok(())
}

fn keywords_step<P: Provider>(session: &mut Session<P>) -> Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        let keywords = session.selection().keywords().to_vec();
        println!(
            "關鍵字（{}/{}）：{}",
            keywords.len(),
            MAX_KEYWORDS,
            if keywords.is_empty() {
                "無".to_string()
            } else {
                keywords.join("、")
            }
        );

        let choice = Select::with_theme(&theme)
            .with_prompt("關鍵字")
            .items(&["新增", "移除", "清空", "返回"])
            .default(0)
            .interact()
            .map_err(ui_err)?;

        match choice {
            0 => {
                let hint = scene_placeholder(session.selection().scene);
                let keyword: String = Input::with_theme(&theme)
                    .with_prompt(format!("輸入關鍵字（{}）", hint))
                    .allow_empty(true)
                    .interact_text()
                    .map_err(ui_err)?;
                if keyword.trim().is_empty() {
                    continue;
                }
                if let Err(err) = session.selection_mut().add_keyword(&keyword) {
                    println!("{}", err);
                }
            }
            1 => {
                if keywords.is_empty() {
                    continue;
                }
                let picked = Select::with_theme(&theme)
                    .with_prompt("移除哪一個？")
                    .items(&keywords)
                    .default(0)
                    .interact()
                    .map_err(ui_err)?;
                session.selection_mut().remove_keyword(&keywords[picked]);
            }
            2 => session.selection_mut().clear_keywords(),
            _ => return Ok(()),
        }
    }
}

async fn browse_step(session: &mut Session<GeminiClient>) -> Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        // Indices into the full list, narrowed by the active search query
        let visible = session.store().filtered_indices();

        if visible.is_empty() {
            println!("沒有符合的貼文，先生成或清除搜尋條件。");
            return Ok(());
        }

        let mut items: Vec<String> = visible
            .iter()
            .map(|&i| {
                let post = &session.store().posts()[i];
                let mut label = post.content.chars().take(24).collect::<String>();
                if post.content.chars().count() > 24 {
                    label.push('…');
                }
                label
            })
            .collect();
        items.push("返回".to_string());

        let picked = Select::with_theme(&theme)
            .with_prompt("選擇貼文")
            .items(&items)
            .default(0)
            .interact()
            .map_err(ui_err)?;
        if picked == items.len() - 1 {
            return Ok(());
        }

        card_step(session, visible[picked]).await?;
    }
}

async fn card_step(session: &mut Session<GeminiClient>, index: usize) -> Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        let Some(card) = session.card(index) else {
            return Ok(());
        };
        println!("{}", render_card(&session.store().posts()[index], card));

        let choice = Select::with_theme(&theme)
            .with_prompt("貼文操作")
            .items(&[
                "複製",
                "編輯",
                "排程",
                "發布到 Threads",
                "生成圖片/動圖",
                "❤ 讚",
                "↺ 轉發",
                "返回",
            ])
            .default(0)
            .interact()
            .map_err(ui_err)?;

        match choice {
            0 => copy_step(session, index)?,
            1 => edit_step(session, index)?,
            2 => schedule_step(session, index)?,
            3 => publish_step(session, index),
            4 => visual_step(session, index).await?,
            5 => {
                if let Some(card) = session.cards.get_mut(index) {
                    let likes = card.toggle_like();
                    println!("❤ {}", likes);
                }
            }
            6 => {
                if let Some(card) = session.cards.get_mut(index) {
                    let reposts = card.toggle_repost();
                    println!("↺ {}", reposts);
                }
            }
            _ => return Ok(()),
        }
    }
}

fn copy_step(session: &Session<GeminiClient>, index: usize) -> Result<()> {
    let Some(text) = session.copy_text(index) else {
        return Ok(());
    };
    if session.config.behavior.clipboard {
        match copy_to_clipboard(&text) {
            Ok(()) => println!("已複製到剪貼簿！"),
            Err(err) => {
                // Clipboard failures degrade to printed text, never crash the card
                warn!("Clipboard failed: {}", err);
                println!("無法寫入剪貼簿，以下為貼文內容：\n{}", text);
            }
        }
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn edit_step(session: &mut Session<GeminiClient>, index: usize) -> Result<()> {
    let theme = ColorfulTheme::default();
    let post = session.store().posts()[index].clone();

    if let Some(card) = session.cards.get_mut(index) {
        if !card.start_edit(&post) {
            return Ok(());
        }
    }

    let content: String = Input::with_theme(&theme)
        .with_prompt("內容")
        .with_initial_text(post.content.clone())
        .interact_text()
        .map_err(ui_err)?;
    let tags: String = Input::with_theme(&theme)
        .with_prompt("標籤（空白或逗號分隔，# 可省略）")
        .with_initial_text(post.tags.join(" "))
        .allow_empty(true)
        .interact_text()
        .map_err(ui_err)?;

    let save = Confirm::with_theme(&theme)
        .with_prompt("儲存修改？")
        .default(true)
        .interact()
        .map_err(ui_err)?;

    if let Some(card) = session.cards.get_mut(index) {
        if save {
            card.set_draft(content, tags);
        } else {
            card.cancel_edit();
            println!("已取消。");
            return Ok(());
        }
    }
    if session.commit_edit(index) {
        println!("已儲存修改。");
    }
    Ok(())
}

fn schedule_step(session: &mut Session<GeminiClient>, index: usize) -> Result<()> {
    let theme = ColorfulTheme::default();
    let date: String = Input::with_theme(&theme)
        .with_prompt("日期 (YYYY-MM-DD)")
        .interact_text()
        .map_err(ui_err)?;
    let time: String = Input::with_theme(&theme)
        .with_prompt("時間 (HH:MM)")
        .interact_text()
        .map_err(ui_err)?;

    let when = format!("{} {}", date.trim(), time.trim());
    if let Some(scheduled) = session.store_mut().schedule(index, &when) {
        println!("已加入排程：{}", scheduled.scheduled_time);
    }
    Ok(())
}

fn publish_step(session: &Session<GeminiClient>, index: usize) {
    let Some(url) = session.publish_url(index) else {
        return;
    };
    match open::that(&url) {
        Ok(()) => println!("已開啟 Threads 發布頁面。"),
        Err(err) => {
            // Blocked or headless environments get the link instead of silence
            warn!("Could not open browser: {}", err);
            println!("無法開啟瀏覽器（{}），請手動開啟：\n{}", err, url);
        }
    }
}

async fn visual_step(session: &mut Session<GeminiClient>, index: usize) -> Result<()> {
    let theme = ColorfulTheme::default();
    let labels: Vec<&str> = ImageStyle::ALL.iter().map(|s| s.label()).collect();
    let picked = Select::with_theme(&theme)
        .with_prompt("視覺風格")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(ui_err)?;
    let style = ImageStyle::ALL[picked];

    println!("生成中，請稍候...");
    match session.request_visual(index, style).await {
        Ok(true) => {
            let media_dir = session.media_dir();
            if let Some(card) = session.card(index) {
                if let ImagePanel::Displaying(visual) = card.image_panel() {
                    match visual {
                        Visual::Video { path } => println!("影片已儲存：{}", path.display()),
                        Visual::Image { .. } => match visual.save(&media_dir) {
                            Ok(path) => println!("圖片已儲存：{}", path.display()),
                            Err(err) => println!("圖片無法寫入檔案：{}", err),
                        },
                    }
                }
            }
        }
        Ok(false) => println!("這次沒有拿到視覺素材，請再試一次。"),
        Err(err) => {
            warn!("Visual generation failed: {}", err);
            println!("{}", err.user_notice());
        }
    }
    Ok(())
}

fn schedule_list_step(session: &mut Session<GeminiClient>) -> Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        if session.store().scheduled().is_empty() {
            println!("排程清單是空的。");
            return Ok(());
        }

        let mut items: Vec<String> = session
            .store()
            .scheduled()
            .iter()
            .map(|s| format!("{}｜{}", s.scheduled_time, s.post.content))
            .collect();
        items.push("返回".to_string());

        let picked = Select::with_theme(&theme)
            .with_prompt(format!("排程清單（{} 筆）", items.len() - 1))
            .items(&items)
            .default(0)
            .interact()
            .map_err(ui_err)?;
        if picked == items.len() - 1 {
            return Ok(());
        }

        let scheduled = &session.store().scheduled()[picked];
        let id = scheduled.id.clone();
        let text = scheduled.post.full_text();

        let action = Select::with_theme(&theme)
            .with_prompt("排程操作")
            .items(&["複製內容", "刪除", "返回"])
            .default(0)
            .interact()
            .map_err(ui_err)?;
        match action {
            0 => match copy_to_clipboard(&text) {
                Ok(()) => println!("已複製到剪貼簿！"),
                Err(err) => {
                    warn!("Clipboard failed: {}", err);
                    println!("無法寫入剪貼簿，以下為貼文內容：\n{}", text);
                }
            },
            1 => {
                session.store_mut().unschedule(&id);
                println!("已刪除。");
            }
            _ => {}
        }
    }
}

/// Write plain UTF-8 text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| ThreadsmithError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| ThreadsmithError::Clipboard(e.to_string()))
}
