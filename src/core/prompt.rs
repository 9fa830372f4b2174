//! Prompt construction
//!
//! Pure transform from selector state plus an explicit clock reading into the
//! instruction, system instruction and response schema sent to the provider.
//! The clock is an input, never read ambiently, so every output is
//! reproducible in tests.

use chrono::{Datelike, Timelike, Weekday};
use serde_json::{json, Value};

use crate::models::{GenerationConfig, Selection};

/// Fixed system-level persona for text generation
pub const SYSTEM_INSTRUCTION: &str = "You are a creative writer for social media, specializing in the 'Threads' app style. You are extremely sensitive to the current context (time of day, day of week) and adjust the tone accordingly to maximize relatability.";

/// Everything the provider call needs for one text generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model_id: String,
    pub instruction: String,
    pub system_instruction: String,
    pub response_schema: Value,
    pub temperature: f32,
}

/// Coarse temporal category folded into the prompt as a tone directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSlot {
    MondayMorning,
    WorkHours,
    FridayNight,
    SundayNight,
    LateNight,
    Weekend,
    OffHours,
}

/// Category boundaries (hours, local time). Configuration, not an invariant
/// callers must enforce.
#[derive(Debug, Clone)]
pub struct SlotBoundaries {
    /// Late-night window start, inclusive
    pub late_night_start: u32,
    /// Late-night window end, exclusive
    pub late_night_end: u32,
    /// Morning window for Monday dread, inclusive/exclusive
    pub morning_start: u32,
    pub morning_end: u32,
    /// Weekday office-hours window, inclusive/exclusive
    pub work_start: u32,
    pub work_end: u32,
    /// Friday liberation starts here
    pub friday_evening_start: u32,
    /// Sunday dread starts here
    pub sunday_evening_start: u32,
}

impl Default for SlotBoundaries {
    fn default() -> Self {
        Self {
            late_night_start: 22,
            late_night_end: 4,
            morning_start: 5,
            morning_end: 12,
            work_start: 9,
            work_end: 18,
            friday_evening_start: 15,
            sunday_evening_start: 17,
        }
    }
}

impl TimeSlot {
    /// Classify a clock reading with the default boundaries.
    pub fn classify<T: Datelike + Timelike>(now: &T) -> Self {
        Self::classify_with(now, &SlotBoundaries::default())
    }

    /// Late night wins over everything; day-specific slots win over the
    /// generic office-hours window.
    pub fn classify_with<T: Datelike + Timelike>(now: &T, bounds: &SlotBoundaries) -> Self {
        let hour = now.hour();
        let weekday = now.weekday();

        if hour >= bounds.late_night_start || hour < bounds.late_night_end {
            return TimeSlot::LateNight;
        }
        match weekday {
            Weekday::Mon if hour >= bounds.morning_start && hour < bounds.morning_end => {
                TimeSlot::MondayMorning
            }
            Weekday::Fri if hour >= bounds.friday_evening_start => TimeSlot::FridayNight,
            Weekday::Sun if hour >= bounds.sunday_evening_start => TimeSlot::SundayNight,
            Weekday::Sat | Weekday::Sun => TimeSlot::Weekend,
            _ if hour >= bounds.work_start && hour < bounds.work_end => TimeSlot::WorkHours,
            _ => TimeSlot::OffHours,
        }
    }

    /// Tone directive folded into the prompt for this slot.
    pub fn tone_directive(&self) -> &'static str {
        match self {
            TimeSlot::MondayMorning => "強調眼神死、不想面對、咖啡續命。",
            TimeSlot::WorkHours => "強調薪水小偷、想下班、職場荒謬。",
            TimeSlot::FridayNight => "強調快樂、解放、微醺、週末計畫。",
            TimeSlot::SundayNight => "強調焦慮、不想收假。",
            TimeSlot::LateNight => "強調感性、孤寂、肚子餓(宵夜文)或發瘋語錄。",
            TimeSlot::Weekend => "強調放鬆、耍廢、補眠、出門晃晃的小確幸。",
            TimeSlot::OffHours => "強調下班後的自由、小確幸、或累到不想動。",
        }
    }
}

fn zh_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

/// Local time rendered the way the prompt expects it, e.g.
/// "2023年10月27日 星期五 22:30".
pub fn format_zh_time<T: Datelike + Timelike>(now: &T) -> String {
    format!(
        "{}年{}月{}日 {} {:02}:{:02}",
        now.year(),
        now.month(),
        now.day(),
        zh_weekday(now.weekday()),
        now.hour(),
        now.minute()
    )
}

/// Declared response schema: array of post objects. `visualPrompt` is
/// required only when visual prompts are requested.
pub fn response_schema(include_visual: bool) -> Value {
    let mut required = vec!["content", "tags"];
    if include_visual {
        required.push("visualPrompt");
    }
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "content": {
                    "type": "STRING",
                    "description": "The main text content of the Threads post. Should be engaging and natural.",
                },
                "tags": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Relevant hashtags without the # symbol.",
                },
                "visualPrompt": {
                    "type": "STRING",
                    "description": "An English scene description for generating a visual that matches the post's tone.",
                },
            },
            "required": required,
        },
    })
}

/// Build the full generation request for the current selection and clock.
pub fn build_generation_request<T: Datelike + Timelike>(
    selection: &Selection,
    now: &T,
    config: &GenerationConfig,
) -> GenerationRequest {
    let slot = TimeSlot::classify(now);
    let time_string = format_zh_time(now);

    let mut instruction = format!(
        "你是一位 Threads 社群平台的高人氣創作者，擅長用繁體中文撰寫高互動率的貼文。\n\
         請根據以下設定，創作出 {} 則不同角度的短文：\n\n\
         1.  **心情基調**: {}\n\
         2.  **應用場景**: {}\n\
         3.  **當下時間**: {} (非常重要！內容必須與此時間點有強烈連結)\n",
        config.post_count,
        selection.mood.label(),
        selection.scene.label(),
        time_string,
    );

    if !selection.keywords().is_empty() {
        instruction.push_str(&format!(
            "4.  **指定關鍵字**: {} (每個關鍵字都必須原樣出現在貼文中，且至少使用一次)\n",
            selection.keywords().join("、"),
        ));
    }

    instruction.push_str(&format!(
        "\n**時間感優化要求**:\n-   請判斷「當下時間」是平日還是週末？是白天、上班時間、下班時間還是深夜？\n-   {}\n",
        slot.tone_directive(),
    ));

    instruction.push_str(&format!(
        "\n**撰寫風格要求**:\n\
         -   **口語化**: 就像在跟朋友聊天，或是自言自語。\n\
         -   **Threads 風格**: 可以是片段的、沒頭沒尾的、稍微情緒化的，或者帶有網路流行梗。\n\
         -   **長度**: 每則貼文控制在 {}-{} 字之間，簡短有力。\n\
         -   **格式**: 不要使用 markdown 標題，直接給我內容。\n\
         -   **Hashtag**: 針對每則貼文附上 {}-{} 個適合的 hashtag。\n",
        config.min_content_chars,
        config.max_content_chars,
        config.min_tags,
        config.max_tags,
    ));

    if config.visual_prompts {
        instruction.push_str(
            "-   **視覺描述**: 針對每則貼文附上 visualPrompt，一段英文的畫面描述，用於生成符合貼文氛圍的圖片。\n",
        );
    }

    instruction.push_str("\n請直接回傳 JSON 格式陣列。\n");

    GenerationRequest {
        model_id: selection.model.model_id().to_string(),
        instruction,
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        response_schema: response_schema(config.visual_prompts),
        temperature: config.temperature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelVersion, Mood, Scene};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_time_slot_classification() {
        // 2025-03-10 is a Monday
        assert_eq!(TimeSlot::classify(&at(2025, 3, 10, 8, 30)), TimeSlot::MondayMorning);
        // Tuesday during office hours
        assert_eq!(TimeSlot::classify(&at(2025, 3, 11, 14, 0)), TimeSlot::WorkHours);
        // Friday evening
        assert_eq!(TimeSlot::classify(&at(2025, 3, 14, 19, 0)), TimeSlot::FridayNight);
        // Sunday evening
        assert_eq!(TimeSlot::classify(&at(2025, 3, 16, 20, 0)), TimeSlot::SundayNight);
        // Saturday afternoon
        assert_eq!(TimeSlot::classify(&at(2025, 3, 15, 14, 0)), TimeSlot::Weekend);
        // Weekday evening after work hours
        assert_eq!(TimeSlot::classify(&at(2025, 3, 11, 20, 0)), TimeSlot::OffHours);
    }

    #[test]
    fn test_late_night_wins_over_everything() {
        // Friday 23:00 is late night, not Friday night
        assert_eq!(TimeSlot::classify(&at(2025, 3, 14, 23, 0)), TimeSlot::LateNight);
        // Monday 03:00 is late night, not Monday morning
        assert_eq!(TimeSlot::classify(&at(2025, 3, 10, 3, 0)), TimeSlot::LateNight);
    }

    #[test]
    fn test_tone_directives_are_total() {
        for slot in [
            TimeSlot::MondayMorning,
            TimeSlot::WorkHours,
            TimeSlot::FridayNight,
            TimeSlot::SundayNight,
            TimeSlot::LateNight,
            TimeSlot::Weekend,
            TimeSlot::OffHours,
        ] {
            assert!(slot.tone_directive().starts_with("強調"));
        }
    }

    #[test]
    fn test_format_zh_time() {
        assert_eq!(
            format_zh_time(&at(2023, 10, 27, 22, 30)),
            "2023年10月27日 星期五 22:30"
        );
    }

    #[test]
    fn test_keywords_appear_verbatim() {
        let mut selection = Selection::default();
        selection.add_keyword("颱風").unwrap();
        selection.add_keyword("放假").unwrap();

        let request =
            build_generation_request(&selection, &at(2025, 3, 11, 14, 0), &GenerationConfig::default());
        assert!(request.instruction.contains("颱風"));
        assert!(request.instruction.contains("放假"));
        assert!(request.instruction.contains("指定關鍵字"));
        assert!(request.instruction.contains("至少使用一次"));
    }

    #[test]
    fn test_keyword_directive_omitted_when_empty() {
        let selection = Selection::default();
        let request =
            build_generation_request(&selection, &at(2025, 3, 11, 14, 0), &GenerationConfig::default());
        assert!(!request.instruction.contains("指定關鍵字"));
    }

    #[test]
    fn test_instruction_embeds_selection_and_band() {
        let selection = Selection::new(Mood::Cynical, Scene::Work, ModelVersion::Flash);
        let config = GenerationConfig::default();
        let request = build_generation_request(&selection, &at(2025, 3, 10, 9, 0), &config);

        assert!(request.instruction.contains("厭世吐槽"));
        assert!(request.instruction.contains("職場社畜"));
        assert!(request.instruction.contains("4 則"));
        assert!(request.instruction.contains("20-80 字"));
        assert!(request.instruction.contains("1-3 個"));
        // Monday morning tone folded in
        assert!(request.instruction.contains("咖啡續命"));
        assert_eq!(request.model_id, "gemini-2.5-flash");
        assert_eq!(request.temperature, 1.2);
    }

    #[test]
    fn test_response_schema_visual_prompt_requirement() {
        let schema = response_schema(true);
        let required = schema["items"]["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "visualPrompt"));

        let schema = response_schema(false);
        let required = schema["items"]["required"].as_array().unwrap();
        assert!(!required.iter().any(|v| v == "visualPrompt"));
        assert!(required.iter().any(|v| v == "content"));
        assert!(required.iter().any(|v| v == "tags"));
    }

    #[test]
    fn test_visual_prompt_instruction_follows_config() {
        let selection = Selection::default();
        let mut config = GenerationConfig::default();
        config.visual_prompts = false;
        let request = build_generation_request(&selection, &at(2025, 3, 11, 14, 0), &config);
        assert!(!request.instruction.contains("visualPrompt"));

        config.visual_prompts = true;
        let request = build_generation_request(&selection, &at(2025, 3, 11, 14, 0), &config);
        assert!(request.instruction.contains("visualPrompt"));
    }

    #[test]
    fn test_referential_transparency() {
        let mut selection = Selection::default();
        selection.add_keyword("颱風").unwrap();
        let config = GenerationConfig::default();
        let now = at(2025, 3, 11, 14, 0);

        let a = build_generation_request(&selection, &now, &config);
        let b = build_generation_request(&selection, &now, &config);
        assert_eq!(a.instruction, b.instruction);
        assert_eq!(a.response_schema, b.response_schema);
    }
}
