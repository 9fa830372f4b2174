//! Visual style lookup tables
//!
//! Total mappings from image style and mood to the fixed zh-TW modifier
//! strings appended to visual-generation prompts. Kept as plain match tables
//! so they stay exhaustive and testable without touching the network.

use crate::models::{ImageStyle, Mood, Scene};

/// Fallback used when no dedicated modifier applies
pub const FALLBACK_MODIFIER: &str = "風格：台灣日常質感，生活化，真實感。";

/// Style modifier for an explicitly chosen image style.
///
/// `Default` and `Animated` fall through to the mood-based table; see
/// [`effective_modifier`].
pub fn style_modifier(style: ImageStyle) -> &'static str {
    match style {
        ImageStyle::Japanese => {
            "風格：日系攝影，自然光，過曝高光，青藍色調(Cyan bias)，低對比，清新空氣感，膠片質感。"
        }
        ImageStyle::Korean => {
            "風格：韓系IG質感，低飽和度，米色/奶油色調(Beige tone)，乾淨簡約，柔光，極簡構圖。"
        }
        ImageStyle::Realistic => {
            "風格：高畫質寫實攝影，4K解析度，銳利清晰，光影細節豐富，像國家地理雜誌或專業商業攝影，真實感。"
        }
        ImageStyle::Illustration => {
            "風格：溫馨手繪插畫，柔和線條，水彩或色鉛筆質感，療癒系，色彩粉嫩，非寫實。"
        }
        ImageStyle::Cyberpunk => {
            "風格：賽博龐克(Cyberpunk)，霓虹燈光，藍紫色與洋紅色系，高科技低生活，未來感，夜晚城市，強烈對比。"
        }
        ImageStyle::Vintage => {
            "風格：90年代復古底片，顆粒感(Grainy)，漏光效果，暖黃色調，懷舊氛圍，Lomo風格。"
        }
        ImageStyle::Default | ImageStyle::Animated => FALLBACK_MODIFIER,
    }
}

/// Mood-based modifier, used when the style is `Default`.
pub fn mood_modifier(mood: Mood) -> &'static str {
    match mood {
        Mood::Cynical => {
            "風格：低飽和度、冷色調、黑白攝影或青藍色濾鏡、高對比、孤寂感、陰影強烈、底片顆粒感。"
        }
        Mood::Chill => {
            "風格：柔和自然光、暖色調、低對比、日系空氣感、像是在咖啡廳或戶外的愜意氛圍、莫蘭迪色系。"
        }
        Mood::Emo => {
            "風格：暗色調、藍紫色系、霓虹燈光、模糊失焦(Bokeh)、雨天或夜晚窗景、王家衛電影風格、孤獨感。"
        }
        Mood::Funny => {
            "風格：高飽和度、鮮豔色彩、迷因(Meme)風格、誇張構圖、像漫畫或普普藝術(Pop Art)、清晰明亮。"
        }
        Mood::Motivational => {
            "風格：明亮採光、黃金時刻(Golden Hour)、清新簡約、充滿希望的感覺、由下往上的視角、乾淨的背景。"
        }
        Mood::Nonsense => {
            "風格：隨手拍質感、低畫質復古感(Lo-fi)、生活碎片、不經意的構圖、真實不做作。"
        }
    }
}

/// The modifier actually applied: an explicit style overrides the mood-based
/// fallback.
pub fn effective_modifier(style: ImageStyle, mood: Mood) -> &'static str {
    match style {
        ImageStyle::Default | ImageStyle::Animated => mood_modifier(mood),
        other => style_modifier(other),
    }
}

/// Example keyword hints shown in the session's keyword input, per scene.
pub fn scene_placeholder(scene: Scene) -> &'static str {
    match scene {
        Scene::Work => "例如：週一症候群、慣老闆、想離職...",
        Scene::Relationship => "例如：曖昧對象、前任、單身...",
        Scene::Daily => "例如：天氣、晚餐吃什麼、失眠...",
        Scene::Weekend => "例如：宅在家、咖啡廳、不想收假...",
        Scene::Trending => "例如：奧運、AI話題、最新迷因、颱風...",
    }
}
