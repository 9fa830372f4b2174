use crate::core::{mood_modifier, scene_placeholder, style_modifier};
use crate::error::Result;
use crate::models::{ImageStyle, ModelVersion, Mood, Scene};

/// Print the selectable moods, scenes, visual styles and model tiers.
pub fn show_styles() -> Result<()> {
    println!("心情基調:");
    for mood in Mood::ALL {
        println!("  {:<12} {}", format!("{:?}", mood).to_lowercase(), mood.label());
    }

    println!("\n應用場景:");
    for scene in Scene::ALL {
        println!(
            "  {:<12} {:<10} {}",
            format!("{:?}", scene).to_lowercase(),
            scene.label(),
            scene_placeholder(scene)
        );
    }

    println!("\n視覺風格:");
    for style in ImageStyle::ALL {
        println!("  {:<12} {}", format!("{:?}", style).to_lowercase(), style.label());
    }

    println!("\n模型版本:");
    for model in ModelVersion::ALL {
        println!(
            "  {:<12} {:<12} {}",
            format!("{:?}", model).to_lowercase(),
            model.label(),
            model.model_id()
        );
    }
    Ok(())
}

/// Print the full modifier tables for inspection.
pub fn show_modifiers() -> Result<()> {
    println!("風格修飾（明確選擇時）:");
    for style in ImageStyle::ALL {
        println!("  {}\n    {}", style.label(), style_modifier(style));
    }

    println!("\n心情修飾（未選風格時）:");
    for mood in Mood::ALL {
        println!("  {}\n    {}", mood.label(), mood_modifier(mood));
    }
    Ok(())
}
