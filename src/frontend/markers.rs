//! Overlay marker presentation
//!
//! Maps renderer-agnostic scene colours and overlay kinds onto egui colours
//! and legend labels. Markers sharing a label are grouped in the legend.

use egui::Color32;

use crate::editor::{MarkerCategory, OverlayKind};
use crate::types::Rgb;

/// Convert a scene colour to an egui colour
pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Legend label for an overlay kind
pub fn legend_name(kind: &OverlayKind) -> String {
    match kind {
        OverlayKind::Selection { .. } => "Selected".to_string(),
        OverlayKind::Peak { .. } => "Peaks".to_string(),
        OverlayKind::Custom { category } => category_name(*category),
    }
}

/// Display name for a custom marker category
pub fn category_name(category: MarkerCategory) -> String {
    format!("Marker {}", category.key())
}

/// Hint listing the marker keys and their colours' names
pub fn key_hint() -> String {
    let keys: Vec<String> = MarkerCategory::all()
        .iter()
        .map(|c| format!("{} {}", c.key(), colour_name(c.color())))
        .collect();
    format!("Hover the plot and press {} to drop a marker", keys.join(", "))
}

fn colour_name(rgb: Rgb) -> &'static str {
    match rgb {
        Rgb::PINK => "pink",
        Rgb::CYAN => "cyan",
        Rgb::RED => "red",
        Rgb::DARK_BLUE => "dark blue",
        Rgb::GREEN => "green",
        Rgb::BLUE => "blue",
        Rgb::PURPLE => "purple",
        _ => "custom",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_color32() {
        assert_eq!(to_color32(Rgb::RED), Color32::from_rgb(255, 0, 0));
        assert_eq!(to_color32(Rgb::DARK_BLUE), Color32::from_rgb(0, 0, 139));
    }

    #[test]
    fn test_legend_names() {
        assert_eq!(legend_name(&OverlayKind::Selection { index: 3 }), "Selected");
        assert_eq!(legend_name(&OverlayKind::Peak { index: 0 }), "Peaks");
        assert_eq!(
            legend_name(&OverlayKind::Custom {
                category: MarkerCategory::Two
            }),
            "Marker 2"
        );
    }

    #[test]
    fn test_key_hint_mentions_every_category() {
        let hint = key_hint();
        assert!(hint.contains("0 pink"));
        assert!(hint.contains("2 red"));
        assert!(hint.contains("3 dark blue"));
    }
}
