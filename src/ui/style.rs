use crate::data::destination::MarkerIcon;
use egui::{Color32, FontId, Stroke};

/// Visual styling for the destination map and its controls
#[derive(Debug, Clone)]
pub struct MapStyle {
    /// Shown behind tiles that have not arrived yet
    pub background_color: Color32,
    pub border_stroke: Stroke,
    pub zoom_controls: ZoomControlStyle,
    pub attribution: AttributionStyle,
    pub markers: MarkerStyle,
    pub user_location: UserLocationStyle,
    pub carousel: CarouselStyle,
}

#[derive(Debug, Clone)]
pub struct ZoomControlStyle {
    pub background_color: Color32,
    pub hover_color: Color32,
    pub text_color: Color32,
    pub border_stroke: Stroke,
    pub button_size: f32,
    /// Distance from the map's edge
    pub margin: f32,
    pub rounding: f32,
}

#[derive(Debug, Clone)]
pub struct AttributionStyle {
    pub text_color: Color32,
    pub background_color: Color32,
    pub font_id: FontId,
    pub padding: f32,
}

#[derive(Debug, Clone)]
pub struct MarkerStyle {
    pub radius: f32,
    pub selected_radius: f32,
    pub border_color: Color32,
    pub border_width: f32,
    pub glyph_font: FontId,
    pub label_font: FontId,
    pub label_color: Color32,
    pub label_background: Color32,
}

#[derive(Debug, Clone)]
pub struct UserLocationStyle {
    pub dot_color: Color32,
    pub dot_radius: f32,
    pub ring_color: Color32,
    pub ring_width: f32,
    /// Halo at its largest; fades as it grows
    pub halo_color: Color32,
}

#[derive(Debug, Clone)]
pub struct CarouselStyle {
    pub background_color: Color32,
    pub text_color: Color32,
    pub button_size: f32,
    pub width: f32,
    pub margin: f32,
    pub rounding: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgb(226, 232, 240),
            border_stroke: Stroke::new(1.0, Color32::from_rgb(203, 213, 225)),
            zoom_controls: ZoomControlStyle::default(),
            attribution: AttributionStyle::default(),
            markers: MarkerStyle::default(),
            user_location: UserLocationStyle::default(),
            carousel: CarouselStyle::default(),
        }
    }
}

impl Default for ZoomControlStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::WHITE,
            hover_color: Color32::from_rgb(241, 245, 249),
            text_color: Color32::from_rgb(30, 41, 59),
            border_stroke: Stroke::new(1.0, Color32::from_rgb(203, 213, 225)),
            button_size: 30.0,
            margin: 10.0,
            rounding: 4.0,
        }
    }
}

impl Default for AttributionStyle {
    fn default() -> Self {
        Self {
            text_color: Color32::from_rgba_unmultiplied(0, 0, 0, 180),
            background_color: Color32::from_rgba_unmultiplied(255, 255, 255, 160),
            font_id: FontId::proportional(10.0),
            padding: 4.0,
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 13.0,
            selected_radius: 17.0,
            border_color: Color32::WHITE,
            border_width: 2.0,
            glyph_font: FontId::proportional(13.0),
            label_font: FontId::proportional(12.0),
            label_color: Color32::from_rgb(15, 23, 42),
            label_background: Color32::from_rgba_unmultiplied(255, 255, 255, 220),
        }
    }
}

impl Default for UserLocationStyle {
    fn default() -> Self {
        Self {
            dot_color: Color32::from_rgb(37, 99, 235),
            dot_radius: 7.0,
            ring_color: Color32::WHITE,
            ring_width: 2.5,
            halo_color: Color32::from_rgb(59, 130, 246),
        }
    }
}

impl Default for CarouselStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgba_unmultiplied(255, 255, 255, 235),
            text_color: Color32::from_rgb(15, 23, 42),
            button_size: 32.0,
            width: 300.0,
            margin: 16.0,
            rounding: 8.0,
        }
    }
}

/// Marker fill for a category icon
pub fn icon_color(icon: &MarkerIcon) -> Color32 {
    let [r, g, b, a] = icon.color;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// `color` with its alpha scaled by `factor` (0..1)
pub fn fade(color: Color32, factor: f64) -> Color32 {
    color.gamma_multiply(factor.clamp(0.0, 1.0) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::destination::DestinationCategory;

    #[test]
    fn test_icon_color_matches_category() {
        let icon = DestinationCategory::Beach.icon();
        assert_eq!(icon_color(&icon), Color32::from_rgb(14, 165, 233));
    }

    #[test]
    fn test_fade_scales_alpha() {
        let faded = fade(Color32::from_rgb(59, 130, 246), 0.5);
        assert!((127..=128).contains(&faded.a()));
        assert_eq!(fade(Color32::WHITE, 0.0).a(), 0);
    }

    #[test]
    fn test_selected_markers_are_larger() {
        let style = MarkerStyle::default();
        assert!(style.selected_radius > style.radius);
    }
}
