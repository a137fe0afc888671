use crate::ui::style::{AttributionStyle, CarouselStyle, ZoomControlStyle};
use egui::{Align2, FontId, LayerId, Order, Painter, Pos2, Rect, Response, Sense, Ui, Vec2};

/// Painter for everything drawn over the map, clipped to it.
///
/// Tiles and markers are painted after the controls register, so the controls paint
/// on a foreground layer to stay on top of them.
pub fn overlay_painter(ui: &Ui, container: Rect) -> Painter {
    ui.ctx()
        .layer_painter(LayerId::new(Order::Foreground, ui.id().with("map-overlay")))
        .with_clip_rect(container)
}

/// Where a control sits inside the map rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    TopRight,
    BottomLeft,
    BottomCenter,
}

impl Position {
    pub fn calculate_rect(&self, container: Rect, size: Vec2, margin: f32) -> Rect {
        let pos = match self {
            Position::TopRight => Pos2::new(container.max.x - margin - size.x, container.min.y + margin),
            Position::BottomLeft => Pos2::new(container.min.x + margin, container.max.y - margin - size.y),
            Position::BottomCenter => {
                let x = container.center().x - size.x / 2.0;
                Pos2::new(x, container.max.y - margin - size.y)
            }
        };
        Rect::from_min_size(pos, size)
    }
}

/// What the user asked for through the on-map controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    ZoomIn,
    ZoomOut,
    Previous,
    Next,
}

/// Zoom in / zoom out buttons in the top-right corner
#[derive(Debug, Clone, Default)]
pub struct NavigationControl;

impl NavigationControl {
    /// Rects of the (+, −) buttons
    pub fn layout(container: Rect, style: &ZoomControlStyle) -> (Rect, Rect) {
        let size = Vec2::splat(style.button_size);
        let zoom_in = Position::TopRight.calculate_rect(container, size, style.margin);
        let zoom_out = zoom_in.translate(Vec2::new(0.0, size.y + 4.0));
        (zoom_in, zoom_out)
    }

    pub fn show(&self, ui: &mut Ui, container: Rect, style: &ZoomControlStyle) -> Option<ControlAction> {
        let (zoom_in, zoom_out) = Self::layout(container, style);
        let painter = overlay_painter(ui, container);
        let mut action = None;
        if control_button(ui, &painter, "nav-zoom-in", zoom_in, "+", style).clicked() {
            action = Some(ControlAction::ZoomIn);
        }
        if control_button(ui, &painter, "nav-zoom-out", zoom_out, "−", style).clicked() {
            action = Some(ControlAction::ZoomOut);
        }
        action
    }
}

fn control_button(
    ui: &mut Ui,
    painter: &Painter,
    id: &str,
    rect: Rect,
    text: &str,
    style: &ZoomControlStyle,
) -> Response {
    let response = ui.interact(rect, ui.id().with(id), Sense::click());
    let background = if response.hovered() {
        style.hover_color
    } else {
        style.background_color
    };
    painter.rect_filled(rect, style.rounding, background);
    painter.rect_stroke(rect, style.rounding, style.border_stroke);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(style.button_size * 0.6),
        style.text_color,
    );
    response
}

/// Rectangles making up the carousel panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselLayout {
    pub panel: Rect,
    pub previous: Rect,
    pub next: Rect,
}

/// Prev/next panel at the bottom of the map: "‹  Paoay Church · 2 of 5  ›"
#[derive(Debug, Clone, Default)]
pub struct CarouselControl;

impl CarouselControl {
    pub fn layout(container: Rect, style: &CarouselStyle) -> CarouselLayout {
        let height = style.button_size + 16.0;
        let width = style.width.min(container.width() - 2.0 * style.margin).max(height * 3.0);
        let panel = Position::BottomCenter.calculate_rect(container, Vec2::new(width, height), style.margin);

        let button = Vec2::splat(style.button_size);
        let previous = Rect::from_center_size(
            Pos2::new(panel.min.x + 8.0 + button.x / 2.0, panel.center().y),
            button,
        );
        let next = Rect::from_center_size(
            Pos2::new(panel.max.x - 8.0 - button.x / 2.0, panel.center().y),
            button,
        );
        CarouselLayout { panel, previous, next }
    }

    /// Draws the panel; nothing is drawn without a label (no destinations)
    pub fn show(
        &self,
        ui: &mut Ui,
        container: Rect,
        title: Option<&str>,
        label: Option<&str>,
        style: &CarouselStyle,
    ) -> Option<ControlAction> {
        let label = label?;
        let layout = Self::layout(container, style);
        let painter = overlay_painter(ui, container);
        painter.rect_filled(layout.panel, style.rounding, style.background_color);

        let text_center = layout.panel.center();
        match title {
            Some(title) => {
                painter.text(
                    text_center - Vec2::new(0.0, 8.0),
                    Align2::CENTER_CENTER,
                    title,
                    FontId::proportional(14.0),
                    style.text_color,
                );
                painter.text(
                    text_center + Vec2::new(0.0, 10.0),
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional(12.0),
                    style.text_color,
                );
            }
            None => {
                painter.text(
                    text_center,
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional(13.0),
                    style.text_color,
                );
            }
        }

        // covers the map so clicks and drags on the panel don't pan it; the buttons
        // register afterwards and sit on top of the panel
        ui.interact(layout.panel, ui.id().with("carousel-panel"), Sense::click_and_drag());

        let mut action = None;
        if carousel_button(ui, &painter, "carousel-prev", layout.previous, "‹", style).clicked() {
            action = Some(ControlAction::Previous);
        }
        if carousel_button(ui, &painter, "carousel-next", layout.next, "›", style).clicked() {
            action = Some(ControlAction::Next);
        }
        action
    }
}

fn carousel_button(
    ui: &mut Ui,
    painter: &Painter,
    id: &str,
    rect: Rect,
    text: &str,
    style: &CarouselStyle,
) -> Response {
    let response = ui.interact(rect, ui.id().with(id), Sense::click());
    let radius = rect.width() / 2.0;
    let fill = if response.hovered() {
        style.text_color.gamma_multiply(0.15)
    } else {
        style.text_color.gamma_multiply(0.08)
    };
    painter.circle_filled(rect.center(), radius, fill);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(style.button_size * 0.7),
        style.text_color,
    );
    response
}

/// Tile provider credit in the bottom-left corner
pub fn show_attribution(ui: &Ui, container: Rect, text: &str, style: &AttributionStyle) {
    let painter = overlay_painter(ui, container);
    let text_size = painter
        .layout_no_wrap(text.to_string(), style.font_id.clone(), style.text_color)
        .size();
    let rect = Position::BottomLeft.calculate_rect(container, text_size + Vec2::splat(style.padding * 2.0), 0.0);
    painter.rect_filled(rect, 0.0, style.background_color);
    painter.text(
        rect.min + Vec2::splat(style.padding),
        Align2::LEFT_TOP,
        text,
        style.font_id.clone(),
        style.text_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> Rect {
        Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_navigation_buttons_stack_in_top_right() {
        let style = ZoomControlStyle::default();
        let (zoom_in, zoom_out) = NavigationControl::layout(container(), &style);
        assert_eq!(zoom_in.max.x, 800.0 - style.margin);
        assert_eq!(zoom_in.min.y, style.margin);
        assert!(zoom_out.min.y > zoom_in.max.y);
        assert_eq!(zoom_in.min.x, zoom_out.min.x);
    }

    #[test]
    fn test_carousel_is_centered_at_bottom() {
        let style = CarouselStyle::default();
        let layout = CarouselControl::layout(container(), &style);
        assert!((layout.panel.center().x - 400.0).abs() < 1e-3);
        assert_eq!(layout.panel.max.y, 600.0 - style.margin);
        assert!(layout.panel.contains_rect(layout.previous));
        assert!(layout.panel.contains_rect(layout.next));
        assert!(layout.previous.max.x < layout.next.min.x);
    }

    #[test]
    fn test_carousel_shrinks_on_narrow_maps() {
        let style = CarouselStyle::default();
        let narrow = Rect::from_min_size(Pos2::ZERO, Vec2::new(240.0, 400.0));
        let layout = CarouselControl::layout(narrow, &style);
        assert!(layout.panel.width() <= 240.0 - 2.0 * style.margin + 1e-3);
    }
}
