use egui::{Align, Button, Color32, Layout, RichText, Ui, Vec2};

/// Copy shown on the landing screen
pub struct LandingContent;

impl LandingContent {
    pub const BRAND: &'static str = "Ilocos Norte Tourism Path Planner";
    pub const TAGLINE: &'static str = "Bring joy to your journey.";
    pub const HEADLINE: &'static str = "Save Time, Save Fuel";
    pub const SUBHEADLINE: &'static str = "with our intelligent path planner.";
    pub const BODY: &'static str = "Ilocos Norte Tourism Path Planner is the intelligent software \
        your family & friends will love for their next adventure.";
    pub const CALL_TO_ACTION: &'static str = "Start Planning";
}

/// Something the user did on the landing screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingAction {
    StartPlanning,
}

const ACCENT: Color32 = Color32::from_rgb(234, 88, 12);

/// Static marketing page with a nav bar and a hero section
#[derive(Debug, Clone, Default)]
pub struct LandingPage;

impl LandingPage {
    pub fn new() -> Self {
        Self
    }

    /// Renders the page; returns an action when either "Start Planning" button is clicked
    pub fn show(&self, ui: &mut Ui) -> Option<LandingAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.label(RichText::new(LandingContent::BRAND).strong().size(18.0));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if cta_button(ui, 14.0).clicked() {
                    action = Some(LandingAction::StartPlanning);
                }
            });
        });
        ui.separator();

        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.label(RichText::new(LandingContent::TAGLINE).italics().size(16.0).color(ACCENT));
            ui.add_space(12.0);
            ui.label(RichText::new(LandingContent::HEADLINE).strong().size(40.0));
            ui.label(RichText::new(LandingContent::SUBHEADLINE).size(24.0));
            ui.add_space(16.0);
            ui.set_max_width(560.0);
            ui.label(RichText::new(LandingContent::BODY).size(15.0));
            ui.add_space(24.0);
            if cta_button(ui, 18.0).clicked() {
                action = Some(LandingAction::StartPlanning);
            }
        });

        if action.is_some() {
            log::info!("start planning requested from landing page");
        }
        action
    }
}

fn cta_button(ui: &mut Ui, text_size: f32) -> egui::Response {
    let text = RichText::new(LandingContent::CALL_TO_ACTION)
        .size(text_size)
        .color(Color32::WHITE);
    ui.add(
        Button::new(text)
            .fill(ACCENT)
            .min_size(Vec2::new(text_size * 9.0, text_size * 2.2)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_copy() {
        assert_eq!(LandingContent::BRAND, "Ilocos Norte Tourism Path Planner");
        assert_eq!(LandingContent::TAGLINE, "Bring joy to your journey.");
        assert_eq!(LandingContent::CALL_TO_ACTION, "Start Planning");
        assert_eq!(
            LandingContent::BODY,
            "Ilocos Norte Tourism Path Planner is the intelligent software your family & friends \
             will love for their next adventure."
        );
    }

    #[test]
    fn test_rendering_without_clicks_has_no_action() {
        let ctx = egui::Context::default();
        let mut action = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                action = LandingPage::new().show(ui);
            });
        });
        assert_eq!(action, None);
    }
}
