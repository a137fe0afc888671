pub mod controls;
pub mod landing;
pub mod style;
pub mod widget;

pub use controls::{CarouselControl, ControlAction, NavigationControl, Position};
pub use landing::{LandingAction, LandingContent, LandingPage};
pub use style::{AttributionStyle, CarouselStyle, MapStyle, MarkerStyle, UserLocationStyle, ZoomControlStyle};
pub use widget::DestinationMapView;

/// Shorthand for showing a [`DestinationMapView`] inside a `Ui`
pub trait UiMapExt {
    fn destination_map(
        &mut self,
        view: &mut DestinationMapView,
        destinations: &[crate::data::destination::Destination],
    ) -> egui::Response;
}

impl UiMapExt for egui::Ui {
    fn destination_map(
        &mut self,
        view: &mut DestinationMapView,
        destinations: &[crate::data::destination::Destination],
    ) -> egui::Response {
        view.show(self, destinations)
    }
}
