use crate::{
    animation::transitions::PulseAnimation,
    core::{
        geo::{LatLng, LatLngBounds},
        viewport::Viewport,
    },
    data::destination::{Destination, DestinationCategory},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::RenderContext,
    Result,
};

/// Layer id used for the destination at `index`
pub fn destination_layer_id(index: usize) -> String {
    format!("destination-{}", index)
}

/// A single destination pin, drawn with its category's icon
pub struct Marker {
    properties: LayerProperties,
    position: LatLng,
    title: String,
    category: DestinationCategory,
    selected: bool,
}

impl Marker {
    pub fn new(id: String, position: LatLng, title: impl Into<String>, kind: &str) -> Self {
        let title = title.into();
        let properties = LayerProperties::new(id, title.clone(), LayerType::Marker);
        Self {
            properties,
            position,
            title,
            category: DestinationCategory::from_tag(kind),
            selected: false,
        }
    }

    pub fn from_destination(index: usize, destination: &Destination) -> Self {
        Self::new(
            destination_layer_id(index),
            destination.position(),
            destination.title.clone(),
            &destination.kind,
        )
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> DestinationCategory {
        self.category
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

impl LayerTrait for Marker {
    crate::impl_layer_trait!(Marker, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let position = viewport.lat_lng_to_pixel(&self.position);
        context.render_marker(
            &self.properties.id,
            position,
            self.category.icon(),
            &self.title,
            self.selected,
        )
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::new(self.position, self.position))
    }
}

/// The "you are here" dot with a pulsing halo
pub struct UserLocationMarker {
    properties: LayerProperties,
    position: LatLng,
    pulse: PulseAnimation,
}

impl UserLocationMarker {
    pub const LAYER_ID: &'static str = "user-location";

    pub fn new(position: LatLng) -> Self {
        Self {
            properties: LayerProperties::new(
                Self::LAYER_ID.to_string(),
                "Your location".to_string(),
                LayerType::UserLocation,
            ),
            position,
            pulse: PulseAnimation::default(),
        }
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn pulse(&self) -> &PulseAnimation {
        &self.pulse
    }
}

impl LayerTrait for UserLocationMarker {
    crate::impl_layer_trait!(UserLocationMarker, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let position = viewport.lat_lng_to_pixel(&self.position);
        context.render_user_location(position, self.pulse.phase())
    }

    fn update(&mut self, delta_time: f64) -> Result<()> {
        self.pulse.advance(delta_time);
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::new(self.position, self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use crate::rendering::context::DrawCommand;

    fn viewport() -> Viewport {
        Viewport::new(LatLng::new(18.1978, 120.5956), 12.0, Point::new(800.0, 600.0))
    }

    #[test]
    fn test_marker_from_destination() {
        let destination = Destination::new("Paoay Church", "church", 18.0614, 120.5217);
        let marker = Marker::from_destination(3, &destination);

        assert_eq!(marker.id(), "destination-3");
        assert_eq!(marker.title(), "Paoay Church");
        assert_eq!(marker.category(), DestinationCategory::Heritage);
        assert_eq!(marker.position(), LatLng::new(18.0614, 120.5217));
        assert_eq!(marker.layer_type(), LayerType::Marker);
    }

    #[test]
    fn test_marker_renders_at_projected_position() {
        let viewport = viewport();
        let mut context = RenderContext::new(800, 600).unwrap();
        let mut marker = Marker::new("m".into(), viewport.center, "Center", "landmark");
        marker.set_selected(true);
        marker.render(&mut context, &viewport).unwrap();

        match &context.get_drawing_queue()[0] {
            DrawCommand::Marker {
                position,
                icon,
                label,
                selected,
                ..
            } => {
                assert!((position.x - 400.0).abs() < 1e-6);
                assert!((position.y - 300.0).abs() < 1e-6);
                assert_eq!(*icon, DestinationCategory::Landmark.icon());
                assert_eq!(label, "Center");
                assert!(selected);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_user_location_pulse_advances_with_update() {
        let viewport = viewport();
        let mut user = UserLocationMarker::new(viewport.center);
        user.update(0.5).unwrap();
        assert!(user.pulse().phase() > 0.0);

        let mut context = RenderContext::new(800, 600).unwrap();
        user.render(&mut context, &viewport).unwrap();
        assert!(matches!(
            context.get_drawing_queue()[0],
            DrawCommand::UserLocation { pulse, .. } if pulse > 0.0
        ));
    }
}
