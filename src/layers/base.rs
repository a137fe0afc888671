use crate::{
    core::{geo::LatLngBounds, viewport::Viewport},
    rendering::context::RenderContext,
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Tile,
    Marker,
    UserLocation,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Marker => write!(f, "marker"),
            LayerType::UserLocation => write!(f, "user-location"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        let z_index = match layer_type {
            LayerType::Tile => 0,
            LayerType::Marker => 10,
            LayerType::UserLocation => 20,
        };
        Self {
            id,
            name,
            layer_type,
            z_index,
            opacity: 1.0,
            visible: true,
        }
    }
}

/// Anything the map can draw
pub trait LayerTrait: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// Get layer opacity (0.0 to 1.0)
    fn opacity(&self) -> f32;

    fn set_opacity(&mut self, opacity: f32);

    /// Get layer z-index for ordering
    fn z_index(&self) -> i32;

    fn set_z_index(&mut self, z_index: i32);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()>;

    /// Advance per-frame state
    fn update(&mut self, _delta_time: f64) -> Result<()> {
        Ok(())
    }

    /// Get layer bounds if applicable
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Layers without bounds (tiles) always intersect
    fn intersects_bounds(&self, bounds: &LatLngBounds) -> bool {
        self.bounds()
            .map(|own| own.intersects(bounds))
            .unwrap_or(true)
    }

    fn as_any(&self) -> &dyn std::any::Any;

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
