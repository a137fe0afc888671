use crate::{
    core::viewport::Viewport,
    layers::base::{LayerTrait, LayerType},
    prelude::HashMap,
    rendering::context::RenderContext,
    MapError, Result,
};

/// Manages layers for the map, handling ordering and rendering
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Ordered list of layer IDs for rendering (sorted by z-index, stable for ties)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer; ids must be unique
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(MapError::Layer(format!("duplicate layer id '{}'", layer_id)));
        }
        let z_index = layer.z_index();

        self.layers.insert(layer_id.clone(), layer);

        // Insert after every layer with z-index <= ours
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    /// Removes every layer of the given type, returning how many went away
    pub fn remove_layers_of_type(&mut self, layer_type: LayerType) -> usize {
        let doomed: Vec<String> = self
            .layers
            .iter()
            .filter(|(_, layer)| layer.layer_type() == layer_type)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &doomed {
            self.remove_layer(id);
        }
        doomed.len()
    }

    /// Gets a reference to a layer by ID
    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layers.get_mut(layer_id).map(|layer| f(layer.as_mut()))
    }

    /// Gets all layers in render order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l.as_ref()))
            .collect()
    }

    pub fn count_of_type(&self, layer_type: LayerType) -> usize {
        self.layers
            .values()
            .filter(|layer| layer.layer_type() == layer_type)
            .count()
    }

    /// Applies a function to each layer mutably in render order
    pub fn for_each_layer_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut dyn LayerTrait),
    {
        for id in &self.render_order {
            if let Some(layer) = self.layers.get_mut(id) {
                f(layer.as_mut());
            }
        }
    }

    /// Renders all visible layers that intersect the viewport, bottom to top
    pub fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let viewport_bounds = viewport.bounds();

        for layer_id in &self.render_order {
            if let Some(layer) = self.layers.get_mut(layer_id) {
                if layer.is_visible() && layer.intersects_bounds(&viewport_bounds) {
                    layer.render(context, viewport)?;
                }
            }
        }
        Ok(())
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::layers::marker::{Marker, UserLocationMarker};

    fn marker(id: &str) -> Box<dyn LayerTrait> {
        Box::new(Marker::new(id.to_string(), LatLng::new(18.2, 120.6), "Spot", "beach"))
    }

    #[test]
    fn test_render_order_follows_z_index() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(UserLocationMarker::new(LatLng::new(18.2, 120.6))))
            .unwrap();
        manager.add_layer(marker("a")).unwrap();
        manager.add_layer(marker("b")).unwrap();

        let order: Vec<&str> = manager.layers().iter().map(|l| l.id()).collect();
        assert_eq!(order, vec!["a", "b", "user-location"]);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut manager = LayerManager::new();
        manager.add_layer(marker("a")).unwrap();
        assert!(matches!(manager.add_layer(marker("a")), Err(MapError::Layer(_))));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_remove_layers_of_type() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(UserLocationMarker::new(LatLng::new(18.2, 120.6))))
            .unwrap();
        manager.add_layer(marker("a")).unwrap();
        manager.add_layer(marker("b")).unwrap();

        assert_eq!(manager.remove_layers_of_type(LayerType::Marker), 2);
        assert_eq!(manager.count_of_type(LayerType::Marker), 0);
        assert_eq!(manager.len(), 1);
        assert!(manager.get_layer("user-location").is_some());
    }
}
