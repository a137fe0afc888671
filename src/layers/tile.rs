use crate::{
    core::{
        constants::TILE_SIZE,
        geo::{Point, TileCoord},
        viewport::{project, Viewport},
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::RenderContext,
    tiles::{
        cache::TileCache,
        loader::{TileLoader, TileLoaderConfig},
        source::TileSource,
    },
    Result,
};

/// A tile slot on screen: which tile, and the screen rectangle it covers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTile {
    pub coord: TileCoord,
    pub bounds: (Point, Point),
}

/// Raster basemap backed by a [`TileSource`]
pub struct TileLayer {
    properties: LayerProperties,
    source: Box<dyn TileSource>,
    cache: TileCache,
    loader: TileLoader,
    /// Tiles that failed on every attempt; not retried until the view changes zoom
    failed: crate::prelude::HashSet<TileCoord>,
    failed_zoom: Option<u8>,
}

impl TileLayer {
    pub fn new(id: String, source: Box<dyn TileSource>, config: TileLoaderConfig) -> Self {
        let properties = LayerProperties::new(id, "Basemap".to_string(), LayerType::Tile);
        Self {
            properties,
            source,
            cache: TileCache::new(config.cache_capacity),
            loader: TileLoader::new(config),
            failed: Default::default(),
            failed_zoom: None,
        }
    }

    pub fn source(&self) -> &dyn TileSource {
        self.source.as_ref()
    }

    pub fn attribution(&self) -> &str {
        self.source.attribution()
    }

    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    /// Integer zoom of the tiles drawn for `zoom`
    pub fn tile_zoom(&self, zoom: f64) -> u8 {
        zoom.round().clamp(0.0, self.source.max_zoom() as f64) as u8
    }

    /// Tiles covering the viewport, nearest to the center first
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<VisibleTile> {
        let z = self.tile_zoom(viewport.zoom);
        let scale = 2_f64.powf(viewport.zoom - z as f64);
        let tile_size = TILE_SIZE as f64;
        let tiles_per_axis = 1i64 << z;

        // Top-left of the screen in world pixels at tile zoom
        let center = project(&viewport.center, z as f64);
        let half = Point::new(viewport.size.x / 2.0 / scale, viewport.size.y / 2.0 / scale);
        let top_left = center.subtract(&half);
        let bottom_right = center.add(&half);

        let min_x = (top_left.x / tile_size).floor() as i64;
        let max_x = (bottom_right.x / tile_size).floor() as i64;
        let min_y = ((top_left.y / tile_size).floor() as i64).max(0);
        let max_y = ((bottom_right.y / tile_size).floor() as i64).min(tiles_per_axis - 1);

        let screen_center = Point::new(viewport.size.x / 2.0, viewport.size.y / 2.0);
        let mut tiles = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let min = Point::new(
                    (x as f64 * tile_size - top_left.x) * scale,
                    (y as f64 * tile_size - top_left.y) * scale,
                );
                let max = Point::new(min.x + tile_size * scale, min.y + tile_size * scale);
                let wrapped_x = x.rem_euclid(tiles_per_axis) as u32;
                tiles.push(VisibleTile {
                    coord: TileCoord::new(wrapped_x, y as u32, z),
                    bounds: (min, max),
                });
            }
        }

        tiles.sort_by(|a, b| {
            let da = midpoint(a.bounds).distance_to(&screen_center);
            let db = midpoint(b.bounds).distance_to(&screen_center);
            da.total_cmp(&db)
        });
        tiles
    }

    /// Moves finished downloads into the cache and requests whatever the view is missing
    pub fn update_tiles(&mut self, viewport: &Viewport) {
        for result in self.loader.drain() {
            match result.data {
                Ok(data) => self.cache.insert(result.coord, data),
                Err(err) => {
                    log::warn!("tile {:?} unavailable: {}", result.coord, err);
                    self.failed.insert(result.coord);
                }
            }
        }

        let z = self.tile_zoom(viewport.zoom);
        if self.failed_zoom != Some(z) {
            self.failed.clear();
            self.failed_zoom = Some(z);
        }

        for tile in self.visible_tiles(viewport) {
            if self.cache.contains(&tile.coord)
                || self.failed.contains(&tile.coord)
                || self.loader.is_loading(&tile.coord)
            {
                continue;
            }
            if !self.loader.request(self.source.as_ref(), tile.coord) {
                // saturated or offline; try again next frame
                break;
            }
        }
    }

    /// True while downloads are outstanding and a later frame will have more to show
    pub fn needs_repaint(&self) -> bool {
        self.loader.in_flight() > 0
    }

    pub fn cancel_downloads(&mut self) {
        self.loader.cancel_all();
    }
}

fn midpoint(bounds: (Point, Point)) -> Point {
    bounds.0.add(&bounds.1).multiply(0.5)
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let opacity = self.properties.opacity;
        for tile in self.visible_tiles(viewport) {
            if let Some(data) = self.cache.get(&tile.coord) {
                context.render_tile(tile.coord, data, tile.bounds, opacity)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::tiles::source::MapboxStyleSource;

    fn layer() -> TileLayer {
        TileLayer::new(
            "basemap".into(),
            Box::new(MapboxStyleSource::new("mapbox/streets-v12", "pk.test")),
            TileLoaderConfig::for_testing(),
        )
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let viewport = Viewport::new(LatLng::new(18.1978, 120.5956), 12.0, Point::new(800.0, 600.0));
        let tiles = layer().visible_tiles(&viewport);

        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.coord.z == 12));

        let min_x = tiles.iter().map(|t| t.bounds.0.x).fold(f64::INFINITY, f64::min);
        let min_y = tiles.iter().map(|t| t.bounds.0.y).fold(f64::INFINITY, f64::min);
        let max_x = tiles.iter().map(|t| t.bounds.1.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = tiles.iter().map(|t| t.bounds.1.y).fold(f64::NEG_INFINITY, f64::max);
        assert!(min_x <= 0.0 && min_y <= 0.0);
        assert!(max_x >= 800.0 && max_y >= 600.0);

        // nearest tile first: it contains the screen center
        let first = tiles[0].bounds;
        assert!(first.0.x <= 400.0 && first.1.x >= 400.0);
        assert!(first.0.y <= 300.0 && first.1.y >= 300.0);
    }

    #[test]
    fn test_fractional_zoom_scales_tiles() {
        let viewport = Viewport::new(LatLng::new(18.2, 120.6), 11.6, Point::new(512.0, 512.0));
        let tiles = layer().visible_tiles(&viewport);
        let width = tiles[0].bounds.1.x - tiles[0].bounds.0.x;
        assert!(tiles.iter().all(|t| t.coord.z == 12));
        assert!((width - 256.0 * 2_f64.powf(-0.4)).abs() < 1e-6);
    }

    #[test]
    fn test_world_view_wraps_columns() {
        let viewport = Viewport::new(LatLng::new(0.0, 179.0), 1.0, Point::new(1024.0, 512.0));
        let tiles = layer().visible_tiles(&viewport);
        assert!(tiles.iter().all(|t| t.coord.x < 2 && t.coord.y < 2));
    }

    #[test]
    fn test_render_draws_cached_tiles_only() {
        let viewport = Viewport::new(LatLng::new(18.1978, 120.5956), 12.0, Point::new(800.0, 600.0));
        let mut layer = layer();
        let visible = layer.visible_tiles(&viewport);
        layer.cache().insert(visible[0].coord, vec![0u8; 4]);

        layer.update_tiles(&viewport);
        assert!(!layer.needs_repaint(), "offline layer never downloads");

        let mut context = RenderContext::new(800, 600).unwrap();
        layer.render(&mut context, &viewport).unwrap();
        assert_eq!(context.command_counts(), (1, 0, 0));
    }
}
