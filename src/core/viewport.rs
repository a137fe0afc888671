use crate::core::constants::TILE_SIZE;
use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 22.0),
            size,
            min_zoom: 0.0,
            max_zoom: 22.0,
        }
    }

    /// Sets the center of the viewport
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), LatLng::wrap_lng(center.lng));
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Projects a LatLng to world pixel coordinates (EPSG:3857) at the given zoom level
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        project(lat_lng, zoom.unwrap_or(self.zoom))
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        unproject(pixel, zoom.unwrap_or(self.zoom))
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let world = self.project(lat_lng, None);
        let center = self.project(&self.center, None);
        world
            .subtract(&center)
            .add(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let center = self.project(&self.center, None);
        let world = pixel
            .subtract(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
            .add(&center);
        self.unproject(&world, None)
    }

    /// Pans the viewport by a screen-space drag delta
    pub fn pan(&mut self, delta: Point) {
        let center = self.project(&self.center, None);
        let new_center = self.unproject(&center.subtract(&delta), None);
        self.set_center(new_center);
    }

    /// Zooms to `zoom`, keeping the geographic point under `focus_point` stationary
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus_point {
            Some(focus) => {
                let focus_lat_lng = self.pixel_to_lat_lng(&focus);
                self.zoom = new_zoom;
                let drift = self.lat_lng_to_pixel(&focus_lat_lng).subtract(&focus);
                self.pan(drift.multiply(-1.0));
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Geographic bounds of the visible area
    pub fn bounds(&self) -> LatLngBounds {
        let north_west = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let south_east = self.pixel_to_lat_lng(&self.size);
        LatLngBounds::from_coords(south_east.lat, north_west.lng, north_west.lat, south_east.lng)
    }
}

/// World pixel coordinates of `lat_lng` at `zoom` (256px tiles).
pub fn project(lat_lng: &LatLng, zoom: f64) -> Point {
    let world_size = TILE_SIZE as f64 * 2_f64.powf(zoom);
    let lat = LatLng::clamp_lat(lat_lng.lat).to_radians();

    let x = (lat_lng.lng + 180.0) / 360.0 * world_size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * world_size;
    Point::new(x, y)
}

/// Inverse of [`project`].
pub fn unproject(pixel: &Point, zoom: f64) -> LatLng {
    let world_size = TILE_SIZE as f64 * 2_f64.powf(zoom);
    let lng = pixel.x / world_size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * pixel.y / world_size;
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}
