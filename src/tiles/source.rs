use crate::core::{constants::MAX_TILE_ZOOM, geo::TileCoord};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    /// Text shown in the map corner
    fn attribution(&self) -> &str;

    fn max_zoom(&self) -> u8 {
        MAX_TILE_ZOOM
    }
}

/// Raster tiles rendered server-side from a hosted Mapbox style.
pub struct MapboxStyleSource {
    style: String,
    access_token: String,
}

impl MapboxStyleSource {
    pub fn new(style: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            access_token: access_token.into(),
        }
    }

    pub fn style(&self) -> &str {
        &self.style
    }
}

impl std::fmt::Debug for MapboxStyleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxStyleSource")
            .field("style", &self.style)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl TileSource for MapboxStyleSource {
    fn url(&self, coord: TileCoord) -> String {
        format!(
            "https://api.mapbox.com/styles/v1/{}/tiles/256/{}/{}/{}?access_token={}",
            self.style, coord.z, coord.x, coord.y, self.access_token
        )
    }

    fn attribution(&self) -> &str {
        "© Mapbox © OpenStreetMap"
    }
}
