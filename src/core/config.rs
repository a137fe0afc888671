//! Configuration for the destination map
//!
//! Everything except the access token has a sensible default, so most callers only do
//! `MapConfig::from_env()`. A JSON file can override the non-secret settings.

use crate::{
    animation::transitions::FlyToOptions,
    core::{
        constants::{DEFAULT_STYLE, DEFAULT_ZOOM, DESTINATION_FOCUS_ZOOM, LAOAG_CITY},
        geo::LatLng,
    },
    tiles::loader::TileLoaderConfig,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the Mapbox access token.
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_TOKEN";

/// Environment variable overriding the Mapbox style id.
pub const STYLE_ENV: &str = "MAPBOX_STYLE";

/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "ILOCOS_PLANNER_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Never serialized; only read from the environment or set in code.
    #[serde(skip)]
    pub access_token: Option<String>,
    pub style: String,
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom used when the carousel flies to a destination
    pub focus_zoom: f64,
    pub user_location: LatLng,
    pub fly_to: FlyToOptions,
    pub tiles: TileLoaderConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        let laoag = LatLng::new(LAOAG_CITY.0, LAOAG_CITY.1);
        Self {
            access_token: None,
            style: DEFAULT_STYLE.to_string(),
            center: laoag,
            zoom: DEFAULT_ZOOM,
            min_zoom: 1.0,
            max_zoom: 20.0,
            focus_zoom: DESTINATION_FOCUS_ZOOM,
            user_location: laoag,
            fly_to: FlyToOptions::default(),
            tiles: TileLoaderConfig::default(),
        }
    }
}

impl MapConfig {
    /// Defaults plus token and style from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_lookup(|key| std::env::var(key).ok())
    }

    /// Applies `MAPBOX_TOKEN` / `MAPBOX_STYLE` from an arbitrary lookup.
    ///
    /// Blank values count as unset.
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = non_blank(ACCESS_TOKEN_ENV) {
            self.access_token = Some(token.trim().to_string());
        }
        if let Some(style) = non_blank(STYLE_ENV) {
            self.style = style.trim().to_string();
        }
        self
    }

    /// Reads overrides from a JSON file; the token still comes from the environment.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_file_with_lookup(path, |key| std::env::var(key).ok())
    }

    pub fn from_json_file_with_lookup<F>(path: impl AsRef<Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: MapConfig = serde_json::from_str(&text)?;
        let config = config.with_lookup(lookup);
        config.validate()?;
        log::info!("loaded map config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Config file named by `path`, else by `ILOCOS_PLANNER_CONFIG`, else plain
    /// [`MapConfig::from_env`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        match (path, from_env) {
            (Some(path), _) => Self::from_json_file(path),
            (None, Some(path)) => Self::from_json_file(path.trim()),
            (None, None) => Ok(Self::from_env()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "center {:?} is out of range",
                self.center
            )));
        }
        if !self.user_location.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "user location {:?} is out of range",
                self.user_location
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.style.trim().is_empty() {
            return Err(MapError::Config("style must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_center(mut self, center: LatLng, zoom: f64) -> Self {
        self.center = center;
        self.zoom = zoom;
        self
    }

    /// Token present, tile downloads disabled. Keeps unit tests off the network.
    pub fn for_testing() -> Self {
        Self {
            access_token: Some("pk.test-token".to_string()),
            tiles: TileLoaderConfig::for_testing(),
            ..Self::default()
        }
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }
}
