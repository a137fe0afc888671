//! # Ilocos Planner
//!
//! Destination map for the Ilocos Norte tourism path planner.
//!
//! The core is renderer-agnostic: [`DestinationMap`] owns the camera, layers and
//! carousel, and emits [`rendering::DrawCommand`]s each frame. The `egui` feature
//! adds a widget that paints those commands and the landing page.

pub mod animation;
pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod spatial;
pub mod tiles;
#[cfg(feature = "egui")]
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    carousel::DestinationCarousel,
    config::MapConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::DestinationMap,
    viewport::Viewport,
};

pub use data::destination::{load_destinations, parse_destinations, Destination, DestinationCategory};

pub use layers::{base::LayerTrait, marker::Marker, tile::TileLayer};

pub use rendering::context::RenderContext;

pub use animation::transitions::{FlyTo, FlyToOptions};

#[cfg(feature = "egui")]
pub use ui::{landing::LandingPage, widget::DestinationMapView};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),
}

/// Error type alias for convenience
pub type Error = MapError;
