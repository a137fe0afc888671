//! Prelude module for common ilocos-planner types and traits
//!
//! `use ilocos_planner::prelude::*;` brings in the map, its configuration and the
//! destination model.

pub use crate::core::{
    carousel::DestinationCarousel,
    config::MapConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::DestinationMap,
    viewport::Viewport,
};

pub use crate::data::destination::{Destination, DestinationCategory, MarkerIcon};

pub use crate::layers::{
    base::LayerTrait,
    manager::LayerManager,
    marker::{Marker, UserLocationMarker},
    tile::TileLayer,
};

pub use crate::animation::transitions::{CameraFrame, FlyTo, FlyToOptions, PulseAnimation};

pub use crate::tiles::{
    cache::TileCache,
    loader::{TileLoader, TileLoaderConfig},
    source::{MapboxStyleSource, TileSource},
};

pub use crate::rendering::context::{DrawCommand, RenderContext};

#[cfg(feature = "egui")]
pub use crate::ui::{
    landing::{LandingAction, LandingPage},
    widget::DestinationMapView,
};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
