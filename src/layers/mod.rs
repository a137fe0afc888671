pub mod base;
pub mod macros;
pub mod manager;
pub mod marker;
pub mod tile;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use manager::LayerManager;
pub use marker::{Marker, UserLocationMarker};
pub use tile::TileLayer;
