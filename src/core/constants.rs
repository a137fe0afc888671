//! Engine-wide defaults for the destination map.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Laoag City, where the map opens and where the user-location marker sits.
pub const LAOAG_CITY: (f64, f64) = (18.1978, 120.5956);

/// Zoom level the map opens at.
pub const DEFAULT_ZOOM: f64 = 12.0;

/// Zoom level the camera settles at after flying to a destination.
pub const DESTINATION_FOCUS_ZOOM: f64 = 14.0;

/// Mapbox style the raster tiles are rendered from.
pub const DEFAULT_STYLE: &str = "mapbox/streets-v12";

/// Highest zoom the hosted raster tile endpoint serves.
pub const MAX_TILE_ZOOM: u8 = 22;

/// Curvature of the fly-to path (same default as hosted web maps).
pub const FLY_CURVE: f64 = 1.42;

/// Average fly-to speed, in screenfuls per second along the path.
pub const FLY_SPEED: f64 = 1.2;

/// Period of the user-location halo, in seconds.
pub const PULSE_PERIOD_SECS: f64 = 2.0;

/// Screen distance within which a click selects a destination marker.
pub const MARKER_HIT_RADIUS_PX: f64 = 18.0;
