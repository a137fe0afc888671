use crate::{
    animation::transitions::{CameraFrame, FlyTo},
    core::{
        carousel::DestinationCarousel,
        config::{MapConfig, ACCESS_TOKEN_ENV},
        constants::MARKER_HIT_RADIUS_PX,
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    data::destination::Destination,
    layers::{
        base::LayerType,
        manager::LayerManager,
        marker::{destination_layer_id, Marker, UserLocationMarker},
        tile::TileLayer,
    },
    rendering::context::RenderContext,
    spatial::index::DestinationIndex,
    tiles::source::MapboxStyleSource,
    MapError, Result,
};
use instant::Instant;

const BASEMAP_LAYER_ID: &str = "basemap";

/// Default canvas size until the host reports the real one
const INITIAL_SIZE: Point = Point { x: 800.0, y: 600.0 };

/// The destination map: basemap tiles, one marker per destination, the user's
/// location, and a carousel that flies the camera between destinations.
pub struct DestinationMap {
    config: MapConfig,
    viewport: Viewport,
    layer_manager: LayerManager,
    destinations: Vec<Destination>,
    carousel: DestinationCarousel,
    index: DestinationIndex,
    flight: Option<FlyTo>,
    last_tick: Option<Instant>,
    torn_down: bool,
}

impl DestinationMap {
    /// Builds the map. Fails with [`MapError::Config`] when no access token is configured.
    pub fn new(config: MapConfig) -> Result<Self> {
        let token = config
            .access_token
            .clone()
            .ok_or_else(|| MapError::Config(format!("{} is not set", ACCESS_TOKEN_ENV)))?;
        config.validate()?;

        let mut viewport = Viewport::new(config.center, config.zoom, INITIAL_SIZE);
        viewport.set_zoom_limits(config.min_zoom, config.max_zoom);

        let mut layer_manager = LayerManager::new();
        layer_manager.add_layer(Box::new(TileLayer::new(
            BASEMAP_LAYER_ID.to_string(),
            Box::new(MapboxStyleSource::new(config.style.clone(), token)),
            config.tiles.clone(),
        )))?;
        layer_manager.add_layer(Box::new(UserLocationMarker::new(config.user_location)))?;

        log::info!(
            "map created at {:?} zoom {} with style {}",
            config.center,
            config.zoom,
            config.style
        );

        Ok(Self {
            config,
            viewport,
            layer_manager,
            destinations: Vec::new(),
            carousel: DestinationCarousel::default(),
            index: DestinationIndex::new(),
            flight: None,
            last_tick: None,
            torn_down: false,
        })
    }

    /// Like [`DestinationMap::new`], but a missing token is logged and yields `None`
    /// instead of an error, so the host can render an empty container.
    pub fn mount(config: MapConfig) -> Option<Self> {
        if !config.has_access_token() {
            log::error!(
                "{} is not set; the destination map will not be created",
                ACCESS_TOKEN_ENV
            );
            return None;
        }
        match Self::new(config) {
            Ok(map) => Some(map),
            Err(err) => {
                log::error!("failed to create destination map: {}", err);
                None
            }
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_size(&mut self, size: Point) {
        if size != self.viewport.size {
            self.viewport.set_size(size);
        }
    }

    /// Replaces every destination marker. Records without a usable position are skipped,
    /// the carousel starts over at the first remaining destination, and the camera returns
    /// to its configured starting view.
    pub fn set_destinations(&mut self, destinations: &[Destination]) {
        self.layer_manager.remove_layers_of_type(LayerType::Marker);
        self.destinations.clear();
        self.flight = None;
        self.viewport.set_center(self.config.center);
        self.viewport.set_zoom(self.config.zoom);

        for destination in destinations {
            if !destination.has_valid_position() {
                log::warn!(
                    "skipping destination '{}' with invalid position ({}, {})",
                    destination.title,
                    destination.latitude,
                    destination.longitude
                );
                continue;
            }
            let index = self.destinations.len();
            if let Err(err) = self
                .layer_manager
                .add_layer(Box::new(Marker::from_destination(index, destination)))
            {
                log::warn!("could not add marker for '{}': {}", destination.title, err);
                continue;
            }
            self.destinations.push(destination.clone());
        }

        self.index = DestinationIndex::from_positions(
            self.destinations
                .iter()
                .enumerate()
                .map(|(i, destination)| (i, destination.position())),
        );
        self.carousel = DestinationCarousel::new(self.destinations.len());
        self.highlight_selected();

        log::debug!("showing {} destinations", self.destinations.len());
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn destination_marker_count(&self) -> usize {
        self.layer_manager.count_of_type(LayerType::Marker)
    }

    /// Position of the marker for destination `index`, if one exists
    pub fn marker_position(&self, index: usize) -> Option<LatLng> {
        self.layer_manager
            .get_layer(&destination_layer_id(index))
            .and_then(|layer| layer.as_any().downcast_ref::<Marker>())
            .map(Marker::position)
    }

    pub fn carousel(&self) -> &DestinationCarousel {
        &self.carousel
    }

    /// "{i+1} of {N}", or `None` with no destinations
    pub fn carousel_label(&self) -> Option<String> {
        self.carousel.label()
    }

    pub fn selected_destination(&self) -> Option<&Destination> {
        self.carousel
            .current()
            .and_then(|index| self.destinations.get(index))
    }

    pub fn select_next(&mut self) -> Option<usize> {
        let index = self.carousel.next()?;
        self.focus_destination(index);
        Some(index)
    }

    pub fn select_previous(&mut self) -> Option<usize> {
        let index = self.carousel.previous()?;
        self.focus_destination(index);
        Some(index)
    }

    pub fn select(&mut self, index: usize) -> Option<usize> {
        let index = self.carousel.select(index)?;
        self.focus_destination(index);
        Some(index)
    }

    fn focus_destination(&mut self, index: usize) {
        self.highlight_selected();
        if let Some(destination) = self.destinations.get(index) {
            log::debug!("flying to '{}'", destination.title);
            let center = destination.position();
            self.fly_to(center, self.config.focus_zoom);
        }
    }

    fn highlight_selected(&mut self) {
        let selected = self.carousel.current();
        for i in 0..self.destinations.len() {
            self.layer_manager
                .with_layer_mut(&destination_layer_id(i), |layer| {
                    if let Some(marker) = layer.as_any_mut().downcast_mut::<Marker>() {
                        marker.set_selected(Some(i) == selected);
                    }
                });
        }
    }

    /// Starts a camera flight from wherever the camera is now, replacing any flight in progress
    pub fn fly_to(&mut self, center: LatLng, zoom: f64) {
        let start = CameraFrame::new(self.viewport.center, self.viewport.zoom);
        let zoom = zoom.clamp(self.viewport.min_zoom, self.viewport.max_zoom);
        let target = CameraFrame::new(center, zoom);
        self.flight = Some(FlyTo::new(
            start,
            target,
            self.viewport.size,
            &self.config.fly_to,
        ));
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Target of the flight in progress
    pub fn flight_target(&self) -> Option<CameraFrame> {
        self.flight.as_ref().map(FlyTo::target)
    }

    /// Drags the map by a screen delta; any flight in progress stops where it is
    pub fn pan_by(&mut self, delta: Point) {
        self.flight = None;
        self.viewport.pan(delta);
    }

    /// Zooms immediately, keeping the point under `focus` fixed
    pub fn zoom_by(&mut self, delta: f64, focus: Option<Point>) {
        self.flight = None;
        let zoom = self.viewport.zoom + delta;
        self.viewport.zoom_to(zoom, focus);
    }

    /// Animated one-level zoom, as used by the navigation buttons
    pub fn zoom_in(&mut self) {
        self.fly_to(self.viewport.center, self.viewport.zoom.round() + 1.0);
    }

    pub fn zoom_out(&mut self) {
        self.fly_to(self.viewport.center, self.viewport.zoom.round() - 1.0);
    }

    /// Destination whose marker lies under `screen`, if any
    pub fn hit_test(&self, screen: Point) -> Option<usize> {
        let position = self.viewport.pixel_to_lat_lng(&screen);
        self.index
            .nearest_within(&position, self.viewport.zoom, MARKER_HIT_RADIUS_PX)
    }

    /// Selects the destination under `screen`, flying to it
    pub fn click(&mut self, screen: Point) -> Option<usize> {
        let index = self.hit_test(screen)?;
        self.select(index)
    }

    /// Advances animations by `delta_time` seconds and schedules tile downloads.
    /// Returns whether another frame should be drawn soon.
    pub fn update(&mut self, delta_time: f64) -> Result<bool> {
        if self.torn_down {
            return Ok(false);
        }

        if let Some(flight) = self.flight.as_mut() {
            let frame = flight.advance(delta_time);
            self.viewport.set_center(frame.center);
            self.viewport.set_zoom(frame.zoom);
            if flight.is_finished() {
                log::debug!("flight finished at {:?} zoom {}", frame.center, frame.zoom);
                self.flight = None;
            }
        }

        let mut result = Ok(());
        self.layer_manager.for_each_layer_mut(|layer| {
            if result.is_ok() && layer.is_visible() {
                result = layer.update(delta_time);
            }
        });
        result?;

        let viewport = self.viewport.clone();
        let tiles_loading = self
            .layer_manager
            .with_layer_mut(BASEMAP_LAYER_ID, |layer| {
                layer
                    .as_any_mut()
                    .downcast_mut::<TileLayer>()
                    .map(|tiles| {
                        tiles.update_tiles(&viewport);
                        tiles.needs_repaint()
                    })
                    .unwrap_or(false)
            })
            .unwrap_or(false);

        let pulsing = self
            .layer_manager
            .get_layer(UserLocationMarker::LAYER_ID)
            .map(|layer| layer.is_visible())
            .unwrap_or(false);

        Ok(self.flight.is_some() || tiles_loading || pulsing)
    }

    /// [`DestinationMap::update`] driven by wall-clock time since the previous tick
    pub fn tick(&mut self) -> Result<bool> {
        let now = Instant::now();
        let delta_time = self
            .last_tick
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);
        // long stalls (minimized window) shouldn't skip flights entirely
        self.update(delta_time.min(0.1))
    }

    /// Emits draw commands for tiles, then markers, then the user's location
    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        if self.torn_down {
            return Ok(());
        }
        context.begin_frame()?;
        self.layer_manager.render(context, &self.viewport)
    }

    pub fn attribution(&self) -> Option<&str> {
        self.layer_manager
            .get_layer(BASEMAP_LAYER_ID)
            .and_then(|layer| layer.as_any().downcast_ref::<TileLayer>())
            .map(TileLayer::attribution)
    }

    /// Cancels downloads and drops every layer. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.layer_manager.with_layer_mut(BASEMAP_LAYER_ID, |layer| {
            if let Some(tiles) = layer.as_any_mut().downcast_mut::<TileLayer>() {
                tiles.cancel_downloads();
            }
        });
        self.layer_manager = LayerManager::new();
        self.flight = None;
        self.index.clear();
        self.torn_down = true;
        log::debug!("destination map torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Drop for DestinationMap {
    fn drop(&mut self) {
        self.teardown();
    }
}
