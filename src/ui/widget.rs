use crate::{
    animation::transitions::PulseAnimation,
    core::{
        config::MapConfig,
        geo::{Point, TileCoord},
        map::DestinationMap,
    },
    data::destination::Destination,
    prelude::{HashMap, HashSet},
    rendering::context::{DrawCommand, RenderContext},
    ui::{
        controls::{show_attribution, CarouselControl, ControlAction, NavigationControl},
        style::{fade, icon_color, MapStyle},
    },
};
use egui::{Align2, Color32, ColorImage, Pos2, Rect, Response, Sense, Stroke, TextureHandle, Ui, Vec2};

/// Scroll-wheel points per zoom level
const SCROLL_ZOOM_RATE: f64 = 0.002;

/// Textures kept around after they stop being drawn
const MAX_IDLE_TEXTURES: usize = 256;

/// Lifecycle of the map behind the widget
enum MountState {
    /// Not shown yet; the map is created on the first frame
    Unmounted(MapConfig),
    Mounted(Box<DestinationMap>),
    /// No access token (or a bad config); the widget renders an empty container
    Unavailable,
}

/// egui widget that hosts a [`DestinationMap`].
///
/// The map is created lazily on the first `show`, which is where a missing access
/// token gets logged. Destination changes between frames are forwarded to the map.
pub struct DestinationMapView {
    state: MountState,
    style: MapStyle,
    destinations: Vec<Destination>,
    textures: HashMap<TileCoord, TextureHandle>,
    undecodable: HashSet<TileCoord>,
}

impl DestinationMapView {
    pub fn new(config: MapConfig) -> Self {
        Self {
            state: MountState::Unmounted(config),
            style: MapStyle::default(),
            destinations: Vec::new(),
            textures: HashMap::default(),
            undecodable: HashSet::default(),
        }
    }

    pub fn with_style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }

    pub fn map(&self) -> Option<&DestinationMap> {
        match &self.state {
            MountState::Mounted(map) => Some(map.as_ref()),
            _ => None,
        }
    }

    pub fn map_mut(&mut self) -> Option<&mut DestinationMap> {
        match &mut self.state {
            MountState::Mounted(map) => Some(map.as_mut()),
            _ => None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.state, MountState::Mounted(_))
    }

    /// True once mounting was attempted and no map could be created
    pub fn is_unavailable(&self) -> bool {
        matches!(self.state, MountState::Unavailable)
    }

    fn mount(&mut self) {
        if let MountState::Unmounted(config) = &self.state {
            self.state = match DestinationMap::mount(config.clone()) {
                Some(mut map) => {
                    map.set_destinations(&self.destinations);
                    MountState::Mounted(Box::new(map))
                }
                None => MountState::Unavailable,
            };
        }
    }

    fn sync_destinations(&mut self, destinations: &[Destination]) {
        if self.destinations.as_slice() == destinations {
            return;
        }
        self.destinations = destinations.to_vec();
        if let MountState::Mounted(map) = &mut self.state {
            map.set_destinations(destinations);
        }
    }

    /// Draws the map filling the available space
    pub fn show(&mut self, ui: &mut Ui, destinations: &[Destination]) -> Response {
        self.sync_destinations(destinations);
        self.mount();

        let rect = Rect::from_min_size(ui.available_rect_before_wrap().min, ui.available_size());

        let MountState::Mounted(map) = &mut self.state else {
            let response = ui.allocate_rect(rect, Sense::hover());
            ui.painter().rect_filled(rect, 0.0, self.style.background_color);
            return response;
        };
        let map: &mut DestinationMap = map;

        let response = ui.allocate_rect(rect, Sense::click_and_drag());
        ui.painter().rect_filled(rect, 0.0, self.style.background_color);
        map.set_size(Point::new(rect.width() as f64, rect.height() as f64));

        // egui hands the pointer to the last widget registered under it, so the
        // controls go after the map rect
        let mut action = NavigationControl.show(ui, rect, &self.style.zoom_controls);
        let title = map.selected_destination().map(|d| d.title.clone());
        let label = map.carousel_label();
        if let Some(carousel_action) = CarouselControl.show(
            ui,
            rect,
            title.as_deref(),
            label.as_deref(),
            &self.style.carousel,
        ) {
            action = Some(carousel_action);
        }

        match action {
            Some(ControlAction::ZoomIn) => map.zoom_in(),
            Some(ControlAction::ZoomOut) => map.zoom_out(),
            Some(ControlAction::Previous) => {
                map.select_previous();
            }
            Some(ControlAction::Next) => {
                map.select_next();
            }
            None => handle_input(ui, &response, rect, map),
        }

        let needs_repaint = match map.tick() {
            Ok(needs_repaint) => needs_repaint,
            Err(err) => {
                log::warn!("map update failed: {}", err);
                false
            }
        };

        let width = rect.width().max(1.0) as u32;
        let height = rect.height().max(1.0) as u32;
        match RenderContext::new(width, height) {
            Ok(mut context) => match map.render(&mut context) {
                Ok(()) => {
                    let hovered = response.hover_pos().map(|pos| pos - rect.min);
                    paint_commands(
                        ui,
                        rect,
                        context.get_drawing_queue(),
                        &self.style,
                        hovered,
                        &mut self.textures,
                        &mut self.undecodable,
                    );
                }
                Err(err) => log::warn!("map render failed: {}", err),
            },
            Err(err) => log::debug!("skipping map frame: {}", err),
        }

        if let Some(attribution) = map.attribution() {
            show_attribution(ui, rect, attribution, &self.style.attribution);
        }

        if needs_repaint || action.is_some() {
            ui.ctx().request_repaint();
        }
        response
    }
}

fn handle_input(ui: &Ui, response: &Response, rect: Rect, map: &mut DestinationMap) {
    if response.dragged() {
        let delta = response.drag_delta();
        if delta.length_sq() > 0.0 {
            map.pan_by(Point::new(delta.x as f64, delta.y as f64));
        }
    }

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll.abs() > 0.1 {
            let focus = response
                .hover_pos()
                .map(|pos| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64));
            map.zoom_by(scroll as f64 * SCROLL_ZOOM_RATE, focus);
        }
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let local = pos - rect.min;
            if let Some(index) = map.click(Point::new(local.x as f64, local.y as f64)) {
                log::debug!("marker {} clicked", index);
            }
        }
    }
}

fn to_screen(rect: Rect, point: &Point) -> Pos2 {
    Pos2::new(rect.min.x + point.x as f32, rect.min.y + point.y as f32)
}

fn paint_commands(
    ui: &Ui,
    rect: Rect,
    commands: &[DrawCommand],
    style: &MapStyle,
    hovered: Option<Vec2>,
    textures: &mut HashMap<TileCoord, TextureHandle>,
    undecodable: &mut HashSet<TileCoord>,
) {
    let painter = ui.painter_at(rect);
    let mut drawn_tiles = HashSet::default();

    for command in commands {
        match command {
            DrawCommand::Tile {
                coord,
                data,
                bounds,
                opacity,
            } => {
                drawn_tiles.insert(*coord);
                if let Some(texture) = tile_texture(ui.ctx(), *coord, data, textures, undecodable) {
                    let tile_rect = Rect::from_two_pos(to_screen(rect, &bounds.0), to_screen(rect, &bounds.1));
                    painter.image(
                        texture.id(),
                        tile_rect,
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE.gamma_multiply(*opacity),
                    );
                }
            }
            DrawCommand::Marker {
                position,
                icon,
                label,
                selected,
                ..
            } => {
                let markers = &style.markers;
                let center = to_screen(rect, position);
                let radius = if *selected {
                    markers.selected_radius
                } else {
                    markers.radius
                };
                painter.circle(
                    center,
                    radius,
                    icon_color(icon),
                    Stroke::new(markers.border_width, markers.border_color),
                );
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    icon.glyph,
                    markers.glyph_font.clone(),
                    Color32::WHITE,
                );

                let is_hovered = hovered
                    .map(|h| (rect.min + h).distance(center) <= radius)
                    .unwrap_or(false);
                if *selected || is_hovered {
                    let anchor = center - Vec2::new(0.0, radius + 4.0);
                    let text_rect = painter.text(
                        anchor,
                        Align2::CENTER_BOTTOM,
                        label,
                        markers.label_font.clone(),
                        markers.label_color,
                    );
                    painter.rect_filled(text_rect.expand(3.0), 3.0, markers.label_background);
                    painter.text(
                        anchor,
                        Align2::CENTER_BOTTOM,
                        label,
                        markers.label_font.clone(),
                        markers.label_color,
                    );
                }
            }
            DrawCommand::UserLocation { position, pulse } => {
                let user = &style.user_location;
                let center = to_screen(rect, position);
                let halo_radius = user.dot_radius * PulseAnimation::halo_scale_at(*pulse) as f32 * 1.6;
                painter.circle_filled(
                    center,
                    halo_radius,
                    fade(user.halo_color, PulseAnimation::halo_alpha_at(*pulse) * 0.45),
                );
                painter.circle(
                    center,
                    user.dot_radius,
                    user.dot_color,
                    Stroke::new(user.ring_width, user.ring_color),
                );
            }
        }
    }

    if textures.len() > drawn_tiles.len() + MAX_IDLE_TEXTURES {
        textures.retain(|coord, _| drawn_tiles.contains(coord));
    }
}

/// Uploaded texture for a tile, decoding it on first sight
fn tile_texture<'a>(
    ctx: &egui::Context,
    coord: TileCoord,
    data: &[u8],
    textures: &'a mut HashMap<TileCoord, TextureHandle>,
    undecodable: &mut HashSet<TileCoord>,
) -> Option<&'a TextureHandle> {
    if undecodable.contains(&coord) {
        return None;
    }
    if !textures.contains_key(&coord) {
        match decode_tile(data) {
            Some(image) => {
                let name = format!("tile-{}-{}-{}", coord.z, coord.x, coord.y);
                let texture = ctx.load_texture(name, image, egui::TextureOptions::LINEAR);
                textures.insert(coord, texture);
            }
            None => {
                log::warn!("could not decode tile {:?} ({} bytes)", coord, data.len());
                undecodable.insert(coord);
                return None;
            }
        }
    }
    textures.get(&coord)
}

fn decode_tile(bytes: &[u8]) -> Option<ColorImage> {
    let image = image::load_from_memory(bytes).ok()?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
