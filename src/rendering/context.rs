use crate::{
    core::geo::{Point, TileCoord},
    data::destination::MarkerIcon,
    MapError, Result,
};
use std::sync::Arc;

/// Frame-local list of things to draw, filled by layers and consumed by the UI
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    pub drawing_queue: Vec<DrawCommand>,
    /// Visible area (min, max) in screen coordinates; tiles outside it are dropped
    pub clip_bounds: (Point, Point),
}

/// Commands that can be issued to the render context
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Encoded raster tile (PNG/JPEG bytes) covering `bounds` on screen
    Tile {
        coord: TileCoord,
        data: Arc<Vec<u8>>,
        bounds: (Point, Point),
        opacity: f32,
    },
    Marker {
        layer_id: String,
        position: Point,
        icon: MarkerIcon,
        label: String,
        selected: bool,
    },
    UserLocation {
        position: Point,
        /// 0..1 phase of the halo animation
        pulse: f64,
    },
}

impl RenderContext {
    /// Create a new render context
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MapError::Render(format!(
                "render target must not be empty ({}x{})",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            drawing_queue: Vec::new(),
            clip_bounds: (Point::new(0.0, 0.0), Point::new(width as f64, height as f64)),
        })
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) -> Result<()> {
        self.drawing_queue.clear();
        Ok(())
    }

    /// Get the current drawing queue
    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    /// Queues a tile unless it lies completely outside the clip area
    pub fn render_tile(
        &mut self,
        coord: TileCoord,
        data: Arc<Vec<u8>>,
        bounds: (Point, Point),
        opacity: f32,
    ) -> Result<()> {
        if bounds.0.x >= bounds.1.x || bounds.0.y >= bounds.1.y {
            return Err(MapError::Render(format!("invalid tile bounds for {:?}", coord)));
        }

        if self.is_outside_clip(bounds) {
            return Ok(());
        }

        self.drawing_queue.push(DrawCommand::Tile {
            coord,
            data,
            bounds,
            opacity: opacity.clamp(0.0, 1.0),
        });
        Ok(())
    }

    /// Queues a destination marker; markers are never clipped so labels can overhang
    pub fn render_marker(
        &mut self,
        layer_id: &str,
        position: Point,
        icon: MarkerIcon,
        label: &str,
        selected: bool,
    ) -> Result<()> {
        self.drawing_queue.push(DrawCommand::Marker {
            layer_id: layer_id.to_string(),
            position,
            icon,
            label: label.to_string(),
            selected,
        });
        Ok(())
    }

    pub fn render_user_location(&mut self, position: Point, pulse: f64) -> Result<()> {
        self.drawing_queue
            .push(DrawCommand::UserLocation { position, pulse });
        Ok(())
    }

    fn is_outside_clip(&self, bounds: (Point, Point)) -> bool {
        let (clip_min, clip_max) = self.clip_bounds;
        let (min, max) = bounds;
        max.x <= clip_min.x || min.x >= clip_max.x || max.y <= clip_min.y || min.y >= clip_max.y
    }

    /// Number of queued commands of each kind: (tiles, markers, user locations)
    pub fn command_counts(&self) -> (usize, usize, usize) {
        self.drawing_queue
            .iter()
            .fold((0, 0, 0), |(tiles, markers, users), cmd| match cmd {
                DrawCommand::Tile { .. } => (tiles + 1, markers, users),
                DrawCommand::Marker { .. } => (tiles, markers + 1, users),
                DrawCommand::UserLocation { .. } => (tiles, markers, users + 1),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::destination::DestinationCategory;

    #[test]
    fn test_zero_sized_context_is_rejected() {
        assert!(RenderContext::new(0, 600).is_err());
    }

    #[test]
    fn test_tiles_outside_clip_are_culled() {
        let mut ctx = RenderContext::new(800, 600).unwrap();
        let data = Arc::new(vec![1u8, 2, 3]);
        let coord = TileCoord::new(1, 1, 2);

        ctx.render_tile(coord, data.clone(), (Point::new(-300.0, 0.0), Point::new(-44.0, 256.0)), 1.0)
            .unwrap();
        ctx.render_tile(coord, data, (Point::new(700.0, 500.0), Point::new(956.0, 756.0)), 1.0)
            .unwrap();

        assert_eq!(ctx.command_counts(), (1, 0, 0));
    }

    #[test]
    fn test_inverted_tile_bounds_error() {
        let mut ctx = RenderContext::new(800, 600).unwrap();
        let result = ctx.render_tile(
            TileCoord::new(0, 0, 0),
            Arc::new(Vec::new()),
            (Point::new(10.0, 10.0), Point::new(5.0, 20.0)),
            1.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_begin_frame_clears_queue() {
        let mut ctx = RenderContext::new(800, 600).unwrap();
        let icon = DestinationCategory::Beach.icon();
        ctx.render_marker("destination-0", Point::new(5.0, 5.0), icon, "Saud Beach", false)
            .unwrap();
        ctx.render_user_location(Point::new(400.0, 300.0), 0.5).unwrap();
        assert_eq!(ctx.command_counts(), (0, 1, 1));

        ctx.begin_frame().unwrap();
        assert!(ctx.get_drawing_queue().is_empty());
    }
}
