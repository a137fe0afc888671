use crate::animation::interpolation::{EasingFunction, Interpolatable};
use crate::core::{
    constants::{FLY_CURVE, FLY_SPEED, PULSE_PERIOD_SECS},
    geo::{LatLng, Point},
    viewport::{project, unproject},
};
use serde::{Deserialize, Serialize};

/// Tuning for camera flights between destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyToOptions {
    /// Zoom-out curvature along the path; higher values zoom out further
    pub curve: f64,
    /// Average speed in screenfuls per second
    pub speed: f64,
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
    pub easing: EasingFunction,
}

impl Default for FlyToOptions {
    fn default() -> Self {
        Self {
            curve: FLY_CURVE,
            speed: FLY_SPEED,
            min_duration_secs: 0.4,
            max_duration_secs: 3.0,
            easing: EasingFunction::EaseInOutCubic,
        }
    }
}

/// A camera position: where the map is centered and how far it is zoomed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub center: LatLng,
    pub zoom: f64,
}

impl CameraFrame {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FlightPath {
    /// Zoom out, pan, zoom in along the van Wijk–Nivat optimal path
    Arc { r0: f64, w0: f64, u1: f64 },
    /// Same center, different zoom
    ZoomOnly { direction: f64 },
    /// Curve degenerated numerically; plain interpolation
    Linear,
    /// Nothing to animate
    Instant,
}

/// Smooth zoom-and-pan from one camera to another.
///
/// Path lengths are measured in world pixels at the starting zoom, and widths in
/// multiples of the starting screen width, so `w(0) == 1` and `u(0) == 0`.
#[derive(Debug, Clone)]
pub struct FlyTo {
    start: CameraFrame,
    target: CameraFrame,
    from: Point,
    delta: Point,
    rho: f64,
    path_length: f64,
    path: FlightPath,
    duration: f64,
    elapsed: f64,
    easing: EasingFunction,
}

impl FlyTo {
    pub fn new(
        start: CameraFrame,
        target: CameraFrame,
        viewport_size: Point,
        options: &FlyToOptions,
    ) -> Self {
        let rho = options.curve.max(0.01);
        let rho2 = rho * rho;

        let from = project(&start.center, start.zoom);
        let to = project(&target.center, start.zoom);
        let delta = to.subtract(&from);

        let w0 = viewport_size.x.max(viewport_size.y).max(1.0);
        let w1 = w0 / 2_f64.powf(target.zoom - start.zoom);
        let u1 = delta.length();

        let r = |i: usize| {
            let (sign, w) = if i == 0 { (1.0, w0) } else { (-1.0, w1) };
            let b = (w1 * w1 - w0 * w0 + sign * rho2 * rho2 * u1 * u1) / (2.0 * w * rho2 * u1);
            ((b * b + 1.0).sqrt() - b).ln()
        };

        let (path, path_length) = if u1 < 1e-6 {
            Self::zoom_only_path(w0, w1, rho)
        } else {
            let r0 = r(0);
            let length = (r(1) - r0) / rho;
            if length.is_finite() {
                (FlightPath::Arc { r0, w0, u1 }, length)
            } else if (w0 - w1).abs() < 1e-6 {
                (FlightPath::Linear, 1.0)
            } else {
                Self::zoom_only_path(w0, w1, rho)
            }
        };

        let duration = match path {
            FlightPath::Instant => 0.0,
            FlightPath::Linear => options.min_duration_secs,
            _ => (path_length / options.speed.max(0.01))
                .clamp(options.min_duration_secs, options.max_duration_secs),
        };

        log::debug!(
            "fly-to {:?} -> {:?}: {:?}, {:.2}s",
            start,
            target,
            path,
            duration
        );

        Self {
            start,
            target,
            from,
            delta,
            rho,
            path_length,
            path,
            duration,
            elapsed: 0.0,
            easing: options.easing,
        }
    }

    fn zoom_only_path(w0: f64, w1: f64, rho: f64) -> (FlightPath, f64) {
        if (w0 - w1).abs() < 1e-6 {
            return (FlightPath::Instant, 0.0);
        }
        let direction = if w1 < w0 { -1.0 } else { 1.0 };
        ((FlightPath::ZoomOnly { direction }), (w1 / w0).ln().abs() / rho)
    }

    /// Camera at normalized (already eased) progress `k` in [0, 1]
    pub fn sample(&self, k: f64) -> CameraFrame {
        let k = k.clamp(0.0, 1.0);
        if k >= 1.0 {
            return self.target;
        }

        let rho = self.rho;
        let s = k * self.path_length;
        match self.path {
            FlightPath::Arc { r0, w0, u1 } => {
                let w = r0.cosh() / (r0 + rho * s).cosh();
                let u = w0 * ((r0.cosh() * (r0 + rho * s).tanh() - r0.sinh()) / (rho * rho)) / u1;
                let center = unproject(&self.from.add(&self.delta.multiply(u)), self.start.zoom);
                CameraFrame::new(center, self.start.zoom + (1.0 / w).log2())
            }
            FlightPath::ZoomOnly { direction } => {
                let w = (direction * rho * s).exp();
                CameraFrame::new(self.start.center, self.start.zoom + (1.0 / w).log2())
            }
            FlightPath::Linear => CameraFrame::new(
                self.start.center.lerp(&self.target.center, k),
                self.start.zoom.lerp(&self.target.zoom, k),
            ),
            FlightPath::Instant => self.target,
        }
    }

    /// Moves the clock forward and returns the camera for the new time
    pub fn advance(&mut self, delta_time: f64) -> CameraFrame {
        self.elapsed = (self.elapsed + delta_time.max(0.0)).min(self.duration);
        self.sample(self.easing.apply(self.progress()))
    }

    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn target(&self) -> CameraFrame {
        self.target
    }
}

/// Repeating 0..1 phase that drives the user-location halo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseAnimation {
    period: f64,
    phase: f64,
}

impl Default for PulseAnimation {
    fn default() -> Self {
        Self::new(PULSE_PERIOD_SECS)
    }
}

impl PulseAnimation {
    pub fn new(period: f64) -> Self {
        Self {
            period: period.max(0.01),
            phase: 0.0,
        }
    }

    pub fn advance(&mut self, delta_time: f64) -> f64 {
        self.phase = (self.phase + delta_time.max(0.0) / self.period).fract();
        self.phase
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn halo_scale(&self) -> f64 {
        Self::halo_scale_at(self.phase)
    }

    pub fn halo_alpha(&self) -> f64 {
        Self::halo_alpha_at(self.phase)
    }

    /// Halo radius multiplier: grows from 1x to 2.5x over a period
    pub fn halo_scale_at(phase: f64) -> f64 {
        1.0 + phase.clamp(0.0, 1.0) * 1.5
    }

    /// Halo opacity: fades out as it grows
    pub fn halo_alpha_at(phase: f64) -> f64 {
        1.0 - phase.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Point = Point { x: 800.0, y: 600.0 };

    fn laoag() -> CameraFrame {
        CameraFrame::new(LatLng::new(18.1978, 120.5956), 12.0)
    }

    fn pagudpud() -> CameraFrame {
        CameraFrame::new(LatLng::new(18.6406, 120.9214), 14.0)
    }

    #[test]
    fn test_flight_lands_exactly_on_target() {
        let mut flight = FlyTo::new(laoag(), pagudpud(), SCREEN, &FlyToOptions::default());
        let mut frame = laoag();
        while !flight.is_finished() {
            frame = flight.advance(1.0 / 60.0);
        }
        assert_eq!(frame, pagudpud());
    }

    #[test]
    fn test_flight_starts_at_origin() {
        let flight = FlyTo::new(laoag(), pagudpud(), SCREEN, &FlyToOptions::default());
        let first = flight.sample(0.0);
        assert!((first.center.lat - laoag().center.lat).abs() < 1e-9);
        assert!((first.center.lng - laoag().center.lng).abs() < 1e-9);
        assert!((first.zoom - laoag().zoom).abs() < 1e-9);
    }

    #[test]
    fn test_long_flight_zooms_out_midway() {
        let flight = FlyTo::new(laoag(), pagudpud(), SCREEN, &FlyToOptions::default());
        let lowest = (1..100)
            .map(|i| flight.sample(i as f64 / 100.0).zoom)
            .fold(f64::INFINITY, f64::min);
        assert!(lowest < laoag().zoom);
    }

    #[test]
    fn test_arc_converges_before_snap() {
        let flight = FlyTo::new(laoag(), pagudpud(), SCREEN, &FlyToOptions::default());
        let almost = flight.sample(0.999_999);
        assert!((almost.center.lat - pagudpud().center.lat).abs() < 1e-4);
        assert!((almost.center.lng - pagudpud().center.lng).abs() < 1e-4);
        assert!((almost.zoom - pagudpud().zoom).abs() < 1e-3);
    }

    #[test]
    fn test_duration_is_clamped() {
        let options = FlyToOptions::default();
        let flight = FlyTo::new(laoag(), pagudpud(), SCREEN, &options);
        assert!(flight.duration() >= options.min_duration_secs);
        assert!(flight.duration() <= options.max_duration_secs);
    }

    #[test]
    fn test_same_camera_is_instant() {
        let flight = FlyTo::new(laoag(), laoag(), SCREEN, &FlyToOptions::default());
        assert!(flight.is_finished());
        assert_eq!(flight.duration(), 0.0);
    }

    #[test]
    fn test_zoom_only_flight_keeps_center() {
        let target = CameraFrame::new(laoag().center, 15.0);
        let mut flight = FlyTo::new(laoag(), target, SCREEN, &FlyToOptions::default());
        let mid = flight.advance(flight.duration() / 2.0);
        assert_eq!(mid.center, laoag().center);
        assert!(mid.zoom > 12.0 && mid.zoom < 15.0);
    }

    #[test]
    fn test_pulse_wraps_each_period() {
        let mut pulse = PulseAnimation::new(2.0);
        assert!((pulse.advance(0.5) - 0.25).abs() < 1e-12);
        assert!((pulse.advance(2.0) - 0.25).abs() < 1e-12);
        assert!(pulse.halo_scale() > 1.0);
        assert!(pulse.halo_alpha() < 1.0);
    }
}
