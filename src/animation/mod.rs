pub mod interpolation;
pub mod transitions;

// Re-export commonly used types for convenience
pub use interpolation::{EasingFunction, Interpolatable};
pub use transitions::{CameraFrame, FlyTo, FlyToOptions, PulseAnimation};
