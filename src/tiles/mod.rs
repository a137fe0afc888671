pub mod cache;
pub mod loader;
pub mod source;

// Re-exports for convenience
pub use cache::TileCache;
pub use loader::{TileLoader, TileLoaderConfig, TileResult};
pub use source::{MapboxStyleSource, TileSource};
