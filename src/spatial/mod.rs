pub mod index;

pub use index::{DestinationIndex, IndexedDestination};
