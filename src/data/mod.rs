pub mod destination;

pub use destination::{
    load_destinations, parse_destinations, Destination, DestinationCategory, MarkerIcon,
};
