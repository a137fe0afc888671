use crate::{core::geo::LatLng, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One point of interest as supplied by the caller.
///
/// Field names match the JSON records: `{ "title", "type", "latitude", "longitude" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Destination {
    pub fn new(title: impl Into<String>, kind: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            title: title.into(),
            kind: kind.into(),
            latitude,
            longitude,
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    pub fn has_valid_position(&self) -> bool {
        self.position().is_valid()
    }

    pub fn category(&self) -> DestinationCategory {
        DestinationCategory::from_tag(&self.kind)
    }
}

/// Marker family derived from a destination's free-form `type` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationCategory {
    Beach,
    Heritage,
    Museum,
    Nature,
    Landmark,
    Food,
    Other,
}

/// Glyph and RGBA fill drawn for a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerIcon {
    pub glyph: &'static str,
    pub color: [u8; 4],
}

impl DestinationCategory {
    /// Case-insensitive match on the tag; anything unknown is `Other`.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        match tag.as_str() {
            "beach" | "coast" | "shore" => Self::Beach,
            "church" | "heritage" | "historical" | "historic" | "cultural" => Self::Heritage,
            "museum" | "gallery" => Self::Museum,
            "nature" | "park" | "waterfall" | "falls" | "mountain" | "dunes" => Self::Nature,
            "landmark" | "viewpoint" | "lighthouse" | "attraction" => Self::Landmark,
            "food" | "restaurant" | "cafe" | "delicacy" => Self::Food,
            _ => Self::Other,
        }
    }

    pub fn icon(&self) -> MarkerIcon {
        let (glyph, color) = match self {
            Self::Beach => ("🏖", [14, 165, 233, 255]),
            Self::Heritage => ("⛪", [180, 83, 9, 255]),
            Self::Museum => ("🏛", [124, 58, 237, 255]),
            Self::Nature => ("🌿", [22, 163, 74, 255]),
            Self::Landmark => ("📍", [220, 38, 38, 255]),
            Self::Food => ("🍴", [234, 88, 12, 255]),
            Self::Other => ("●", [71, 85, 105, 255]),
        };
        MarkerIcon { glyph, color }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beach => "Beach",
            Self::Heritage => "Heritage",
            Self::Museum => "Museum",
            Self::Nature => "Nature",
            Self::Landmark => "Landmark",
            Self::Food => "Food",
            Self::Other => "Other",
        }
    }
}

/// Parses a JSON array of destination records.
pub fn parse_destinations(json: &str) -> Result<Vec<Destination>> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_destinations(path: impl AsRef<Path>) -> Result<Vec<Destination>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let destinations = parse_destinations(&text)?;
    log::info!(
        "loaded {} destinations from {}",
        destinations.len(),
        path.as_ref().display()
    );
    Ok(destinations)
}
