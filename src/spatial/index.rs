use crate::core::{
    geo::{LatLng, Point},
    viewport::project,
};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A destination's position in zoom-0 world pixels, tagged with its index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedDestination {
    pub index: usize,
    pub world: Point,
}

impl RTreeObject for IndexedDestination {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.world.x, self.world.y])
    }
}

impl PointDistance for IndexedDestination {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.world.x - point[0];
        let dy = self.world.y - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree over destination positions, used to hit-test clicks on markers.
///
/// Positions are stored at zoom 0 so the tree survives zooming; screen
/// distances are converted by the caller's zoom at query time.
pub struct DestinationIndex {
    rtree: RTree<IndexedDestination>,
}

impl Default for DestinationIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationIndex {
    pub fn new() -> Self {
        Self { rtree: RTree::new() }
    }

    /// Builds the index in one pass from `(index, position)` pairs
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = (usize, LatLng)>,
    {
        let items = positions
            .into_iter()
            .map(|(index, position)| IndexedDestination {
                index,
                world: project(&position, 0.0),
            })
            .collect();
        Self {
            rtree: RTree::bulk_load(items),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
    }

    /// Closest destination to `position` whose screen distance at `zoom` is at most `max_px`
    pub fn nearest_within(&self, position: &LatLng, zoom: f64, max_px: f64) -> Option<usize> {
        let query = project(position, 0.0);
        let scale = 2_f64.powf(zoom);
        let max_world = max_px / scale;

        self.rtree
            .nearest_neighbor(&[query.x, query.y])
            .filter(|item| item.distance_2(&[query.x, query.y]) <= max_world * max_world)
            .map(|item| item.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> DestinationIndex {
        DestinationIndex::from_positions(vec![
            (0, LatLng::new(18.0614, 120.5217)),
            (1, LatLng::new(18.5150, 120.6000)),
            (2, LatLng::new(18.6406, 120.9214)),
        ])
    }

    #[test]
    fn test_nearest_within_finds_close_marker() {
        let index = index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.nearest_within(&LatLng::new(18.0615, 120.5218), 14.0, 18.0), Some(0));
    }

    #[test]
    fn test_far_click_misses() {
        // halfway between Paoay and Cape Bojeador is many pixels from both at zoom 14
        let index = index();
        assert_eq!(index.nearest_within(&LatLng::new(18.29, 120.56), 14.0, 18.0), None);
    }

    #[test]
    fn test_empty_index_never_hits() {
        let index = DestinationIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.nearest_within(&LatLng::new(18.0, 120.0), 10.0, 100.0), None);
    }
}
