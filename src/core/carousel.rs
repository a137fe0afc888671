/// Index state behind the prev/next destination control.
///
/// Wraps in both directions. With no destinations every operation is a no-op and
/// there is nothing to label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DestinationCarousel {
    len: usize,
    current: usize,
}

impl DestinationCarousel {
    pub fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.current)
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.len;
        Some(self.current)
    }

    pub fn previous(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.current = (self.current + self.len - 1) % self.len;
        Some(self.current)
    }

    /// Jumps straight to `index`; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        self.current = index;
        Some(index)
    }

    /// "{current+1} of {len}"
    pub fn label(&self) -> Option<String> {
        self.current()
            .map(|current| format!("{} of {}", current + 1, self.len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_carousel_is_inert() {
        let mut carousel = DestinationCarousel::new(0);
        assert!(carousel.is_empty());
        assert_eq!(carousel.current(), None);
        assert_eq!(carousel.next(), None);
        assert_eq!(carousel.previous(), None);
        assert_eq!(carousel.label(), None);
    }

    #[test]
    fn test_previous_from_first_wraps_to_last() {
        let mut carousel = DestinationCarousel::new(4);
        assert_eq!(carousel.previous(), Some(3));
        assert_eq!(carousel.label().unwrap(), "4 of 4");
    }

    #[test]
    fn test_next_from_last_wraps_to_first() {
        let mut carousel = DestinationCarousel::new(3);
        carousel.select(2);
        assert_eq!(carousel.next(), Some(0));
        assert_eq!(carousel.label().unwrap(), "1 of 3");
    }

    #[test]
    fn test_single_destination_stays_put() {
        let mut carousel = DestinationCarousel::new(1);
        assert_eq!(carousel.next(), Some(0));
        assert_eq!(carousel.previous(), Some(0));
        assert_eq!(carousel.label().unwrap(), "1 of 1");
    }

    #[test]
    fn test_label_tracks_every_step() {
        let mut carousel = DestinationCarousel::new(5);
        for step in 0..12 {
            let expected = format!("{} of 5", (step % 5) + 1);
            assert_eq!(carousel.label().unwrap(), expected);
            carousel.next();
        }
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let mut carousel = DestinationCarousel::new(2);
        assert_eq!(carousel.select(7), None);
        assert_eq!(carousel.current(), Some(0));
    }
}
