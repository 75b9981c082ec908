//! Timeline cursor.
//!
//! The only mutable state in the viewer: a position into the catalog.
//! Steps saturate at both ends and jumps to unknown ids are ignored, so no
//! operation here can fail.

use tracing::{debug, trace};

use super::catalog::Catalog;
use super::types::{EventId, HistoricalEvent};

/// Cursor over an immutable [`Catalog`].
#[derive(Clone, Debug)]
pub struct Navigator<'a> {
    catalog: &'a Catalog,
    current: usize,
}

impl<'a> Navigator<'a> {
    /// Start at the first event.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog, current: 0 }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Step forward one event. Returns whether the cursor moved.
    pub fn advance(&mut self) -> bool {
        if self.current + 1 < self.catalog.len() {
            self.current += 1;
            debug!(position = self.current, "advanced");
            true
        } else {
            trace!("advance at last event ignored");
            false
        }
    }

    /// Step back one event. Returns whether the cursor moved.
    pub fn retreat(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            debug!(position = self.current, "retreated");
            true
        } else {
            trace!("retreat at first event ignored");
            false
        }
    }

    /// Move to the event with `id`. Unknown ids leave the cursor alone;
    /// they can come from stale overlay data. Returns whether the id
    /// resolved.
    pub fn jump_to(&mut self, id: EventId) -> bool {
        match self.catalog.position_of(id) {
            Some(position) => {
                self.current = position;
                debug!(%id, position, "jumped");
                true
            }
            None => {
                trace!(%id, "jump target not in catalog");
                false
            }
        }
    }

    pub fn current_position(&self) -> usize {
        self.current
    }

    pub fn current_event(&self) -> &'a HistoricalEvent {
        &self.catalog.events()[self.current]
    }

    /// `(position + 1) / len`, always in `(0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        (self.current + 1) as f64 / self.catalog.len() as f64
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::catalog::tests::catalog_with_ids;

    #[test]
    fn test_starts_at_first_event() {
        let catalog = catalog_with_ids(&[1, 2, 3]);
        let nav = Navigator::new(&catalog);
        assert_eq!(nav.current_position(), 0);
        assert_eq!(nav.current_event().id, EventId(1));
        assert!(nav.is_first());
        assert!(!nav.is_last());
    }

    #[test]
    fn test_advance_saturates_at_last_event() {
        let catalog = catalog_with_ids(&[1, 2, 3]);
        let mut nav = Navigator::new(&catalog);
        assert!(nav.advance());
        assert!(nav.advance());
        assert_eq!(nav.current_position(), 2);
        assert!(nav.is_last());

        assert!(!nav.advance());
        assert!(!nav.advance());
        assert_eq!(nav.current_position(), 2);
    }

    #[test]
    fn test_retreat_saturates_at_first_event() {
        let catalog = catalog_with_ids(&[1, 2, 3]);
        let mut nav = Navigator::new(&catalog);
        assert!(!nav.retreat());
        assert_eq!(nav.current_position(), 0);

        nav.advance();
        assert!(nav.retreat());
        assert!(!nav.retreat());
        assert_eq!(nav.current_position(), 0);
    }

    #[test]
    fn test_single_event_catalog() {
        let catalog = catalog_with_ids(&[42]);
        let mut nav = Navigator::new(&catalog);
        assert!(nav.is_first() && nav.is_last());
        assert!(!nav.advance());
        assert!(!nav.retreat());
        assert_eq!(nav.progress_fraction(), 1.0);
    }

    #[test]
    fn test_position_stays_in_bounds_for_any_step_sequence() {
        let catalog = catalog_with_ids(&[1, 2, 3, 4, 5]);
        let mut nav = Navigator::new(&catalog);
        // Deterministic pseudo-random walk biased in both directions.
        let mut state: u32 = 0x2545_f491;
        for _ in 0..500 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state % 3 == 0 {
                nav.retreat();
            } else {
                nav.advance();
            }
            assert!(nav.current_position() < catalog.len());
        }
    }

    #[test]
    fn test_jump_to_known_id() {
        let catalog = catalog_with_ids(&[10, 20, 30, 40]);
        let mut nav = Navigator::new(&catalog);
        assert!(nav.jump_to(EventId(30)));
        assert_eq!(nav.current_position(), 2);
        assert!(nav.jump_to(EventId(30)));
        assert_eq!(nav.current_position(), 2);
        assert!(nav.jump_to(EventId(10)));
        assert_eq!(nav.current_position(), 0);
    }

    #[test]
    fn test_jump_to_unknown_id_is_ignored() {
        let catalog = catalog_with_ids(&[10, 20, 30]);
        let mut nav = Navigator::new(&catalog);
        nav.advance();
        assert!(!nav.jump_to(EventId(999)));
        assert!(!nav.jump_to(EventId(15)));
        assert_eq!(nav.current_position(), 1);
    }

    #[test]
    fn test_progress_fraction() {
        let catalog = catalog_with_ids(&[1, 2, 3, 4, 5]);
        let mut nav = Navigator::new(&catalog);
        assert_eq!(nav.progress_fraction(), 0.2);
        for _ in 0..4 {
            nav.advance();
        }
        assert_eq!(nav.progress_fraction(), 1.0);
    }
}
