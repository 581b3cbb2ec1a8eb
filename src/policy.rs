//! ResizePolicy: decides when the bucket array resizes and to what capacity.

/// Load-factor thresholds for one map. Growth reacts to the configured
/// maximum load; shrinking reacts to a fixed low-water mark.
pub(crate) struct ResizePolicy {
    max_load: f64,
}

impl ResizePolicy {
    /// Capacity multiplier applied per growth step.
    const GROWTH_FACTOR: usize = 2;
    /// Load below which a removal halves the capacity.
    const SHRINK_LOAD: f64 = 0.5;

    pub(crate) fn new(max_load: f64) -> Self {
        debug_assert!(max_load > 0.0 && max_load.is_finite());
        Self { max_load }
    }

    pub(crate) fn max_load(&self) -> f64 {
        self.max_load
    }

    /// Target capacity for an insert that would bring the table to
    /// `incoming_len` entries, or `None` while the load stays within bounds.
    ///
    /// The check uses the incoming size, so the table grows on the exact
    /// insert that would cross `max_load`, never one insert late. Doubling
    /// repeats until `incoming_len` fits: once for any `max_load >= 0.5`,
    /// more for stricter settings.
    pub(crate) fn grow_target(&self, incoming_len: usize, capacity: usize) -> Option<usize> {
        if !self.overloaded(incoming_len, capacity) {
            return None;
        }
        let mut target = capacity * Self::GROWTH_FACTOR;
        while self.overloaded(incoming_len, target) {
            target *= Self::GROWTH_FACTOR;
        }
        Some(target)
    }

    /// Target capacity after a removal left `remaining_len` entries, or
    /// `None` when no shrink is due. An empty table keeps its capacity, and
    /// the capacity never drops below one bucket.
    pub(crate) fn shrink_target(&self, remaining_len: usize, capacity: usize) -> Option<usize> {
        if remaining_len == 0 {
            return None;
        }
        if (remaining_len as f64) / (capacity as f64) < Self::SHRINK_LOAD {
            return Some((capacity / Self::GROWTH_FACTOR).max(1));
        }
        None
    }

    fn overloaded(&self, len: usize, capacity: usize) -> bool {
        (len as f64) / (capacity as f64) > self.max_load
    }
}
