//! Position state owned by a single signal engine.

/// Mutable state carried from bar to bar.
///
/// `size` is restricted to `0` or the configured lot size; the engine never
/// shorts, so `short_entry_count` stays at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionState {
    pub size: i64,
    pub adaptive_window_length: usize,
    pub long_entry_count: u64,
    pub short_entry_count: u64,
}

impl PositionState {
    /// Flat state with the adaptive window at its maximum.
    pub fn initial(max_window: usize) -> Self {
        Self {
            size: 0,
            adaptive_window_length: max_window,
            long_entry_count: 0,
            short_entry_count: 0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.size == 0
    }

    pub fn is_long(&self) -> bool {
        self.size > 0
    }

    /// Window length for the next bar: reset while flat, otherwise shrink
    /// by `step` without going below `min_window`.
    pub fn next_window(&self, min_window: usize, max_window: usize, step: usize) -> usize {
        if self.is_flat() {
            max_window
        } else {
            self.adaptive_window_length
                .saturating_sub(step)
                .max(min_window)
        }
    }
}
