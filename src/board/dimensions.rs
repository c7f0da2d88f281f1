//! Board size normalization.

use serde::{Deserialize, Serialize};

/// Validated board size.
///
/// Non-positive sides are clamped to 1, and an odd slot count leaves the
/// last slot empty so every card has a partner.
///
/// ```
/// use concentration::board::BoardDimensions;
///
/// let dims = BoardDimensions::new(3, 3);
/// assert_eq!(dims.slots(), 9);
/// assert_eq!(dims.card_count(), 8);
/// assert_eq!(dims.pair_count(), 4);
///
/// let clamped = BoardDimensions::new(0, -2);
/// assert_eq!((clamped.columns(), clamped.rows()), (1, 1));
/// assert_eq!(clamped.card_count(), 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardDimensions {
    columns: u16,
    rows: u16,
}

impl BoardDimensions {
    /// Clamp a requested size to a valid one.
    #[must_use]
    pub fn new(columns: i32, rows: i32) -> Self {
        Self {
            columns: columns.clamp(1, i32::from(u16::MAX)) as u16,
            rows: rows.clamp(1, i32::from(u16::MAX)) as u16,
        }
    }

    #[must_use]
    pub fn columns(&self) -> u16 {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Grid slots, including a possibly unused last one.
    #[must_use]
    pub fn slots(&self) -> usize {
        usize::from(self.columns) * usize::from(self.rows)
    }

    /// Cards actually dealt: slots rounded down to even.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.slots() & !1
    }

    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.card_count() / 2
    }
}
