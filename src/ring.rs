//! 3-slot carousel ring
//!
//! Each column shows three card slots. The ring tracks which slot sits in
//! which visual position (left / active / right) as a permutation of the
//! slot indices; clicking a side card rotates the ring toward it.

/// Visual position within one column's carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPosition {
    Left,
    Active,
    Right,
}

impl RingPosition {
    pub fn all() -> &'static [RingPosition] {
        &[RingPosition::Left, RingPosition::Active, RingPosition::Right]
    }
}

/// Permutation of the three slot indices over the three positions.
/// `order[0]` is the slot shown at left, `order[1]` active, `order[2]` right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselRing {
    order: [usize; 3],
}

impl Default for CarouselRing {
    fn default() -> Self {
        Self::new()
    }
}

impl CarouselRing {
    pub fn new() -> Self {
        Self { order: [0, 1, 2] }
    }

    pub fn order(&self) -> [usize; 3] {
        self.order
    }

    /// Discard the current arrangement (fresh stack on spin reset)
    pub fn reset(&mut self) {
        self.order = [0, 1, 2];
    }

    /// Slot index currently shown at `position`
    pub fn slot_at(&self, position: RingPosition) -> usize {
        match position {
            RingPosition::Left => self.order[0],
            RingPosition::Active => self.order[1],
            RingPosition::Right => self.order[2],
        }
    }

    /// Position the given slot index is currently shown at
    pub fn position_of(&self, slot: usize) -> Option<RingPosition> {
        self.order
            .iter()
            .position(|&s| s == slot)
            .map(|i| RingPosition::all()[i])
    }

    /// Rotate the ring left: the active card slides to the left position,
    /// the right card becomes active, the left card wraps around to right.
    pub fn rotate_left(&mut self) {
        let [a, b, c] = self.order;
        self.order = [b, c, a];
    }

    /// Inverse of [`rotate_left`](Self::rotate_left)
    pub fn rotate_right(&mut self) {
        let [a, b, c] = self.order;
        self.order = [c, a, b];
    }

    /// Apply the click policy for the card at `position`: clicking the
    /// left card rotates right, the right card rotates left, the active
    /// card does nothing. Returns whether the ring moved.
    pub fn click(&mut self, position: RingPosition) -> bool {
        match position {
            RingPosition::Left => {
                self.rotate_right();
                true
            }
            RingPosition::Right => {
                self.rotate_left();
                true
            }
            RingPosition::Active => false,
        }
    }
}
