//! Render sink: the surface the spin engine pushes card content to
//!
//! The engine never touches the terminal. It emits frames through
//! [`RenderSink`]; the ratatui layer draws whatever the [`FrameStore`]
//! last received, and tests inspect the store directly.

use crate::catalog::{Game, Provider, PROVIDER_COUNT};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Ready-to-draw content for one card slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFace {
    pub name: String,
    pub image: String,
    pub provider: &'static str,
    /// RTP badge text, already resolved (catalog value or random JILI roll)
    pub rtp: Option<String>,
}

/// Display state of one column: up to three cards plus visual flags
#[derive(Debug, Clone, Default)]
pub struct ColumnDisplay {
    /// Slot-indexed card content; fewer than 3 on degraded pools
    pub cards: Vec<CardFace>,
    /// Spin blur effect active
    pub spinning: bool,
    /// Slot index of the highlighted winner, if any
    pub winning: Option<usize>,
}

/// Target the spin engine renders through
pub trait RenderSink {
    /// Replace the column's slot content with `games` (slot i gets games[i])
    fn render_frame(&mut self, provider: Provider, games: &[Game]);
    /// Toggle the column's spinning visual
    fn set_spinning(&mut self, provider: Provider, on: bool);
    /// Highlight one slot as the winner
    fn set_winning(&mut self, provider: Provider, slot: usize);
    /// Drop the winning highlight from all of the column's slots
    fn clear_highlights(&mut self, provider: Provider);
}

/// Retained display state consumed by the UI layer
#[derive(Debug)]
pub struct FrameStore {
    columns: [ColumnDisplay; PROVIDER_COUNT],
    /// RNG for the per-frame random RTP badges
    badge_rng: ChaCha8Rng,
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStore {
    pub fn new() -> Self {
        Self {
            columns: Default::default(),
            badge_rng: ChaCha8Rng::seed_from_u64(rand::random()),
        }
    }

    pub fn column(&self, provider: Provider) -> &ColumnDisplay {
        &self.columns[provider.index()]
    }
}

impl RenderSink for FrameStore {
    fn render_frame(&mut self, provider: Provider, games: &[Game]) {
        let cards = games
            .iter()
            .map(|g| CardFace {
                name: g.name.clone(),
                image: g.image.clone(),
                provider: g.provider.name(),
                rtp: g.rtp_badge(&mut self.badge_rng),
            })
            .collect();
        self.columns[provider.index()].cards = cards;
    }

    fn set_spinning(&mut self, provider: Provider, on: bool) {
        self.columns[provider.index()].spinning = on;
    }

    fn set_winning(&mut self, provider: Provider, slot: usize) {
        self.columns[provider.index()].winning = Some(slot);
    }

    fn clear_highlights(&mut self, provider: Provider) {
        self.columns[provider.index()].winning = None;
    }
}
