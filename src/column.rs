//! Per-column spin state machine
//!
//! One controller per provider column. A spin is a timed sequence: every
//! 100 ms the column renders a fresh random triple as a transient frame,
//! then at its deadline it settles on the outcome that was chosen when
//! the spin was requested. Controllers are polled with `update(now)` from
//! the frame loop, so tests can drive them with synthetic instants.

use crate::catalog::{Game, Provider};
use crate::feedback::FeedbackSink;
use crate::render::RenderSink;
use crate::ring::{CarouselRing, RingPosition};
use crate::sampler::Sampler;
use std::time::{Duration, Instant};

/// Cards per column
pub const SLOT_COUNT: usize = 3;
/// Transient frame cadence during a spin
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
/// A tick feedback event fires every this many ticks
const TICKS_PER_FEEDBACK: u64 = 2;

/// In-flight spin bookkeeping
#[derive(Debug)]
struct ActiveSpin {
    started: Instant,
    duration: Duration,
    /// The distinct games this column will settle on, fixed at spin start
    outcome: Vec<Game>,
    /// Ticks already rendered
    ticks: u64,
}

/// Lock flag, ring, and spin state for one provider column
#[derive(Debug)]
pub struct ColumnController {
    provider: Provider,
    ring: CarouselRing,
    locked: bool,
    spin: Option<ActiveSpin>,
}

impl ColumnController {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            ring: CarouselRing::new(),
            locked: false,
            spin: None,
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    pub fn ring(&self) -> &CarouselRing {
        &self.ring
    }

    /// Flip the lock flag. The coordinator rejects this while a spin is
    /// in flight, so a spinning column never changes lock state.
    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        self.locked
    }

    /// Fill the column with a random triple (startup population)
    pub fn populate(&mut self, pool: &[Game], sampler: &mut Sampler, sink: &mut impl RenderSink) {
        let initial = sampler.sample(pool, SLOT_COUNT);
        sink.render_frame(self.provider, &initial);
    }

    /// Discard the current stack ahead of a spin: fresh ring order,
    /// highlights cleared, a new random triple on display
    pub fn reset_stack(&mut self, pool: &[Game], sampler: &mut Sampler, sink: &mut impl RenderSink) {
        self.ring.reset();
        sink.clear_highlights(self.provider);
        self.populate(pool, sampler, sink);
    }

    /// Begin the timed spin toward `outcome`. No-op when the column is
    /// locked or has nothing to land on (empty pool).
    pub fn start_spin(
        &mut self,
        now: Instant,
        duration: Duration,
        outcome: Vec<Game>,
        sink: &mut impl RenderSink,
    ) {
        if self.locked || outcome.is_empty() {
            return;
        }
        tracing::debug!(
            "{} spinning for {}ms -> {:?}",
            self.provider.name(),
            duration.as_millis(),
            outcome.iter().map(|g| g.name.as_str()).collect::<Vec<_>>()
        );
        sink.set_spinning(self.provider, true);
        self.spin = Some(ActiveSpin {
            started: now,
            duration,
            outcome,
            ticks: 0,
        });
    }

    /// Poll the spin forward to `now`: render any due transient frames,
    /// or settle once the duration has elapsed.
    pub fn update(
        &mut self,
        now: Instant,
        pool: &[Game],
        sampler: &mut Sampler,
        sink: &mut impl RenderSink,
        feedback: &mut impl FeedbackSink,
    ) {
        let Some(spin) = &mut self.spin else {
            return;
        };

        let elapsed = now.saturating_duration_since(spin.started);
        if elapsed < spin.duration {
            let due = (elapsed.as_millis() / TICK_INTERVAL.as_millis()) as u64;
            if due > spin.ticks {
                for tick in spin.ticks + 1..=due {
                    if tick % TICKS_PER_FEEDBACK == 0 {
                        feedback.on_tick();
                    }
                }
                spin.ticks = due;
                let frame = sampler.sample(pool, SLOT_COUNT);
                sink.render_frame(self.provider, &frame);
            }
            return;
        }

        // Settle: commit the outcome, stop the blur, crown the active slot
        if let Some(spin) = self.spin.take() {
            sink.render_frame(self.provider, &spin.outcome);
            sink.set_spinning(self.provider, false);
            sink.set_winning(self.provider, self.ring.slot_at(RingPosition::Active));
            feedback.on_column_stop();
            tracing::debug!("{} settled", self.provider.name());
        }
    }

    /// A click on the card at `position`. Rejected while spinning; a
    /// rotation drops the winning highlight.
    pub fn handle_click(&mut self, position: RingPosition, sink: &mut impl RenderSink) -> bool {
        if self.is_spinning() {
            return false;
        }
        if self.ring.click(position) {
            sink.clear_highlights(self.provider);
            true
        } else {
            false
        }
    }
}
