//! Spin coordinator: one spin cycle across all three columns
//!
//! A single in-flight session gates spin requests and lock toggles. On an
//! accepted request every unlocked column gets a fresh stack and its own
//! precomputed outcome, then runs its own timed settle. Columns stop in a
//! deliberate stagger (2s / 3s / 4s); the cycle completes after the fixed
//! maximum duration rather than by awaiting per-column signals.

use crate::catalog::{GamePool, Provider, PROVIDER_COUNT};
use crate::column::{ColumnController, SLOT_COUNT};
use crate::feedback::FeedbackSink;
use crate::render::RenderSink;
use crate::ring::RingPosition;
use crate::sampler::Sampler;
use std::time::{Duration, Instant};

/// Per-column spin durations, in provider order. Distinct on purpose:
/// the columns stop left to right.
pub const SPIN_DURATIONS: [Duration; PROVIDER_COUNT] = [
    Duration::from_millis(2000),
    Duration::from_millis(3000),
    Duration::from_millis(4000),
];

/// The whole cycle ends when the slowest column does
pub const MAX_SPIN_DURATION: Duration = SPIN_DURATIONS[PROVIDER_COUNT - 1];

fn spin_duration(provider: Provider) -> Duration {
    SPIN_DURATIONS[provider.index()]
}

/// The one piece of cross-column shared state: present while a spin
/// cycle is in flight
#[derive(Debug)]
struct SpinSession {
    deadline: Instant,
}

/// Owns the three column controllers and the global session flag
#[derive(Debug)]
pub struct SpinCoordinator {
    columns: [ColumnController; PROVIDER_COUNT],
    session: Option<SpinSession>,
}

impl Default for SpinCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinCoordinator {
    pub fn new() -> Self {
        Self {
            columns: [
                ColumnController::new(Provider::Jili),
                ColumnController::new(Provider::PgSoft),
                ColumnController::new(Provider::PpSlot),
            ],
            session: None,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    pub fn column(&self, provider: Provider) -> &ColumnController {
        &self.columns[provider.index()]
    }

    /// Fill every column with an initial random stack so the display is
    /// never empty before the first spin
    pub fn populate_all(&mut self, pools: &GamePool, sampler: &mut Sampler, sink: &mut impl RenderSink) {
        for column in &mut self.columns {
            column.populate(pools.pool(column.provider()), sampler, sink);
        }
    }

    /// Start a spin cycle. Rejected while one is already in flight or
    /// when the catalog is empty. Locked columns keep their stack and sit
    /// the cycle out.
    pub fn request_spin(
        &mut self,
        now: Instant,
        pools: &GamePool,
        sampler: &mut Sampler,
        sink: &mut impl RenderSink,
    ) -> bool {
        if self.session.is_some() {
            tracing::debug!("Spin request ignored: already animating");
            return false;
        }
        if pools.is_empty() {
            tracing::warn!("Spin request ignored: no games loaded");
            return false;
        }

        for column in &mut self.columns {
            if column.is_locked() {
                continue;
            }
            let pool = pools.pool(column.provider());
            column.reset_stack(pool, sampler, sink);
            let outcome = sampler.sample(pool, SLOT_COUNT);
            column.start_spin(now, spin_duration(column.provider()), outcome, sink);
        }

        self.session = Some(SpinSession {
            deadline: now + MAX_SPIN_DURATION,
        });
        tracing::info!("Spin cycle started");
        true
    }

    /// Poll every column forward, and finish the cycle once the fixed
    /// maximum duration has elapsed. Returns true on the poll where the
    /// cycle completes, so the UI can celebrate.
    pub fn update(
        &mut self,
        now: Instant,
        pools: &GamePool,
        sampler: &mut Sampler,
        sink: &mut impl RenderSink,
        feedback: &mut impl FeedbackSink,
    ) -> bool {
        for column in &mut self.columns {
            let pool = pools.pool(column.provider());
            column.update(now, pool, sampler, sink, feedback);
        }

        if let Some(session) = &self.session {
            if now >= session.deadline {
                self.session = None;
                feedback.on_all_settled();
                tracing::info!("Spin cycle complete");
                return true;
            }
        }
        false
    }

    /// Flip a column's lock. Rejected while a spin is in flight, so a
    /// running cycle is never interrupted and `locked` never changes
    /// under a spinning column.
    pub fn toggle_lock(&mut self, provider: Provider, feedback: &mut impl FeedbackSink) -> bool {
        if self.session.is_some() {
            tracing::debug!("Lock toggle ignored during spin");
            return false;
        }
        let locked = self.columns[provider.index()].toggle_lock();
        feedback.on_lock_toggle();
        tracing::info!("{} {}", provider.name(), if locked { "locked" } else { "unlocked" });
        true
    }

    /// A click on one column's card at the given position
    pub fn handle_click(
        &mut self,
        provider: Provider,
        position: RingPosition,
        sink: &mut impl RenderSink,
    ) -> bool {
        self.columns[provider.index()].handle_click(position, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Game;
    use crate::render::FrameStore;

    #[derive(Default)]
    struct CountingFeedback {
        ticks: u32,
        stops: u32,
        settles: u32,
        locks: u32,
    }

    impl FeedbackSink for CountingFeedback {
        fn on_tick(&mut self) {
            self.ticks += 1;
        }
        fn on_column_stop(&mut self) {
            self.stops += 1;
        }
        fn on_all_settled(&mut self) {
            self.settles += 1;
        }
        fn on_lock_toggle(&mut self) {
            self.locks += 1;
        }
    }

    fn game(name: &str, provider: Provider) -> Game {
        Game {
            name: name.to_string(),
            image: String::new(),
            provider,
            rtp: None,
        }
    }

    fn full_pools() -> GamePool {
        let mut games = Vec::new();
        for p in Provider::all() {
            for i in 0..5 {
                games.push(game(&format!("{}-{}", p.name(), i), *p));
            }
        }
        GamePool::new(&games)
    }

    fn names(store: &FrameStore, provider: Provider) -> Vec<String> {
        store
            .column(provider)
            .cards
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Drive a full cycle in 100ms steps, returning feedback counters
    fn run_cycle(
        coordinator: &mut SpinCoordinator,
        t0: Instant,
        pools: &GamePool,
        sampler: &mut Sampler,
        store: &mut FrameStore,
    ) -> CountingFeedback {
        let mut feedback = CountingFeedback::default();
        let mut completions = 0;
        let total = MAX_SPIN_DURATION.as_millis() as u64 + 200;
        for ms in (0..=total).step_by(100) {
            if coordinator.update(t0 + Duration::from_millis(ms), pools, sampler, store, &mut feedback) {
                completions += 1;
            }
        }
        assert_eq!(completions, feedback.settles);
        feedback
    }

    #[test]
    fn test_spin_cycle_settles_all_columns() {
        let mut coordinator = SpinCoordinator::new();
        let mut store = FrameStore::new();
        let mut sampler = Sampler::with_seed(11);
        let pools = full_pools();
        let t0 = Instant::now();

        assert!(coordinator.request_spin(t0, &pools, &mut sampler, &mut store));
        assert!(coordinator.is_animating());

        let feedback = run_cycle(&mut coordinator, t0, &pools, &mut sampler, &mut store);

        assert!(!coordinator.is_animating());
        assert!(feedback.ticks > 0);
        assert_eq!(feedback.stops, 3);
        assert_eq!(feedback.settles, 1);
        for p in Provider::all() {
            let cards = names(&store, *p);
            assert_eq!(cards.len(), 3);
            assert!(cards.iter().all(|n| n.starts_with(p.name())));
            assert_eq!(store.column(*p).winning, Some(1));
            assert!(!store.column(*p).spinning);
        }
    }

    #[test]
    fn test_columns_stop_in_staggered_order() {
        let mut coordinator = SpinCoordinator::new();
        let mut store = FrameStore::new();
        let mut sampler = Sampler::with_seed(2);
        let mut feedback = CountingFeedback::default();
        let pools = full_pools();
        let t0 = Instant::now();

        coordinator.request_spin(t0, &pools, &mut sampler, &mut store);
        for p in Provider::all() {
            assert!(coordinator.column(*p).is_spinning());
        }

        coordinator.update(t0 + Duration::from_millis(2100), &pools, &mut sampler, &mut store, &mut feedback);
        assert!(!coordinator.column(Provider::Jili).is_spinning());
        assert!(coordinator.column(Provider::PgSoft).is_spinning());
        assert!(coordinator.column(Provider::PpSlot).is_spinning());

        coordinator.update(t0 + Duration::from_millis(3100), &pools, &mut sampler, &mut store, &mut feedback);
        assert!(!coordinator.column(Provider::PgSoft).is_spinning());
        assert!(coordinator.column(Provider::PpSlot).is_spinning());
        assert!(coordinator.is_animating());

        let completed =
            coordinator.update(t0 + Duration::from_millis(4100), &pools, &mut sampler, &mut store, &mut feedback);
        assert!(completed);
        assert!(!coordinator.column(Provider::PpSlot).is_spinning());
        assert!(!coordinator.is_animating());
        assert_eq!(feedback.stops, 3);
    }

    #[test]
    fn test_reentrant_spin_request_rejected() {
        let mut coordinator = SpinCoordinator::new();
        let mut store = FrameStore::new();
        let mut sampler = Sampler::with_seed(4);
        let pools = full_pools();
        let t0 = Instant::now();

        assert!(coordinator.request_spin(t0, &pools, &mut sampler, &mut store));
        let mid = names(&store, Provider::Jili);

        // A second request mid-flight changes nothing
        assert!(!coordinator.request_spin(t0 + Duration::from_millis(500), &pools, &mut sampler, &mut store));
        assert_eq!(names(&store, Provider::Jili), mid);
        assert!(coordinator.is_animating());
    }

    #[test]
    fn test_locked_column_is_untouched_by_spin() {
        let mut coordinator = SpinCoordinator::new();
        let mut store = FrameStore::new();
        let mut sampler = Sampler::with_seed(8);
        let mut feedback = CountingFeedback::default();
        let pools = full_pools();
        let t0 = Instant::now();

        coordinator.populate_all(&pools, &mut sampler, &mut store);
        coordinator.handle_click(Provider::PgSoft, RingPosition::Right, &mut store);
        let before_cards = names(&store, Provider::PgSoft);
        let before_order = coordinator.column(Provider::PgSoft).ring().order();

        assert!(coordinator.toggle_lock(Provider::PgSoft, &mut feedback));
        assert_eq!(feedback.locks, 1);

        coordinator.request_spin(t0, &pools, &mut sampler, &mut store);
        assert!(!coordinator.column(Provider::PgSoft).is_spinning());
        let feedback = run_cycle(&mut coordinator, t0, &pools, &mut sampler, &mut store);

        // Only the two unlocked columns stopped; the completion event
        // still fired despite the lock
        assert_eq!(feedback.stops, 2);
        assert_eq!(feedback.settles, 1);
        assert_eq!(names(&store, Provider::PgSoft), before_cards);
        assert_eq!(coordinator.column(Provider::PgSoft).ring().order(), before_order);
    }

    #[test]
    fn test_unlocked_columns_settle_on_precomputed_outcomes() {
        let seed = 21;
        let pools = full_pools();
        let t0 = Instant::now();

        // Replay the coordinator's draw order with an identical sampler:
        // per unlocked column, one draw for the reset stack and one for
        // the outcome.
        let mut shadow = Sampler::with_seed(seed);
        let mut expected = Vec::new();
        for p in Provider::all() {
            let _reset = shadow.sample(pools.pool(*p), SLOT_COUNT);
            expected.push(shadow.sample(pools.pool(*p), SLOT_COUNT));
        }

        let mut coordinator = SpinCoordinator::new();
        let mut store = FrameStore::new();
        let mut sampler = Sampler::with_seed(seed);
        coordinator.request_spin(t0, &pools, &mut sampler, &mut store);
        run_cycle(&mut coordinator, t0, &pools, &mut sampler, &mut store);

        for (p, outcome) in Provider::all().iter().zip(&expected) {
            let expected_names: Vec<String> = outcome.iter().map(|g| g.name.clone()).collect();
            assert_eq!(names(&store, *p), expected_names);
        }
    }

    #[test]
    fn test_lock_toggle_rejected_mid_spin() {
        let mut coordinator = SpinCoordinator::new();
        let mut store = FrameStore::new();
        let mut sampler = Sampler::with_seed(6);
        let mut feedback = CountingFeedback::default();
        let pools = full_pools();
        let t0 = Instant::now();

        coordinator.request_spin(t0, &pools, &mut sampler, &mut store);
        assert!(!coordinator.toggle_lock(Provider::Jili, &mut feedback));
        assert!(!coordinator.column(Provider::Jili).is_locked());
        assert_eq!(feedback.locks, 0);
    }

    #[test]
    fn test_empty_catalog_spin_is_noop() {
        let mut coordinator = SpinCoordinator::new();
        let mut store = FrameStore::new();
        let mut sampler = Sampler::with_seed(1);
        let pools = GamePool::new(&[]);

        assert!(!coordinator.request_spin(Instant::now(), &pools, &mut sampler, &mut store));
        assert!(!coordinator.is_animating());
        for p in Provider::all() {
            assert!(!coordinator.column(*p).is_spinning());
            assert!(store.column(*p).cards.is_empty());
        }
    }

    #[test]
    fn test_degraded_pools_scenario() {
        // 5 JILI games, 2 PG Soft games, no PP Slot games
        let mut games = Vec::new();
        for i in 0..5 {
            games.push(game(&format!("JILI-{}", i), Provider::Jili));
        }
        for i in 0..2 {
            games.push(game(&format!("PG Soft-{}", i), Provider::PgSoft));
        }
        let pools = GamePool::new(&games);

        let mut coordinator = SpinCoordinator::new();
        let mut store = FrameStore::new();
        let mut sampler = Sampler::with_seed(13);
        let t0 = Instant::now();

        assert!(coordinator.request_spin(t0, &pools, &mut sampler, &mut store));
        // The empty column never enters the spinning state
        assert!(!coordinator.column(Provider::PpSlot).is_spinning());

        run_cycle(&mut coordinator, t0, &pools, &mut sampler, &mut store);

        let jili = names(&store, Provider::Jili);
        assert_eq!(jili.len(), 3);
        let distinct: std::collections::HashSet<_> = jili.iter().collect();
        assert_eq!(distinct.len(), 3);

        let pg = names(&store, Provider::PgSoft);
        assert_eq!(pg.len(), 2);
        assert_ne!(pg[0], pg[1]);

        assert!(names(&store, Provider::PpSlot).is_empty());
        assert!(!store.column(Provider::PpSlot).spinning);
    }

    #[test]
    fn test_spin_accepted_again_after_completion() {
        let mut coordinator = SpinCoordinator::new();
        let mut store = FrameStore::new();
        let mut sampler = Sampler::with_seed(17);
        let pools = full_pools();
        let t0 = Instant::now();

        coordinator.request_spin(t0, &pools, &mut sampler, &mut store);
        run_cycle(&mut coordinator, t0, &pools, &mut sampler, &mut store);

        let t1 = t0 + MAX_SPIN_DURATION + Duration::from_secs(1);
        assert!(coordinator.request_spin(t1, &pools, &mut sampler, &mut store));
    }
}
