//! Feedback sink: audio/celebration hooks fired by the spin engine

/// Events the engine emits while spinning. The audio layer implements
/// this; tests use counting stubs.
pub trait FeedbackSink {
    /// Coarse spin tick (every second frame tick)
    fn on_tick(&mut self);
    /// One column settled on its outcome
    fn on_column_stop(&mut self);
    /// The whole spin cycle completed
    fn on_all_settled(&mut self);
    /// A lock toggle was accepted
    fn on_lock_toggle(&mut self);
}
