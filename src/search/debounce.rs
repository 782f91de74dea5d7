/// Trailing-edge debounce keyed by generation.
///
/// Every `push` replaces the pending value. The browser timer scheduled for
/// it carries the generation returned by `push`; `take` only yields for the
/// latest generation, so a timer that escaped cancellation can never fire a
/// stale value.
#[derive(Clone, Debug)]
pub(crate) struct Debouncer<T> {
    delay_ms: i64,
    generation: u64,
    pending: Option<(u64, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: i64) -> Self {
        Self {
            delay_ms,
            generation: 0,
            pending: None,
        }
    }

    /// How long the caller's timer should wait after each `push`.
    pub fn delay_ms(&self) -> i64 {
        self.delay_ms
    }

    pub fn push(&mut self, value: T) -> u64 {
        self.generation += 1;
        self.pending = Some((self.generation, value));
        self.generation
    }

    /// Timer callback path.
    pub fn take(&mut self, generation: u64) -> Option<T> {
        if !self.pending.as_ref().is_some_and(|(g, _)| *g == generation) {
            return None;
        }
        self.pending.take().map(|(_, value)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
