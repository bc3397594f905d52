use std::collections::VecDeque;

/// Relative slack on elapsed time checks. Host clocks built as `i * step` in
/// decimal steps land a few ulps short of the exact multiple.
pub const TIME_TOLERANCE: f64 = 1e-9;

/// `now - since >= interval`, allowing for roundoff in the host clock
pub fn has_elapsed(now: f64, since: f64, interval: f64) -> bool {
    let slack = TIME_TOLERANCE * now.abs().max(interval).max(1.0);
    now - since >= interval - slack
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DelayEntry<S> {
    time: f64,
    value: S,
}

/// Acquired values waiting out the transport delay, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayQueue<S> {
    history: VecDeque<DelayEntry<S>>,
}

impl<S> Default for DelayQueue<S> {
    fn default() -> Self {
        Self {
            history: VecDeque::new(),
        }
    }
}

impl<S: Copy> DelayQueue<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: f64, value: S) {
        self.history.push_back(DelayEntry { time, value });
    }

    /// Removes the oldest entry if it has aged at least `delay` by `now`
    pub fn pop_due(&mut self, now: f64, delay: f64) -> Option<S> {
        let front = self.history.front()?;
        if has_elapsed(now, front.time, delay) {
            self.history.pop_front().map(|entry| entry.value)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Enqueue time of the oldest entry
    pub fn front_time(&self) -> Option<f64> {
        self.history.front().map(|entry| entry.time)
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
