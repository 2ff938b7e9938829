//! Contract between the runtime and the game built on top of it.

use std::fmt;

/// Shared simulation context handed to every window and form hook.
///
/// The implementing type is the game's own state; the runtime never inspects
/// it beyond these hooks.
pub trait Simulation: Sized + 'static {
    /// Closed set of window kinds. Used as the stack key.
    type WindowKey: Copy + Eq + Ord + fmt::Debug + 'static;
    /// Closed set of form kinds.
    type FormKey: Copy + Eq + Ord + fmt::Debug + 'static;

    /// Header line shown above the focused window.
    fn title(&self) -> Option<String> {
        None
    }

    /// Runs once, on the first simulation tick.
    fn on_first_tick(&mut self, _requests: &mut Requests<Self::WindowKey>) {}

    /// Runs on every simulation tick before the focused window ticks.
    fn on_tick(&mut self, _tick: u64) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<K> {
    Add(K),
    Clear,
}

/// Window-stack changes queued from inside hooks.
///
/// Hooks run while the window manager is walking its collection, so they
/// cannot touch it directly; the manager drains this queue once the hook
/// returns.
#[derive(Debug, Clone)]
pub struct Requests<K> {
    queue: Vec<Request<K>>,
}

impl<K> Default for Requests<K> {
    fn default() -> Self {
        Self { queue: Vec::new() }
    }
}

impl<K: Copy> Requests<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        self.queue.push(Request::Add(key));
    }

    /// Drop every window. Anything queued before this is discarded too.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.queue.push(Request::Clear);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> &[Request<K>] {
        &self.queue
    }

    pub(crate) fn take(&mut self) -> Vec<Request<K>> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_discards_earlier_adds() {
        let mut requests = Requests::new();
        requests.add(1u8);
        requests.clear();
        requests.add(2);
        assert_eq!(requests.pending(), &[Request::Clear, Request::Add(2)]);
        assert_eq!(requests.take().len(), 2);
        assert!(requests.is_empty());
    }
}
