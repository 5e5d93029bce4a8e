//! Read-once sequential item source

use parking_lot::Mutex;

/// A read-once source of items for producer threads.
///
/// Wraps a fixed list of items behind its own lock; each call to
/// [`next`](Self::next) hands out the next item exactly once, no matter how
/// many producers share the source. The lock is independent of the queue's
/// lock and is never held across a queue call.
#[derive(Debug)]
pub struct ItemSource<T> {
    state: Mutex<SourceState<T>>,
    total: usize,
}

#[derive(Debug)]
struct SourceState<T> {
    items: std::vec::IntoIter<T>,
    taken: usize,
}

impl<T> ItemSource<T> {
    /// Create a source over the given items.
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self {
            state: Mutex::new(SourceState {
                items: items.into_iter(),
                taken: 0,
            }),
            total,
        }
    }

    /// Take the next item, or `None` once the source is exhausted.
    pub fn next(&self) -> Option<T> {
        let mut state = self.state.lock();
        let item = state.items.next();
        if item.is_some() {
            state.taken += 1;
        }
        item
    }

    /// Number of items not yet handed out.
    pub fn remaining(&self) -> usize {
        let state = self.state.lock();
        self.total - state.taken
    }

    /// Returns `true` if at least one item is still available.
    pub fn has_next(&self) -> bool {
        self.remaining() > 0
    }

    /// Total number of items this source started with.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Returns `true` if the source started out empty.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
