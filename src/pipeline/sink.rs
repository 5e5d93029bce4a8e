//! Append-only concurrent item sink

use parking_lot::Mutex;

/// An append-only destination for consumer threads.
///
/// Safe to share among any number of consumers; guarded by its own lock,
/// distinct from the queue's, so no call chain ever holds both at once.
#[derive(Debug, Default)]
pub struct ItemSink<T> {
    items: Mutex<Vec<T>>,
}

impl<T> ItemSink<T> {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Append an item.
    pub fn push(&self, item: T) {
        self.items.lock().push(item);
    }

    /// Number of items appended so far.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Returns `true` if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Consume the sink and return everything appended, in append order.
    pub fn into_items(self) -> Vec<T> {
        self.items.into_inner()
    }
}

impl<T: Clone> ItemSink<T> {
    /// Copy of the current contents, in append order.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}
