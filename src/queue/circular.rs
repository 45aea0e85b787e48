//! Auto-growing circular queue with lookahead
//!
//! This module provides the ring buffer that sits between a bulk producer and
//! a one-at-a-time consumer:
//! - Amortized O(1) enqueue with geometric growth
//! - O(1) advance, read-back and arbitrary-offset peek
//! - Strict FIFO consumption
//! - No retention of consumed items: a slot is emptied the moment its item
//!   leaves the logical window, and the consumption cursor only ever holds
//!   the single most recently consumed item

use std::fmt;

/// Smallest number of slots allocated when the queue has to grow
pub const MIN_CAPACITY: usize = 4;

/// Generic circular queue decoupling bulk enqueue from sequential consumption
///
/// Items are appended at the tail with [`enqueue`](Self::enqueue) and consumed
/// from the head with [`advance`](Self::advance), after which the consumed
/// item can be re-read through [`value`](Self::value) until the next advance.
/// [`peek`](Self::peek) looks at any not-yet-consumed item without removing it.
///
/// The queue is single-owner: every mutating operation takes `&mut self`.
/// Wrap it in a `Mutex` if producers and consumers live on different threads.
///
/// # Example
///
/// ```rust
/// use streamring::queue::CircularQueue;
///
/// let mut queue = CircularQueue::new([1, 2, 3]);
///
/// assert!(queue.advance());
/// assert_eq!(queue.value(), Some(&1));
/// assert_eq!(queue.peek(0), Some(&2));
/// assert_eq!(queue.peek(5), None);
///
/// queue.enqueue([4]);
/// let mut rest = Vec::new();
/// while queue.advance() {
///     rest.extend(queue.value().copied());
/// }
/// assert_eq!(rest, vec![2, 3, 4]);
/// ```
#[derive(Clone)]
pub struct CircularQueue<T> {
    /// Backing slots; `None` marks a slot outside the logical window
    storage: Vec<Option<T>>,

    /// Index of the oldest unconsumed item
    head: usize,

    /// Number of unconsumed items
    count: usize,

    /// Most recently consumed item
    last: Option<T>,
}

impl<T> CircularQueue<T> {
    /// Create a queue pre-loaded with `initial`, oldest first
    ///
    /// Capacity matches the number of initial items; an empty sequence
    /// yields an empty queue that allocates nothing until the first enqueue.
    pub fn new<I>(initial: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let storage: Vec<Option<T>> = initial.into_iter().map(Some).collect();
        let count = storage.len();

        Self {
            storage,
            head: 0,
            count,
            last: None,
        }
    }

    /// Create an empty queue with room for `capacity` items before growing
    pub fn with_capacity(capacity: usize) -> Self {
        let mut storage = Vec::with_capacity(capacity);
        storage.resize_with(capacity, || None);

        Self {
            storage,
            head: 0,
            count: 0,
            last: None,
        }
    }

    /// Append `items`, in order, to the tail of the queue
    ///
    /// Grows the backing storage whenever it is full. An empty sequence is a
    /// no-op.
    pub fn enqueue<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.push(item);
        }
    }

    /// Append a single item to the tail of the queue
    pub fn push(&mut self, item: T) {
        if self.count == self.storage.len() {
            self.grow();
        }

        let tail = (self.head + self.count) % self.storage.len();
        self.storage[tail] = Some(item);
        self.count += 1;
    }

    /// Consume the item at the head of the queue
    ///
    /// Returns `true` and moves the head item into the read-back cursor when
    /// one is available; the previously consumed item is dropped at this
    /// point. Returns `false` when the queue is empty, in which case the
    /// cursor is cleared as well.
    pub fn advance(&mut self) -> bool {
        if self.count == 0 {
            self.last = None;
            return false;
        }

        // take() leaves the slot empty, so the queue no longer owns the item
        self.last = self.storage[self.head].take();
        self.head = (self.head + 1) % self.storage.len();
        self.count -= 1;
        true
    }

    /// The item surfaced by the most recent successful [`advance`](Self::advance)
    ///
    /// Returns `None` if no advance has succeeded yet, if the last advance
    /// returned `false`, or if the item was moved out with
    /// [`take_value`](Self::take_value).
    pub fn value(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Move the most recently consumed item out of the queue
    ///
    /// After this call the queue holds no reference to the item and
    /// [`value`](Self::value) returns `None` until the next successful advance.
    pub fn take_value(&mut self) -> Option<T> {
        self.last.take()
    }

    /// Look at the unconsumed item `offset` positions from the head
    ///
    /// `peek(0)` is the item the next successful advance will surface.
    /// Returns `None` for any `offset >= len()`.
    pub fn peek(&self, offset: usize) -> Option<&T> {
        if offset >= self.count {
            return None;
        }

        let index = (self.head + offset) % self.storage.len();
        self.storage[index].as_ref()
    }

    /// Iterate over the unconsumed items, oldest first, without consuming them
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.count).filter_map(move |offset| self.peek(offset))
    }

    /// Number of unconsumed items
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check whether every enqueued item has been consumed
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots currently allocated
    ///
    /// Capacity only ever grows; it is retained for the life of the queue.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Double the storage (at least [`MIN_CAPACITY`] slots) and relay the
    /// live items contiguously from index 0
    fn grow(&mut self) {
        let old_capacity = self.storage.len();
        let new_capacity = (old_capacity * 2).max(MIN_CAPACITY);

        let mut relaid = Vec::with_capacity(new_capacity);
        for offset in 0..self.count {
            let index = (self.head + offset) % old_capacity;
            relaid.push(self.storage[index].take());
        }
        relaid.resize_with(new_capacity, || None);

        self.storage = relaid;
        self.head = 0;

        log::trace!(
            "Circular queue grew from {} to {} slots ({} pending)",
            old_capacity,
            new_capacity,
            self.count
        );
    }
}

impl<T> Default for CircularQueue<T> {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl<T> FromIterator<T> for CircularQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<T> Extend<T> for CircularQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.enqueue(iter);
    }
}

impl<T: fmt::Debug> fmt::Debug for CircularQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircularQueue")
            .field("pending", &self.iter().collect::<Vec<_>>())
            .field("last", &self.last)
            .field("capacity", &self.capacity())
            .finish()
    }
}

// Tests are located in src/queue/tests/
