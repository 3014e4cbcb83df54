use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

// Upper bound on buffers kept alive between calls.
const MAX_POOLED: usize = 16;
// Buffers that grew past this many bytes are dropped instead of pooled.
const MAX_RETAINED_CAPACITY: usize = 1 << 20;

/// A concurrent stack of reusable `String` buffers.
///
/// Buffers are handed out empty through a [`Lease`] and come back cleared
/// when the lease drops. The pool is a cache, not a fixed set: retention is
/// bounded by `MAX_POOLED` and `MAX_RETAINED_CAPACITY`.
pub(crate) struct BufferPool {
    stack: Mutex<Vec<String>>,
}

impl BufferPool {
    pub(crate) const fn new() -> BufferPool {
        BufferPool {
            stack: Mutex::new(Vec::new()),
        }
    }

    /// Takes a buffer with at least `capacity` bytes reserved, allocating a
    /// fresh one on a pool miss.
    pub(crate) fn acquire(&self, capacity: usize) -> Lease<'_> {
        let mut buf = self.lock().pop().unwrap_or_default();
        buf.reserve(capacity);
        Lease { pool: self, buf }
    }

    fn release(&self, mut buf: String) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();
        let mut stack = self.lock();
        if stack.len() < MAX_POOLED {
            stack.push(buf);
        }
    }

    // A poisoned lock only means another caller panicked mid-push; the stack
    // itself is always a valid list of empty buffers.
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped ownership of one pooled buffer. Exactly one caller sees the buffer
/// until the lease drops, which clears it and returns it to the pool.
pub(crate) struct Lease<'a> {
    pool: &'a BufferPool,
    buf: String,
}

impl Deref for Lease<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buf
    }
}

impl DerefMut for Lease<'_> {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buf
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.pool.release(mem::take(&mut self.buf));
    }
}

#[test]
fn test_reuses_released_capacity() {
    let pool = BufferPool::new();
    {
        let mut lease = pool.acquire(8);
        lease.push_str(&"x".repeat(4096));
    }
    let lease = pool.acquire(8);
    assert!(lease.capacity() >= 4096);
    assert!(lease.is_empty());
}

#[test]
fn test_bounds_retained_count() {
    let pool = BufferPool::new();
    let leases: Vec<_> = (0..MAX_POOLED * 2).map(|_| pool.acquire(1)).collect();
    drop(leases);
    assert!(pool.lock().len() <= MAX_POOLED);
}

#[test]
fn test_drops_oversized_buffers() {
    let pool = BufferPool::new();
    {
        let mut lease = pool.acquire(MAX_RETAINED_CAPACITY + 1);
        lease.push('x');
    }
    assert!(pool.lock().is_empty());
}

#[test]
fn test_leased_buffers_are_distinct() {
    let pool = BufferPool::new();
    let mut first = pool.acquire(4);
    let mut second = pool.acquire(4);
    first.push_str("one");
    second.push_str("two");
    assert_eq!(first.as_str(), "one");
    assert_eq!(second.as_str(), "two");
}
