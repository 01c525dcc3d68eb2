//! SPSC ring-buffer FIFOs (spec.md §3).
//!
//! Three instances of the same queue back the modem: `delay_fifo` (ADC ISR
//! producer and consumer, for the discriminator's delay line),
//! `rx_fifo` (ADC ISR producer, foreground consumer) and `tx_fifo`
//! (foreground producer, DAC ISR consumer). All three are single-producer
//! single-consumer, so the plain [`Fifo`] needs no locking between `push`
//! and `pop` themselves; only operations observed from *both* an ISR and
//! the foreground (e.g. `len` for flow control) need the `_locked` variants
//! that wrap the access in [`cortex_m::interrupt::free`].

use heapless::spsc::Queue;

/// Error returned by [`Fifo::push`] when the queue has no free slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Full;

/// A bounded SPSC byte (or sample) queue backed by `heapless::spsc::Queue`,
/// the same lock-free ring buffer `stabilizer`'s network stack uses for its
/// telemetry/stream queues (`net::data_stream`). As with the underlying
/// `heapless` queue, `N` usable slots require a backing array of `N + 1`
/// (one slot is reserved to disambiguate full from empty), so callers size
/// `N` one larger than the number of items they actually need to hold.
pub struct Fifo<T, const N: usize> {
    queue: Queue<T, N>,
}

impl<T, const N: usize> Fifo<T, N> {
    pub const fn new() -> Self {
        Self { queue: Queue::new() }
    }

    /// Pushes `item`, returning [`Full`] if the queue has no room. Safe to
    /// call from the single designated producer context (ISR or
    /// foreground) without additional locking.
    pub fn push(&mut self, item: T) -> Result<(), Full> {
        self.queue.enqueue(item).map_err(|_| Full)
    }

    /// Pops the oldest item, or `None` if empty. Safe to call from the
    /// single designated consumer context without additional locking.
    pub fn pop(&mut self) -> Option<T> {
        self.queue.dequeue()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() == self.capacity()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Number of items that can be held at once (`N - 1`, per the
    /// underlying queue's sentinel slot).
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Drops all queued items. Used on RX timeout / line-abort recovery
    /// (spec.md §5 "Fatal"/"Abort" rows) to resynchronize the parser.
    pub fn clear(&mut self) {
        while self.queue.dequeue().is_some() {}
    }
}

impl<T, const N: usize> Default for Fifo<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `f` inside a critical section (masking the relevant interrupt, or
/// equivalent), for the handful of accesses — `sending`, `trailer_len`
/// (spec.md §5 "Atomicity") — that are genuinely observed from more than
/// one priority level. Most `Fifo` access does not need this: a plain SPSC
/// `push`/`pop` pair is already safe across a single producer/consumer
/// split. Backed by the `critical-section` crate so the same call works
/// whether the active implementation comes from `cortex-m` (on-target) or
/// from `critical-section`'s `std`-backed mutex (host-side `cargo test`).
pub fn locked<R>(f: impl FnOnce() -> R) -> R {
    critical_section::with(|_cs| f())
}
