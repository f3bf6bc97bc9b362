//! Single-producer/single-consumer ring of [`CanFrame`]s over caller-supplied
//! storage.
//!
//! The producer half is handed to the port layer and runs in interrupt
//! context; the consumer half is held by the driver context. Each half owns
//! one index:
//!
//! * `tail`: written by the producer only, read by the consumer;
//! * `head`: written by the consumer only, read by the producer.
//!
//! Both counters run over `0..2 * capacity` and wrap back to 0 by hand, so a
//! full ring (`tail - head == capacity`) and an empty one (`tail == head`)
//! stay distinct whatever the capacity. The slot is `index` folded into
//! `0..capacity`. A slot is published with a `Release` store of its index and
//! observed with an `Acquire` load, so no lock is ever taken and the producer
//! never waits.
//!
//! When the ring is full the incoming frame is dropped and counted; the
//! frames already queued are kept.
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};
use core::task::Waker;

use embassy_sync::waitqueue::AtomicWaker;

use crate::error::QueueFull;
use crate::transport::can_frame::CanFrame;

//==================================================================================RX_QUEUE
/// Receive ring wrapping a borrowed frame buffer.
///
/// The capacity is the number of whole frames in the storage slice. Split the
/// queue with [`RxQueue::split`] to obtain the two halves; the exclusive borrow
/// guarantees there is exactly one of each.
pub struct RxQueue<'a> {
    slots: &'a [UnsafeCell<CanFrame>],
    head: AtomicUsize,
    tail: AtomicUsize,
    dropped: AtomicUsize,
    reader: AtomicWaker,
}

// SAFETY: slots are only written by the single `RxProducer` before the `tail`
// release store, and only read by the single `RxConsumer` after the matching
// acquire load; a slot is never handed back to the producer before `head` has
// moved past it.
unsafe impl Sync for RxQueue<'_> {}

impl<'a> RxQueue<'a> {
    /// Wrap `storage`. Its previous content is irrelevant; it is overwritten
    /// as frames arrive.
    pub fn new(storage: &'a mut [CanFrame]) -> Self {
        let len = storage.len();
        let ptr = storage.as_mut_ptr() as *const UnsafeCell<CanFrame>;
        // SAFETY: `UnsafeCell<T>` has the same layout as `T`, and the exclusive
        // borrow is held for `'a`, so nobody else can observe the slice.
        let slots = unsafe { core::slice::from_raw_parts(ptr, len) };

        Self {
            slots,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
            reader: AtomicWaker::new(),
        }
    }

    /// Number of frames the ring can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Frames currently queued.
    pub fn len(&self) -> usize {
        // Head first: it never passes the tail read after it.
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        self.distance(tail, head)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frames dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Split into the interrupt-side producer and the task-side consumer.
    pub fn split(&mut self) -> (RxProducer<'_>, RxConsumer<'_>) {
        let queue: &RxQueue<'_> = self;
        (RxProducer { queue }, RxConsumer { queue })
    }

    /// Next counter value, wrapping at `2 * capacity`.
    #[inline]
    fn advance(&self, index: usize) -> usize {
        let next = index + 1;
        if next == 2 * self.capacity() {
            0
        } else {
            next
        }
    }

    /// Frames between `head` and `tail`, both in `0..2 * capacity`.
    #[inline]
    fn distance(&self, tail: usize, head: usize) -> usize {
        if tail >= head {
            tail - head
        } else {
            tail + 2 * self.capacity() - head
        }
    }

    #[inline]
    fn slot(&self, index: usize) -> *mut CanFrame {
        let capacity = self.capacity();
        let index = if index >= capacity { index - capacity } else { index };
        self.slots[index].get()
    }
}

//==================================================================================PRODUCER
/// Producer half: the port layer's receive-callback entry point.
pub struct RxProducer<'a> {
    queue: &'a RxQueue<'a>,
}

impl<'a> RxProducer<'a> {
    /// Enqueue one received frame. Never blocks.
    ///
    /// On a full ring the frame is dropped, the drop counter is incremented
    /// and `QueueFull` is returned for the caller's information only.
    pub fn push(&mut self, frame: CanFrame) -> Result<(), QueueFull> {
        let queue = self.queue;
        let tail = queue.tail.load(Ordering::Relaxed);
        let head = queue.head.load(Ordering::Acquire);

        if queue.distance(tail, head) >= queue.capacity() {
            // Single writer: a plain load/store pair is enough and works on
            // targets without compare-and-swap.
            let dropped = queue.dropped.load(Ordering::Relaxed);
            queue.dropped.store(dropped.wrapping_add(1), Ordering::Relaxed);

            if dropped == 0 {
                #[cfg(feature = "defmt")]
                defmt::warn!("CAN receive queue overrun, dropping frames");
            }
            return Err(QueueFull);
        }

        // SAFETY: fewer than `capacity` frames are queued, so the consumer is not reading this
        // slot, and only this producer writes slots.
        unsafe { queue.slot(tail).write(frame) };
        queue.tail.store(queue.advance(tail), Ordering::Release);
        queue.reader.wake();
        Ok(())
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.queue.capacity()
    }

    #[inline]
    pub fn dropped(&self) -> usize {
        self.queue.dropped()
    }
}

//==================================================================================CONSUMER
/// Consumer half, drained in FIFO order from application context.
pub struct RxConsumer<'a> {
    queue: &'a RxQueue<'a>,
}

impl<'a> RxConsumer<'a> {
    /// Oldest queued frame, if any.
    pub fn pop(&mut self) -> Option<CanFrame> {
        let queue = self.queue;
        let head = queue.head.load(Ordering::Relaxed);
        let tail = queue.tail.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        // SAFETY: `head != tail`, so the producer published this slot and will
        // not touch it again until `head` moves past it.
        let frame = unsafe { queue.slot(head).read() };
        queue.head.store(queue.advance(head), Ordering::Release);
        Some(frame)
    }

    /// Copy up to `out.len()` frames into `out`, oldest first. Returns the
    /// number copied; 0 when the ring is empty.
    pub fn read_into(&mut self, out: &mut [CanFrame]) -> usize {
        let mut count = 0;
        for slot in out.iter_mut() {
            match self.pop() {
                Some(frame) => {
                    *slot = frame;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    /// Register `waker` to be woken by the next push.
    ///
    /// Callers must check [`RxConsumer::is_empty`] again after registering,
    /// otherwise a frame pushed in between is missed until the next one.
    pub fn register_waker(&self, waker: &Waker) {
        self.queue.reader.register(waker);
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn dropped(&self) -> usize {
        self.queue.dropped()
    }
}
