//! Console input ring buffer.
//!
//! Single producer, single consumer, no locks. The producer is whatever drains
//! the input sources (an interrupt handler or the polling loop), the consumer
//! is `getchar`. Cursors run freely and are reduced modulo the capacity on use,
//! so all `N` slots are usable.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use log::trace;

pub const CONSOLE_BUFFER_SIZE: usize = 512;

pub struct ConsoleBuffer<const N: usize = CONSOLE_BUFFER_SIZE> {
    buf: UnsafeCell<[u8; N]>,
    /// Next slot to read. Only the consumer stores it.
    rpos: AtomicUsize,
    /// Next slot to write. Only the producer stores it.
    wpos: AtomicUsize,
    dropped: AtomicUsize,
}

// Slots between rpos and wpos belong to the consumer, the rest to the producer.
unsafe impl<const N: usize> Sync for ConsoleBuffer<N> {}

impl<const N: usize> ConsoleBuffer<N> {
    pub const fn new() -> Self {
        ConsoleBuffer {
            buf: UnsafeCell::new([0; N]),
            rpos: AtomicUsize::new(0),
            wpos: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Appends `byte`. When the buffer is full the byte is dropped and
    /// `false` is returned; unread input is never overwritten.
    ///
    /// Must only be called from the producer side.
    pub fn push(&self, byte: u8) -> bool {
        let wpos = self.wpos.load(Ordering::Relaxed);
        let rpos = self.rpos.load(Ordering::Acquire);
        if wpos.wrapping_sub(rpos) >= N {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            trace!("console: input buffer full, dropping {:#04x}", byte);
            return false;
        }
        // The slot at wpos is not visible to the consumer until wpos moves.
        unsafe { self.slot(wpos).write(byte) };
        self.wpos.store(wpos.wrapping_add(1), Ordering::Release);
        true
    }

    /// Removes the oldest byte. Must only be called from the consumer side.
    pub fn pop(&self) -> Option<u8> {
        let rpos = self.rpos.load(Ordering::Relaxed);
        let wpos = self.wpos.load(Ordering::Acquire);
        if rpos == wpos {
            return None;
        }
        let byte = unsafe { self.slot(rpos).read() };
        self.rpos.store(rpos.wrapping_add(1), Ordering::Release);
        Some(byte)
    }

    pub fn len(&self) -> usize {
        let wpos = self.wpos.load(Ordering::Acquire);
        let rpos = self.rpos.load(Ordering::Acquire);
        wpos.wrapping_sub(rpos)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= N
    }

    /// Bytes refused because the buffer was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    fn slot(&self, pos: usize) -> *mut u8 {
        unsafe { (self.buf.get() as *mut u8).add(pos % N) }
    }
}

impl<const N: usize> Default for ConsoleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
