//! Growable byte buffer with explicit capacity management.
//!
//! [`GrowableBuffer`] owns a contiguous byte region and keeps the growth
//! policy explicit: a fresh buffer holds no allocation at all, the first
//! allocation happens on first use at a fixed initial size, and later growth
//! doubles the capacity until the request is covered. Allocation failure is
//! reported to the caller as a recoverable error instead of aborting, so a
//! directory traversal can skip one oversized file and keep going.
//!
//! Capacity never shrinks over a buffer's lifetime; [`clear`] resets the
//! in-use length but keeps the allocation for reuse across files.
//!
//! [`clear`]: GrowableBuffer::clear

use anyhow::anyhow;

use crate::error::Result;

/// Size of the first allocation (32 KiB).
///
/// Requests larger than this jump straight to the smallest doubling of it
/// that covers them.
pub const INITIAL_CAPACITY: usize = 32 * 1024;

/// Heap-owned byte container with lazy, doubling allocation.
#[derive(Debug, Default)]
pub struct GrowableBuffer {
    data: Vec<u8>,
}

impl GrowableBuffer {
    /// Create an empty buffer. No allocation happens until the first
    /// [`ensure_capacity`](Self::ensure_capacity) call.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Bytes logically in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes currently allocated. Always at least [`len`](Self::len).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Reset the in-use length to zero, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Guarantee room for `additional` more bytes beyond the current length
    /// without further reallocation.
    ///
    /// If the current capacity already covers the request this is a no-op.
    /// Otherwise the capacity grows to the smallest doubling of
    /// [`INITIAL_CAPACITY`] that covers `len() + additional`; the first call
    /// on a fresh buffer performs the initial allocation.
    ///
    /// Growth moves the storage, so any previously derived slice must be
    /// re-derived after a successful call. On allocation failure the buffer
    /// is left exactly as it was and an error is returned.
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        let required = self
            .data
            .len()
            .checked_add(additional)
            .ok_or_else(|| anyhow!("buffer size overflow"))?;
        if self.data.capacity() >= required {
            return Ok(());
        }

        let mut target = INITIAL_CAPACITY;
        while target < required {
            target <<= 1;
        }

        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|e| anyhow!("out of memory growing buffer to {target} bytes: {e}"))?;
        Ok(())
    }

    /// Append one byte.
    ///
    /// Capacity must already have been ensured; appends within ensured
    /// capacity never reallocate.
    pub fn push(&mut self, byte: u8) {
        debug_assert!(
            self.data.len() < self.data.capacity(),
            "push past ensured capacity"
        );
        self.data.push(byte);
    }

    /// Append a run of bytes within already-ensured capacity.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        debug_assert!(
            self.data.len() + bytes.len() <= self.data.capacity(),
            "extend past ensured capacity"
        );
        self.data.extend_from_slice(bytes);
    }

    /// Extend the in-use region with `additional` zero bytes, within
    /// already-ensured capacity. Used to expose a writable slice for reads.
    pub fn grow_zeroed(&mut self, additional: usize) {
        debug_assert!(
            self.data.len() + additional <= self.data.capacity(),
            "grow past ensured capacity"
        );
        self.data.resize(self.data.len() + additional, 0);
    }

    /// Shorten the in-use region. No-op if `len` is not smaller than the
    /// current length. The allocation is untouched.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }
}
