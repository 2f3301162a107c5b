//! Length-checked handles over caller-owned memory.
//!
//! A [`Buffer`] is a thin wrapper around a raw `u64` pointer plus a byte
//! capacity. Constructing one is `unsafe` (the caller vouches for validity
//! and lifetime); every later access goes through [`Buffer::resolve`], which
//! hands out the address only for lengths the capacity covers.

use crate::error::{Result, TesseraError};

/// An opaque handle to a memory region owned by the caller.
///
/// The holder never allocates, frees, or outlives the region it references;
/// the caller retains ownership and must keep the region alive until every
/// entry referencing it has reached completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Buffer {
    ptr: u64,
    capacity: usize,
}

impl Buffer {
    /// Wrap a raw pointer and the byte capacity behind it.
    ///
    /// # Safety
    /// `ptr` must point to at least `capacity` bytes of valid memory, and
    /// the region must stay valid for as long as any entry holds this handle.
    pub unsafe fn new(ptr: u64, capacity: usize) -> Self {
        Self { ptr, capacity }
    }

    /// Resolve the base address for an access of `len` bytes.
    ///
    /// Fails with [`TesseraError::BufferSizeMismatch`] when the capacity
    /// cannot cover the requested length.
    pub fn resolve(&self, len: usize) -> Result<u64> {
        if len > self.capacity {
            return Err(TesseraError::BufferSizeMismatch {
                expected: len,
                actual: self.capacity,
            });
        }
        Ok(self.ptr)
    }

    /// Capacity of the region in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if the region has zero capacity.
    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    /// Get the raw `u64` pointer.
    pub fn as_u64(&self) -> u64 {
        self.ptr
    }
}

impl std::fmt::Display for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Buffer(0x{:x}, {}B)", self.ptr, self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_within_capacity() {
        let data: Vec<u8> = vec![0; 1024];
        let buf = unsafe { Buffer::new(data.as_ptr() as u64, 1024) };
        assert_eq!(buf.resolve(1024).unwrap(), data.as_ptr() as u64);
        assert_eq!(buf.resolve(1).unwrap(), data.as_ptr() as u64);
        assert_eq!(buf.resolve(0).unwrap(), data.as_ptr() as u64);
    }

    #[test]
    fn test_resolve_too_large() {
        let data: Vec<u8> = vec![0; 16];
        let buf = unsafe { Buffer::new(data.as_ptr() as u64, 16) };
        match buf.resolve(40) {
            Err(TesseraError::BufferSizeMismatch { expected, actual }) => {
                assert_eq!(expected, 40);
                assert_eq!(actual, 16);
            }
            other => panic!("expected BufferSizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_buffer() {
        let buf = unsafe { Buffer::new(0x1000, 0) };
        assert!(buf.is_empty());
        assert!(buf.resolve(0).is_ok());
        assert!(buf.resolve(1).is_err());
    }

    #[test]
    fn test_display() {
        let buf = unsafe { Buffer::new(0xFF, 256) };
        let s = buf.to_string();
        assert!(s.contains("0xff"));
        assert!(s.contains("256B"));
    }
}
