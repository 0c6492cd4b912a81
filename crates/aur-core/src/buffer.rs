//! Append-only byte buffer with 2.5x amortized growth.
//!
//! Backs request response bodies and URL assembly. Every reservation goes
//! through `try_reserve_exact`; allocation failure surfaces as
//! [`Error::Alloc`](crate::Error::Alloc).

use crate::error::Result;

/// Capacity of a freshly initialized buffer.
pub const INITIAL_CAPACITY: usize = 100;

/// Next capacity after an overflow: 2.5x the current one.
pub(crate) fn next_capacity(capacity: usize) -> usize {
    capacity.saturating_mul(5) / 2
}

/// Growable byte storage. See the [module docs](self).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DynBuffer {
    data: Vec<u8>,
}

impl DynBuffer {
    /// An empty buffer with no storage. The first append allocates.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer with [`INITIAL_CAPACITY`] bytes reserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`](crate::Error::Alloc) if the reservation fails.
    pub fn init() -> Result<Self> {
        let mut buf = Self::new();
        buf.data.try_reserve_exact(INITIAL_CAPACITY)?;
        Ok(buf)
    }

    /// Copy `bytes` onto the end, growing as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`](crate::Error::Alloc) if growing fails; the
    /// buffer is left as it was.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        let mut capacity = self.data.capacity();
        if capacity == 0 {
            capacity = INITIAL_CAPACITY;
        }
        while bytes.len() > capacity - self.data.len() {
            capacity = next_capacity(capacity);
        }
        if capacity > self.data.capacity() {
            self.data.try_reserve_exact(capacity - self.data.len())?;
        }

        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Ensure the contents end in a single NUL byte and return them.
    ///
    /// Calling this repeatedly appends at most one terminator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`](crate::Error::Alloc) if the terminator does
    /// not fit and growing fails.
    pub fn as_c_str(&mut self) -> Result<&[u8]> {
        if self.data.last() != Some(&0) {
            self.append(&[0])?;
        }
        Ok(&self.data)
    }

    /// Hand the stored bytes to the caller and reset to the empty state.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }

    /// Stored bytes, without taking them.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes that fit before the next growth step.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }
}
