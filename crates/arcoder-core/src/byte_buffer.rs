use std::ops::{Index, IndexMut};

use crate::status::{CoderError, Status, StatusResult};

/// Owned, growable byte buffer used as encoder output and decoder output.
///
/// Growth goes through `try_reserve_exact`, so a refused allocation surfaces
/// as [`CoderError::AllocationFailure`] instead of aborting. Capacity at
/// least doubles on every growth, which keeps appends amortized O(1).
///
/// # Example
///
/// ```
/// use arcoder_core::ByteBuffer;
///
/// let mut buffer = ByteBuffer::with_capacity(2).unwrap();
/// buffer.write(b"abc").unwrap();
/// assert_eq!(buffer.size(), 3);
/// assert_eq!(buffer[2], b'c');
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    data: Vec<u8>,
}

impl ByteBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a buffer with initial capacity
    pub fn with_capacity(capacity: usize) -> StatusResult<Self> {
        let mut buffer = Self::new();
        buffer.reserve(capacity)?;
        Ok(buffer)
    }

    /// Ensure the buffer can hold at least `capacity` bytes without
    /// reallocating. Existing content is preserved.
    pub fn reserve(&mut self, capacity: usize) -> Status {
        if capacity <= self.data.capacity() {
            return Ok(());
        }
        self.data
            .try_reserve_exact(capacity - self.data.len())
            .map_err(|_| CoderError::AllocationFailure { requested: capacity })
    }

    /// Append `bytes` to the end of the buffer.
    pub fn write(&mut self, bytes: &[u8]) -> Status {
        self.grow_for(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Append a single byte.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Status {
        if self.data.len() == self.data.capacity() {
            self.grow_for(1)?;
        }
        self.data.push(byte);
        Ok(())
    }

    /// Append `count` copies of `byte`.
    pub fn push_repeated(&mut self, byte: u8, count: usize) -> Status {
        self.grow_for(count)?;
        self.data.resize(self.data.len() + count, byte);
        Ok(())
    }

    /// Set the logical length. New bytes are zero; shrinking keeps capacity.
    pub fn resize(&mut self, size: usize) -> Status {
        if size > self.data.len() {
            self.grow_for(size - self.data.len())?;
        }
        self.data.resize(size, 0);
        Ok(())
    }

    /// Clear all data from the buffer
    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checked read access.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.data.get(index).copied()
    }

    /// Checked write access.
    pub fn set(&mut self, index: usize, value: u8) -> Status {
        let size = self.data.len();
        match self.data.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(CoderError::invalid_argument(format!(
                "index {} out of bounds for buffer of size {}",
                index, size
            ))),
        }
    }

    /// Get the current buffer data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable view of `[0, size)` for bulk copies.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    fn grow_for(&mut self, additional: usize) -> Status {
        let required = self
            .data
            .len()
            .checked_add(additional)
            .ok_or(CoderError::AllocationFailure { requested: usize::MAX })?;
        if required <= self.data.capacity() {
            return Ok(());
        }
        let doubled = self.data.capacity().saturating_mul(2);
        self.reserve(required.max(doubled))
    }
}

impl Index<usize> for ByteBuffer {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.data[index]
    }
}

impl IndexMut<usize> for ByteBuffer {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.data[index]
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}
