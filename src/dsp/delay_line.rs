//! Circular delay line
//!
//! The storage primitive shared by every comb and all-pass filter. A
//! filter reads the sample under the cursor, writes its replacement at the
//! same position, then advances.

use crate::error::{ReverbError, Result};

/// Fixed-capacity circular buffer with a single read/write cursor
///
/// The cursor is always in `0..length`. Storage beyond `length` is
/// allocated up to `capacity` but never touched.
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Sample storage, `capacity` long
    buffer: Vec<f32>,
    /// Effective length (wrap point)
    length: usize,
    /// Current read/write position
    cursor: usize,
}

impl DelayLine {
    /// Create a zeroed delay line of `length` samples backed by `capacity`
    ///
    /// # Errors
    /// * `DelayCapacity` - if `length` is zero or exceeds `capacity`
    pub fn new(length: usize, capacity: usize, filter: &str) -> Result<Self> {
        Self::check_length(length, capacity, filter)?;
        Ok(Self::zeroed(length, capacity))
    }

    /// Check that a line of `length` samples fits in `capacity`
    pub fn check_length(length: usize, capacity: usize, filter: &str) -> Result<()> {
        if length == 0 || length > capacity {
            return Err(ReverbError::DelayCapacity {
                filter: filter.to_string(),
                length,
                capacity,
            });
        }
        Ok(())
    }

    /// Caller has already run `check_length`
    pub(super) fn zeroed(length: usize, capacity: usize) -> Self {
        debug_assert!(length > 0 && length <= capacity);
        Self {
            buffer: vec![0.0; capacity],
            length,
            cursor: 0,
        }
    }

    /// Sample currently under the cursor
    #[inline]
    pub fn read(&self) -> f32 {
        self.buffer[self.cursor]
    }

    /// Overwrite the sample under the cursor
    #[inline]
    pub fn write(&mut self, value: f32) {
        self.buffer[self.cursor] = value;
    }

    /// Move the cursor one position forward, wrapping at `length`
    #[inline]
    pub fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor == self.length {
            self.cursor = 0;
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when every stored sample is zero and the cursor is at the start
    pub fn is_at_rest(&self) -> bool {
        self.cursor == 0 && self.is_silent()
    }

    /// True when every stored sample is zero, regardless of cursor
    pub fn is_silent(&self) -> bool {
        self.buffer[..self.length].iter().all(|&s| s == 0.0)
    }
}
