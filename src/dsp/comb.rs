//! Feedback comb filters
//!
//! Eight combs with mutually incommensurate lengths run in parallel per
//! channel. Their averaged output is the raw reverberant tail that the
//! all-pass chain later diffuses.

use super::delay_line::DelayLine;
use crate::error::Result;

/// Number of parallel comb filters per channel
pub const NUM_COMBS: usize = 8;

/// Damped feedback comb filter
///
/// The delay line is the only state. The value stored at the cursor
/// already carries the damped feedback from the previous visit, so no
/// separate low-pass memory is kept.
#[derive(Debug, Clone)]
pub struct CombFilter {
    line: DelayLine,
    /// Feedback gain (room size)
    room_size: f32,
    /// High-frequency damping blend
    damping: f32,
}

impl CombFilter {
    pub fn new(line: DelayLine, room_size: f32, damping: f32) -> Self {
        Self {
            line,
            room_size,
            damping,
        }
    }

    /// Process one input sample, returning the delayed output
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.line.read();

        let feedback = delayed + input;
        let damped = delayed - feedback * self.room_size;

        // Blend against the pre-write content, not the previous output
        let smoothed = damped * (1.0 - self.damping) + delayed * self.damping;
        self.line.write(smoothed);
        self.line.advance();

        delayed
    }

    pub fn delay_line(&self) -> &DelayLine {
        &self.line
    }
}

/// Parallel bank of comb filters for one channel
#[derive(Debug, Clone)]
pub struct CombBank {
    combs: [CombFilter; NUM_COMBS],
}

impl CombBank {
    /// Build a bank from explicit delay lengths
    ///
    /// # Errors
    /// * `DelayCapacity` - if any length exceeds `capacity`
    pub fn new(
        lengths: &[usize; NUM_COMBS],
        capacity: usize,
        room_size: f32,
        damping: f32,
    ) -> Result<Self> {
        for (i, &length) in lengths.iter().enumerate() {
            DelayLine::check_length(length, capacity, &format!("comb {}", i))?;
        }

        let combs = std::array::from_fn(|i| {
            CombFilter::new(DelayLine::zeroed(lengths[i], capacity), room_size, damping)
        });
        Ok(Self { combs })
    }

    /// Feed one sample to every comb and return the mean of their outputs
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut sum = 0.0;
        for comb in &mut self.combs {
            sum += comb.process(input);
        }
        sum / NUM_COMBS as f32
    }

    pub fn filters(&self) -> &[CombFilter] {
        &self.combs
    }

    /// Shortest delay length in the bank
    pub fn shortest_delay(&self) -> usize {
        self.combs
            .iter()
            .map(|c| c.line.length())
            .min()
            .unwrap_or(0)
    }

    pub fn is_at_rest(&self) -> bool {
        self.combs.iter().all(|c| c.line.is_at_rest())
    }
}
