//! Serial all-pass diffusion chain

use super::delay_line::DelayLine;
use crate::error::Result;

/// Number of serial all-pass stages per channel
pub const NUM_ALLPASS: usize = 4;

/// Fixed gain shared by every all-pass stage
pub const ALLPASS_GAIN: f32 = 0.5;

/// Schroeder all-pass filter
///
/// Implements: y[n] = -g * x[n] + buf[n - d], buf[n] = x[n] + g * buf[n - d]
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    line: DelayLine,
}

impl AllpassFilter {
    pub fn new(line: DelayLine) -> Self {
        Self { line }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let stored = self.line.read();
        let output = stored - ALLPASS_GAIN * input;

        self.line.write(input + ALLPASS_GAIN * stored);
        self.line.advance();

        output
    }

    pub fn delay_line(&self) -> &DelayLine {
        &self.line
    }
}

/// Four all-pass stages applied in series for one channel
#[derive(Debug, Clone)]
pub struct AllpassChain {
    stages: [AllpassFilter; NUM_ALLPASS],
}

impl AllpassChain {
    /// # Errors
    /// * `DelayCapacity` - if any length exceeds `capacity`
    pub fn new(lengths: &[usize; NUM_ALLPASS], capacity: usize) -> Result<Self> {
        for (i, &length) in lengths.iter().enumerate() {
            DelayLine::check_length(length, capacity, &format!("allpass {}", i))?;
        }

        let stages =
            std::array::from_fn(|i| AllpassFilter::new(DelayLine::zeroed(lengths[i], capacity)));
        Ok(Self { stages })
    }

    /// Run one sample through every stage in order
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.stages
            .iter_mut()
            .fold(input, |signal, stage| stage.process(signal))
    }

    pub fn stages(&self) -> &[AllpassFilter] {
        &self.stages
    }

    pub fn is_at_rest(&self) -> bool {
        self.stages.iter().all(|s| s.line.is_at_rest())
    }
}
