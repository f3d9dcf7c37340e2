//! Interleaved stereo PCM buffer
//!
//! The engine works on signed 16-bit interleaved stereo frames. Float
//! conversion happens per sample inside the engine.

use crate::error::{ReverbError, Result};

/// Channel count of every buffer
pub const CHANNELS: usize = 2;

/// Default upper bound on input duration in seconds
pub const MAX_DURATION_SECS: f64 = 400.0;

/// int16 to float scale
const SCALE_IN: f32 = 1.0 / 32768.0;

/// float to int16 scale
const SCALE_OUT: f32 = 32767.0;

/// Convert a 16-bit sample to the normalised float domain
#[inline]
pub fn i16_to_f32(sample: i16) -> f32 {
    sample as f32 * SCALE_IN
}

/// Convert a normalised float back to 16 bits, saturating at the rails
#[inline]
pub fn f32_to_i16(sample: f32) -> i16 {
    (sample * SCALE_OUT).clamp(-32768.0, 32767.0) as i16
}

/// Stereo 16-bit audio, interleaved as [L, R, L, R, ...]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl PcmBuffer {
    /// Wrap interleaved stereo samples
    ///
    /// # Errors
    /// * `UnsupportedFormat` - if the sample count is not a whole number of frames
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Result<Self> {
        if samples.len() % CHANNELS != 0 {
            return Err(ReverbError::UnsupportedFormat {
                format: format!(
                    "{} samples is not a whole number of stereo frames",
                    samples.len()
                ),
            });
        }
        Ok(Self::from_frames(samples, sample_rate))
    }

    pub(crate) fn from_frames(samples: Vec<i16>, sample_rate: u32) -> Self {
        debug_assert_eq!(samples.len() % CHANNELS, 0);
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a silent buffer of `frames` frames
    pub fn silence(frames: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![0; frames * CHANNELS],
            sample_rate,
        }
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of stereo frames
    pub fn frames(&self) -> usize {
        self.samples.len() / CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Left/right pair at `index`, if in range
    pub fn frame(&self, index: usize) -> Option<[i16; 2]> {
        let start = index * CHANNELS;
        self.samples
            .get(start..start + CHANNELS)
            .map(|pair| [pair[0], pair[1]])
    }

    /// Overwrite the frame at `index`; out-of-range indices are ignored
    pub fn set_frame(&mut self, index: usize, frame: [i16; 2]) {
        let start = index * CHANNELS;
        if let Some(pair) = self.samples.get_mut(start..start + CHANNELS) {
            pair.copy_from_slice(&frame);
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Largest frame count allowed for `max_secs` at this buffer's rate
    pub fn max_frames_for(&self, max_secs: f64) -> usize {
        (max_secs * self.sample_rate as f64).floor() as usize
    }

    /// Drop everything past `max_secs`
    ///
    /// Returns the number of frames removed, or `None` if the buffer
    /// already fit.
    pub fn truncate_to_duration(&mut self, max_secs: f64) -> Option<usize> {
        let max_frames = self.max_frames_for(max_secs);
        let frames = self.frames();
        if frames <= max_frames {
            return None;
        }
        self.samples.truncate(max_frames * CHANNELS);
        Some(frames - max_frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_partial_frame() {
        let err = PcmBuffer::new(vec![1, 2, 3], 48000).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_frame_access() {
        let mut buffer = PcmBuffer::new(vec![1, -1, 2, -2, 3, -3], 48000).unwrap();
        assert_eq!(buffer.frames(), 3);
        assert_eq!(buffer.frame(1), Some([2, -2]));
        assert_eq!(buffer.frame(3), None);

        buffer.set_frame(2, [7, 8]);
        assert_eq!(buffer.samples(), &[1, -1, 2, -2, 7, 8]);
        buffer.set_frame(5, [9, 9]);
        assert_eq!(buffer.frames(), 3);
    }

    #[test]
    fn test_truncate_to_exact_bound() {
        let mut buffer = PcmBuffer::silence(1500, 1000);
        assert_eq!(buffer.truncate_to_duration(1.0), Some(500));
        assert_eq!(buffer.frames(), 1000);
        assert_eq!(buffer.truncate_to_duration(1.0), None);
        assert_eq!(buffer.duration_secs(), 1.0);
    }

    #[test]
    fn test_conversion_extremes() {
        assert_eq!(i16_to_f32(i16::MIN), -1.0);
        assert_eq!(f32_to_i16(1.0), 32767);
        assert_eq!(f32_to_i16(-1.0), -32767);
        assert_eq!(f32_to_i16(3.0), 32767);
        assert_eq!(f32_to_i16(-3.0), -32768);
        assert_eq!(f32_to_i16(0.0), 0);
    }
}
