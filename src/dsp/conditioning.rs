//! Output conditioning chain
//!
//! Dry/wet mix, DC-blocking high-pass, hard clamp and soft-knee clipper.
//! Everything after the mix is per channel and keeps the signal inside
//! [-1.0, 1.0] before it returns to the integer domain.

use std::f32::consts::PI;

/// Default DC blocker cutoff in Hz
pub const DEFAULT_HIGHPASS_CUTOFF_HZ: f32 = 20.0;

/// Magnitude above which the soft clipper starts compressing
pub const SOFT_CLIP_THRESHOLD: f32 = 0.95;

/// Linear crossfade between the dry input and the processed wet signal
#[inline]
pub fn mix(dry: f32, wet_signal: f32, wet: f32) -> f32 {
    dry * (1.0 - wet) + wet_signal * wet
}

/// Clamp to the normalised full-scale range
#[inline]
pub fn hard_clamp(x: f32) -> f32 {
    x.clamp(-1.0, 1.0)
}

/// Soft-knee clipper
///
/// Identity up to the threshold, then `t + (|x| - t) / (1 + (|x| - t)^2)`
/// with the sign of `x`.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    let magnitude = x.abs();
    if magnitude <= SOFT_CLIP_THRESHOLD {
        return x;
    }

    let excess = magnitude - SOFT_CLIP_THRESHOLD;
    (SOFT_CLIP_THRESHOLD + excess / (1.0 + excess * excess)).copysign(x)
}

/// One-pole DC blocker: y[n] = x[n] - x[n-1] + R * y[n-1]
#[derive(Debug, Clone)]
pub struct DcBlocker {
    /// Pole radius, exp(-2π·fc/fs)
    coefficient: f32,
    x_prev: f32,
    y_prev: f32,
}

impl DcBlocker {
    pub fn new(cutoff_hz: f32, sample_rate: u32) -> Self {
        Self {
            coefficient: (-2.0 * PI * cutoff_hz / sample_rate as f32).exp(),
            x_prev: 0.0,
            y_prev: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = x - self.x_prev + self.coefficient * self.y_prev;
        self.x_prev = x;
        self.y_prev = y;
        y
    }

    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }

    pub fn is_at_rest(&self) -> bool {
        self.x_prev == 0.0 && self.y_prev == 0.0
    }
}

/// Per-channel tail of the chain: high-pass, clamp, soft clip
#[derive(Debug, Clone)]
pub struct OutputConditioner {
    highpass: DcBlocker,
}

impl OutputConditioner {
    pub fn new(cutoff_hz: f32, sample_rate: u32) -> Self {
        Self {
            highpass: DcBlocker::new(cutoff_hz, sample_rate),
        }
    }

    /// Condition one mixed sample; the result is always within [-1.0, 1.0]
    #[inline]
    pub fn process(&mut self, mixed: f32) -> f32 {
        soft_clip(hard_clamp(self.highpass.process(mixed)))
    }

    pub fn is_at_rest(&self) -> bool {
        self.highpass.is_at_rest()
    }
}
