//! Schroeder reverb engine
//!
//! Per channel, each stereo frame runs through:
//! - 8 parallel damped comb filters, averaged
//! - 4 serial all-pass filters for diffusion
//!
//! The two wet channels then meet for mid/side width, get mixed with the
//! dry signal and pass through the output conditioning chain. Frames that
//! fall inside the pre-delay window bypass all of this untouched.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::allpass::{AllpassChain, NUM_ALLPASS};
use super::comb::{CombBank, NUM_COMBS};
use super::conditioning::{mix, OutputConditioner, DEFAULT_HIGHPASS_CUTOFF_HZ};
use super::stereo::apply_width;
use crate::audio::{f32_to_i16, i16_to_f32, PcmBuffer};
use crate::error::{ReverbError, Result};

// ============================================================================
// Tuning Constants
// ============================================================================

/// Sample rate the delay lengths below are tuned for
pub const REFERENCE_SAMPLE_RATE: u32 = 48000;

/// Comb filter delays at the reference rate (mutually prime)
pub const COMB_DELAYS: [usize; NUM_COMBS] = [1909, 2767, 3217, 3559, 4133, 4639, 4999, 5511];

/// All-pass filter delays at the reference rate
pub const ALLPASS_DELAYS: [usize; NUM_ALLPASS] = [439, 599, 739, 881];

/// Offset added to every right-channel delay so the channels decorrelate
pub const STEREO_SPREAD: usize = 23;

/// Storage allocated per delay line, in samples
pub const DELAY_CAPACITY: usize = 20000;

/// Largest capacity a tuning may ask for (about 21 s at 48 kHz)
pub const MAX_DELAY_CAPACITY: usize = 1 << 20;

/// Maximum pre-delay time in milliseconds
const MAX_PRE_DELAY_MS: f32 = 1000.0;

// ============================================================================
// Parameter Structs
// ============================================================================

/// Reverb knobs, fixed for the duration of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbParams {
    /// Wet/dry mix: 0 (dry only) to 1 (wet only)
    pub wet: f32,
    /// Comb feedback gain: 0 to 1
    pub room_size: f32,
    /// High-frequency loss in the feedback path: 0 to 1
    pub damping: f32,
    /// Time before the wet signal starts, in milliseconds
    pub pre_delay_ms: f32,
    /// Stereo width of the wet signal: 0 (mono) to 1 (full)
    pub stereo_width: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            wet: 0.6,
            room_size: 0.85,
            damping: 0.5,
            pre_delay_ms: 100.0,
            stereo_width: 1.0,
        }
    }
}

impl ReverbParams {
    /// Validate all parameters are within range
    pub fn validate(&self) -> Result<()> {
        check_unit("wet", self.wet)?;
        check_unit("room_size", self.room_size)?;
        check_unit("damping", self.damping)?;
        check_unit("stereo_width", self.stereo_width)?;

        if !(0.0..=MAX_PRE_DELAY_MS).contains(&self.pre_delay_ms) {
            return Err(ReverbError::InvalidParameter {
                param: "pre_delay_ms".to_string(),
                value: self.pre_delay_ms.to_string(),
                expected: format!("0.0 to {} ms", MAX_PRE_DELAY_MS),
            });
        }
        Ok(())
    }

    /// Length of the bypass window in frames at `sample_rate`
    pub fn pre_delay_samples(&self, sample_rate: u32) -> usize {
        (sample_rate as f32 * self.pre_delay_ms / 1000.0) as usize
    }
}

fn check_unit(param: &str, value: f32) -> Result<()> {
    // NaN fails the range check too
    if !(0.0..=1.0).contains(&value) {
        return Err(ReverbError::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
            expected: "0.0 to 1.0".to_string(),
        });
    }
    Ok(())
}

/// Delay-line layout and fixed filter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    pub comb_delays: [usize; NUM_COMBS],
    pub allpass_delays: [usize; NUM_ALLPASS],
    /// Samples added to each right-channel delay
    pub stereo_spread: usize,
    /// Storage per delay line; every scaled delay must fit
    pub capacity: usize,
    /// Rate at which the delays above are exact
    pub reference_sample_rate: u32,
    pub highpass_cutoff_hz: f32,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            comb_delays: COMB_DELAYS,
            allpass_delays: ALLPASS_DELAYS,
            stereo_spread: STEREO_SPREAD,
            capacity: DELAY_CAPACITY,
            reference_sample_rate: REFERENCE_SAMPLE_RATE,
            highpass_cutoff_hz: DEFAULT_HIGHPASS_CUTOFF_HZ,
        }
    }
}

impl EngineTuning {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DELAY_CAPACITY).contains(&self.capacity) {
            return Err(ReverbError::InvalidParameter {
                param: "capacity".to_string(),
                value: self.capacity.to_string(),
                expected: format!("1 to {} samples", MAX_DELAY_CAPACITY),
            });
        }
        if self.stereo_spread > self.capacity {
            return Err(ReverbError::InvalidParameter {
                param: "stereo_spread".to_string(),
                value: self.stereo_spread.to_string(),
                expected: format!("0 to {} samples (the capacity)", self.capacity),
            });
        }
        if self.reference_sample_rate == 0 {
            return Err(ReverbError::InvalidParameter {
                param: "reference_sample_rate".to_string(),
                value: "0".to_string(),
                expected: "a positive sample rate".to_string(),
            });
        }
        if !(self.highpass_cutoff_hz > 0.0 && self.highpass_cutoff_hz < 1000.0) {
            return Err(ReverbError::InvalidParameter {
                param: "highpass_cutoff_hz".to_string(),
                value: self.highpass_cutoff_hz.to_string(),
                expected: "0 to 1000 Hz (exclusive)".to_string(),
            });
        }
        Ok(())
    }

    /// Rescale a delay tuned for the reference rate to `sample_rate`
    ///
    /// Oversized results saturate and are rejected by the delay line.
    fn scale(&self, delay: usize, sample_rate: u32) -> usize {
        if sample_rate == self.reference_sample_rate {
            return delay;
        }
        let scaled = delay as f64 * sample_rate as f64 / self.reference_sample_rate as f64;
        (scaled.round() as usize).max(1)
    }

    /// Comb delays for one channel at `sample_rate`
    pub fn comb_delays_at(&self, sample_rate: u32, channel: Channel) -> [usize; NUM_COMBS] {
        let spread = channel.spread(self.stereo_spread);
        self.comb_delays.map(|d| self.scale(d.saturating_add(spread), sample_rate))
    }

    /// All-pass delays for one channel at `sample_rate`
    pub fn allpass_delays_at(&self, sample_rate: u32, channel: Channel) -> [usize; NUM_ALLPASS] {
        let spread = channel.spread(self.stereo_spread);
        self.allpass_delays.map(|d| self.scale(d.saturating_add(spread), sample_rate))
    }
}

/// Stereo channel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    fn spread(self, stereo_spread: usize) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => stereo_spread,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Where the engine is in its one-way run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Dry passthrough, no filter state touched
    PreDelay,
    /// Full reverb path
    Active,
}

/// Filter state owned by one channel
#[derive(Debug, Clone)]
struct ChannelState {
    combs: CombBank,
    allpasses: AllpassChain,
    output: OutputConditioner,
}

impl ChannelState {
    fn new(
        params: &ReverbParams,
        tuning: &EngineTuning,
        sample_rate: u32,
        channel: Channel,
    ) -> Result<Self> {
        Ok(Self {
            combs: CombBank::new(
                &tuning.comb_delays_at(sample_rate, channel),
                tuning.capacity,
                params.room_size,
                params.damping,
            )?,
            allpasses: AllpassChain::new(
                &tuning.allpass_delays_at(sample_rate, channel),
                tuning.capacity,
            )?,
            output: OutputConditioner::new(tuning.highpass_cutoff_hz, sample_rate),
        })
    }

    /// Comb bank average followed by the all-pass chain
    #[inline]
    fn wet(&mut self, dry: f32) -> f32 {
        let tail = self.combs.process(dry);
        self.allpasses.process(tail)
    }

    fn is_at_rest(&self) -> bool {
        self.combs.is_at_rest() && self.allpasses.is_at_rest() && self.output.is_at_rest()
    }
}

/// Stereo Schroeder reverberator
///
/// Built once per run with fixed parameters, then fed frames in order.
/// Frame `i` is bypassed while `i < pre_delay_samples`; every later frame
/// runs the full path. Engines share no state, so several can run side
/// by side.
#[derive(Debug, Clone)]
pub struct ReverbEngine {
    params: ReverbParams,
    sample_rate: u32,
    pre_delay_samples: usize,
    left: ChannelState,
    right: ChannelState,
    /// Index of the next frame to process
    position: usize,
}

impl ReverbEngine {
    /// Create an engine with the default delay tuning
    pub fn new(params: ReverbParams, sample_rate: u32) -> Result<Self> {
        Self::with_tuning(params, sample_rate, &EngineTuning::default())
    }

    /// Create an engine with an explicit delay tuning
    ///
    /// # Errors
    /// * `InvalidParameter` - if a parameter or the sample rate is out of range
    /// * `DelayCapacity` - if a scaled delay does not fit the line capacity
    pub fn with_tuning(params: ReverbParams, sample_rate: u32, tuning: &EngineTuning) -> Result<Self> {
        params.validate()?;
        tuning.validate()?;
        if sample_rate == 0 {
            return Err(ReverbError::InvalidParameter {
                param: "sample_rate".to_string(),
                value: "0".to_string(),
                expected: "a positive sample rate".to_string(),
            });
        }

        if sample_rate != tuning.reference_sample_rate {
            warn!(
                "Input is {} Hz, rescaling delays tuned for {} Hz",
                sample_rate, tuning.reference_sample_rate
            );
        }

        let left = ChannelState::new(&params, tuning, sample_rate, Channel::Left)?;
        let right = ChannelState::new(&params, tuning, sample_rate, Channel::Right)?;
        let pre_delay_samples = params.pre_delay_samples(sample_rate);

        debug!(
            "Reverb engine: {} Hz, combs L {:?} R {:?}, allpass L {:?} R {:?}, pre-delay {} samples",
            sample_rate,
            tuning.comb_delays_at(sample_rate, Channel::Left),
            tuning.comb_delays_at(sample_rate, Channel::Right),
            tuning.allpass_delays_at(sample_rate, Channel::Left),
            tuning.allpass_delays_at(sample_rate, Channel::Right),
            pre_delay_samples
        );

        Ok(Self {
            params,
            sample_rate,
            pre_delay_samples,
            left,
            right,
            position: 0,
        })
    }

    pub fn params(&self) -> &ReverbParams {
        &self.params
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn pre_delay_samples(&self) -> usize {
        self.pre_delay_samples
    }

    /// Index of the next frame to be processed
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn phase(&self) -> Phase {
        if self.position < self.pre_delay_samples {
            Phase::PreDelay
        } else {
            Phase::Active
        }
    }

    /// True while no filter memory has been written
    pub fn is_at_rest(&self) -> bool {
        self.left.is_at_rest() && self.right.is_at_rest()
    }

    /// Shortest comb delay across both channels, in samples
    pub fn shortest_comb_delay(&self) -> usize {
        self.left
            .combs
            .shortest_delay()
            .min(self.right.combs.shortest_delay())
    }

    /// Process a whole buffer, returning one of the same length
    pub fn process(&mut self, input: &PcmBuffer) -> PcmBuffer {
        let mut samples = Vec::with_capacity(input.samples().len());
        for frame in input.samples().chunks_exact(2) {
            let [l, r] = self.process_frame([frame[0], frame[1]]);
            samples.push(l);
            samples.push(r);
        }
        PcmBuffer::from_frames(samples, input.sample_rate())
    }

    /// Process one interleaved 16-bit frame
    ///
    /// Bypassed frames are returned bit-for-bit.
    pub fn process_frame(&mut self, frame: [i16; 2]) -> [i16; 2] {
        if self.phase() == Phase::PreDelay {
            self.position += 1;
            return frame;
        }

        let (l, r) = self.process_sample_pair(i16_to_f32(frame[0]), i16_to_f32(frame[1]));
        [f32_to_i16(l), f32_to_i16(r)]
    }

    /// Process one frame in the float domain
    ///
    /// Active output is the conditioned value, always within [-1.0, 1.0].
    pub fn process_sample_pair(&mut self, dry_left: f32, dry_right: f32) -> (f32, f32) {
        let phase = self.phase();
        self.position += 1;
        if phase == Phase::PreDelay {
            return (dry_left, dry_right);
        }

        let wet_left = self.left.wet(dry_left);
        let wet_right = self.right.wet(dry_right);
        let (wet_left, wet_right) = apply_width(wet_left, wet_right, self.params.stereo_width);

        let wet = self.params.wet;
        let out_left = self.left.output.process(mix(dry_left, wet_left, wet));
        let out_right = self.right.output.process(mix(dry_right, wet_right, wet));

        (out_left, out_right)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(wet: f32, pre_delay_ms: f32, stereo_width: f32) -> ReverbParams {
        ReverbParams {
            wet,
            room_size: 0.85,
            damping: 0.5,
            pre_delay_ms,
            stereo_width,
        }
    }

    #[test]
    fn test_reverb_default_params() {
        let params = ReverbParams::default();
        assert_eq!(params.wet, 0.6);
        assert_eq!(params.room_size, 0.85);
        assert_eq!(params.damping, 0.5);
        assert_eq!(params.pre_delay_ms, 100.0);
        assert_eq!(params.stereo_width, 1.0);
        assert!(params.validate().is_ok());
        assert_eq!(params.pre_delay_samples(48000), 4800);
    }

    #[test]
    fn test_reverb_param_validation() {
        let mut p = ReverbParams::default();
        p.wet = 1.5;
        assert!(p.validate().is_err());

        let mut p = ReverbParams::default();
        p.room_size = -0.1;
        assert!(p.validate().is_err());

        let mut p = ReverbParams::default();
        p.damping = f32::NAN;
        assert!(p.validate().is_err());

        let mut p = ReverbParams::default();
        p.stereo_width = 2.0;
        assert!(p.validate().is_err());

        let mut p = ReverbParams::default();
        p.pre_delay_ms = -1.0;
        assert!(p.validate().is_err());

        let mut p = ReverbParams::default();
        p.pre_delay_ms = 1000.0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_tuning_at_reference_rate() {
        let tuning = EngineTuning::default();
        assert_eq!(tuning.comb_delays_at(48000, Channel::Left), COMB_DELAYS);
        assert_eq!(tuning.comb_delays_at(48000, Channel::Right)[0], 1909 + STEREO_SPREAD);
        assert_eq!(tuning.allpass_delays_at(48000, Channel::Right)[3], 881 + STEREO_SPREAD);
    }

    #[test]
    fn test_tuning_rescales_for_other_rates() {
        let tuning = EngineTuning::default();
        let combs = tuning.comb_delays_at(96000, Channel::Left);
        assert_eq!(combs[0], 3818);
        assert_eq!(combs[7], 11022);

        let allpass = tuning.allpass_delays_at(44100, Channel::Left);
        assert_eq!(allpass[0], 403); // 439 * 0.91875 = 403.3
    }

    #[test]
    fn test_engine_rejects_rate_exceeding_capacity() {
        // 5511 * 4 = 22044 > 20000
        let err = ReverbEngine::new(ReverbParams::default(), 192000).unwrap_err();
        assert_eq!(err.error_code(), "DELAY_CAPACITY");

        let tuning = EngineTuning {
            capacity: 24000,
            ..EngineTuning::default()
        };
        assert!(ReverbEngine::with_tuning(ReverbParams::default(), 192000, &tuning).is_ok());
    }

    #[test]
    fn test_tuning_rejects_unbounded_values() {
        let tuning = EngineTuning {
            stereo_spread: usize::MAX,
            ..EngineTuning::default()
        };
        let err = ReverbEngine::with_tuning(ReverbParams::default(), 48000, &tuning).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");

        let tuning = EngineTuning {
            capacity: usize::MAX,
            ..EngineTuning::default()
        };
        let err = tuning.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");

        let tuning = EngineTuning {
            capacity: 0,
            ..EngineTuning::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_oversized_delay_saturates_into_capacity_error() {
        let mut tuning = EngineTuning::default();
        tuning.comb_delays[3] = usize::MAX;
        assert_eq!(tuning.comb_delays_at(48000, Channel::Right)[3], usize::MAX);
        assert_eq!(tuning.comb_delays_at(96000, Channel::Right)[3], usize::MAX);

        let err = ReverbEngine::with_tuning(ReverbParams::default(), 48000, &tuning).unwrap_err();
        assert_eq!(err.error_code(), "DELAY_CAPACITY");
    }

    #[test]
    fn test_engine_rejects_invalid_params() {
        let err = ReverbEngine::new(params(2.0, 0.0, 1.0), 48000).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(ReverbEngine::new(ReverbParams::default(), 0).is_err());
    }

    #[test]
    fn test_phase_transition_is_one_way() {
        let mut engine = ReverbEngine::new(params(0.5, 1.0, 1.0), 48000).unwrap();
        assert_eq!(engine.pre_delay_samples(), 48);

        for i in 0..48 {
            assert_eq!(engine.phase(), Phase::PreDelay, "frame {}", i);
            assert_eq!(engine.process_frame([1000, -1000]), [1000, -1000]);
        }
        assert!(engine.is_at_rest());

        for _ in 0..200 {
            assert_eq!(engine.phase(), Phase::Active);
            engine.process_frame([1000, -1000]);
        }
        assert_eq!(engine.position(), 248);
        assert!(!engine.is_at_rest());
    }

    #[test]
    fn test_float_bypass_returns_dry() {
        let mut engine = ReverbEngine::new(params(1.0, 10.0, 1.0), 48000).unwrap();
        assert_eq!(engine.process_sample_pair(3.5, -7.25), (3.5, -7.25));
        assert!(engine.is_at_rest());
    }

    #[test]
    fn test_zero_wet_ignores_reverb_settings() {
        let mut a = ReverbEngine::new(
            ReverbParams {
                wet: 0.0,
                room_size: 0.1,
                damping: 0.9,
                pre_delay_ms: 0.0,
                stereo_width: 0.0,
            },
            48000,
        )
        .unwrap();
        let mut b = ReverbEngine::new(
            ReverbParams {
                wet: 0.0,
                room_size: 1.0,
                damping: 0.0,
                pre_delay_ms: 0.0,
                stereo_width: 1.0,
            },
            48000,
        )
        .unwrap();
        let mut reference = OutputConditioner::new(DEFAULT_HIGHPASS_CUTOFF_HZ, 48000);

        for n in 0..10000 {
            let x = ((n as f32) * 0.01).sin() * 0.8;
            let out_a = a.process_sample_pair(x, -x);
            let out_b = b.process_sample_pair(x, -x);
            assert_eq!(out_a, out_b);
            assert_eq!(out_a.0, reference.process(x));
        }
    }

    #[test]
    fn test_zero_width_collapses_wet_to_mono() {
        let mut engine = ReverbEngine::new(params(1.0, 0.0, 0.0), 48000).unwrap();
        for n in 0..12000 {
            let l = if n % 997 == 0 { 0.9 } else { 0.0 };
            let r = ((n as f32) * 0.05).sin() * 0.3;
            let (out_l, out_r) = engine.process_sample_pair(l, r);
            assert_eq!(out_l, out_r, "frame {}", n);
        }
    }

    #[test]
    fn test_output_bounded_for_hot_input() {
        let mut engine = ReverbEngine::new(params(0.6, 0.0, 1.0), 48000).unwrap();
        for n in 0..20000 {
            let x = if (n / 50) % 2 == 0 { 4.0 } else { -4.0 };
            let (l, r) = engine.process_sample_pair(x, -x * 0.5);
            assert!((-1.0..=1.0).contains(&l));
            assert!((-1.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn test_first_wet_sample_at_shortest_comb() {
        let mut engine = ReverbEngine::new(params(1.0, 0.0, 1.0), 48000).unwrap();
        assert_eq!(engine.shortest_comb_delay(), 1909);

        let (l, r) = engine.process_sample_pair(1.0, 1.0);
        assert_eq!((l, r), (0.0, 0.0));
        for n in 1..1909 {
            assert_eq!(engine.process_sample_pair(0.0, 0.0), (0.0, 0.0), "frame {}", n);
        }

        // Comb 0 echoes -0.425, averaged over 8 combs, then the four
        // all-pass stages each contribute -0.5 on an empty line
        let (l, r) = engine.process_sample_pair(0.0, 0.0);
        assert_relative_eq!(l, -0.425 / 8.0 * 0.0625, epsilon = 1e-6);
        assert_eq!(r, 0.0);
    }
}
