//! Reverberation DSP
//!
//! Leaf-first: the delay line primitive, the comb bank and all-pass chain
//! built on it, the stereo width stage, the output conditioning chain and
//! the engine that runs them frame by frame.

pub mod allpass;
pub mod comb;
pub mod conditioning;
pub mod delay_line;
pub mod reverb;
pub mod stereo;

pub use allpass::{AllpassChain, AllpassFilter, ALLPASS_GAIN, NUM_ALLPASS};
pub use comb::{CombBank, CombFilter, NUM_COMBS};
pub use conditioning::{hard_clamp, mix, soft_clip, DcBlocker, OutputConditioner};
pub use delay_line::DelayLine;
pub use reverb::{Channel, EngineTuning, Phase, ReverbEngine, ReverbParams};
pub use stereo::apply_width;
