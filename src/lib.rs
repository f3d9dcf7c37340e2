//! Schroeder - Stereo Reverberation
//!
//! Applies a Schroeder reverb (parallel comb filters feeding a serial
//! all-pass chain) to interleaved 16-bit stereo PCM and blends the result
//! with the dry signal.
//!
//! # Architecture
//!
//! - `dsp`: delay lines, comb bank, all-pass chain, stereo width, output
//!   conditioning and the `ReverbEngine` that drives them
//! - `audio`: the PCM buffer plus WAV/MP3 decoding and WAV encoding
//! - `render`: the one-pass batch pipeline over a whole buffer
//! - `config` / `cli`: settings and the command-line front end

pub mod audio;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod error;
pub mod render;

pub use audio::PcmBuffer;
pub use config::Settings;
pub use dsp::{ReverbEngine, ReverbParams};
pub use error::{Result, ReverbError};
pub use render::{render, RenderOutput};
