//! Audio Module
//!
//! PCM buffer type and the decode/encode collaborators around the engine.

pub mod buffer;
pub mod io;

pub use buffer::{f32_to_i16, i16_to_f32, PcmBuffer, CHANNELS, MAX_DURATION_SECS};
pub use io::{decode_file, decode_mp3, decode_wav, encode_wav};
