//! Batch render pipeline
//!
//! Truncate to the duration bound, build a fresh engine for the input's
//! sample rate, and run the whole buffer through it in one pass.

use log::{info, warn};

use crate::audio::PcmBuffer;
use crate::config::Settings;
use crate::dsp::ReverbEngine;
use crate::error::Result;

/// Processed audio plus what happened on the way
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub buffer: PcmBuffer,
    /// Frames dropped from the end of an oversized input
    pub truncated_frames: usize,
    /// Frames passed through dry at the start
    pub pre_delay_samples: usize,
}

impl RenderOutput {
    pub fn frames(&self) -> usize {
        self.buffer.frames()
    }
}

/// Apply the reverb described by `settings` to `input`
///
/// # Errors
/// * `InvalidParameter` - if the settings are out of range
/// * `DelayCapacity` - if the input rate pushes a delay past capacity
pub fn render(mut input: PcmBuffer, settings: &Settings) -> Result<RenderOutput> {
    settings.validate()?;

    let truncated_frames = match input.truncate_to_duration(settings.max_duration_secs) {
        Some(dropped) => {
            warn!(
                "Input is too long, clipping to {} seconds ({} frames dropped)",
                settings.max_duration_secs, dropped
            );
            dropped
        }
        None => 0,
    };

    let mut engine =
        ReverbEngine::with_tuning(settings.reverb.clone(), input.sample_rate(), &settings.tuning)?;

    info!(
        "Rendering {} frames (wet {:.2}, room {:.2}, damping {:.2}, width {:.2}, pre-delay {} samples)",
        input.frames(),
        settings.reverb.wet,
        settings.reverb.room_size,
        settings.reverb.damping,
        settings.reverb.stereo_width,
        engine.pre_delay_samples()
    );

    let buffer = engine.process(&input);

    Ok(RenderOutput {
        buffer,
        truncated_frames,
        pre_delay_samples: engine.pre_delay_samples(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_preserves_length() {
        let input = PcmBuffer::silence(4800, 48000);
        let output = render(input, &Settings::default()).unwrap();
        assert_eq!(output.frames(), 4800);
        assert_eq!(output.truncated_frames, 0);
        assert_eq!(output.pre_delay_samples, 4800);
    }

    #[test]
    fn test_render_truncates() {
        let mut settings = Settings::default();
        settings.max_duration_secs = 0.5;

        let output = render(PcmBuffer::silence(30000, 48000), &settings).unwrap();
        assert_eq!(output.frames(), 24000);
        assert_eq!(output.truncated_frames, 6000);
    }

    #[test]
    fn test_render_rejects_bad_settings() {
        let mut settings = Settings::default();
        settings.reverb.wet = -1.0;
        let err = render(PcmBuffer::silence(10, 48000), &settings).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_empty_input() {
        let output = render(PcmBuffer::silence(0, 44100), &Settings::default()).unwrap();
        assert!(output.buffer.is_empty());
    }
}
