//! Audio file I/O for Schroeder
//!
//! Decoding a source file into interleaved 16-bit stereo and encoding the
//! result as a 16-bit stereo WAV. WAV goes through hound, MP3 through
//! minimp3. Nothing is resampled; the engine adapts its delays instead.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};
use minimp3::{Decoder, Error as Mp3Error, Frame};

use crate::audio::buffer::{f32_to_i16, PcmBuffer, CHANNELS};
use crate::error::{ReverbError, Result};

/// Decode a WAV or MP3 file into a stereo 16-bit buffer
///
/// # Errors
/// * `SourceOpen` - if the file cannot be opened or parsed
/// * `UnsupportedFormat` - if the extension is unknown, the audio is not
///   stereo, or the bit depth cannot be read
pub fn decode_file(path: &Path) -> Result<PcmBuffer> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let buffer = match extension.as_deref() {
        Some("wav") | Some("wave") => decode_wav(path)?,
        Some("mp3") => decode_mp3(path)?,
        other => {
            return Err(ReverbError::UnsupportedFormat {
                format: format!("'.{}' files (expected .wav or .mp3)", other.unwrap_or("")),
            })
        }
    };

    info!(
        "Decoded {}: {} frames at {} Hz ({:.2}s)",
        path.display(),
        buffer.frames(),
        buffer.sample_rate(),
        buffer.duration_secs()
    );
    Ok(buffer)
}

/// Decode a WAV file with hound
pub fn decode_wav(path: &Path) -> Result<PcmBuffer> {
    let reader =
        WavReader::open(path).map_err(|e| source_error(path, "not a readable WAV file", e))?;

    let spec = reader.spec();
    check_channels(spec.channels as usize)?;
    debug!(
        "WAV spec: {} Hz, {} bits, {:?}",
        spec.sample_rate, spec.bits_per_sample, spec.sample_format
    );

    let samples = read_samples_as_i16(reader, path, spec)?;
    PcmBuffer::new(samples, spec.sample_rate)
}

/// Decode an MP3 file with minimp3, concatenating every frame
pub fn decode_mp3(path: &Path) -> Result<PcmBuffer> {
    let file = File::open(path).map_err(|e| source_error(path, "cannot open file", e))?;
    let mut decoder = Decoder::new(BufReader::new(file));

    let mut samples = Vec::new();
    let mut sample_rate = None;

    loop {
        match decoder.next_frame() {
            Ok(Frame {
                data,
                sample_rate: frame_rate,
                channels,
                ..
            }) => {
                check_channels(channels)?;
                let frame_rate = frame_rate as u32;
                match sample_rate {
                    None => sample_rate = Some(frame_rate),
                    Some(rate) if rate != frame_rate => {
                        return Err(ReverbError::UnsupportedFormat {
                            format: format!(
                                "MP3 with changing sample rate ({} Hz then {} Hz)",
                                rate, frame_rate
                            ),
                        });
                    }
                    Some(_) => {}
                }
                samples.extend_from_slice(&data);
            }
            Err(Mp3Error::Eof) => break,
            Err(Mp3Error::SkippedData) => continue,
            Err(e) => {
                return Err(ReverbError::SourceOpen {
                    path: path.display().to_string(),
                    reason: format!("MP3 decode failed: {:?}", e),
                    source: None,
                });
            }
        }
    }

    let sample_rate = sample_rate.ok_or_else(|| ReverbError::SourceOpen {
        path: path.display().to_string(),
        reason: "no MP3 frames found".to_string(),
        source: None,
    })?;

    PcmBuffer::new(samples, sample_rate)
}

/// Write a buffer as 16-bit stereo PCM WAV at the buffer's sample rate
///
/// # Errors
/// * `DestinationOpen` - if the file cannot be created
/// * `EncodeFailed` - if writing or finalising fails
pub fn encode_wav(buffer: &PcmBuffer, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: CHANNELS as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| ReverbError::DestinationOpen {
        path: path.display().to_string(),
        reason: e.to_string(),
        source: Some(Box::new(e)),
    })?;

    let encode_error = |source: hound::Error| ReverbError::EncodeFailed {
        path: path.display().to_string(),
        source,
    };

    for &sample in buffer.samples() {
        writer.write_sample(sample).map_err(encode_error)?;
    }
    writer.finalize().map_err(encode_error)?;

    info!("Wrote {} frames to {}", buffer.frames(), path.display());
    Ok(())
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn check_channels(channels: usize) -> Result<()> {
    if channels != CHANNELS {
        return Err(ReverbError::UnsupportedFormat {
            format: format!("{}-channel audio (only stereo supported)", channels),
        });
    }
    Ok(())
}

fn source_error<E>(path: &Path, reason: &str, e: E) -> ReverbError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ReverbError::SourceOpen {
        path: path.display().to_string(),
        reason: format!("{}: {}", reason, e),
        source: Some(Box::new(e)),
    }
}

/// Read every sample from a WAV reader, reduced to 16 bits
fn read_samples_as_i16<R: std::io::Read>(
    mut reader: WavReader<R>,
    path: &Path,
    spec: WavSpec,
) -> Result<Vec<i16>> {
    let bits = spec.bits_per_sample;
    let read_error = |e: hound::Error| source_error(path, "corrupt sample data", e);

    match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f32_to_i16).map_err(read_error))
            .collect(),
        SampleFormat::Int => match bits {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| (v as i16) << 8).map_err(read_error))
                .collect(),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map_err(read_error))
                .collect(),
            17..=32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v >> (bits - 16)) as i16).map_err(read_error))
                .collect(),
            _ => Err(ReverbError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits),
            }),
        },
    }
}
