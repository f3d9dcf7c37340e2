//! CLI Command Implementations

use std::path::{Path, PathBuf};

use log::info;

use super::KnobArgs;
use crate::audio::{decode_file, encode_wav};
use crate::config::Settings;
use crate::error::Result;
use crate::render::{render, RenderOutput};

/// Resolve settings: file (or defaults), then overrides, then validation
pub fn resolve_settings(knobs: &KnobArgs) -> Result<Settings> {
    let mut settings = Settings::load_or_default(knobs.config.as_deref())?;
    knobs.apply(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Default output path: `<stem>_reverb.wav` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_reverb.wav", stem))
}

/// Decode, reverberate and encode one file
pub fn render_file(input: &Path, output: &Path, settings: &Settings) -> Result<RenderOutput> {
    info!("Rendering {} -> {}", input.display(), output.display());

    let source = decode_file(input)?;
    let rendered = render(source, settings)?;
    encode_wav(&rendered.buffer, output)?;

    Ok(rendered)
}

/// `render` subcommand
pub fn run_render(input: &Path, output: Option<&Path>, knobs: &KnobArgs) -> Result<()> {
    let settings = resolve_settings(knobs)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));

    let rendered = render_file(input, &output, &settings)?;

    println!(
        "Wrote {} ({} frames, {:.2}s)",
        output.display(),
        rendered.frames(),
        rendered.buffer.duration_secs()
    );
    if rendered.truncated_frames > 0 {
        println!(
            "Input was clipped to {} seconds ({} frames dropped)",
            settings.max_duration_secs, rendered.truncated_frames
        );
    }
    Ok(())
}

/// `show-config` subcommand
pub fn run_show_config(knobs: &KnobArgs) -> Result<()> {
    let settings = resolve_settings(knobs)?;
    println!("{}", settings.to_json_pretty()?);
    Ok(())
}
