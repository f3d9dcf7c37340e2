//! CLI Module
//!
//! Command-line interface for the Schroeder reverberator.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Settings;

/// Schroeder Reverb - apply a comb/all-pass reverb to stereo audio
#[derive(Parser, Debug)]
#[command(name = "schroeder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply the reverb to an audio file
    #[command(name = "render")]
    Render {
        /// Input audio file (.wav or .mp3)
        input: PathBuf,

        /// Output WAV file (default: <input stem>_reverb.wav)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        knobs: KnobArgs,
    },

    /// Print the resolved settings as JSON
    #[command(name = "show-config")]
    ShowConfig {
        #[command(flatten)]
        knobs: KnobArgs,
    },
}

/// Settings file plus per-knob overrides
#[derive(Args, Debug, Default)]
pub struct KnobArgs {
    /// JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Wet/dry mix (0.0 - 1.0)
    #[arg(long)]
    pub wet: Option<f32>,

    /// Comb feedback gain (0.0 - 1.0)
    #[arg(long)]
    pub room_size: Option<f32>,

    /// High-frequency damping (0.0 - 1.0)
    #[arg(long)]
    pub damping: Option<f32>,

    /// Pre-delay before the reverb starts, in milliseconds
    #[arg(long)]
    pub pre_delay_ms: Option<f32>,

    /// Stereo width of the wet signal (0.0 mono - 1.0 wide)
    #[arg(long)]
    pub stereo_width: Option<f32>,

    /// Inputs longer than this many seconds are truncated
    #[arg(long)]
    pub max_duration_secs: Option<f64>,
}

impl KnobArgs {
    /// Apply any overrides given on the command line
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = self.wet {
            settings.reverb.wet = v;
        }
        if let Some(v) = self.room_size {
            settings.reverb.room_size = v;
        }
        if let Some(v) = self.damping {
            settings.reverb.damping = v;
        }
        if let Some(v) = self.pre_delay_ms {
            settings.reverb.pre_delay_ms = v;
        }
        if let Some(v) = self.stereo_width {
            settings.reverb.stereo_width = v;
        }
        if let Some(v) = self.max_duration_secs {
            settings.max_duration_secs = v;
        }
    }
}
