//! Command-line arguments

use anyhow::{ensure, Result};
use clap::{ArgAction, Parser, ValueEnum};
use spatial_io::OutputFormat;
use spatial_mix::{MixConfig, PanLaw};
use std::path::PathBuf;

/// Fixed number of tracks the mixer front end accepts
pub const MAX_TRACKS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PanLawArg {
    Balance,
    ConstantGain,
    ConstantPower,
}

impl From<PanLawArg> for PanLaw {
    fn from(arg: PanLawArg) -> Self {
        match arg {
            PanLawArg::Balance => PanLaw::Balance,
            PanLawArg::ConstantGain => PanLaw::ConstantGain,
            PanLawArg::ConstantPower => PanLaw::ConstantPower,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Pcm16,
    Pcm24,
    Pcm32,
    Float32,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pcm16 => OutputFormat::Pcm16,
            FormatArg::Pcm24 => OutputFormat::Pcm24,
            FormatArg::Pcm32 => OutputFormat::Pcm32,
            FormatArg::Float32 => OutputFormat::Float32,
        }
    }
}

/// Mix up to four WAV tracks into one stereo file with a pan per track
#[derive(Debug, Parser)]
#[command(name = "spatial-mix", version)]
pub struct Args {
    /// Input WAV files (mono or stereo, one shared sample rate)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Pan per input in [-1.0, 1.0], comma separated or repeated.
    /// Omit to center every track.
    #[arg(short, long = "pan", value_delimiter = ',', allow_hyphen_values = true)]
    pub pans: Vec<f32>,

    /// Destination WAV file
    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = PanLawArg::Balance)]
    pub pan_law: PanLawArg,

    /// Output encoding (default: highest-resolution input format)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Log mix details
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.inputs.len() <= MAX_TRACKS,
            "at most {} input tracks are supported, got {}",
            MAX_TRACKS,
            self.inputs.len()
        );
        Ok(())
    }

    /// Pan values as given; all centered when none were passed.
    /// A count mismatch is left for the mixer to report.
    pub fn pan_values(&self) -> Vec<f32> {
        if self.pans.is_empty() {
            vec![0.0; self.inputs.len()]
        } else {
            self.pans.clone()
        }
    }

    pub fn mix_config(&self) -> MixConfig {
        MixConfig {
            pan_law: self.pan_law.into(),
            ..MixConfig::default()
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Warn
        } else if self.verbose > 0 {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("spatial-mix").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["a.wav", "b.wav", "-o", "out.wav"]);

        assert_eq!(args.inputs, vec![PathBuf::from("a.wav"), PathBuf::from("b.wav")]);
        assert_eq!(args.output, PathBuf::from("out.wav"));
        assert_eq!(args.pan_values(), vec![0.0, 0.0]);
        assert_eq!(args.mix_config().pan_law, PanLaw::Balance);
        assert_eq!(args.format, None);
        assert_eq!(args.log_level(), log::LevelFilter::Info);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_negative_pans() {
        let args = parse(&["a.wav", "b.wav", "-o", "out.wav", "--pan", "-0.5,0.75"]);
        assert_eq!(args.pan_values(), vec![-0.5, 0.75]);

        let args = parse(&["a.wav", "b.wav", "-o", "out.wav", "-p", "-1", "-p", "1"]);
        assert_eq!(args.pan_values(), vec![-1.0, 1.0]);
    }

    #[test]
    fn test_pan_count_is_passed_through() {
        let args = parse(&["a.wav", "b.wav", "c.wav", "-o", "out.wav", "--pan=0.1,0.2"]);
        assert_eq!(args.pan_values().len(), 2);
    }

    #[test]
    fn test_options() {
        let args = parse(&[
            "a.wav",
            "-o",
            "out.wav",
            "--pan-law",
            "constant-power",
            "--format",
            "float32",
            "-v",
        ]);

        assert_eq!(args.mix_config().pan_law, PanLaw::ConstantPower);
        assert_eq!(args.format.map(OutputFormat::from), Some(OutputFormat::Float32));
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_too_many_tracks() {
        let args = parse(&["1.wav", "2.wav", "3.wav", "4.wav", "5.wav", "-o", "out.wav"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_missing_output_or_inputs() {
        assert!(Args::try_parse_from(["spatial-mix", "a.wav"]).is_err());
        assert!(Args::try_parse_from(["spatial-mix", "-o", "out.wav"]).is_err());
        assert!(Args::try_parse_from(["spatial-mix", "a.wav", "-o", "x", "-v", "-q"]).is_err());
    }
}
