//! Command-line argument parsing

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lumen_engine::VisualizerConfig;
use lumen_fx::EffectKind;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Audio-reactive LED strip visualizer", long_about = None)]
pub struct Args {
    /// Config file (default: <config dir>/lumen/config.txt)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Starting effect: scroll, energy, spectrum, pump
    #[arg(long, value_name = "EFFECT")]
    pub effect: Option<String>,

    /// Input device name (substring match); default input if omitted
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Show the terminal debug view
    #[arg(long)]
    pub tui: bool,

    /// Process audio without sending frames to the strip
    #[arg(long)]
    pub dry_run: bool,

    /// Log the measured frame rate
    #[arg(long)]
    pub fps_report: bool,

    /// Stop after this many seconds (headless mode)
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    pub save_config: bool,

    /// List input devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Path the configuration is read from and saved to
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(VisualizerConfig::config_path)
    }

    /// Load the configuration file and apply command-line overrides
    pub fn load_config(&self) -> anyhow::Result<VisualizerConfig> {
        let path = self.config_path();
        let mut config = if path.exists() {
            VisualizerConfig::load_from(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        } else {
            VisualizerConfig::default()
        };
        self.apply(&mut config)?;
        Ok(config)
    }

    fn apply(&self, config: &mut VisualizerConfig) -> anyhow::Result<()> {
        if let Some(ref effect) = self.effect {
            config.effect = effect.parse::<EffectKind>()?;
        }
        if self.fps_report {
            config.display_fps = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_applied() {
        let args = Args::parse_from(["lumen", "--effect", "energy", "--fps-report"]);
        let mut config = VisualizerConfig::default();
        args.apply(&mut config).unwrap();
        assert_eq!(config.effect, EffectKind::Energy);
        assert!(config.display_fps);
    }

    #[test]
    fn test_unknown_effect_rejected() {
        let args = Args::parse_from(["lumen", "--effect", "strobe"]);
        assert!(args.apply(&mut VisualizerConfig::default()).is_err());
    }

    #[test]
    fn test_explicit_config_path() {
        let args = Args::parse_from(["lumen", "--config", "/tmp/lumen.txt", "--tui"]);
        assert_eq!(args.config_path(), PathBuf::from("/tmp/lumen.txt"));
        assert!(args.tui);
    }
}
