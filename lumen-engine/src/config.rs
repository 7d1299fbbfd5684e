//! Visualizer configuration and its persistence
//!
//! Settings live in a simple `key=value` text file with `#` comments.
//! Missing keys keep their defaults; unknown keys are ignored.

use crate::error::ConfigError;
use lumen_analysis::Coefficients;
use lumen_fx::{EffectKind, IdleKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Every tunable of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizerConfig {
    /// Capture sample rate in Hz
    pub sample_rate: u32,
    /// Frames (and audio chunks) per second
    pub fps: u32,
    /// Physical LED count; must be even
    pub pixel_count: usize,
    /// Number of mel bands
    pub band_count: usize,
    pub min_frequency: f32,
    pub max_frequency: f32,
    /// Chunks held in the rolling sample window
    pub rolling_history: usize,
    /// Peak amplitude below which a chunk counts as silent
    pub volume_threshold: f32,
    /// Silence needed before switching to idle patterns
    pub idle_timeout: Duration,
    /// Log the measured frame rate
    pub display_fps: bool,
    pub udp_host: String,
    pub udp_port: u16,
    pub effect: EffectKind,
    pub idle_patterns: Vec<IdleKind>,
    /// Redraw the active effect whenever an idle pattern finishes its cycles
    pub shuffle_effect_on_idle_cycle: bool,
    /// Output black frames while active but below the threshold
    pub blank_when_quiet: bool,
    /// Seed for variant draws; the clock is used when unset
    pub seed: Option<u64>,
    pub gain: Coefficients,
    pub band_smoothing: Coefficients,
    pub fps_smoothing: Coefficients,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            fps: 60,
            pixel_count: 60,
            band_count: 24,
            min_frequency: 200.0,
            max_frequency: 12000.0,
            rolling_history: 2,
            volume_threshold: 1e-7,
            idle_timeout: Duration::from_secs(5),
            display_fps: false,
            udp_host: "192.168.0.150".to_string(),
            udp_port: 7777,
            effect: EffectKind::Spectrum,
            idle_patterns: IdleKind::ALL.to_vec(),
            shuffle_effect_on_idle_cycle: false,
            blank_when_quiet: false,
            seed: None,
            gain: Coefficients::new(0.01, 0.99),
            band_smoothing: Coefficients::new(0.5, 0.99),
            fps_smoothing: Coefficients::new(0.2, 0.2),
        }
    }
}

impl VisualizerConfig {
    /// Load config from the default location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate config from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())?;
        Ok(())
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lumen")
            .join("config.txt")
    }

    /// Samples per audio chunk
    pub fn chunk_len(&self) -> usize {
        (self.sample_rate as f64 / self.fps.max(1) as f64).round() as usize
    }

    /// Samples in the rolling window
    pub fn window_len(&self) -> usize {
        self.chunk_len() * self.rolling_history
    }

    /// Check every value is usable by the pipeline
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: String| Err(ConfigError::Invalid(msg));

        if self.sample_rate == 0 {
            return fail("sample_rate must be positive".into());
        }
        if self.fps == 0 {
            return fail("fps must be positive".into());
        }
        if self.chunk_len() == 0 {
            return fail(format!(
                "fps {} is too high for sample_rate {}",
                self.fps, self.sample_rate
            ));
        }
        if self.pixel_count < 2 || self.pixel_count % 2 != 0 {
            return fail(format!(
                "pixel_count must be even and at least 2, got {}",
                self.pixel_count
            ));
        }
        if self.band_count < 4 {
            return fail(format!(
                "band_count must be at least 4, got {}",
                self.band_count
            ));
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        if !(self.min_frequency > 0.0
            && self.min_frequency < self.max_frequency
            && self.max_frequency <= nyquist)
        {
            return fail(format!(
                "frequency range {} - {} Hz must satisfy 0 < min < max <= {}",
                self.min_frequency, self.max_frequency, nyquist
            ));
        }
        if self.rolling_history == 0 {
            return fail("rolling_history must be at least 1".into());
        }
        if !(self.volume_threshold >= 0.0) {
            return fail("volume_threshold must be non-negative".into());
        }
        for (name, coefficients) in [
            ("gain", self.gain),
            ("band_smoothing", self.band_smoothing),
            ("fps_smoothing", self.fps_smoothing),
        ] {
            if !coefficients.is_valid() {
                return fail(format!(
                    "{} coefficients must lie in (0, 1], got decay {} rise {}",
                    name, coefficients.decay, coefficients.rise
                ));
            }
        }
        if self.idle_patterns.is_empty() {
            return fail("idle_patterns must name at least one pattern".into());
        }
        Ok(())
    }

    /// Parse config from simple key=value format
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!(line = index + 1, "Ignoring config line without '='");
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            let bad = || ConfigError::Parse {
                line: index + 1,
                key: key.to_string(),
                value: value.to_string(),
            };

            match key {
                "sample_rate" => config.sample_rate = parse_value(value).ok_or_else(bad)?,
                "fps" => config.fps = parse_value(value).ok_or_else(bad)?,
                "pixel_count" => config.pixel_count = parse_value(value).ok_or_else(bad)?,
                "band_count" => config.band_count = parse_value(value).ok_or_else(bad)?,
                "min_frequency" => config.min_frequency = parse_value(value).ok_or_else(bad)?,
                "max_frequency" => config.max_frequency = parse_value(value).ok_or_else(bad)?,
                "rolling_history" => {
                    config.rolling_history = parse_value(value).ok_or_else(bad)?
                }
                "volume_threshold" => {
                    config.volume_threshold = parse_value(value).ok_or_else(bad)?
                }
                "idle_timeout" => {
                    let secs: f64 = parse_value(value).ok_or_else(bad)?;
                    config.idle_timeout = Duration::try_from_secs_f64(secs).map_err(|_| bad())?;
                }
                "display_fps" => config.display_fps = parse_value(value).ok_or_else(bad)?,
                "udp_host" => config.udp_host = value.to_string(),
                "udp_port" => config.udp_port = parse_value(value).ok_or_else(bad)?,
                "effect" => config.effect = parse_value(value).ok_or_else(bad)?,
                "idle_patterns" => {
                    config.idle_patterns = value
                        .split(',')
                        .filter(|name| !name.trim().is_empty())
                        .map(|name| name.parse())
                        .collect::<Result<_, _>>()
                        .map_err(|_| bad())?
                }
                "shuffle_effect_on_idle_cycle" => {
                    config.shuffle_effect_on_idle_cycle = parse_value(value).ok_or_else(bad)?
                }
                "blank_when_quiet" => {
                    config.blank_when_quiet = parse_value(value).ok_or_else(bad)?
                }
                "seed" => {
                    config.seed = if value.is_empty() {
                        None
                    } else {
                        Some(parse_value(value).ok_or_else(bad)?)
                    }
                }
                "gain_decay" => config.gain.decay = parse_value(value).ok_or_else(bad)?,
                "gain_rise" => config.gain.rise = parse_value(value).ok_or_else(bad)?,
                "band_smoothing_decay" => {
                    config.band_smoothing.decay = parse_value(value).ok_or_else(bad)?
                }
                "band_smoothing_rise" => {
                    config.band_smoothing.rise = parse_value(value).ok_or_else(bad)?
                }
                "fps_smoothing_decay" => {
                    config.fps_smoothing.decay = parse_value(value).ok_or_else(bad)?
                }
                "fps_smoothing_rise" => {
                    config.fps_smoothing.rise = parse_value(value).ok_or_else(bad)?
                }
                _ => warn!(key, line = index + 1, "Ignoring unknown config key"),
            }
        }

        Ok(config)
    }

    /// Serialize config to simple key=value format
    pub fn serialize(&self) -> String {
        let idle_patterns: Vec<&str> = self.idle_patterns.iter().map(|k| k.name()).collect();
        let lines = [
            "# Lumen Configuration".to_string(),
            format!("sample_rate={}", self.sample_rate),
            format!("fps={}", self.fps),
            format!("pixel_count={}", self.pixel_count),
            format!("band_count={}", self.band_count),
            format!("min_frequency={}", self.min_frequency),
            format!("max_frequency={}", self.max_frequency),
            format!("rolling_history={}", self.rolling_history),
            format!("volume_threshold={}", self.volume_threshold),
            format!("idle_timeout={}", self.idle_timeout.as_secs_f64()),
            format!("display_fps={}", self.display_fps),
            format!("udp_host={}", self.udp_host),
            format!("udp_port={}", self.udp_port),
            format!("effect={}", self.effect),
            format!("idle_patterns={}", idle_patterns.join(",")),
            format!(
                "shuffle_effect_on_idle_cycle={}",
                self.shuffle_effect_on_idle_cycle
            ),
            format!("blank_when_quiet={}", self.blank_when_quiet),
            format!(
                "seed={}",
                self.seed.map(|s| s.to_string()).unwrap_or_default()
            ),
            format!("gain_decay={}", self.gain.decay),
            format!("gain_rise={}", self.gain.rise),
            format!("band_smoothing_decay={}", self.band_smoothing.decay),
            format!("band_smoothing_rise={}", self.band_smoothing.rise),
            format!("fps_smoothing_decay={}", self.fps_smoothing.decay),
            format!("fps_smoothing_rise={}", self.fps_smoothing.rise),
        ];
        lines.join("\n")
    }
}

fn parse_value<T: FromStr>(value: &str) -> Option<T> {
    value.parse().ok()
}
