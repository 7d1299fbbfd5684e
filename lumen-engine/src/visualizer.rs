//! Visualizer - runs the whole pipeline once per audio chunk
//!
//! window -> activity check -> (ACTIVE: spectrum -> bands -> gain ->
//! smoothing -> effect) or (IDLE: idle pattern) -> sink -> observer

use crate::activity::{ActivityMonitor, Mode, Transition};
use crate::commands::Command;
use crate::config::VisualizerConfig;
use crate::error::VisualizerError;
use crate::fps::FrameRateEstimator;
use crate::output::{FrameObserver, FrameSink, FrameSnapshot};
use crossbeam_channel::Receiver;
use lumen_analysis::{
    AdaptiveSmoother, BandLayout, BandMapper, GainNormalizer, SampleWindow, SpectrumAnalyzer,
};
use lumen_fx::{EffectEngine, EffectKind, IdleAnimator, IdleKind, IdleStep, PixelFrame, Xorshift64};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Initial smoothed band value
const BAND_SEED: f32 = 0.1;

/// Largest accepted sample magnitude
///
/// Full scale is 1.0; the headroom covers integer formats whose most
/// negative value converts slightly below -1.0.
pub const MAX_SAMPLE_AMPLITUDE: f32 = 2.0;

/// Sink failures between two repeated warnings
const SINK_WARN_EVERY: u64 = 600;

/// What produced a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Spectral pipeline and the current effect
    Visualized,
    /// Black frame for a quiet chunk while active
    Blank,
    /// Idle animator
    Idle,
}

/// Outcome of one processed chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub mode: Mode,
    pub kind: FrameKind,
    /// Peak amplitude of the rolling window
    pub peak: f32,
    /// Smoothed frame rate
    pub fps: f32,
}

/// Owns every stage of the pipeline and its state
///
/// Not internally synchronized: chunks, commands and observer callbacks
/// are all handled on the thread that calls [`Visualizer::process_chunk`].
pub struct Visualizer<S: FrameSink> {
    config: VisualizerConfig,
    window: SampleWindow,
    analyzer: SpectrumAnalyzer,
    mapper: BandMapper,
    raw_bands: Vec<f32>,
    gain: GainNormalizer,
    band_smoother: AdaptiveSmoother,
    effects: EffectEngine,
    idle: IdleAnimator,
    activity: ActivityMonitor,
    fps: FrameRateEstimator,
    rng: Xorshift64,
    last_frame: PixelFrame,
    sink: S,
    sink_failures: u64,
    observer: Option<Box<dyn FrameObserver>>,
    commands: Option<Receiver<Command>>,
}

impl<S: FrameSink> Visualizer<S> {
    /// Validate `config` and build every stage
    pub fn new(config: VisualizerConfig, sink: S) -> Result<Self, VisualizerError> {
        config.validate()?;

        let window = SampleWindow::new(config.chunk_len(), config.rolling_history);
        let analyzer = SpectrumAnalyzer::new(config.window_len());
        let mapper = BandMapper::new(BandLayout {
            sample_rate: config.sample_rate,
            fft_size: analyzer.fft_size(),
            bins: analyzer.bins(),
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
            band_count: config.band_count,
        })?;

        let seed = config.seed.unwrap_or_else(clock_seed);
        let idle = IdleAnimator::new(config.pixel_count, config.idle_patterns.clone(), seed)?;

        info!(
            sample_rate = config.sample_rate,
            fps = config.fps,
            chunk = config.chunk_len(),
            fft_size = analyzer.fft_size(),
            pixels = config.pixel_count,
            bands = config.band_count,
            effect = %config.effect,
            "Visualizer ready"
        );

        Ok(Self {
            window,
            raw_bands: vec![0.0; config.band_count],
            gain: GainNormalizer::new(config.gain),
            band_smoother: AdaptiveSmoother::filled(
                config.band_count,
                BAND_SEED,
                config.band_smoothing,
            ),
            effects: EffectEngine::new(config.pixel_count, config.band_count, config.effect),
            idle,
            activity: ActivityMonitor::new(config.volume_threshold, config.idle_timeout),
            fps: FrameRateEstimator::new(config.fps as f32, config.fps_smoothing),
            rng: Xorshift64::new(seed.rotate_left(32)),
            last_frame: PixelFrame::new(config.pixel_count),
            analyzer,
            mapper,
            sink,
            sink_failures: 0,
            observer: None,
            commands: None,
            config,
        })
    }

    /// Receive runtime commands; they are applied before each chunk
    pub fn attach_commands(&mut self, rx: Receiver<Command>) {
        self.commands = Some(rx);
    }

    /// Install a debug observer, replacing any previous one
    pub fn set_observer(&mut self, observer: Box<dyn FrameObserver>) {
        self.observer = Some(observer);
    }

    /// Process one chunk stamped with the current time
    pub fn process_chunk(&mut self, chunk: &[f32]) -> Result<FrameReport, VisualizerError> {
        self.process_chunk_at(chunk, Instant::now())
    }

    /// Process one chunk captured at `now`
    ///
    /// Invalid chunks are rejected before any state changes.
    pub fn process_chunk_at(
        &mut self,
        chunk: &[f32],
        now: Instant,
    ) -> Result<FrameReport, VisualizerError> {
        let expected = self.window.chunk_len();
        if chunk.len() != expected {
            return Err(VisualizerError::ChunkLength {
                expected,
                actual: chunk.len(),
            });
        }
        if let Some(index) = chunk.iter().position(|s| !s.is_finite()) {
            return Err(VisualizerError::NonFiniteSample { index });
        }
        if let Some(index) = chunk.iter().position(|s| s.abs() > MAX_SAMPLE_AMPLITUDE) {
            return Err(VisualizerError::SampleOutOfRange {
                index,
                value: chunk[index],
            });
        }

        self.drain_commands();

        self.window.push(chunk);
        let activity = self.activity.check_peak(self.window.peak(), now);
        match activity.transition {
            Some(Transition::ActiveToIdle) => {
                let pattern = self.idle.enter(&self.last_frame);
                info!(pattern = %pattern, "No audio, switching to idle");
            }
            Some(Transition::IdleToActive) => {
                info!(peak = activity.peak, effect = %self.effects.current(), "Audio resumed");
            }
            None => {}
        }

        let (frame, kind) = match activity.mode {
            Mode::Active if !activity.loud && self.config.blank_when_quiet => {
                (PixelFrame::new(self.config.pixel_count), FrameKind::Blank)
            }
            Mode::Active => (self.visualize(), FrameKind::Visualized),
            Mode::Idle => (self.idle_frame(), FrameKind::Idle),
        };

        self.output(&frame);

        let fps = self.fps.tick(now);
        if self.config.display_fps {
            if let Some(measured) = self.fps.maybe_report(now) {
                info!("FPS {:.0} / {:.0}", measured, self.config.fps);
            }
        }

        if let Some(observer) = self.observer.as_mut() {
            let snapshot = FrameSnapshot {
                mode: activity.mode,
                effect: self.effects.current(),
                idle: (activity.mode == Mode::Idle).then(|| self.idle.current()),
                bands: self.band_smoother.value(),
                frame: &frame,
                fps,
                gain: self.gain.divisor(),
                frequency_range: self.mapper.frequency_range(),
            };
            observer.observe(&snapshot);
        }

        self.last_frame = frame;
        Ok(FrameReport {
            mode: activity.mode,
            kind,
            peak: activity.peak,
            fps,
        })
    }

    /// Apply one runtime command
    pub fn handle_command(&mut self, command: Command) -> Result<(), VisualizerError> {
        match command {
            Command::SetEffect(kind) => self.effects.select(kind),
            Command::NextEffect => self.effects.select(self.effects.current().next()),
            Command::SetFrequencyRange { min, max } => {
                self.mapper.set_frequency_range(min, max)?;
                self.config.min_frequency = min;
                self.config.max_frequency = max;
                info!(min, max, "Frequency range changed");
            }
        }
        Ok(())
    }

    fn drain_commands(&mut self) {
        let Some(rx) = self.commands.as_ref() else {
            return;
        };
        let pending: Vec<Command> = rx.try_iter().collect();
        for command in pending {
            if let Err(e) = self.handle_command(command) {
                warn!(?command, error = %e, "Command rejected");
            }
        }
    }

    fn visualize(&mut self) -> PixelFrame {
        let spectrum = self.analyzer.analyze(self.window.flatten());
        self.mapper.map_into(spectrum, &mut self.raw_bands);
        self.gain.normalize(&mut self.raw_bands);
        let bands = self.band_smoother.update(&self.raw_bands);
        self.effects.apply(bands)
    }

    fn idle_frame(&mut self) -> PixelFrame {
        let (frame, step) = self.idle.step();
        if step == IdleStep::CycleComplete {
            debug!(next = %self.idle.current(), "Idle cycle complete");
            if self.config.shuffle_effect_on_idle_cycle {
                self.effects.select_random(&mut self.rng, &EffectKind::ALL);
            }
        }
        frame
    }

    fn output(&mut self, frame: &PixelFrame) {
        let result = self.sink.write(frame).and_then(|()| self.sink.flush());
        if let Err(e) = result {
            if self.sink_failures % SINK_WARN_EVERY == 0 {
                warn!(error = %e, failures = self.sink_failures + 1, "Frame output failed");
            }
            self.sink_failures += 1;
        }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.activity.mode()
    }

    pub fn effect(&self) -> EffectKind {
        self.effects.current()
    }

    pub fn idle_pattern(&self) -> IdleKind {
        self.idle.current()
    }

    /// Current smoothed band energies
    pub fn band_energies(&self) -> &[f32] {
        self.band_smoother.value()
    }

    /// Current gain normalization divisor
    pub fn gain_divisor(&self) -> f32 {
        self.gain.divisor()
    }

    /// Blurred band peak of the most recent visualized chunk
    pub fn gain_peak(&self) -> f32 {
        self.gain.last_peak()
    }

    pub fn frequency_range(&self) -> (f32, f32) {
        self.mapper.frequency_range()
    }

    pub fn last_frame(&self) -> &PixelFrame {
        &self.last_frame
    }

    /// Frames the sink failed to accept
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
