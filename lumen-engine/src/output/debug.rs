//! Read-only debug taps on the per-frame signals

use crate::activity::Mode;
use crossbeam_channel::{Sender, TrySendError};
use lumen_analysis::{AdaptiveSmoother, Coefficients};
use lumen_fx::{EffectKind, IdleKind, PixelFrame};

/// Smoothing of the plotted band curve
const PLOT_SMOOTHING: Coefficients = Coefficients::new(0.5, 0.99);

/// Initial plotted band value
const PLOT_SEED: f32 = 0.1;

/// Borrowed view of one processed frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub mode: Mode,
    pub effect: EffectKind,
    /// Current idle pattern, while idle
    pub idle: Option<IdleKind>,
    /// Smoothed, gain-normalized band energies
    pub bands: &'a [f32],
    pub frame: &'a PixelFrame,
    pub fps: f32,
    pub gain: f32,
    pub frequency_range: (f32, f32),
}

/// Passive consumer of frame snapshots
///
/// Called on the processing thread after the frame was written, so
/// implementations must return quickly.
pub trait FrameObserver: Send {
    fn observe(&mut self, snapshot: &FrameSnapshot<'_>);
}

/// Owned copy of a snapshot, sent across threads
#[derive(Debug, Clone)]
pub struct DebugFrame {
    pub mode: Mode,
    pub effect: EffectKind,
    pub idle: Option<IdleKind>,
    /// Band energies after plot smoothing
    pub bands: Vec<f32>,
    pub frame: PixelFrame,
    pub fps: f32,
    pub gain: f32,
    pub frequency_range: (f32, f32),
}

/// Forwards snapshots over a bounded channel, dropping them when full
pub struct ChannelObserver {
    tx: Sender<DebugFrame>,
    plot: AdaptiveSmoother,
    dropped: u64,
}

impl ChannelObserver {
    pub fn new(tx: Sender<DebugFrame>, band_count: usize) -> Self {
        Self {
            tx,
            plot: AdaptiveSmoother::filled(band_count, PLOT_SEED, PLOT_SMOOTHING),
            dropped: 0,
        }
    }

    /// Snapshots discarded because the receiver was behind or gone
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl FrameObserver for ChannelObserver {
    fn observe(&mut self, snapshot: &FrameSnapshot<'_>) {
        if snapshot.bands.len() != self.plot.len() {
            self.plot = AdaptiveSmoother::filled(snapshot.bands.len(), PLOT_SEED, PLOT_SMOOTHING);
        }
        let bands = self.plot.update(snapshot.bands).to_vec();
        let frame = DebugFrame {
            mode: snapshot.mode,
            effect: snapshot.effect,
            idle: snapshot.idle,
            bands,
            frame: snapshot.frame.clone(),
            fps: snapshot.fps,
            gain: snapshot.gain,
            frequency_range: snapshot.frequency_range,
        };
        match self.tx.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => self.dropped += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn snapshot<'a>(bands: &'a [f32], frame: &'a PixelFrame) -> FrameSnapshot<'a> {
        FrameSnapshot {
            mode: Mode::Active,
            effect: EffectKind::Spectrum,
            idle: None,
            bands,
            frame,
            fps: 60.0,
            gain: 1.0,
            frequency_range: (200.0, 12000.0),
        }
    }

    #[test]
    fn test_plot_smoothing_applied() {
        let (tx, rx) = bounded(4);
        let mut observer = ChannelObserver::new(tx, 2);
        let frame = PixelFrame::new(4);
        observer.observe(&snapshot(&[1.1, 0.0], &frame));

        let received = rx.try_recv().unwrap();
        // Rise 0.99 from 0.1 toward 1.1, decay 0.5 from 0.1 toward 0
        assert!((received.bands[0] - 1.09).abs() < 1e-5);
        assert!((received.bands[1] - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_full_channel_drops() {
        let (tx, rx) = bounded(1);
        let mut observer = ChannelObserver::new(tx, 3);
        let frame = PixelFrame::new(4);
        for _ in 0..3 {
            observer.observe(&snapshot(&[0.0; 3], &frame));
        }
        assert_eq!(observer.dropped(), 2);
        assert_eq!(rx.len(), 1);
    }
}
