//! Frame outputs
//!
//! A [`FrameSink`] receives every finished frame; a [`FrameObserver`] is an
//! optional read-only tap on the same per-frame signals for debug views.

mod debug;
mod udp;

pub use debug::{ChannelObserver, DebugFrame, FrameObserver, FrameSnapshot};
pub use udp::{build_packets, UdpStripSink, MAX_PIXELS_PER_PACKET, MAX_STRIP_PIXELS};

use crate::error::SinkError;
use lumen_fx::PixelFrame;

/// Consumer of finished frames
///
/// `write` is called once per processed chunk, followed by `flush`.
pub trait FrameSink {
    fn write(&mut self, frame: &PixelFrame) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn write(&mut self, frame: &PixelFrame) -> Result<(), SinkError> {
        (**self).write(frame)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

/// Discards every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn write(&mut self, _frame: &PixelFrame) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every written frame in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    frames: Vec<PixelFrame>,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[PixelFrame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&PixelFrame> {
        self.frames.last()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.flushes = 0;
    }
}

impl FrameSink for MemorySink {
    fn write(&mut self, frame: &PixelFrame) -> Result<(), SinkError> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.flushes += 1;
        Ok(())
    }
}
