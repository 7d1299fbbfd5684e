//! Visualizer engine for Lumen
//!
//! Wires the analysis stages and pattern generators into one per-chunk
//! pipeline:
//! - Config: the persisted `key=value` settings and their validation
//! - Activity: ACTIVE / IDLE gating on input amplitude
//! - Visualizer: the orchestrator driven once per audio chunk
//! - Output: frame sinks (ESP8266 over UDP, in-memory) and debug observers

mod activity;
mod commands;
mod config;
mod error;
mod fps;
mod output;
mod visualizer;

pub use activity::{ActivityMonitor, ActivityReport, Mode, Transition};
pub use commands::Command;
pub use config::VisualizerConfig;
pub use error::{ConfigError, SinkError, VisualizerError};
pub use fps::FrameRateEstimator;
pub use output::{
    build_packets, ChannelObserver, DebugFrame, FrameObserver, FrameSink, FrameSnapshot,
    MemorySink, NullSink, UdpStripSink, MAX_PIXELS_PER_PACKET, MAX_STRIP_PIXELS,
};
pub use visualizer::{FrameKind, FrameReport, Visualizer, MAX_SAMPLE_AMPLITUDE};
