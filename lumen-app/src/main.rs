//! Lumen - audio-reactive LED strip visualizer
//!
//! Captures audio, turns it into LED frames and sends them to an ESP8266
//! strip controller, with an optional terminal debug view.

mod capture;
mod cli;
mod tui;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{bounded, RecvTimeoutError};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lumen_engine::{ChannelObserver, FrameSink, NullSink, UdpStripSink, Visualizer};
use lumen_tui::AppState;

use crate::cli::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    if args.list_devices {
        return capture::list_devices();
    }

    let mut config = args.load_config()?;
    if args.save_config {
        let path = args.config_path();
        config.save_to(&path)?;
        info!(path = %path.display(), "Configuration saved");
        return Ok(());
    }

    let device = capture::find_device(args.device.as_deref())?;
    let (stream_config, sample_format) = capture::stream_config(&device, &mut config)?;

    let sink: Box<dyn FrameSink + Send> = if args.dry_run {
        info!("Dry run, frames are not sent");
        Box::new(NullSink)
    } else {
        Box::new(
            UdpStripSink::connect(&config.udp_host, config.udp_port, config.pixel_count)
                .context("Failed to open strip output")?,
        )
    };

    let mut visualizer = Visualizer::new(config.clone(), sink)?;
    let (cmd_tx, cmd_rx) = bounded(64);
    visualizer.attach_commands(cmd_rx);

    let debug_rx = if args.tui {
        let (tx, rx) = bounded(4);
        visualizer.set_observer(Box::new(ChannelObserver::new(tx, config.band_count)));
        Some(rx)
    } else {
        None
    };

    let (err_tx, err_rx) = bounded(16);
    let stream = capture::start(&device, &stream_config, sample_format, visualizer, err_tx)?;

    let result = match debug_rx {
        Some(frames) => {
            let state = AppState::new(
                (config.min_frequency, config.max_frequency),
                config.sample_rate,
            );
            tui::run(state, frames, cmd_tx, err_rx)
        }
        None => {
            let timeout = args.duration.map(Duration::from_secs_f64);
            match timeout {
                Some(t) => match err_rx.recv_timeout(t) {
                    Ok(err) => Err(anyhow::anyhow!("Audio stream failed: {}", err)),
                    Err(RecvTimeoutError::Timeout) => Ok(()),
                    Err(RecvTimeoutError::Disconnected) => {
                        Err(anyhow::anyhow!("Audio stream closed"))
                    }
                },
                None => match err_rx.recv() {
                    Ok(err) => Err(anyhow::anyhow!("Audio stream failed: {}", err)),
                    Err(_) => Err(anyhow::anyhow!("Audio stream closed")),
                },
            }
        }
    };

    drop(stream);
    info!("Stopped");
    result
}

/// Log to stderr, or to a file while the terminal view owns the screen
fn init_logging(args: &Args) -> anyhow::Result<()> {
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    if args.tui {
        let path = log_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
    Ok(())
}

fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lumen")
        .join("lumen.log")
}
