//! ESP8266 strip output over UDP
//!
//! Each datagram is a run of `[index, r, g, b]` byte quadruples. Only
//! pixels that changed since the previous frame are sent.

use super::FrameSink;
use crate::error::SinkError;
use lumen_fx::PixelFrame;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use tracing::{debug, info};

/// Pixels per datagram the firmware accepts
pub const MAX_PIXELS_PER_PACKET: usize = 126;

/// Highest pixel count a one-byte index can address
pub const MAX_STRIP_PIXELS: usize = 256;

/// Build the datagrams that update `prev` into `frame`
///
/// With no previous frame every pixel is sent. Changed pixels are split
/// into `changed / 126 + 1` packets of near-equal size; nothing is sent
/// when no pixel changed.
pub fn build_packets(prev: Option<&PixelFrame>, frame: &PixelFrame) -> Vec<Vec<u8>> {
    let changed: Vec<usize> = (0..frame.pixel_count())
        .filter(|&i| match prev {
            Some(prev) => prev.get(i) != frame.get(i),
            None => true,
        })
        .collect();
    if changed.is_empty() {
        return Vec::new();
    }

    let packets = changed.len() / MAX_PIXELS_PER_PACKET + 1;
    let base = changed.len() / packets;
    let extra = changed.len() % packets;

    let mut out = Vec::with_capacity(packets);
    let mut start = 0;
    for p in 0..packets {
        let len = base + usize::from(p < extra);
        let mut packet = Vec::with_capacity(len * 4);
        for &i in &changed[start..start + len] {
            if let Some([r, g, b]) = frame.get(i) {
                packet.extend_from_slice(&[i as u8, r, g, b]);
            }
        }
        out.push(packet);
        start += len;
    }
    out
}

/// Sends frames to an ESP8266 running the LED strip firmware
pub struct UdpStripSink {
    socket: UdpSocket,
    target: SocketAddr,
    pending: Option<PixelFrame>,
    previous: Option<PixelFrame>,
}

impl UdpStripSink {
    /// Bind a local socket for a strip of `pixel_count` pixels at `host:port`
    ///
    /// The host is resolved here, once; frames go to the first address found.
    pub fn connect(host: &str, port: u16, pixel_count: usize) -> Result<Self, SinkError> {
        if pixel_count > MAX_STRIP_PIXELS {
            return Err(SinkError::TooManyPixels {
                count: pixel_count,
                max: MAX_STRIP_PIXELS,
            });
        }
        let target = (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| SinkError::Unresolved(format!("{}:{}", host, port)))?;
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;
        info!(target = %target, "UDP strip output ready");
        Ok(Self {
            socket,
            target,
            pending: None,
            previous: None,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl FrameSink for UdpStripSink {
    fn write(&mut self, frame: &PixelFrame) -> Result<(), SinkError> {
        if frame.pixel_count() > MAX_STRIP_PIXELS {
            return Err(SinkError::TooManyPixels {
                count: frame.pixel_count(),
                max: MAX_STRIP_PIXELS,
            });
        }
        self.pending = Some(frame.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        let Some(frame) = self.pending.take() else {
            return Ok(());
        };
        let packets = build_packets(self.previous.as_ref(), &frame);
        for packet in &packets {
            self.socket.send_to(packet, self.target)?;
        }
        if !packets.is_empty() {
            debug!(packets = packets.len(), "Strip update sent");
        }
        self.previous = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_sends_every_pixel() {
        let mut frame = PixelFrame::new(4);
        frame.set(2, [1, 2, 3]);
        let packets = build_packets(None, &frame);
        assert_eq!(packets.len(), 1);
        assert_eq!(
            packets[0],
            vec![0, 0, 0, 0, 1, 0, 0, 0, 2, 1, 2, 3, 3, 0, 0, 0]
        );
    }

    #[test]
    fn test_only_changed_pixels_sent() {
        let prev = PixelFrame::new(60);
        let mut frame = prev.clone();
        frame.set(5, [255, 0, 0]);
        frame.set(40, [0, 0, 9]);
        let packets = build_packets(Some(&prev), &frame);
        assert_eq!(packets, vec![vec![5, 255, 0, 0, 40, 0, 0, 9]]);

        assert!(build_packets(Some(&frame), &frame).is_empty());
    }

    #[test]
    fn test_large_updates_split_evenly() {
        let mut frame = PixelFrame::new(200);
        frame.fill([7, 7, 7]);
        let packets = build_packets(None, &frame);
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].len(), 100 * 4);
        assert_eq!(packets[1].len(), 100 * 4);
        assert_eq!(packets[1][0], 100, "second packet starts at pixel 100");
        assert!(packets.iter().all(|p| p.len() / 4 <= MAX_PIXELS_PER_PACKET));
    }

    #[test]
    fn test_sink_rejects_oversized_strip() {
        assert!(matches!(
            UdpStripSink::connect("127.0.0.1", 7777, 300),
            Err(SinkError::TooManyPixels { count: 300, max: 256 })
        ));

        let mut sink = UdpStripSink::connect("127.0.0.1", 7777, 256).unwrap();
        assert!(matches!(
            sink.write(&PixelFrame::new(300)),
            Err(SinkError::TooManyPixels { count: 300, .. })
        ));
    }

    #[test]
    fn test_target_resolved_once() {
        let sink = UdpStripSink::connect("127.0.0.1", 7777, 60).unwrap();
        assert_eq!(sink.target(), "127.0.0.1:7777".parse::<SocketAddr>().unwrap());

        let sink = UdpStripSink::connect("localhost", 7777, 60).unwrap();
        assert!(sink.target().ip().is_loopback());
        assert_eq!(sink.target().port(), 7777);
    }

    #[test]
    fn test_sink_sends_to_listener() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut sink = UdpStripSink::connect("127.0.0.1", port, 2).unwrap();

        let mut frame = PixelFrame::new(2);
        frame.set(1, [10, 20, 30]);
        sink.write(&frame).unwrap();
        sink.flush().unwrap();

        listener
            .set_read_timeout(Some(std::time::Duration::from_secs(2)))
            .unwrap();
        let mut buf = [0u8; 64];
        let n = listener.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], &[0, 0, 0, 0, 1, 10, 20, 30]);
    }
}
