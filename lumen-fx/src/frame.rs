//! Pixel frames and working channel buffers

use lumen_analysis::gaussian_filter1d_in_place;

/// One pixel's red, green and blue intensities
pub type Rgb = [u8; 3];

/// A finished frame of per-pixel colors, stored as three channel rows
///
/// Every channel value is an integer in `0..=255`; this is the unit handed
/// to output sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    channels: [Vec<u8>; 3],
}

impl PixelFrame {
    /// An all-black frame of `pixel_count` pixels
    pub fn new(pixel_count: usize) -> Self {
        Self {
            channels: [
                vec![0; pixel_count],
                vec![0; pixel_count],
                vec![0; pixel_count],
            ],
        }
    }

    /// Build a frame from float channels, clamping into `0..=255`
    ///
    /// Values are truncated toward zero; NaN becomes 0. The frame is as long
    /// as the shortest channel.
    pub fn from_channels(red: &[f32], green: &[f32], blue: &[f32]) -> Self {
        let len = red.len().min(green.len()).min(blue.len());
        let convert = |c: &[f32]| c[..len].iter().map(|&v| to_channel_value(v)).collect();
        Self {
            channels: [convert(red), convert(green), convert(blue)],
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.channels[0].len()
    }

    /// One channel row (0 = red, 1 = green, 2 = blue)
    pub fn channel(&self, channel: usize) -> &[u8] {
        &self.channels[channel]
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        if index >= self.pixel_count() {
            return None;
        }
        Some([
            self.channels[0][index],
            self.channels[1][index],
            self.channels[2][index],
        ])
    }

    /// Set one pixel; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, rgb: Rgb) {
        if index >= self.pixel_count() {
            return;
        }
        for (channel, value) in self.channels.iter_mut().zip(rgb) {
            channel[index] = value;
        }
    }

    pub fn fill(&mut self, rgb: Rgb) {
        for (channel, value) in self.channels.iter_mut().zip(rgb) {
            channel.fill(value);
        }
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        (0..self.pixel_count()).map(move |i| {
            [
                self.channels[0][i],
                self.channels[1][i],
                self.channels[2][i],
            ]
        })
    }

    pub fn is_black(&self) -> bool {
        self.channels.iter().all(|c| c.iter().all(|&v| v == 0))
    }

    /// Move both halves one pixel away from the center
    ///
    /// The two center pixels keep their previous values and are normally
    /// overwritten by the caller.
    pub fn shift_outward(&mut self) {
        let half = self.pixel_count() / 2;
        for channel in &mut self.channels {
            let len = channel.len();
            if half == 0 {
                continue;
            }
            channel.copy_within(half..len - 1, half + 1);
            channel.copy_within(1..half, 0);
        }
    }

    /// Move both halves one pixel toward the center
    ///
    /// The two edge pixels keep their previous values.
    pub fn shift_inward(&mut self) {
        let half = self.pixel_count() / 2;
        for channel in &mut self.channels {
            let len = channel.len();
            if half == 0 {
                continue;
            }
            channel.copy_within(half + 1..len, half);
            channel.copy_within(0..half - 1, 1);
        }
    }
}

fn to_channel_value(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Float working buffer of three channels over half of the strip
///
/// Index 0 is the pixel nearest the center; [`ChannelBuffer::mirrored`]
/// reflects it into a full, left/right symmetric frame.
#[derive(Debug, Clone)]
pub struct ChannelBuffer {
    channels: [Vec<f32>; 3],
}

impl ChannelBuffer {
    pub fn new(width: usize, value: f32) -> Self {
        Self {
            channels: [
                vec![value; width],
                vec![value; width],
                vec![value; width],
            ],
        }
    }

    pub fn width(&self) -> usize {
        self.channels[0].len()
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.channels[channel]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        &mut self.channels[channel]
    }

    /// All three channels back to back (red, green, blue)
    pub fn flattened(&self) -> Vec<f32> {
        self.channels.concat()
    }

    /// Overwrite all channels from a red-green-blue concatenation
    pub fn copy_from_flat(&mut self, flat: &[f32]) {
        let width = self.width();
        for (channel, source) in self.channels.iter_mut().zip(flat.chunks_exact(width)) {
            channel.copy_from_slice(source);
        }
    }

    /// Move every column one step away from the center
    pub fn shift_outward(&mut self) {
        for channel in &mut self.channels {
            let len = channel.len();
            if len > 1 {
                channel.copy_within(0..len - 1, 1);
            }
        }
    }

    pub fn scale(&mut self, factor: f32) {
        for value in self.channels.iter_mut().flatten() {
            *value *= factor;
        }
    }

    pub fn blur(&mut self, sigma: f32) {
        for channel in &mut self.channels {
            gaussian_filter1d_in_place(channel, sigma);
        }
    }

    pub fn set_column(&mut self, index: usize, rgb: [f32; 3]) {
        for (channel, value) in self.channels.iter_mut().zip(rgb) {
            if let Some(slot) = channel.get_mut(index) {
                *slot = value;
            }
        }
    }

    /// Full frame: the buffer reversed on the left, as-is on the right
    pub fn mirrored(&self) -> PixelFrame {
        let [r, g, b] = &self.channels;
        PixelFrame::from_channels(&mirror(r), &mirror(g), &mirror(b))
    }
}

/// `[c, b, a]` + `[a, b, c]`
pub(crate) fn mirror(half: &[f32]) -> Vec<f32> {
    half.iter().rev().chain(half.iter()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_channels_clamps() {
        let frame = PixelFrame::from_channels(&[-5.0, 300.0], &[12.7, f32::NAN], &[255.0, 0.0]);
        assert_eq!(frame.get(0), Some([0, 12, 255]));
        assert_eq!(frame.get(1), Some([255, 0, 0]));
        assert_eq!(frame.get(2), None);
    }

    #[test]
    fn test_mirrored_is_symmetric() {
        let mut buffer = ChannelBuffer::new(3, 0.0);
        buffer.set_column(0, [10.0, 20.0, 30.0]);
        buffer.set_column(2, [1.0, 2.0, 3.0]);
        let frame = buffer.mirrored();
        assert_eq!(frame.pixel_count(), 6);
        assert_eq!(frame.get(2), Some([10, 20, 30]));
        assert_eq!(frame.get(3), Some([10, 20, 30]));
        assert_eq!(frame.get(0), Some([1, 2, 3]));
        assert_eq!(frame.get(5), Some([1, 2, 3]));
    }

    #[test]
    fn test_buffer_shift_outward() {
        let mut buffer = ChannelBuffer::new(4, 0.0);
        buffer.set_column(0, [1.0, 1.0, 1.0]);
        buffer.shift_outward();
        assert_eq!(buffer.channel(0), &[1.0, 1.0, 0.0, 0.0]);
        buffer.shift_outward();
        assert_eq!(buffer.channel(0), &[1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_frame_shift_outward_and_inward() {
        let mut frame = PixelFrame::new(6);
        frame.set(2, [9, 0, 0]);
        frame.set(3, [0, 9, 0]);
        frame.shift_outward();
        assert_eq!(frame.get(1), Some([9, 0, 0]));
        assert_eq!(frame.get(4), Some([0, 9, 0]));

        frame.shift_inward();
        assert_eq!(frame.get(2), Some([9, 0, 0]));
        assert_eq!(frame.get(3), Some([0, 9, 0]));
    }

    #[test]
    fn test_set_out_of_range_is_ignored() {
        let mut frame = PixelFrame::new(2);
        frame.set(5, [1, 2, 3]);
        assert!(frame.is_black());
    }

    #[test]
    fn test_flat_roundtrip_preserves_layout() {
        let mut buffer = ChannelBuffer::new(2, 0.0);
        buffer.copy_from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(buffer.channel(1), &[3.0, 4.0]);
        assert_eq!(buffer.flattened(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
