//! Center scroll - rainbow bands flow out of (or into) the middle of the strip

use super::{flip, IdlePattern, IdleStep, CYCLES_PER_PATTERN, RAINBOW};
use crate::frame::PixelFrame;

/// Color changes between direction flips
const COLORS_PER_DIRECTION: u32 = 20;

/// Center scroll idle pattern
///
/// Scrolling outward, the current color is injected at the two center
/// pixels; scrolling inward it enters at both edges. The color advances
/// every `pixel_count / 8` frames.
pub struct CenterScroll {
    pixel_count: usize,
    frames_per_color: u32,
    frames: u32,
    color_changes: u32,
    color: usize,
    direction: i32,
    repeats: u32,
}

impl CenterScroll {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            pixel_count,
            frames_per_color: ((pixel_count / 8) as u32).max(1),
            frames: 0,
            color_changes: 0,
            color: 0,
            direction: 1,
            repeats: 0,
        }
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn color_index(&self) -> usize {
        self.color
    }

    /// Frames between two color changes
    pub fn frames_per_color(&self) -> u32 {
        self.frames_per_color
    }
}

impl IdlePattern for CenterScroll {
    fn step(&mut self, canvas: &mut PixelFrame) -> IdleStep {
        let color = RAINBOW[self.color];
        let half = self.pixel_count / 2;
        if self.direction > 0 {
            canvas.shift_outward();
            canvas.set(half.saturating_sub(1), color);
            canvas.set(half, color);
        } else {
            canvas.shift_inward();
            canvas.set(0, color);
            canvas.set(self.pixel_count.saturating_sub(1), color);
        }

        self.frames += 1;
        if self.frames >= self.frames_per_color {
            self.frames = 0;
            self.color_changes += 1;
            self.color = (self.color + 1) % RAINBOW.len();
        }

        if self.color_changes >= COLORS_PER_DIRECTION {
            self.color_changes = 0;
            if flip(&mut self.direction) {
                self.repeats += 1;
                if self.repeats >= CYCLES_PER_PATTERN {
                    return IdleStep::CycleComplete;
                }
            }
        }
        IdleStep::Continue
    }

    fn reset(&mut self) {
        *self = Self::new(self.pixel_count);
    }

    fn repeats(&self) -> u32 {
        self.repeats
    }

    fn name(&self) -> &'static str {
        "center_scroll"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_enters_at_center() {
        let mut scroll = CenterScroll::new(16);
        let mut canvas = PixelFrame::new(16);
        scroll.step(&mut canvas);
        assert_eq!(canvas.get(7), Some(RAINBOW[0]));
        assert_eq!(canvas.get(8), Some(RAINBOW[0]));
        scroll.step(&mut canvas);
        assert_eq!(canvas.get(6), Some(RAINBOW[0]), "first color moved outward");
        assert_eq!(canvas.get(9), Some(RAINBOW[0]));
    }

    #[test]
    fn test_color_advances_with_strip_length() {
        let mut scroll = CenterScroll::new(60);
        let mut canvas = PixelFrame::new(60);
        assert_eq!(scroll.frames_per_color(), 7);
        for _ in 0..7 {
            scroll.step(&mut canvas);
        }
        assert_eq!(scroll.color_index(), 1);
    }

    #[test]
    fn test_direction_flips_and_cycle_completes() {
        let mut scroll = CenterScroll::new(16);
        let mut canvas = PixelFrame::new(16);
        // 2 frames per color, 20 colors per direction
        for _ in 0..40 {
            assert_eq!(scroll.step(&mut canvas), IdleStep::Continue);
        }
        assert_eq!(scroll.direction(), -1);
        assert_eq!(scroll.repeats(), 0);

        let steps: Vec<IdleStep> = (0..120).map(|_| scroll.step(&mut canvas)).collect();
        assert_eq!(scroll.repeats(), 2);
        assert_eq!(steps.iter().filter(|&&s| s == IdleStep::CycleComplete).count(), 1);
        assert_eq!(steps[119], IdleStep::CycleComplete);
    }

    #[test]
    fn test_inward_injects_at_edges() {
        let mut scroll = CenterScroll::new(16);
        let mut canvas = PixelFrame::new(16);
        for _ in 0..40 {
            scroll.step(&mut canvas);
        }
        let color = RAINBOW[scroll.color_index()];
        scroll.step(&mut canvas);
        assert_eq!(canvas.get(0), Some(color));
        assert_eq!(canvas.get(15), Some(color));
    }
}
