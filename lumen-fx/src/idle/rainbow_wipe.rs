//! Rainbow wipe - a single cursor sweeps colors back and forth across the strip

use super::{flip, IdlePattern, IdleStep, CYCLES_PER_PATTERN, RAINBOW};
use crate::frame::PixelFrame;

/// Rainbow wipe idle pattern
pub struct RainbowWipe {
    pixel_count: usize,
    position: usize,
    direction: i32,
    color: usize,
    repeats: u32,
}

impl RainbowWipe {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            pixel_count,
            position: 0,
            direction: 1,
            color: 0,
            repeats: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn color_index(&self) -> usize {
        self.color
    }
}

impl IdlePattern for RainbowWipe {
    fn step(&mut self, canvas: &mut PixelFrame) -> IdleStep {
        if self.pixel_count < 2 {
            canvas.fill(RAINBOW[self.color]);
            return IdleStep::Continue;
        }

        canvas.set(self.position, RAINBOW[self.color]);
        self.position = if self.direction > 0 {
            self.position + 1
        } else {
            self.position.saturating_sub(1)
        };

        let at_boundary = self.position >= self.pixel_count - 1 || self.position == 0;
        if at_boundary && flip(&mut self.direction) {
            // Back at the start: next color, one full sweep done
            self.color = (self.color + 1) % RAINBOW.len();
            self.repeats += 1;
            if self.repeats >= CYCLES_PER_PATTERN {
                return IdleStep::CycleComplete;
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
        "rainbow_wipe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_moves_with_direction() {
        let mut wipe = RainbowWipe::new(8);
        let mut canvas = PixelFrame::new(8);
        let mut flips = 0;
        for _ in 0..40 {
            let (before, dir) = (wipe.position(), wipe.direction());
            wipe.step(&mut canvas);
            if dir > 0 {
                assert!(wipe.position() > before);
            } else {
                assert!(wipe.position() < before);
            }
            if wipe.direction() != dir {
                flips += 1;
                let pos = wipe.position();
                assert!(pos == 0 || pos == 7, "flip only at a boundary, got {}", pos);
            }
            if wipe.repeats() >= CYCLES_PER_PATTERN {
                break;
            }
        }
        assert_eq!(flips, 4);
    }

    #[test]
    fn test_one_back_and_forth_is_one_repeat() {
        let mut wipe = RainbowWipe::new(5);
        let mut canvas = PixelFrame::new(5);
        for _ in 0..4 {
            wipe.step(&mut canvas);
        }
        assert_eq!(wipe.direction(), -1);
        assert_eq!(wipe.repeats(), 0);
        for _ in 0..4 {
            wipe.step(&mut canvas);
        }
        assert_eq!(wipe.direction(), 1);
        assert_eq!(wipe.repeats(), 1);
        assert_eq!(wipe.color_index(), 1, "color advances on the flip to forward");
    }

    #[test]
    fn test_second_repeat_completes_cycle() {
        let mut wipe = RainbowWipe::new(5);
        let mut canvas = PixelFrame::new(5);
        let steps: Vec<IdleStep> = (0..16).map(|_| wipe.step(&mut canvas)).collect();
        assert!(steps[..15].iter().all(|&s| s == IdleStep::Continue));
        assert_eq!(steps[15], IdleStep::CycleComplete);
    }

    #[test]
    fn test_wipe_paints_whole_strip() {
        let mut wipe = RainbowWipe::new(6);
        let mut canvas = PixelFrame::new(6);
        for _ in 0..10 {
            wipe.step(&mut canvas);
        }
        assert!(canvas.pixels().all(|p| p == RAINBOW[0]));
    }

    #[test]
    fn test_reset_restores_start_values() {
        let mut wipe = RainbowWipe::new(5);
        let mut canvas = PixelFrame::new(5);
        for _ in 0..9 {
            wipe.step(&mut canvas);
        }
        wipe.reset();
        assert_eq!(
            (wipe.position(), wipe.direction(), wipe.color_index(), wipe.repeats()),
            (0, 1, 0, 0)
        );
    }
}
