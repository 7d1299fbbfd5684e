//! Linear resizing of band vectors

use std::collections::VecDeque;
use std::sync::Arc;

/// Number of distinct lengths whose sample positions are kept
const POSITION_CACHE_CAPACITY: usize = 8;

/// Resizes vectors by linear interpolation over normalized positions
///
/// Sample positions `0, 1/(n-1), ..., 1` are cached per length. The cache is
/// bounded; the least recently inserted length is evicted first.
#[derive(Debug, Clone, Default)]
pub struct Resizer {
    cache: VecDeque<(usize, Arc<[f32]>)>,
}

impl Resizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize `values` to exactly `new_len` elements
    ///
    /// Returns the input unchanged when the lengths already match. Monotonic
    /// input gives monotonic output.
    pub fn resize(&mut self, values: &[f32], new_len: usize) -> Vec<f32> {
        if values.len() == new_len {
            return values.to_vec();
        }
        match values.len() {
            0 => return vec![0.0; new_len],
            1 => return vec![values[0]; new_len],
            _ => {}
        }

        let old_x = self.positions(values.len());
        let new_x = self.positions(new_len);

        // Both position sets are sorted, so one forward pass finds each segment
        let mut segment = 0;
        new_x
            .iter()
            .map(|&x| {
                while segment + 2 < old_x.len() && x > old_x[segment + 1] {
                    segment += 1;
                }
                let (x0, x1) = (old_x[segment], old_x[segment + 1]);
                let (y0, y1) = (values[segment], values[segment + 1]);
                let t = ((x - x0) / (x1 - x0)).clamp(0.0, 1.0);
                y0 + t * (y1 - y0)
            })
            .collect()
    }

    /// Cached `linspace(0, 1, len)`
    fn positions(&mut self, len: usize) -> Arc<[f32]> {
        if let Some((_, positions)) = self.cache.iter().find(|(n, _)| *n == len) {
            return Arc::clone(positions);
        }
        let positions: Arc<[f32]> = linspace(len).into();
        if self.cache.len() == POSITION_CACHE_CAPACITY {
            self.cache.pop_front();
        }
        self.cache.push_back((len, Arc::clone(&positions)));
        positions
    }

    /// Number of lengths currently cached
    pub fn cached_lengths(&self) -> usize {
        self.cache.len()
    }
}

fn linspace(len: usize) -> Vec<f32> {
    match len {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = 1.0 / (len - 1) as f32;
            (0..len)
                .map(|i| if i == len - 1 { 1.0 } else { i as f32 * step })
                .collect()
        }
    }
}
