//! Rolling sample window

/// The most recent `history` audio chunks held as one contiguous buffer
///
/// The oldest chunk sits at the front. After construction the window is
/// always full (seeded with silence), so `flatten()` has a fixed length.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    chunk_len: usize,
    history: usize,
    samples: Vec<f32>,
}

impl SampleWindow {
    /// Create a window of `history` chunks of `chunk_len` samples each
    pub fn new(chunk_len: usize, history: usize) -> Self {
        Self {
            chunk_len,
            history,
            samples: vec![0.0; chunk_len * history],
        }
    }

    /// Evict the oldest chunk and append `chunk`
    ///
    /// # Panics
    ///
    /// Panics if `chunk.len()` differs from the configured chunk length.
    /// Callers validate chunk shape at the boundary.
    pub fn push(&mut self, chunk: &[f32]) {
        assert_eq!(
            chunk.len(),
            self.chunk_len,
            "chunk length must match the window's chunk length"
        );
        if self.samples.is_empty() {
            return;
        }
        self.samples.copy_within(self.chunk_len.., 0);
        let tail = self.samples.len() - self.chunk_len;
        self.samples[tail..].copy_from_slice(chunk);
    }

    /// Concatenated samples, oldest first
    pub fn flatten(&self) -> &[f32] {
        &self.samples
    }

    /// Peak absolute amplitude over the whole window
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    pub fn history(&self) -> usize {
        self.history
    }

    /// Total number of samples in the flattened view
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_full_of_silence() {
        let window = SampleWindow::new(4, 3);
        assert_eq!(window.len(), 12);
        assert!(window.flatten().iter().all(|&s| s == 0.0));
        assert_eq!(window.peak(), 0.0);
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut window = SampleWindow::new(2, 3);
        window.push(&[1.0, 1.0]);
        window.push(&[2.0, 2.0]);
        window.push(&[3.0, 3.0]);
        assert_eq!(window.flatten(), &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);

        window.push(&[4.0, 4.0]);
        assert_eq!(window.flatten(), &[2.0, 2.0, 3.0, 3.0, 4.0, 4.0]);
        assert_eq!(window.len(), 6, "length is fixed after every push");
    }

    #[test]
    fn test_peak_uses_absolute_value() {
        let mut window = SampleWindow::new(3, 2);
        window.push(&[0.1, -0.7, 0.3]);
        assert!((window.peak() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_single_chunk_history() {
        let mut window = SampleWindow::new(2, 1);
        window.push(&[0.5, 0.25]);
        window.push(&[-0.5, 0.0]);
        assert_eq!(window.flatten(), &[-0.5, 0.0]);
    }

    #[test]
    #[should_panic]
    fn test_wrong_chunk_length_panics() {
        let mut window = SampleWindow::new(4, 2);
        window.push(&[0.0; 3]);
    }
}
