//! One-dimensional Gaussian smoothing

/// Gaussian-filter `input` with standard deviation `sigma`
///
/// The kernel is truncated at four standard deviations and the signal is
/// extended at the edges by reflection (`d c b a | a b c d | d c b a`).
pub fn gaussian_filter1d(input: &[f32], sigma: f32) -> Vec<f32> {
    let mut output = input.to_vec();
    gaussian_filter1d_in_place(&mut output, sigma);
    output
}

/// In-place variant of [`gaussian_filter1d`]
pub fn gaussian_filter1d_in_place(data: &mut [f32], sigma: f32) {
    if data.len() < 2 || sigma <= 0.0 {
        return;
    }
    let kernel = kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let source = data.to_vec();
    let len = source.len() as isize;

    for (i, out) in data.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (k, &weight) in kernel.iter().enumerate() {
            let j = reflect(i as isize + k as isize - radius, len);
            acc += weight * source[j];
        }
        *out = acc;
    }
}

fn kernel(sigma: f32) -> Vec<f32> {
    let radius = (4.0 * sigma + 0.5) as isize;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|x| (-((x * x) as f32) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Map an out-of-range index back into `0..len` by half-sample reflection
fn reflect(mut index: isize, len: isize) -> usize {
    let period = 2 * len;
    index = index.rem_euclid(period);
    if index >= len {
        index = period - 1 - index;
    }
    index as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized() {
        for sigma in [0.2, 1.0, 4.0] {
            let sum: f32 = kernel(sigma).iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "sigma {} sums to {}", sigma, sum);
        }
    }

    #[test]
    fn test_small_sigma_has_radius_one() {
        assert_eq!(kernel(0.2).len(), 3);
        assert_eq!(kernel(1.0).len(), 9);
    }

    #[test]
    fn test_constant_signal_unchanged() {
        let out = gaussian_filter1d(&[3.0; 10], 4.0);
        assert!(out.iter().all(|&v| (v - 3.0).abs() < 1e-4));
    }

    #[test]
    fn test_impulse_spreads_symmetrically() {
        let mut input = vec![0.0; 9];
        input[4] = 1.0;
        let out = gaussian_filter1d(&input, 1.0);
        assert!(out[4] < 1.0);
        assert!((out[3] - out[5]).abs() < 1e-6);
        let total: f32 = out.iter().sum();
        assert!((total - 1.0).abs() < 1e-4, "energy is preserved, got {}", total);
    }

    #[test]
    fn test_reflect_edges() {
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
    }

    #[test]
    fn test_short_inputs_pass_through() {
        assert_eq!(gaussian_filter1d(&[], 1.0), Vec::<f32>::new());
        assert_eq!(gaussian_filter1d(&[2.0], 1.0), vec![2.0]);
    }
}
