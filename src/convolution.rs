//! Discrete convolution of signals and kernels

/// Full discrete convolution.
///
/// `c[k] = sum_i a[i] * b[k - i]` over every valid index, so the output has
/// `a.len() + b.len() - 1` samples. Either input being empty gives an empty
/// output.
pub fn convolve_full(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut result = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            result[i + j] += ai * bj;
        }
    }

    result
}

/// Convolve one signal with each kernel in turn.
///
/// The first entry is the untouched signal, followed by `signal * kernel` for
/// every kernel, which is the layout [`crate::plot::convolution_plot`] expects.
pub fn convolve_with_kernels<K: AsRef<[f64]>>(signal: &[f64], kernels: &[K]) -> Vec<Vec<f64>> {
    let mut signals = Vec::with_capacity(kernels.len() + 1);
    signals.push(signal.to_vec());
    signals.extend(
        kernels
            .iter()
            .map(|kernel| convolve_full(signal, kernel.as_ref())),
    );
    signals
}

/// A unit impulse surrounded by `pad` zeros on each side.
pub fn kronecker_delta(pad: usize) -> Vec<f64> {
    let mut delta = vec![0.0; 2 * pad + 1];
    delta[pad] = 1.0;
    delta
}
