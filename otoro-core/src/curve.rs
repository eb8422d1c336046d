//! 1-D curve operators that turn the raw R-min sequence into a peak-ready
//! signal.
//!
//! All operators are pure functions over finite numeric sequences. The
//! orchestrator derives every window and sigma from `min_cluster_size`; the
//! functions themselves carry no configuration.

use thiserror::Error;

/// Offset from the end of the curve of the entry pinned to half the sequence
/// minimum before the log transform.
///
/// The pin compresses decayed-density tails so the final annexations cannot
/// dominate the log-rescaled curve as an extreme peak. The offset is an
/// empirical constant; its validity for other dataset sizes is unverified,
/// so it is kept configurable rather than re-derived.
pub const TAIL_PIN_OFFSET: usize = 10;

/// Floor applied before the log transform so zero distances (duplicate
/// points) cannot poison it.
const LOG_FLOOR: f32 = 1e-12;

/// An error produced by the curve operators on degenerate input.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CurveError {
    /// The operator was handed an empty sequence.
    #[error("cannot process an empty curve")]
    EmptySequence,
    /// Min-max rescaling is undefined for a constant sequence.
    #[error("curve is constant at {value}; min-max rescaling is undefined")]
    ConstantSequence {
        /// The single value the sequence holds everywhere.
        value: f32,
    },
}

impl CurveError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> CurveErrorCode {
        match self {
            Self::EmptySequence => CurveErrorCode::EmptySequence,
            Self::ConstantSequence { .. } => CurveErrorCode::ConstantSequence,
        }
    }
}

/// Machine-readable error codes for [`CurveError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CurveErrorCode {
    /// The operator was handed an empty sequence.
    EmptySequence,
    /// Min-max rescaling is undefined for a constant sequence.
    ConstantSequence,
}

impl CurveErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptySequence => "CURVE_EMPTY_SEQUENCE",
            Self::ConstantSequence => "CURVE_CONSTANT_SEQUENCE",
        }
    }
}

/// Rolling maximum over a forward-looking window.
///
/// `out[i]` is the maximum of `seq[i..i + window]`. The last `window`
/// positions repeat the final computed value instead of shrinking the
/// window at the tail; that boundary policy is deliberate and keeps the
/// curve length unchanged. The window is clamped to `1..=seq.len()`.
///
/// # Examples
/// ```
/// use otoro_core::moving_max;
///
/// let out = moving_max(&[1.0, 3.0, 2.0, 5.0, 4.0], 2);
/// assert_eq!(out, [3.0, 3.0, 5.0, 5.0, 5.0]);
/// ```
#[must_use]
pub fn moving_max(seq: &[f32], window: usize) -> Vec<f32> {
    if seq.is_empty() {
        return Vec::new();
    }
    let window = window.clamp(1, seq.len());
    let mut out = Vec::with_capacity(seq.len());
    if window == seq.len() {
        out.resize(seq.len(), slice_max(seq));
        return out;
    }
    for start in 0..seq.len() - window {
        out.push(slice_max(&seq[start..start + window]));
    }
    let tail = out[out.len() - 1];
    for _ in 0..window {
        out.push(tail);
    }
    out
}

/// Gaussian convolution smoothing with reflected boundaries.
///
/// The kernel is truncated at four standard deviations (radius
/// `floor(4 * sigma + 0.5)`); `sigma <= 0` returns the input unchanged. The
/// caller derives `sigma` from `min_cluster_size`.
#[must_use]
pub fn gaussian_smooth(seq: &[f32], sigma: f64) -> Vec<f32> {
    if seq.is_empty() || sigma <= 0.0 {
        return seq.to_vec();
    }
    let radius = (4.0 * sigma + 0.5) as usize;
    if radius == 0 {
        return seq.to_vec();
    }

    let denom = 2.0 * sigma * sigma;
    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let mut total = 0.0_f64;
    for offset in -(radius as i64)..=(radius as i64) {
        let weight = (-(offset as f64).powi(2) / denom).exp();
        kernel.push(weight);
        total += weight;
    }
    for weight in &mut kernel {
        *weight /= total;
    }

    let len = seq.len() as i64;
    (0..len)
        .map(|center| {
            let mut acc = 0.0_f64;
            for (tap, &weight) in kernel.iter().enumerate() {
                let pos = center + tap as i64 - radius as i64;
                acc += weight * f64::from(seq[reflect_index(pos, len)]);
            }
            acc as f32
        })
        .collect()
}

/// Reflects an out-of-range position back into `0..len`.
///
/// Mirrors about the array edges including the edge samples:
/// `(d c b a | a b c d | d c b a)`.
fn reflect_index(mut pos: i64, len: i64) -> usize {
    loop {
        if pos < 0 {
            pos = -pos - 1;
        } else if pos >= len {
            pos = 2 * len - pos - 1;
        } else {
            return pos as usize;
        }
    }
}

/// Linear min-max rescale to `[0, 1]`.
///
/// # Errors
/// Returns [`CurveError::EmptySequence`] for an empty input and
/// [`CurveError::ConstantSequence`] when every entry is equal; a constant
/// curve is degenerate input, never silently rescaled to zeros.
///
/// # Examples
/// ```
/// use otoro_core::normalize;
///
/// let out = normalize(&[2.0, 4.0, 3.0])?;
/// assert_eq!(out, [0.0, 1.0, 0.5]);
/// assert!(normalize(&[1.0, 1.0, 1.0]).is_err());
/// # Ok::<(), otoro_core::CurveError>(())
/// ```
pub fn normalize(seq: &[f32]) -> Result<Vec<f32>, CurveError> {
    if seq.is_empty() {
        return Err(CurveError::EmptySequence);
    }
    let lowest = slice_min(seq);
    let highest = slice_max(seq);
    let span = highest - lowest;
    if span == 0.0 {
        return Err(CurveError::ConstantSequence { value: lowest });
    }
    Ok(seq.iter().map(|&value| (value - lowest) / span).collect())
}

/// Compresses the curve's dynamic range in log space.
///
/// Applies `-ln(x)`, min-max normalizes, then negates and re-zeroes so the
/// result lies in `[0, 1]` with larger input distances mapped to larger
/// output values. Entries at or below a small positive floor are clipped to
/// it before the log so exact-zero distances cannot poison the transform.
///
/// # Errors
/// Propagates [`CurveError`] from the embedded normalization when the input
/// is empty or constant.
pub fn log_rescale_and_invert(seq: &[f32]) -> Result<Vec<f32>, CurveError> {
    let logs: Vec<f32> = seq
        .iter()
        .map(|&value| -(f64::from(value.max(LOG_FLOOR)).ln()) as f32)
        .collect();
    let scaled = normalize(&logs)?;
    Ok(scaled.iter().map(|&value| 1.0 - value).collect())
}

/// Pins the entry `offset` positions from the end to half the sequence
/// minimum.
///
/// The near-tail of the R-min curve decays towards extremely low spread
/// distances; without the pin those entries dominate the log-rescaled curve
/// as one extreme peak. A no-op when the sequence is shorter than `offset`.
pub fn pin_tail(seq: &mut [f32], offset: usize) {
    if offset == 0 || seq.len() < offset {
        return;
    }
    let lowest = slice_min(seq);
    seq[seq.len() - offset] = lowest / 2.0;
}

fn slice_max(seq: &[f32]) -> f32 {
    seq.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

fn slice_min(seq: &[f32]) -> f32 {
    seq.iter().copied().fold(f32::INFINITY, f32::min)
}
