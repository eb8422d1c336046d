//! Peak detection and prominence scoring over processed R-min curves.
//!
//! Candidate peaks are strict local maxima within a spacing-derived window.
//! Each candidate is then scored with a relative prominence that compares it
//! against an asymmetric window bounded by its neighbouring candidates, and
//! a selection policy keeps either every candidate above a threshold or the
//! top `k - 1` candidates for a known region count.

use thiserror::Error;

/// An error produced during peak analysis.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PeakError {
    /// A prominence scan found a higher value at distance zero; the supplied
    /// index is not a local maximum under the given windows.
    #[error("index {peak} is not a local maximum under its prominence window")]
    NotLocalMaximum {
        /// The offending candidate index.
        peak: usize,
    },
    /// Top-k selection needs `requested - 1` candidates but found fewer.
    #[error(
        "requested {requested} clusters but the curve yields only {found} candidate boundaries"
    )]
    InsufficientCandidates {
        /// Target cluster count supplied by the caller.
        requested: usize,
        /// Number of valid candidate peaks discovered.
        found: usize,
    },
}

impl PeakError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> PeakErrorCode {
        match self {
            Self::NotLocalMaximum { .. } => PeakErrorCode::NotLocalMaximum,
            Self::InsufficientCandidates { .. } => PeakErrorCode::InsufficientCandidates,
        }
    }
}

/// Machine-readable error codes for [`PeakError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PeakErrorCode {
    /// The supplied index is not a local maximum under its windows.
    NotLocalMaximum,
    /// Fewer candidate peaks exist than top-k selection requires.
    InsufficientCandidates,
}

impl PeakErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotLocalMaximum => "PEAK_NOT_LOCAL_MAXIMUM",
            Self::InsufficientCandidates => "PEAK_INSUFFICIENT_CANDIDATES",
        }
    }
}

/// Policy deciding which candidate peaks survive prominence scoring.
///
/// The two modes are mutually exclusive: thresholding serves an unknown
/// cluster count, top-k serves a known one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Selection {
    /// Keep every candidate whose prominence strictly exceeds the threshold.
    Threshold(f32),
    /// Keep the `k - 1` most prominent candidates, yielding `k` regions once
    /// combined with the sequence endpoints.
    TopK(usize),
}

/// Finds boundary peaks in a processed curve.
///
/// Candidates are strict local maxima within a half-width window derived
/// from `min_spacing`; survivors are chosen by `selection` after prominence
/// scoring. The result is sorted by position.
///
/// # Errors
/// Returns [`PeakError::InsufficientCandidates`] when top-k selection wants
/// more candidates than the curve yields, and propagates
/// [`PeakError::NotLocalMaximum`] from prominence scoring (a contract
/// violation, not a data condition).
///
/// # Examples
/// ```
/// use otoro_core::{Selection, find_peaks};
///
/// let curve = [0.0, 0.1, 0.9, 0.1, 0.0, 0.2, 0.8, 0.2, 0.0];
/// let peaks = find_peaks(&curve, 2, Selection::Threshold(0.5))?;
/// assert_eq!(peaks, [2, 6]);
/// # Ok::<(), otoro_core::PeakError>(())
/// ```
pub fn find_peaks(
    curve: &[f32],
    min_spacing: usize,
    selection: Selection,
) -> Result<Vec<usize>, PeakError> {
    let order = (min_spacing / 2).max(1);
    let candidates = local_maxima(curve, order);
    let windows = candidate_windows(&candidates, curve.len());

    let mut prominences = Vec::with_capacity(candidates.len());
    for (&peak, &(left, right)) in candidates.iter().zip(windows.iter()) {
        prominences.push(peak_prominence(curve, peak, left, right)?);
    }

    match selection {
        Selection::Threshold(threshold) => Ok(candidates
            .iter()
            .zip(prominences.iter())
            .filter(|&(_, &prominence)| prominence > threshold)
            .map(|(&peak, _)| peak)
            .collect()),
        Selection::TopK(k) => {
            let wanted = k.saturating_sub(1);
            if candidates.len() < wanted {
                return Err(PeakError::InsufficientCandidates {
                    requested: k,
                    found: candidates.len(),
                });
            }
            let mut ranked: Vec<usize> = (0..candidates.len()).collect();
            ranked.sort_by(|&a, &b| prominences[b].total_cmp(&prominences[a]));
            let mut kept: Vec<usize> = ranked
                .iter()
                .take(wanted)
                .map(|&rank| candidates[rank])
                .collect();
            kept.sort_unstable();
            Ok(kept)
        }
    }
}

/// Scores one candidate peak against its asymmetric window.
///
/// Scans outward on each side collecting the running minimum until a value
/// above the peak height stops the scan, then returns the height minus the
/// SMALLER of the two one-sided minima. Taking the smaller support lets a
/// step change (one flat side, one deep side) score as a legitimate peak.
///
/// # Errors
/// Returns [`PeakError::NotLocalMaximum`] when either scan is stopped at
/// distance zero; such an index was never a local maximum and the caller
/// has violated the contract.
pub fn peak_prominence(
    curve: &[f32],
    peak: usize,
    left_window: usize,
    right_window: usize,
) -> Result<f32, PeakError> {
    let height = curve[peak];
    let left_start = peak.saturating_sub(left_window);
    let right_end = peak.saturating_add(right_window).min(curve.len());

    let min_left = min_until_exceeded(curve[left_start..peak].iter().rev(), height);
    let min_right = min_until_exceeded(curve[(peak + 1).min(right_end)..right_end].iter(), height);

    match (min_left, min_right) {
        (Some(left), Some(right)) => Ok(height - left.min(right)),
        _ => Err(PeakError::NotLocalMaximum { peak }),
    }
}

/// Splits the curve at the given sorted peak positions and returns the
/// first-occurrence argmin of each segment.
///
/// With `k` peaks this yields `k + 1` minima, the cores of the regions the
/// peaks separate. Each peak position belongs to the segment it opens.
#[must_use]
pub fn minima_between(curve: &[f32], peaks: &[usize]) -> Vec<usize> {
    if curve.is_empty() {
        return Vec::new();
    }
    let mut minima = Vec::with_capacity(peaks.len() + 1);
    let mut start = 0_usize;
    for bound in peaks.iter().copied().chain(std::iter::once(curve.len())) {
        if bound > start {
            minima.push(argmin(curve, start, bound));
        }
        start = bound;
    }
    minima
}

fn argmin(curve: &[f32], start: usize, end: usize) -> usize {
    let mut best = start;
    for index in start..end {
        if curve[index] < curve[best] {
            best = index;
        }
    }
    best
}

/// Strict local maxima within a rolling window of half-width `order`.
///
/// A position qualifies only if it exceeds every neighbour within `order`
/// on both sides, so the curve must be at least `2 * order + 1` long to
/// yield any candidate.
fn local_maxima(curve: &[f32], order: usize) -> Vec<usize> {
    if curve.len() < 2 * order + 1 {
        return Vec::new();
    }
    let mut maxima = Vec::new();
    for center in order..curve.len() - order {
        let value = curve[center];
        let dominates = (1..=order).all(|span| {
            value > curve[center - span] && value > curve[center + span]
        });
        if dominates {
            maxima.push(center);
        }
    }
    maxima
}

/// Asymmetric prominence windows for ordered candidates: the gap to each
/// neighbouring candidate, with the open side of the first and last
/// candidate spanning the full curve.
fn candidate_windows(candidates: &[usize], curve_len: usize) -> Vec<(usize, usize)> {
    let mut windows = Vec::with_capacity(candidates.len());
    for (position, &peak) in candidates.iter().enumerate() {
        let left = if position == 0 {
            curve_len
        } else {
            peak - candidates[position - 1]
        };
        let right = if position + 1 == candidates.len() {
            curve_len
        } else {
            candidates[position + 1] - peak
        };
        windows.push((left, right));
    }
    windows
}

fn min_until_exceeded<'a>(values: impl Iterator<Item = &'a f32>, ceiling: f32) -> Option<f32> {
    let mut minimum = None;
    for &value in values {
        if value > ceiling {
            break;
        }
        minimum = Some(minimum.map_or(value, |current: f32| current.min(value)));
    }
    minimum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn unimodal() -> Vec<f32> {
        vec![0.3, 0.4, 0.6, 0.9, 1.0, 0.8, 0.5, 0.2, 0.1]
    }

    #[test]
    fn unimodal_prominence_is_height_minus_lower_endpoint() {
        let curve = unimodal();
        let prominence =
            peak_prominence(&curve, 4, curve.len(), curve.len()).expect("index 4 is the maximum");
        assert!((prominence - (1.0 - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn prominence_rejects_non_maxima() {
        let curve = unimodal();
        let err = peak_prominence(&curve, 2, curve.len(), curve.len())
            .expect_err("index 2 is dominated on its right");
        assert_eq!(err, PeakError::NotLocalMaximum { peak: 2 });
        assert_eq!(err.code().as_str(), "PEAK_NOT_LOCAL_MAXIMUM");
    }

    #[test]
    fn step_change_scores_by_its_deep_side() {
        // Flat high plateau on the left, deep valley on the right.
        let curve = [0.8, 0.8, 0.8, 0.9, 0.3, 0.1, 0.1];
        let prominence = peak_prominence(&curve, 3, curve.len(), curve.len())
            .expect("index 3 is a local maximum");
        assert!((prominence - (0.9 - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn threshold_mode_keeps_only_prominent_candidates() {
        let curve = [0.0, 0.1, 0.9, 0.1, 0.0, 0.15, 0.2, 0.15, 0.0];
        let peaks = find_peaks(&curve, 2, Selection::Threshold(0.5)).expect("analysis succeeds");
        assert_eq!(peaks, [2]);
    }

    #[test]
    fn threshold_mode_accepts_a_peakless_curve() {
        let curve = [0.5, 0.5, 0.5, 0.5, 0.5];
        let peaks = find_peaks(&curve, 4, Selection::Threshold(0.1)).expect("analysis succeeds");
        assert!(peaks.is_empty());
    }

    #[test]
    fn top_k_keeps_the_most_prominent_boundaries_in_position_order() {
        let curve = [0.0, 0.2, 0.6, 0.1, 0.0, 0.1, 1.0, 0.1, 0.0];
        let peaks = find_peaks(&curve, 2, Selection::TopK(3)).expect("two candidates exist");
        assert_eq!(peaks, [2, 6]);

        let peaks = find_peaks(&curve, 2, Selection::TopK(2)).expect("two candidates exist");
        assert_eq!(peaks, [6]);
    }

    #[test]
    fn top_k_fails_loudly_when_candidates_run_short() {
        // A single boundary cannot support three regions.
        let curve = [0.0, 0.1, 0.9, 0.1, 0.0];
        let err = find_peaks(&curve, 2, Selection::TopK(3))
            .expect_err("three clusters need two boundaries");
        assert_eq!(
            err,
            PeakError::InsufficientCandidates {
                requested: 3,
                found: 1
            }
        );
        assert_eq!(err.code().as_str(), "PEAK_INSUFFICIENT_CANDIDATES");
    }

    #[test]
    fn top_one_selects_no_boundaries() {
        let curve = [0.0, 0.1, 0.9, 0.1, 0.0];
        let peaks = find_peaks(&curve, 2, Selection::TopK(1)).expect("analysis succeeds");
        assert!(peaks.is_empty());
    }

    #[rstest]
    #[case(&[], &[], vec![])]
    #[case(&[0.4, 0.1, 0.3], &[], vec![1])]
    #[case(&[0.4, 0.1, 0.9, 0.3, 0.2, 0.9], &[2], vec![1, 4])]
    fn minima_between_returns_one_core_per_segment(
        #[case] curve: &[f32],
        #[case] peaks: &[usize],
        #[case] expected: Vec<usize>,
    ) {
        assert_eq!(minima_between(curve, peaks), expected);
    }

    #[test]
    fn minima_between_prefers_first_occurrence() {
        assert_eq!(minima_between(&[0.2, 0.1, 0.1, 0.2], &[]), vec![1]);
    }
}
