//! Greedy label-spreading propagation engine.
//!
//! Grows a labelled set from seed point(s) by repeatedly annexing the
//! globally closest unlabelled point, propagating the annexing point's label
//! with each step. With a single seed this is a Prim-style single-linkage
//! expansion whose step distances form the R-min curve; with several seeds
//! of distinct labels it performs simultaneous multi-source region growing.
//!
//! The frontier keeps, for every unlabelled point, its best distance to the
//! labelled set and the labelled point achieving it, relaxed against each
//! newly annexed point. That makes one pass O(N) distance evaluations per
//! step and O(N²) overall instead of a full matrix rescan per step. Strict
//! `<` comparisons give a deterministic first-occurrence tie-break in seed
//! order, then annexation order.

use thiserror::Error;

use crate::{dataset::PointSet, distance::Metric, result::Label};

/// An invariant violation detected while spreading labels.
///
/// Every variant signals a bug in propagation bookkeeping or in the caller's
/// partition; none is retried or downgraded.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SpreadError {
    /// A spreading pass needs at least one seed to grow from.
    #[error("label spreading requires a non-empty seed set")]
    EmptySeeds,
    /// Seed and unlabelled sets do not partition the dataset.
    #[error(
        "labelled ({labelled}) and unlabelled ({unlabelled}) points do not sum to the total ({total})"
    )]
    PartitionMismatch {
        /// Number of labelled points observed.
        labelled: usize,
        /// Number of unlabelled points observed.
        unlabelled: usize,
        /// Total number of points in the dataset.
        total: usize,
    },
    /// A point index appeared in both partitions or twice in one.
    #[error("point {index} appears more than once across the partitions")]
    DuplicateIndex {
        /// The repeated point index.
        index: usize,
    },
    /// A partition referenced a point outside the dataset.
    #[error("point {index} is out of bounds for a dataset of {total} points")]
    OutOfBounds {
        /// The invalid point index.
        index: usize,
        /// Total number of points in the dataset.
        total: usize,
    },
    /// A seed carried the reserved unlabelled label.
    #[error("seed point {index} must carry a positive label")]
    SeedNotLabelled {
        /// The offending seed index.
        index: usize,
    },
    /// An unlabelled point already carried a label.
    #[error("point {index} is in the unlabelled partition but carries a label")]
    RestNotUnlabelled {
        /// The offending point index.
        index: usize,
    },
}

impl SpreadError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> SpreadErrorCode {
        match self {
            Self::EmptySeeds => SpreadErrorCode::EmptySeeds,
            Self::PartitionMismatch { .. } => SpreadErrorCode::PartitionMismatch,
            Self::DuplicateIndex { .. } => SpreadErrorCode::DuplicateIndex,
            Self::OutOfBounds { .. } => SpreadErrorCode::OutOfBounds,
            Self::SeedNotLabelled { .. } => SpreadErrorCode::SeedNotLabelled,
            Self::RestNotUnlabelled { .. } => SpreadErrorCode::RestNotUnlabelled,
        }
    }
}

/// Machine-readable error codes for [`SpreadError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SpreadErrorCode {
    /// A spreading pass needs at least one seed to grow from.
    EmptySeeds,
    /// Seed and unlabelled sets do not partition the dataset.
    PartitionMismatch,
    /// A point index appeared more than once.
    DuplicateIndex,
    /// A partition referenced a point outside the dataset.
    OutOfBounds,
    /// A seed carried the reserved unlabelled label.
    SeedNotLabelled,
    /// An unlabelled point already carried a label.
    RestNotUnlabelled,
}

impl SpreadErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptySeeds => "SPREAD_EMPTY_SEEDS",
            Self::PartitionMismatch => "SPREAD_PARTITION_MISMATCH",
            Self::DuplicateIndex => "SPREAD_DUPLICATE_INDEX",
            Self::OutOfBounds => "SPREAD_OUT_OF_BOUNDS",
            Self::SeedNotLabelled => "SPREAD_SEED_NOT_LABELLED",
            Self::RestNotUnlabelled => "SPREAD_REST_NOT_UNLABELLED",
        }
    }
}

/// Output of one spreading pass.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SpreadOutcome {
    /// Every point index in annexation order, seeds first.
    pub ordering: Vec<usize>,
    /// For each annexed point, the labelled point it was closest to when
    /// annexed; `None` for seeds. A directed forest rooted at the seeds.
    pub parents: Vec<Option<usize>>,
    /// Minimum labelled-to-unlabelled distance at each annexation step.
    /// Empty unless curve recording was requested.
    pub curve: Vec<f32>,
}

/// One frontier entry: an unlabelled point and its best link into the
/// labelled set so far.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    index: usize,
    best_distance: f32,
    best_parent: usize,
}

/// Spreads labels from `seeds` until every point in `rest` is labelled.
///
/// `seeds` and `rest` must partition `0..points.len()` exactly; seeds must
/// already carry positive labels and the rest must be unlabelled. `labels`
/// is mutated in place, one point per annexation.
pub(crate) fn spread(
    points: &PointSet,
    metric: Metric,
    labels: &mut [Label],
    seeds: &[usize],
    rest: &[usize],
    record_curve: bool,
) -> Result<SpreadOutcome, SpreadError> {
    validate_partition(points.len(), labels, seeds, rest)?;

    let mut ordering = seeds.to_vec();
    let mut parents = vec![None; points.len()];
    let mut curve = Vec::with_capacity(if record_curve { rest.len() } else { 0 });

    // Seed the frontier with each unlabelled point's best link into the seed
    // set; seed order doubles as the tie-break order.
    let mut frontier: Vec<FrontierEntry> = rest
        .iter()
        .map(|&index| {
            let row = points.row(index);
            let mut best_distance = f32::INFINITY;
            let mut best_parent = seeds[0];
            for &seed in seeds {
                let distance = metric.distance(points.row(seed), row);
                if distance < best_distance {
                    best_distance = distance;
                    best_parent = seed;
                }
            }
            FrontierEntry {
                index,
                best_distance,
                best_parent,
            }
        })
        .collect();

    while !frontier.is_empty() {
        let mut closest = 0_usize;
        for (position, entry) in frontier.iter().enumerate() {
            if entry.best_distance < frontier[closest].best_distance {
                closest = position;
            }
        }
        // `remove` keeps the frontier in insertion order so ties stay
        // deterministic across steps.
        let annexed = frontier.remove(closest);

        labels[annexed.index] = labels[annexed.best_parent];
        parents[annexed.index] = Some(annexed.best_parent);
        ordering.push(annexed.index);
        if record_curve {
            curve.push(annexed.best_distance);
        }

        let annexed_row = points.row(annexed.index);
        for entry in &mut frontier {
            let distance = metric.distance(points.row(entry.index), annexed_row);
            if distance < entry.best_distance {
                entry.best_distance = distance;
                entry.best_parent = annexed.index;
            }
        }
    }

    if ordering.len() != points.len() {
        return Err(SpreadError::PartitionMismatch {
            labelled: ordering.len(),
            unlabelled: 0,
            total: points.len(),
        });
    }

    Ok(SpreadOutcome {
        ordering,
        parents,
        curve,
    })
}

fn validate_partition(
    total: usize,
    labels: &[Label],
    seeds: &[usize],
    rest: &[usize],
) -> Result<(), SpreadError> {
    if seeds.is_empty() {
        return Err(SpreadError::EmptySeeds);
    }
    let mut seen = vec![false; total];
    for &index in seeds.iter().chain(rest.iter()) {
        if index >= total {
            return Err(SpreadError::OutOfBounds { index, total });
        }
        if seen[index] {
            return Err(SpreadError::DuplicateIndex { index });
        }
        seen[index] = true;
    }
    if seeds.len() + rest.len() != total {
        return Err(SpreadError::PartitionMismatch {
            labelled: seeds.len(),
            unlabelled: rest.len(),
            total,
        });
    }
    for &index in seeds {
        if labels[index].is_unlabelled() {
            return Err(SpreadError::SeedNotLabelled { index });
        }
    }
    for &index in rest {
        if !labels[index].is_unlabelled() {
            return Err(SpreadError::RestNotUnlabelled { index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(values: &[f32]) -> PointSet {
        let rows: Vec<Vec<f32>> = values.iter().map(|&value| vec![value]).collect();
        PointSet::try_from_rows(&rows).expect("test data is valid")
    }

    fn seeded_labels(total: usize, seeds: &[usize]) -> Vec<Label> {
        let mut labels = vec![Label::UNLABELLED; total];
        for (offset, &seed) in seeds.iter().enumerate() {
            labels[seed] = Label::new(offset as u32 + 1);
        }
        labels
    }

    #[test]
    fn single_seed_records_the_full_curve() {
        let points = line(&[0.0, 1.0, 3.0, 6.0]);
        let mut labels = seeded_labels(4, &[0]);
        let rest = [1, 2, 3];
        let outcome =
            spread(&points, Metric::Euclidean, &mut labels, &[0], &rest, true).expect("valid");

        assert_eq!(outcome.ordering, [0, 1, 2, 3]);
        assert_eq!(outcome.curve, [1.0, 2.0, 3.0]);
        assert_eq!(outcome.parents, [None, Some(0), Some(1), Some(2)]);
        assert!(labels.iter().all(|label| label.get() == 1));
    }

    #[test]
    fn labels_grow_towards_the_nearer_seed() {
        let points = line(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        let mut labels = seeded_labels(6, &[0, 5]);
        let rest = [1, 2, 3, 4];
        let outcome =
            spread(&points, Metric::Euclidean, &mut labels, &[0, 5], &rest, false).expect("valid");

        let ids: Vec<u32> = labels.iter().map(|label| label.get()).collect();
        assert_eq!(ids, [1, 1, 1, 2, 2, 2]);
        assert!(outcome.curve.is_empty());
        assert_eq!(outcome.parents[3], Some(4));
    }

    #[test]
    fn rejects_incomplete_partitions() {
        let points = line(&[0.0, 1.0, 2.0]);
        let mut labels = seeded_labels(3, &[0]);
        let err = spread(&points, Metric::Euclidean, &mut labels, &[0], &[1], false)
            .expect_err("point 2 is missing");
        assert_eq!(
            err,
            SpreadError::PartitionMismatch {
                labelled: 1,
                unlabelled: 1,
                total: 3
            }
        );
    }

    #[test]
    fn rejects_duplicated_points() {
        let points = line(&[0.0, 1.0, 2.0]);
        let mut labels = seeded_labels(3, &[0]);
        let err = spread(&points, Metric::Euclidean, &mut labels, &[0], &[1, 1], false)
            .expect_err("point 1 appears twice");
        assert_eq!(err, SpreadError::DuplicateIndex { index: 1 });
    }

    #[test]
    fn rejects_unlabelled_seeds() {
        let points = line(&[0.0, 1.0]);
        let mut labels = vec![Label::UNLABELLED; 2];
        let err = spread(&points, Metric::Euclidean, &mut labels, &[0], &[1], false)
            .expect_err("seed 0 carries no label");
        assert_eq!(err, SpreadError::SeedNotLabelled { index: 0 });
    }

    #[test]
    fn rejects_labelled_rest_points() {
        let points = line(&[0.0, 1.0]);
        let mut labels = vec![Label::new(1), Label::new(2)];
        let err = spread(&points, Metric::Euclidean, &mut labels, &[0], &[1], false)
            .expect_err("point 1 is already labelled");
        assert_eq!(err, SpreadError::RestNotUnlabelled { index: 1 });
    }

    proptest! {
        #[test]
        fn spreading_always_yields_a_permutation(
            values in prop::collection::vec(-100.0_f32..100.0, 2..24),
            seed_count in 1_usize..4,
        ) {
            let total = values.len();
            let seed_count = seed_count.min(total - 1);
            let points = line(&values);
            let seeds: Vec<usize> = (0..seed_count).collect();
            let rest: Vec<usize> = (seed_count..total).collect();
            let mut labels = seeded_labels(total, &seeds);

            let outcome = spread(&points, Metric::Euclidean, &mut labels, &seeds, &rest, true)
                .expect("partition is valid by construction");

            let mut sorted = outcome.ordering.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..total).collect::<Vec<_>>());
            prop_assert_eq!(outcome.curve.len(), total - seed_count);
            prop_assert!(outcome.curve.iter().all(|&distance| distance >= 0.0));
            prop_assert!(labels.iter().all(|label| !label.is_unlabelled()));
            for index in 0..total {
                prop_assert_eq!(outcome.parents[index].is_none(), index < seed_count);
            }
        }
    }
}
