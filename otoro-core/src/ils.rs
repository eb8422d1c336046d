//! ILS orchestration: the fit pipeline and the fitted model surface.
//!
//! Fitting runs three stages in sequence: a single-seed discovery pass that
//! produces the point ordering and the R-min curve, curve analysis that
//! turns the curve into one seed per high-density region, and a multi-seed
//! pass that spreads the final labels. The stages are plain sequential calls
//! into the stateless spreader, never one routine with a mode flag.

use std::num::NonZeroUsize;

use tracing::{info, instrument};

use crate::{
    Result,
    curve::{self, TAIL_PIN_OFFSET},
    dataset::PointSet,
    distance::Metric,
    error::IlsError,
    peaks::{self, Selection},
    result::Label,
    spread::spread,
};

/// Divisor of the dataset size used for the default `min_cluster_size` (5%).
const DEFAULT_MIN_CLUSTER_DIVISOR: usize = 20;

/// Configured but not yet fitted ILS instance.
///
/// Construct via [`crate::IlsBuilder`]. Calling [`Ils::fit`] consumes a
/// dataset and returns a [`FittedIls`]; the configuration itself stays
/// reusable. A [`FittedIls`] is frozen — there is deliberately no way to
/// re-fit one, so "re-fitting" always means calling [`Ils::fit`] again with
/// a fresh dataset.
///
/// # Examples
/// ```
/// use otoro_core::{IlsBuilder, PointSet};
///
/// let points = PointSet::try_from_rows(&[
///     vec![0.0], vec![0.1], vec![0.2],
///     vec![10.0], vec![10.1], vec![10.2],
/// ])?;
/// let model = IlsBuilder::new().build()?.fit(points)?;
/// assert_eq!(model.cluster_count(), 2);
/// let ids: Vec<u32> = model.labels().iter().map(|label| label.get()).collect();
/// assert_eq!(ids, [1, 1, 1, 2, 2, 2]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Ils {
    n_clusters: Option<NonZeroUsize>,
    min_cluster_size: Option<NonZeroUsize>,
    metric: Metric,
    sensitivity: f32,
}

impl Ils {
    pub(crate) fn new(
        n_clusters: Option<NonZeroUsize>,
        min_cluster_size: Option<NonZeroUsize>,
        metric: Metric,
        sensitivity: f32,
    ) -> Self {
        Self {
            n_clusters,
            min_cluster_size,
            metric,
            sensitivity,
        }
    }

    /// Returns the configured target cluster count, if any.
    #[must_use]
    pub fn n_clusters(&self) -> Option<NonZeroUsize> {
        self.n_clusters
    }

    /// Returns the configured minimum cluster size, if any.
    #[must_use]
    pub fn min_cluster_size(&self) -> Option<NonZeroUsize> {
        self.min_cluster_size
    }

    /// Returns the configured distance metric.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the prominence threshold used when no cluster count is set.
    #[must_use]
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Fits the model to a dataset.
    ///
    /// # Errors
    /// Returns [`IlsError::TooFewPoints`] for datasets below two points,
    /// [`IlsError::Curve`] when the R-min curve is degenerate,
    /// [`IlsError::Peaks`] when a known cluster count cannot be supported by
    /// the curve, and [`IlsError::Spread`] on propagation invariant
    /// violations. No failure is retried or downgraded.
    pub fn fit(&self, points: PointSet) -> Result<FittedIls> {
        let items = points.len();
        self.fit_with_len(points, items)
    }

    #[instrument(
        name = "core.fit",
        err,
        skip(self, points),
        fields(
            items = items,
            metric = %self.metric,
            n_clusters = ?self.n_clusters,
            sensitivity = f64::from(self.sensitivity),
        ),
    )]
    fn fit_with_len(&self, points: PointSet, items: usize) -> Result<FittedIls> {
        if items < 2 {
            return Err(IlsError::TooFewPoints { items, required: 2 });
        }
        let min_cluster_size = self.resolve_min_cluster_size(items);

        // Discovery pass: one seed, curve recording on.
        let mut discovery_labels = vec![Label::UNLABELLED; items];
        discovery_labels[0] = Label::new(1);
        let unlabelled: Vec<usize> = (1..items).collect();
        let discovery = spread(
            &points,
            self.metric,
            &mut discovery_labels,
            &[0],
            &unlabelled,
            true,
        )?;

        let seeds = self.seed_points(&discovery.curve, &discovery.ordering, min_cluster_size)?;

        // Final pass: one seed per region, fresh labels, curve recording off.
        let mut labels = vec![Label::UNLABELLED; items];
        let mut is_seed = vec![false; items];
        for (offset, &point) in seeds.iter().enumerate() {
            labels[point] = Label::new(offset as u32 + 1);
            is_seed[point] = true;
        }
        let remaining: Vec<usize> = (0..items).filter(|&index| !is_seed[index]).collect();
        let spreading = spread(&points, self.metric, &mut labels, &seeds, &remaining, false)?;

        info!(
            clusters = seeds.len(),
            min_cluster_size, "label spreading completed"
        );

        Ok(FittedIls {
            points,
            labels,
            metric: self.metric,
            min_cluster_size,
            cluster_count: seeds.len(),
            curve: discovery.curve,
            ordering: discovery.ordering,
            parents: spreading.parents,
        })
    }

    /// Resolves the effective minimum cluster size for a dataset of `items`
    /// points: the explicit value, else `items / (2 * n_clusters)`, else 5%
    /// of the dataset; always at least 1.
    fn resolve_min_cluster_size(&self, items: usize) -> usize {
        self.min_cluster_size.map_or_else(
            || {
                let derived = self.n_clusters.map_or(
                    items / DEFAULT_MIN_CLUSTER_DIVISOR,
                    |count| items / (2 * count.get()),
                );
                derived.max(1)
            },
            NonZeroUsize::get,
        )
    }

    /// Turns the raw R-min curve into one seed point per region.
    ///
    /// Every window in this pipeline is an integer fraction of
    /// `min_cluster_size`, so the analysis scales with the configured
    /// resolution rather than the dataset size.
    fn seed_points(
        &self,
        rmin: &[f32],
        ordering: &[usize],
        min_cluster_size: usize,
    ) -> Result<Vec<usize>> {
        // Drop the decayed tail before smoothing, keeping at least two
        // entries so the rescale below stays meaningful.
        let trim = (min_cluster_size / 4).min(rmin.len().saturating_sub(2));
        let trimmed = &rmin[..rmin.len() - trim];

        let mut filtered = curve::moving_max(trimmed, (min_cluster_size / 16).max(1));
        filtered = curve::gaussian_smooth(&filtered, (min_cluster_size / 8) as f64);
        curve::pin_tail(&mut filtered, TAIL_PIN_OFFSET);
        let processed = curve::log_rescale_and_invert(&filtered)?;

        let selection = self.n_clusters.map_or(
            Selection::Threshold(self.sensitivity),
            |count| Selection::TopK(count.get()),
        );
        let boundaries = peaks::find_peaks(&processed, min_cluster_size, selection)?;

        // Region cores: the argmin of each inter-boundary segment over a
        // lightly smoothed copy of the full curve. No normalisation here;
        // argmin is scale-invariant.
        let smoothed = curve::gaussian_smooth(rmin, (min_cluster_size / 32) as f64);
        let minima = peaks::minima_between(&smoothed, &boundaries);

        Ok(minima
            .into_iter()
            .map(|position| ordering[position])
            .collect())
    }
}

/// A fitted ILS model: frozen labels plus the diagnostic surfaces a
/// visualization layer needs to render the clustering.
///
/// Labels are indexed by original point order. The ordering and curve come
/// from the single-seed discovery pass; the parent map describes the final
/// multi-seed forest.
#[derive(Debug, Clone)]
pub struct FittedIls {
    points: PointSet,
    labels: Vec<Label>,
    metric: Metric,
    min_cluster_size: usize,
    cluster_count: usize,
    curve: Vec<f32>,
    ordering: Vec<usize>,
    parents: Vec<Option<usize>>,
}

impl FittedIls {
    /// Returns the fitted dataset.
    #[must_use]
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Returns one label per point, in original input order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Returns the metric the model was fitted with.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the minimum cluster size the fit resolved to.
    #[must_use]
    pub fn min_cluster_size(&self) -> usize {
        self.min_cluster_size
    }

    /// Returns the number of regions discovered.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Returns the R-min curve recorded by the discovery pass; entry `i` is
    /// the minimum labelled-to-unlabelled distance when the `i + 1`-th point
    /// was annexed. Length is always one less than the dataset size.
    #[must_use]
    pub fn rmin_curve(&self) -> &[f32] {
        &self.curve
    }

    /// Returns the annexation ordering of the discovery pass, a permutation
    /// of `0..len` starting at the seed.
    #[must_use]
    pub fn ordering(&self) -> &[usize] {
        &self.ordering
    }

    /// Returns the closest-parent map of the final pass: for each point the
    /// labelled point it was annexed from, or `None` for region seeds. A
    /// directed forest rooted at the seeds.
    #[must_use]
    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    /// Labels query points by their nearest fitted neighbour.
    ///
    /// This is a lookup against the training exemplars under the fitted
    /// metric, not a model evaluation; ties resolve to the earliest point.
    ///
    /// # Errors
    /// Returns [`IlsError::QueryDimensionMismatch`] when the query dimension
    /// differs from the fitted dataset.
    ///
    /// # Examples
    /// ```
    /// use otoro_core::{IlsBuilder, PointSet};
    ///
    /// let points = PointSet::try_from_rows(&[
    ///     vec![0.0], vec![0.1], vec![0.2],
    ///     vec![10.0], vec![10.1], vec![10.2],
    /// ])?;
    /// let model = IlsBuilder::new().build()?.fit(points)?;
    /// let queries = PointSet::try_from_rows(&[vec![0.05], vec![10.05]])?;
    /// let labels = model.predict(&queries)?;
    /// assert_eq!(labels[0].get(), 1);
    /// assert_eq!(labels[1].get(), 2);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn predict(&self, queries: &PointSet) -> Result<Vec<Label>> {
        if queries.dimension() != self.points.dimension() {
            return Err(IlsError::QueryDimensionMismatch {
                expected: self.points.dimension(),
                found: queries.dimension(),
            });
        }
        Ok((0..queries.len())
            .map(|query| {
                let row = queries.row(query);
                let mut best_distance = f32::INFINITY;
                let mut best_index = 0_usize;
                for index in 0..self.points.len() {
                    let distance = self.metric.distance(self.points.row(index), row);
                    if distance < best_distance {
                        best_distance = distance;
                        best_index = index;
                    }
                }
                self.labels[best_index]
            })
            .collect())
    }
}
