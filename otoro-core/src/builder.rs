//! Builder utilities for configuring ILS instances.
//!
//! Exposes the configuration surface and validation used before
//! constructing [`Ils`] instances.

use std::num::NonZeroUsize;

use crate::{Result, distance::Metric, error::IlsError, ils::Ils};

/// Prominence threshold applied when no target cluster count is configured.
const DEFAULT_SENSITIVITY: f32 = 0.1;

/// Configures and constructs [`Ils`] instances.
///
/// When neither `n_clusters` nor `min_cluster_size` is set, the fit derives
/// a minimum cluster size of 5% of the dataset; with only `n_clusters` set
/// it uses `len / (2 * n_clusters)`.
///
/// # Examples
/// ```
/// use otoro_core::{IlsBuilder, Metric};
///
/// let ils = IlsBuilder::new()
///     .with_n_clusters(2)
///     .with_metric(Metric::Manhattan)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(ils.n_clusters().map(|count| count.get()), Some(2));
/// assert_eq!(ils.metric(), Metric::Manhattan);
/// ```
#[derive(Debug, Clone)]
pub struct IlsBuilder {
    n_clusters: Option<usize>,
    min_cluster_size: Option<usize>,
    metric: Metric,
    sensitivity: f32,
}

impl Default for IlsBuilder {
    fn default() -> Self {
        Self {
            n_clusters: None,
            min_cluster_size: None,
            metric: Metric::Euclidean,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl IlsBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use otoro_core::{IlsBuilder, Metric};
    ///
    /// let builder = IlsBuilder::new();
    /// assert_eq!(builder.n_clusters(), None);
    /// assert_eq!(builder.metric(), Metric::Euclidean);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target number of clusters.
    ///
    /// With a target set, peak selection switches from thresholding to
    /// keeping the `n - 1` most prominent boundaries.
    #[must_use]
    pub fn with_n_clusters(mut self, count: usize) -> Self {
        self.n_clusters = Some(count);
        self
    }

    /// Returns the configured target cluster count, if any.
    #[must_use]
    pub fn n_clusters(&self) -> Option<usize> {
        self.n_clusters
    }

    /// Overrides the minimum cluster size.
    #[must_use]
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = Some(size);
        self
    }

    /// Returns the configured minimum cluster size, if any.
    #[must_use]
    pub fn min_cluster_size(&self) -> Option<usize> {
        self.min_cluster_size
    }

    /// Selects the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the configured metric.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Overrides the prominence threshold used when `n_clusters` is unset.
    ///
    /// # Examples
    /// ```
    /// use otoro_core::IlsBuilder;
    ///
    /// let builder = IlsBuilder::new().with_sensitivity(0.3);
    /// assert_eq!(builder.sensitivity(), 0.3);
    /// ```
    #[must_use]
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Returns the configured sensitivity.
    #[must_use]
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Validates the configuration and constructs an [`Ils`] instance.
    ///
    /// # Errors
    /// Returns [`IlsError::InvalidClusterCount`] or
    /// [`IlsError::InvalidMinClusterSize`] for zero counts and
    /// [`IlsError::InvalidSensitivity`] for a non-finite or non-positive
    /// sensitivity.
    ///
    /// # Examples
    /// ```
    /// use otoro_core::{IlsBuilder, IlsError};
    ///
    /// let err = IlsBuilder::new().with_n_clusters(0).build().unwrap_err();
    /// assert!(matches!(err, IlsError::InvalidClusterCount { got: 0 }));
    /// ```
    pub fn build(self) -> Result<Ils> {
        let n_clusters = self
            .n_clusters
            .map(|count| {
                NonZeroUsize::new(count).ok_or(IlsError::InvalidClusterCount { got: count })
            })
            .transpose()?;
        let min_cluster_size = self
            .min_cluster_size
            .map(|size| {
                NonZeroUsize::new(size).ok_or(IlsError::InvalidMinClusterSize { got: size })
            })
            .transpose()?;
        if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 {
            return Err(IlsError::InvalidSensitivity {
                got: self.sensitivity,
            });
        }

        Ok(Ils::new(
            n_clusters,
            min_cluster_size,
            self.metric,
            self.sensitivity,
        ))
    }
}
