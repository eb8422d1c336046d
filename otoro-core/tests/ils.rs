//! Tests for the ILS configuration and orchestration API.

use otoro_core::{IlsBuilder, IlsError, Metric, PeakError, PointSet};
use rstest::rstest;

fn two_groups() -> PointSet {
    PointSet::try_from_rows(&[
        vec![0.0],
        vec![0.1],
        vec![0.2],
        vec![10.0],
        vec![10.1],
        vec![10.2],
    ])
    .expect("test data is valid")
}

#[rstest]
fn builder_defaults() {
    let builder = IlsBuilder::new();
    assert_eq!(builder.n_clusters(), None);
    assert_eq!(builder.min_cluster_size(), None);
    assert_eq!(builder.metric(), Metric::Euclidean);
    assert!((builder.sensitivity() - 0.1).abs() < f32::EPSILON);

    let ils = builder.build().expect("defaults are valid");
    assert_eq!(ils.n_clusters(), None);
    assert_eq!(ils.metric(), Metric::Euclidean);
}

#[rstest]
fn builder_rejects_zero_cluster_count() {
    let err = IlsBuilder::new()
        .with_n_clusters(0)
        .build()
        .expect_err("builder must reject zero n_clusters");
    assert!(matches!(err, IlsError::InvalidClusterCount { got: 0 }));
    assert_eq!(err.code().as_str(), "ILS_INVALID_CLUSTER_COUNT");
}

#[rstest]
fn builder_rejects_zero_min_cluster_size() {
    let err = IlsBuilder::new()
        .with_min_cluster_size(0)
        .build()
        .expect_err("builder must reject zero min_cluster_size");
    assert!(matches!(err, IlsError::InvalidMinClusterSize { got: 0 }));
}

#[rstest]
#[case::zero(0.0)]
#[case::negative(-0.5)]
#[case::nan(f32::NAN)]
#[case::infinite(f32::INFINITY)]
fn builder_rejects_degenerate_sensitivity(#[case] sensitivity: f32) {
    let err = IlsBuilder::new()
        .with_sensitivity(sensitivity)
        .build()
        .expect_err("builder must reject non-positive sensitivity");
    assert!(matches!(err, IlsError::InvalidSensitivity { .. }));
}

#[rstest]
fn fit_rejects_single_point_datasets() {
    let points = PointSet::try_from_rows(&[vec![1.0, 2.0]]).expect("one row is a valid set");
    let ils = IlsBuilder::new().build().expect("defaults are valid");
    let err = ils.fit(points).expect_err("one point cannot be spread");
    assert!(matches!(
        err,
        IlsError::TooFewPoints {
            items: 1,
            required: 2
        }
    ));
}

#[rstest]
fn fit_exposes_the_diagnostic_surfaces() {
    let ils = IlsBuilder::new().build().expect("defaults are valid");
    let model = ils.fit(two_groups()).expect("fit must succeed");

    assert_eq!(model.rmin_curve().len(), 5);
    assert!(model.rmin_curve().iter().all(|&distance| distance >= 0.0));

    let mut ordering = model.ordering().to_vec();
    ordering.sort_unstable();
    assert_eq!(ordering, (0..6).collect::<Vec<_>>());

    let seed_count = model
        .parents()
        .iter()
        .filter(|parent| parent.is_none())
        .count();
    assert_eq!(seed_count, model.cluster_count());
    assert_eq!(model.min_cluster_size(), 1);
}

#[rstest]
fn fit_labels_both_groups_distinctly() {
    let ils = IlsBuilder::new()
        .with_n_clusters(2)
        .build()
        .expect("configuration is valid");
    let model = ils.fit(two_groups()).expect("fit must succeed");

    let ids: Vec<u32> = model.labels().iter().map(|label| label.get()).collect();
    assert_eq!(ids, [1, 1, 1, 2, 2, 2]);
    assert_eq!(model.cluster_count(), 2);
}

#[rstest]
fn fit_fails_loudly_when_the_curve_cannot_support_the_target() {
    let ils = IlsBuilder::new()
        .with_n_clusters(3)
        .build()
        .expect("configuration is valid");
    let err = ils
        .fit(two_groups())
        .expect_err("two groups cannot support three clusters");
    assert!(matches!(
        err,
        IlsError::Peaks {
            error: PeakError::InsufficientCandidates {
                requested: 3,
                found: 1
            }
        }
    ));
    assert_eq!(err.code().as_str(), "ILS_PEAK_FAILURE");
}

#[rstest]
fn predict_checks_query_dimensions() {
    let ils = IlsBuilder::new().build().expect("defaults are valid");
    let model = ils.fit(two_groups()).expect("fit must succeed");
    let queries =
        PointSet::try_from_rows(&[vec![0.0, 0.0]]).expect("two-dimensional query is valid");
    let err = model
        .predict(&queries)
        .expect_err("dimension mismatch must fail");
    assert!(matches!(
        err,
        IlsError::QueryDimensionMismatch {
            expected: 1,
            found: 2
        }
    ));
}

#[rstest]
#[case::manhattan(Metric::Manhattan)]
#[case::chebyshev(Metric::Chebyshev)]
fn fit_supports_every_registry_metric(#[case] metric: Metric) {
    let ils = IlsBuilder::new()
        .with_n_clusters(2)
        .with_metric(metric)
        .build()
        .expect("configuration is valid");
    let model = ils.fit(two_groups()).expect("fit must succeed");
    let ids: Vec<u32> = model.labels().iter().map(|label| label.get()).collect();
    assert_eq!(ids, [1, 1, 1, 2, 2, 2]);
}
