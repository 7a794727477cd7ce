mod common;

use common::synthetic_data::{blobs, column, six_points};
use extended_em::{
    EmError, EmParams, ExtendedEm, FitState, FittedModel, Initialization, Instance,
};

fn assert_invariants(fitted: &FittedModel, floor: f64) {
    let priors = fitted.cluster_priors();
    let total: f64 = priors.iter().sum();
    assert!((total - 1.0).abs() < 1e-9, "priors sum to {total}");

    let resp = fitted.responsibilities();
    for l in 0..resp.nrows() {
        let row_sum: f64 = resp.row(l).iter().sum();
        assert!((row_sum - 1.0).abs() < 1e-9, "row {l} sums to {row_sum}");
    }

    for s in fitted.std_devs().iter() {
        assert!(s.is_finite() && *s > 0.0 && *s >= floor, "bad std dev {s}");
    }
}

#[test]
fn six_point_column_splits_into_two_groups() {
    let _ = env_logger::builder().is_test(true).try_init();
    let data = six_points();
    let init = Initialization::centers(
        vec![Instance::numeric(&[1.5]), Instance::numeric(&[8.5])],
        vec![3.0, 3.0],
    );
    let params = EmParams {
        max_iterations: 50,
        ..EmParams::with_clusters(2)
    };
    let fitted = ExtendedEm::new(params).fit(&data, &init).expect("fit succeeds");

    assert!(fitted.converged(), "expected convergence before the cap");
    assert!(fitted.iterations() < 50);
    assert_eq!(fitted.report().state, FitState::Converged);
    assert!(fitted.report().restarts.is_empty());

    let means = fitted.means();
    assert!((means[(0, 0)] - 4.0 / 3.0).abs() < 1e-2, "mean0={}", means[(0, 0)]);
    assert!((means[(1, 0)] - 26.0 / 3.0).abs() < 1e-2, "mean1={}", means[(1, 0)]);
    let priors = fitted.cluster_priors();
    assert!((priors[0] - 0.5).abs() < 1e-3, "priors={priors:?}");
    assert!((priors[1] - 0.5).abs() < 1e-3, "priors={priors:?}");
    assert_invariants(&fitted, 1e-6);

    assert_eq!(fitted.assignments(), vec![0, 0, 0, 1, 1, 1]);
    assert_eq!(
        fitted
            .cluster_for_instance(&Instance::numeric(&[7.5]))
            .expect("posterior"),
        1
    );
    let dist = fitted
        .distribution_for_instance(&Instance::numeric(&[1.2]))
        .expect("posterior");
    assert!(dist[0] > 0.99);
    let density = fitted
        .log_density_for_instance(&Instance::numeric(&[1.2]))
        .expect("density");
    assert!(density.is_finite());
}

#[test]
fn log_likelihood_does_not_regress_between_rounds() {
    let data = blobs(&[[0.0, 0.0], [6.0, 1.0], [2.0, 8.0]], 30, 1.0, Some(7), 11);
    let params = EmParams {
        max_iterations: 200,
        ..EmParams::with_clusters(3)
    };
    let fitted = ExtendedEm::new(params)
        .fit(&data, &Initialization::RandomRows)
        .expect("fit succeeds");
    assert_eq!(fitted.num_clusters(), 3);
    assert!(
        fitted.report().max_regression() <= 1e-6,
        "log-likelihood regressed by {}",
        fitted.report().max_regression()
    );
    assert_invariants(&fitted, 1e-6);
    let trace = &fitted.report().iterations;
    assert!(trace[0].gain.is_none());
    assert!(trace.iter().skip(1).all(|r| r.gain.is_some()));
}

#[test]
fn random_row_initialization_is_reproducible() {
    let data = blobs(&[[0.0, 0.0], [10.0, 10.0]], 20, 1.0, None, 5);
    let params = EmParams {
        seed: 42,
        ..EmParams::with_clusters(2)
    };
    let a = ExtendedEm::new(params.clone())
        .fit(&data, &Initialization::RandomRows)
        .expect("fit a");
    let b = ExtendedEm::new(params)
        .fit(&data, &Initialization::RandomRows)
        .expect("fit b");
    assert_eq!(a.means(), b.means());
    assert_eq!(a.cluster_priors(), b.cluster_priors());
    assert_eq!(a.iterations(), b.iterations());
}

#[test]
fn parallel_e_step_matches_sequential_fit() {
    let data = blobs(&[[0.0, 0.0], [5.0, 5.0]], 40, 1.5, Some(5), 3);
    let init = Initialization::centers(
        vec![Instance::numeric(&[0.0, 0.0]), Instance::numeric(&[5.0, 5.0])],
        vec![1.0, 1.0],
    );
    let serial = ExtendedEm::new(EmParams::with_clusters(2))
        .fit(&data, &init)
        .expect("serial fit");
    let parallel = ExtendedEm::new(EmParams {
        parallel: true,
        ..EmParams::with_clusters(2)
    })
    .fit(&data, &init)
    .expect("parallel fit");
    for (a, b) in serial.means().iter().zip(parallel.means().iter()) {
        assert!((a - b).abs() < 1e-6, "serial={a} parallel={b}");
    }
}

#[test]
fn missing_cells_do_not_bias_their_attribute() {
    let data = blobs(&[[0.0, 0.0], [20.0, 20.0]], 25, 1.0, Some(3), 9);
    let init = Initialization::centers(
        vec![Instance::numeric(&[0.0, 0.0]), Instance::numeric(&[20.0, 20.0])],
        vec![1.0, 1.0],
    );
    let fitted = ExtendedEm::new(EmParams::with_clusters(2))
        .fit(&data, &init)
        .expect("fit succeeds");
    let means = fitted.means();
    assert!(means[(0, 1)].abs() < 1.0, "y mean of blob 0: {}", means[(0, 1)]);
    assert!((means[(1, 1)] - 20.0).abs() < 1.0, "y mean of blob 1: {}", means[(1, 1)]);
    let weights = fitted.model().weight_sums();
    assert!(weights[(0, 1)] < weights[(0, 0)], "missing y cells carry no weight");
    assert_invariants(&fitted, 1e-6);
}

#[test]
fn argument_errors_abort_immediately() {
    let data = six_points();
    let one_center = Initialization::centers(vec![Instance::numeric(&[1.0])], vec![1.0]);

    let err = ExtendedEm::new(EmParams::with_clusters(0))
        .fit(&data, &one_center)
        .expect_err("zero clusters");
    assert!(matches!(err, EmError::InvalidArgument(_)));

    let err = ExtendedEm::new(EmParams::with_clusters(2))
        .fit(&data, &one_center)
        .expect_err("center count mismatch");
    assert!(matches!(err, EmError::InvalidArgument(_)));

    let zero_sizes = Initialization::centers(
        vec![Instance::numeric(&[1.0]), Instance::numeric(&[9.0])],
        vec![0.0, 0.0],
    );
    let err = ExtendedEm::new(EmParams::with_clusters(2))
        .fit(&data, &zero_sizes)
        .expect_err("zero sizes");
    assert!(matches!(err, EmError::InvalidArgument(_)));

    let err = ExtendedEm::new(EmParams::with_clusters(1))
        .fit(&column(&[]), &Initialization::RandomRows)
        .expect_err("empty dataset");
    assert!(matches!(err, EmError::InvalidArgument(_)));

    let err = ExtendedEm::new(EmParams {
        min_std_dev_per_attribute: Some(vec![1e-3, 1e-3]),
        ..EmParams::with_clusters(1)
    })
    .fit(&data, &Initialization::RandomRows)
    .expect_err("floor arity");
    assert!(matches!(err, EmError::InvalidArgument(_)));
}

#[test]
fn iteration_cap_stops_an_unconverged_fit() {
    let data = blobs(&[[0.0, 0.0], [3.0, 3.0]], 30, 2.0, None, 17);
    let params = EmParams {
        max_iterations: 2,
        ..EmParams::with_clusters(2)
    };
    let fitted = ExtendedEm::new(params)
        .fit(&data, &Initialization::RandomRows)
        .expect("fit succeeds");
    assert_eq!(fitted.iterations(), 2);
    assert!(!fitted.converged());
    assert_eq!(fitted.report().state, FitState::Converged);
}

#[test]
fn extra_centers_beyond_k_are_ignored() {
    let init = Initialization::centers(
        vec![
            Instance::numeric(&[1.5]),
            Instance::numeric(&[8.5]),
            Instance::numeric(&[5.0]),
        ],
        vec![3.0, 3.0, 1.0],
    );
    let fitted = ExtendedEm::new(EmParams::with_clusters(2))
        .fit(&six_points(), &init)
        .expect("fit succeeds");
    assert_eq!(fitted.num_clusters(), 2);
    assert_eq!(fitted.priors().len(), 2);
    assert_eq!(fitted.assignments(), vec![0, 0, 0, 1, 1, 1]);
}
