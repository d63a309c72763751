//! Tests for builder validation and API-level error handling.
//!
//! These tests verify:
//! - Builder defaults produce working models
//! - Duplicate parameter detection
//! - Parameter and data validation errors

use dualtree::api::{DualTreeError, Emst, Kde, Nbody};

// ============================================================================
// Defaults
// ============================================================================

/// The default KDE builder runs end to end.
#[test]
fn kde_defaults_run() {
    let data = [0.0, 0.0, 1.0, 0.5, 0.2, 1.1, 2.0, 2.0];
    let result = Kde::<f64>::new()
        .build()
        .unwrap()
        .estimate(&data, 2)
        .unwrap();

    assert_eq!(result.len(), 4);
    for q in 0..4 {
        assert!(result.estimate[q] > 0.0);
        assert!(result.lower[q] <= result.upper[q]);
    }
}

/// The default N-body builder runs end to end.
#[test]
fn nbody_defaults_run() {
    let positions = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let result = Nbody::<f64>::new()
        .build()
        .unwrap()
        .potentials(&positions, 3, None)
        .unwrap();

    assert_eq!(result.len(), 2);
    // Each potential is at least the self-term 1/eps with default eps 0.05.
    for &phi in &result.estimate {
        assert!(phi >= 1.0 / 0.05);
    }
}

// ============================================================================
// Duplicate Parameters
// ============================================================================

/// Setting the same parameter twice fails at build time.
#[test]
fn duplicate_parameter_rejected() {
    let err = Kde::<f64>::new()
        .bandwidth(0.5)
        .bandwidth(0.7)
        .build()
        .unwrap_err();
    match err {
        DualTreeError::InvalidInput(msg) => assert!(msg.contains("bandwidth")),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(Nbody::<f64>::new()
        .softening(0.1)
        .softening(0.2)
        .build()
        .is_err());
    assert!(Emst::new().leaf_size(1).leaf_size(2).build().is_err());
}

/// Fixed and per-reference bandwidths are mutually exclusive.
#[test]
fn conflicting_bandwidth_modes_rejected() {
    let err = Kde::new()
        .bandwidth(0.5)
        .bandwidths(&[0.5, 0.6])
        .build()
        .unwrap_err();
    assert!(matches!(err, DualTreeError::InvalidInput(_)));
}

// ============================================================================
// Parameter Validation
// ============================================================================

#[test]
fn invalid_bandwidth_rejected() {
    assert!(matches!(
        Kde::new().bandwidth(0.0).build().unwrap_err(),
        DualTreeError::InvalidBandwidth(_)
    ));
    assert!(matches!(
        Kde::new().bandwidth(-1.0).build().unwrap_err(),
        DualTreeError::InvalidBandwidth(_)
    ));
    assert!(matches!(
        Kde::new().bandwidths(&[0.5, f64::NAN]).build().unwrap_err(),
        DualTreeError::InvalidBandwidth(_)
    ));
}

#[test]
fn invalid_probability_rejected() {
    for p in [0.0, -0.5, 1.5, f64::NAN] {
        assert!(matches!(
            Kde::new().bandwidth(0.5).probability(p).build().unwrap_err(),
            DualTreeError::InvalidProbability(_)
        ));
    }
    // Exactly one is the deterministic mode and is allowed.
    assert!(Kde::new().bandwidth(0.5).probability(1.0).build().is_ok());
}

#[test]
fn invalid_relative_error_rejected() {
    assert!(matches!(
        Kde::new().relative_error(-0.1).build().unwrap_err(),
        DualTreeError::InvalidRelativeError(_)
    ));
    assert!(matches!(
        Kde::<f64>::new()
            .relative_error(f64::INFINITY)
            .build()
            .unwrap_err(),
        DualTreeError::InvalidRelativeError(_)
    ));
}

#[test]
fn invalid_leaf_size_rejected() {
    assert!(matches!(
        Kde::<f64>::new().leaf_size(0).build().unwrap_err(),
        DualTreeError::InvalidLeafSize(0)
    ));
    assert!(matches!(
        Emst::new().leaf_size(0).build().unwrap_err(),
        DualTreeError::InvalidLeafSize(0)
    ));
}

#[test]
fn invalid_softening_rejected() {
    assert!(matches!(
        Nbody::new().softening(0.0).build().unwrap_err(),
        DualTreeError::InvalidSoftening(_)
    ));
}

#[test]
fn invalid_sample_budget_rejected() {
    let err = Kde::<f64>::new()
        .initial_samples(100)
        .max_samples(50)
        .build()
        .unwrap_err();
    assert!(matches!(err, DualTreeError::InvalidSampleBudget { .. }));
}

// ============================================================================
// Data Validation
// ============================================================================

#[test]
fn empty_input_rejected() {
    let model = Kde::<f64>::new().build().unwrap();
    assert!(matches!(
        model.estimate(&[], 2).unwrap_err(),
        DualTreeError::EmptyInput
    ));
}

#[test]
fn ragged_input_rejected() {
    let model = Kde::<f64>::new().build().unwrap();
    assert!(matches!(
        model.estimate(&[1.0, 2.0, 3.0], 2).unwrap_err(),
        DualTreeError::RaggedInput { len: 3, dim: 2 }
    ));
}

#[test]
fn non_finite_input_rejected() {
    let model = Kde::<f64>::new().build().unwrap();
    assert!(matches!(
        model.estimate(&[1.0, f64::NAN], 2).unwrap_err(),
        DualTreeError::InvalidNumericValue(_)
    ));
}

#[test]
fn mismatched_weights_rejected() {
    let model = Kde::<f64>::new().build().unwrap();
    let err = model
        .estimate_into(&[0.0, 0.0], &[1.0, 1.0, 2.0, 2.0], 2, Some(&[1.0]))
        .unwrap_err();
    assert!(matches!(
        err,
        DualTreeError::MismatchedInputs {
            expected: 2,
            got: 1
        }
    ));
}

#[test]
fn negative_weight_rejected() {
    let model = Kde::<f64>::new().build().unwrap();
    let err = model
        .estimate_into(&[0.0, 0.0], &[1.0, 1.0, 2.0, 2.0], 2, Some(&[1.0, -1.0]))
        .unwrap_err();
    assert!(matches!(err, DualTreeError::InvalidWeight { index: 1, .. }));
}
