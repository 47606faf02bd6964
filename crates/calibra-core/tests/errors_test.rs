//! Tests for the error types and their codes.

use calibra_core::errors::{
    AggregationError, CalibraErrorCode, CalibrationError, ConfigError, EngineError, FusionError,
    ProviderError,
};
use calibra_core::types::{LayerId, NodeLevel, Role};

#[test]
fn test_cardinality_error_carries_expected_and_observed() {
    let err = AggregationError::Cardinality {
        level: NodeLevel::Dimension,
        expected: 60,
        observed: 59,
    };
    assert_eq!(err.error_code(), "CARDINALITY_VIOLATION");
    let msg = err.to_string();
    assert!(msg.contains("dimension"));
    assert!(msg.contains("60"));
    assert!(msg.contains("59"));
}

#[test]
fn test_coded_string_format() {
    let err = FusionError::MissingKey { key: "@q".into() };
    assert_eq!(
        err.coded_string(),
        "[MISSING_KEY] score for key @q is required by the weights but missing"
    );
}

#[test]
fn test_nested_fusion_error_keeps_inner_code() {
    let err = CalibrationError::Fusion {
        method_id: "m".into(),
        source: FusionError::OutOfRange {
            key: "@b".into(),
            value: 1.5,
        },
    };
    assert_eq!(err.error_code(), "OUT_OF_RANGE");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_engine_error_from_conversions() {
    let err: EngineError = ProviderError::NotRegistered {
        layer: LayerId::Unit,
    }
    .into();
    assert_eq!(err.error_code(), "PROVIDER_ERROR");

    let err: EngineError = CalibrationError::MissingWeights {
        method_id: "m".into(),
        role: Role::Utility,
    }
    .into();
    assert_eq!(err.error_code(), "CONFIG_ERROR");

    let err: EngineError = ConfigError::InvalidWeights {
        scope: "calibration.weights.utility".into(),
        source: FusionError::Empty,
    }
    .into();
    assert_eq!(err.error_code(), "INVALID_WEIGHTS");
    assert!(err.to_string().contains("calibration.weights.utility"));
}

#[test]
fn test_provider_error_reports_layer() {
    let err = ProviderError::MissingContext {
        layer: LayerId::Unit,
        what: "document",
    };
    assert_eq!(err.layer(), LayerId::Unit);
    assert!(err.to_string().contains("@u"));
}
