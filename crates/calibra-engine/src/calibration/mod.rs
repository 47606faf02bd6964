//! Level A: per-method calibration over the role's required layers.

pub mod calibrator;
pub mod gates;
pub mod request;

pub use calibrator::Calibrator;
pub use request::CalibrationRequest;
