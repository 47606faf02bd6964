//! Shared constants for the Calibra engine.

/// Calibra version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Allowed deviation of `Σlinear + Σinteraction` from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Default configuration version tag recorded on every produced artifact.
pub const DEFAULT_CONFIG_VERSION: &str = "2024.1";

/// Project config file name looked up by `EngineConfig::load_from_dir`.
pub const CONFIG_FILE_NAME: &str = "calibra.toml";

/// Environment variable read by `init_tracing`.
pub const LOG_ENV_VAR: &str = "CALIBRA_LOG";

// ---- Pyramid cardinalities ----

/// Number of policy areas (PA01..PA10).
pub const POLICY_AREA_COUNT: u8 = 10;

/// Number of analytical dimensions (DIM01..DIM06).
pub const DIMENSION_COUNT: u8 = 6;

/// Number of micro-questions per (area, dimension) cell (Q1..Q5).
pub const SLOT_COUNT: u8 = 5;

/// Number of thematic clusters (CL01..CL04).
pub const CLUSTER_COUNT: u8 = 4;

/// Micro-score leaves expected at the base of the pyramid.
pub const MICRO_NODE_COUNT: usize = 300;

/// Dimension nodes produced by stage 1.
pub const DIMENSION_NODE_COUNT: usize = 60;

/// Area nodes produced by stage 2.
pub const AREA_NODE_COUNT: usize = 10;

/// Cluster nodes produced by stage 3.
pub const CLUSTER_NODE_COUNT: usize = 4;

/// Macro nodes produced by stage 4.
pub const MACRO_NODE_COUNT: usize = 1;

// ---- Classification defaults ----

pub const DEFAULT_EXCELLENT_THRESHOLD: f64 = 0.85;
pub const DEFAULT_GOOD_THRESHOLD: f64 = 0.70;
pub const DEFAULT_ACCEPTABLE_THRESHOLD: f64 = 0.30;

// ---- Layer hard gates ----

/// `@b` below this vetoes the calibration.
pub const DEFAULT_BASE_LAYER_GATE: f64 = 0.3;

/// `@C` below this vetoes the calibration.
pub const DEFAULT_CONTRACT_LAYER_GATE: f64 = 0.5;

// ---- Role layer-set sizes ----

/// Permitted sizes of a role's required layer set.
pub const ALLOWED_LAYER_SET_SIZES: [usize; 4] = [3, 4, 6, 8];
