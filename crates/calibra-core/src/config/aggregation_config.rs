//! Level B (aggregation pyramid) configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{CLUSTER_COUNT, POLICY_AREA_COUNT};
use crate::errors::ConfigError;
use crate::types::{ClusterId, Dimension, FusionWeights, PolicyArea, Slot, WeightsSpec};

/// One pyramid stage: optional weight override plus optional hard gate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub weights: Option<WeightsSpec>,
    /// A node with any child below this is gated to 0.0.
    pub hard_gate_min: Option<f64>,
}

/// Stage 3 settings: membership and one weight table per cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterStageConfig {
    /// `CL01 = ["PA02", "PA03", "PA07"]`. Empty means the default partition.
    pub membership: BTreeMap<String, Vec<String>>,
    /// Per-cluster weights keyed by cluster id; absent clusters weigh members equally.
    pub weights: BTreeMap<String, WeightsSpec>,
    pub hard_gate_min: Option<f64>,
}

/// One adaptive-penalty band. `cv_max` is exclusive; the last band has none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyBand {
    pub cv_max: Option<f64>,
    pub factor: f64,
}

impl PenaltyBand {
    pub fn below(cv_max: f64, factor: f64) -> Self {
        Self {
            cv_max: Some(cv_max),
            factor,
        }
    }

    pub fn open(factor: f64) -> Self {
        Self {
            cv_max: None,
            factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub dimension: StageConfig,
    pub area: StageConfig,
    pub cluster: ClusterStageConfig,
    #[serde(rename = "macro")]
    pub synthesis: StageConfig,
    pub penalty_bands: Vec<PenaltyBand>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            dimension: StageConfig::default(),
            area: StageConfig::default(),
            cluster: ClusterStageConfig::default(),
            synthesis: StageConfig::default(),
            penalty_bands: default_penalty_bands(),
        }
    }
}

fn default_penalty_bands() -> Vec<PenaltyBand> {
    vec![
        PenaltyBand::below(0.20, 1.00),
        PenaltyBand::below(0.40, 0.95),
        PenaltyBand::below(0.60, 0.85),
        PenaltyBand::open(0.70),
    ]
}

/// Validated, ascending penalty bands ending in an open band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenaltyBands(Vec<PenaltyBand>);

impl PenaltyBands {
    pub fn new(bands: Vec<PenaltyBand>) -> Result<Self, ConfigError> {
        const FIELD: &str = "aggregation.penalty_bands";
        let Some((last, bounded)) = bands.split_last() else {
            return Err(ConfigError::validation(FIELD, "at least one band is required"));
        };
        if last.cv_max.is_some() {
            return Err(ConfigError::validation(
                FIELD,
                "the last band must be open-ended (no cv_max)",
            ));
        }
        let mut prev_cv = 0.0;
        let mut prev_factor = 1.0;
        for (i, band) in bands.iter().enumerate() {
            if !band.factor.is_finite() || band.factor <= 0.0 || band.factor > 1.0 {
                return Err(ConfigError::validation(
                    FIELD,
                    format!("band {i}: factor {} outside (0, 1]", band.factor),
                ));
            }
            if band.factor > prev_factor {
                return Err(ConfigError::validation(
                    FIELD,
                    format!("band {i}: factors must not increase with dispersion"),
                ));
            }
            prev_factor = band.factor;
            if i < bounded.len() {
                match band.cv_max {
                    Some(cv) if cv.is_finite() && cv > prev_cv => prev_cv = cv,
                    Some(cv) => {
                        return Err(ConfigError::validation(
                            FIELD,
                            format!("band {i}: cv_max {cv} must be finite and ascending"),
                        ))
                    }
                    None => {
                        return Err(ConfigError::validation(
                            FIELD,
                            format!("band {i}: only the last band may omit cv_max"),
                        ))
                    }
                }
            }
        }
        Ok(Self(bands))
    }

    pub fn bands(&self) -> &[PenaltyBand] {
        &self.0
    }
}

impl Default for PenaltyBands {
    fn default() -> Self {
        Self(default_penalty_bands())
    }
}

/// Validated partition of the ten policy areas into four clusters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterMembership(BTreeMap<ClusterId, SmallVec<[PolicyArea; 3]>>);

impl ClusterMembership {
    pub fn new(clusters: BTreeMap<ClusterId, SmallVec<[PolicyArea; 3]>>) -> Result<Self, ConfigError> {
        const FIELD: &str = "aggregation.cluster.membership";
        if clusters.len() != usize::from(CLUSTER_COUNT) {
            return Err(ConfigError::validation(
                FIELD,
                format!("expected {CLUSTER_COUNT} clusters, got {}", clusters.len()),
            ));
        }
        let mut seen: BTreeMap<PolicyArea, ClusterId> = BTreeMap::new();
        for (cluster, areas) in &clusters {
            if !(2..=3).contains(&areas.len()) {
                return Err(ConfigError::validation(
                    FIELD,
                    format!("{cluster} has {} areas, expected 2 or 3", areas.len()),
                ));
            }
            for area in areas {
                if let Some(owner) = seen.insert(*area, *cluster) {
                    return Err(ConfigError::validation(
                        FIELD,
                        format!("{area} assigned to both {owner} and {cluster}"),
                    ));
                }
            }
        }
        if seen.len() != usize::from(POLICY_AREA_COUNT) {
            let missing: Vec<String> = PolicyArea::all()
                .filter(|a| !seen.contains_key(a))
                .map(|a| a.to_string())
                .collect();
            return Err(ConfigError::validation(
                FIELD,
                format!("areas not assigned to any cluster: {}", missing.join(", ")),
            ));
        }
        Ok(Self(clusters))
    }

    /// Member areas of `cluster`, in configured order.
    pub fn members(&self, cluster: ClusterId) -> &[PolicyArea] {
        self.0.get(&cluster).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn cluster_of(&self, area: PolicyArea) -> Option<ClusterId> {
        self.0
            .iter()
            .find(|(_, areas)| areas.contains(&area))
            .map(|(cluster, _)| *cluster)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClusterId, &[PolicyArea])> {
        self.0.iter().map(|(c, a)| (*c, a.as_slice()))
    }
}

impl Default for ClusterMembership {
    fn default() -> Self {
        let table: [(u8, &[u8]); 4] = [(1, &[2, 3, 7]), (2, &[1, 5, 6]), (3, &[4, 8]), (4, &[9, 10])];
        let mut clusters = BTreeMap::new();
        for (cluster, areas) in table {
            let (Ok(id), members) = (
                ClusterId::new(cluster),
                areas
                    .iter()
                    .filter_map(|a| PolicyArea::new(*a).ok())
                    .collect::<SmallVec<[PolicyArea; 3]>>(),
            ) else {
                continue;
            };
            clusters.insert(id, members);
        }
        Self(clusters)
    }
}

/// One stage after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSettings {
    pub weights: FusionWeights,
    pub hard_gate_min: Option<f64>,
}

/// Stage 3 after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterStageSettings {
    pub membership: ClusterMembership,
    pub weights: BTreeMap<ClusterId, FusionWeights>,
    pub hard_gate_min: Option<f64>,
}

/// Validated pyramid settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAggregation {
    pub dimension: StageSettings,
    pub area: StageSettings,
    pub cluster: ClusterStageSettings,
    pub synthesis: StageSettings,
    pub penalty_bands: PenaltyBands,
}

impl AggregationConfig {
    pub(crate) fn resolve(&self) -> Result<ResolvedAggregation, ConfigError> {
        let slot_keys: Vec<String> = Slot::all().map(|s| s.to_string()).collect();
        let dimension = resolve_stage(
            "aggregation.dimension",
            &self.dimension,
            &slot_keys,
            default_dimension_weights,
            false,
        )?;

        let dim_keys: Vec<String> = Dimension::all().map(|d| d.to_string()).collect();
        let area = resolve_stage(
            "aggregation.area",
            &self.area,
            &dim_keys,
            || WeightsSpec::linear(Dimension::all().map(|d| (d.to_string(), 1.0 / 6.0))),
            true,
        )?;

        let cluster = self.cluster.resolve()?;

        let cluster_keys: Vec<String> = ClusterId::all().map(|c| c.to_string()).collect();
        let synthesis = resolve_stage(
            "aggregation.macro",
            &self.synthesis,
            &cluster_keys,
            || WeightsSpec::linear(ClusterId::all().map(|c| (c.to_string(), 0.25))),
            false,
        )?;

        Ok(ResolvedAggregation {
            dimension,
            area,
            cluster,
            synthesis,
            penalty_bands: PenaltyBands::new(self.penalty_bands.clone())?,
        })
    }
}

impl ClusterStageConfig {
    fn resolve(&self) -> Result<ClusterStageSettings, ConfigError> {
        let membership = if self.membership.is_empty() {
            ClusterMembership::default()
        } else {
            let mut clusters = BTreeMap::new();
            for (cluster_key, areas) in &self.membership {
                let field = format!("aggregation.cluster.membership.{cluster_key}");
                let cluster = cluster_key
                    .parse::<ClusterId>()
                    .map_err(|e| ConfigError::validation(&field, e.to_string()))?;
                let members = areas
                    .iter()
                    .map(|a| a.parse::<PolicyArea>())
                    .collect::<Result<SmallVec<[PolicyArea; 3]>, _>>()
                    .map_err(|e| ConfigError::validation(&field, e.to_string()))?;
                clusters.insert(cluster, members);
            }
            ClusterMembership::new(clusters)?
        };

        for key in self.weights.keys() {
            key.parse::<ClusterId>().map_err(|e| {
                ConfigError::validation(format!("aggregation.cluster.weights.{key}"), e.to_string())
            })?;
        }

        let mut weights = BTreeMap::new();
        for (cluster, areas) in membership.iter() {
            let scope = format!("aggregation.cluster.weights.{cluster}");
            let children: Vec<String> = areas.iter().map(|a| a.to_string()).collect();
            let spec = self
                .weights
                .iter()
                .find(|(k, _)| k.parse::<ClusterId>().ok() == Some(cluster))
                .map(|(_, spec)| spec.clone())
                .unwrap_or_else(|| {
                    let w = 1.0 / children.len() as f64;
                    WeightsSpec::linear(children.iter().map(|c| (c.clone(), w)))
                });
            let fw = FusionWeights::new(spec).map_err(|e| ConfigError::weights(&scope, e))?;
            check_keys(&scope, &fw, &children)?;
            weights.insert(cluster, fw);
        }

        Ok(ClusterStageSettings {
            membership,
            weights,
            hard_gate_min: check_gate_min("aggregation.cluster.hard_gate_min", self.hard_gate_min)?,
        })
    }
}

fn default_dimension_weights() -> WeightsSpec {
    WeightsSpec::linear(Slot::all().map(|s| (s.to_string(), 0.16)))
        .with_interaction("Q1", "Q2", 0.10)
        .with_interaction("Q4", "Q5", 0.10)
}

fn resolve_stage(
    scope: &str,
    stage: &StageConfig,
    children: &[String],
    default: impl FnOnce() -> WeightsSpec,
    linear_only: bool,
) -> Result<StageSettings, ConfigError> {
    let spec = stage.weights.clone().unwrap_or_else(default);
    let weights = if linear_only {
        FusionWeights::new_linear_only(spec)
    } else {
        FusionWeights::new(spec)
    }
    .map_err(|e| ConfigError::weights(format!("{scope}.weights"), e))?;
    check_keys(scope, &weights, children)?;
    Ok(StageSettings {
        weights,
        hard_gate_min: check_gate_min(&format!("{scope}.hard_gate_min"), stage.hard_gate_min)?,
    })
}

fn check_keys(scope: &str, weights: &FusionWeights, children: &[String]) -> Result<(), ConfigError> {
    for key in weights.referenced_keys() {
        if !children.iter().any(|c| c == key) {
            return Err(ConfigError::validation(
                scope,
                format!("weight key {key} is not a child of this stage ({})", children.join(", ")),
            ));
        }
    }
    Ok(())
}

fn check_gate_min(field: &str, value: Option<f64>) -> Result<Option<f64>, ConfigError> {
    match value {
        Some(v) if !v.is_finite() || !(0.0..=1.0).contains(&v) => {
            Err(ConfigError::validation(field, "must lie in [0, 1]"))
        }
        other => Ok(other),
    }
}
