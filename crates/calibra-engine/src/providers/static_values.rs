use rustc_hash::FxHashMap;

use calibra_core::errors::ProviderError;
use calibra_core::traits::{CalibrationContext, LayerScoreProvider};
use calibra_core::types::{LayerId, LayerValue};

/// Serves values computed outside the engine.
///
/// Lookup order: per-method value, then the context attribute named after
/// the layer key (`"@q"`), then the default.
#[derive(Debug, Clone)]
pub struct StaticLayerProvider {
    layer: LayerId,
    values: FxHashMap<String, f64>,
    default: Option<f64>,
}

impl StaticLayerProvider {
    pub fn new(layer: LayerId) -> Self {
        Self {
            layer,
            values: FxHashMap::default(),
            default: None,
        }
    }

    pub fn with_value(mut self, method_id: impl Into<String>, value: f64) -> Self {
        self.values.insert(method_id.into(), value);
        self
    }

    pub fn with_values<K: Into<String>>(mut self, values: impl IntoIterator<Item = (K, f64)>) -> Self {
        self.values
            .extend(values.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    pub fn with_default(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }
}

impl LayerScoreProvider for StaticLayerProvider {
    fn layer(&self) -> LayerId {
        self.layer
    }

    fn provide(
        &self,
        method_id: &str,
        context: &CalibrationContext<'_>,
    ) -> Result<LayerValue, ProviderError> {
        let value = self
            .values
            .get(method_id)
            .copied()
            .or_else(|| context.attribute(self.layer.key()))
            .or(self.default)
            .ok_or_else(|| ProviderError::UnknownMethod {
                layer: self.layer,
                method_id: method_id.to_string(),
            })?;
        if !self.layer.is_binary() {
            return Ok(LayerValue::Continuous(value));
        }
        // A binary layer has no range check downstream.
        if !(0.0..=1.0).contains(&value) {
            return Err(ProviderError::Failed {
                layer: self.layer,
                message: format!("binary value {value} outside [0, 1]"),
            });
        }
        Ok(LayerValue::Binary(value >= 1.0))
    }
}
