use calibra_core::errors::ProviderError;
use calibra_core::traits::{CalibrationContext, LayerScoreProvider};
use calibra_core::types::{LayerId, LayerValue};

use crate::unit::UnitEvaluator;

/// `@u`: the unit evaluator's final score for the document on the context.
#[derive(Debug, Clone, Default)]
pub struct UnitLayerProvider {
    evaluator: UnitEvaluator,
}

impl UnitLayerProvider {
    pub fn new(evaluator: UnitEvaluator) -> Self {
        Self { evaluator }
    }
}

impl LayerScoreProvider for UnitLayerProvider {
    fn layer(&self) -> LayerId {
        LayerId::Unit
    }

    fn provide(
        &self,
        _method_id: &str,
        context: &CalibrationContext<'_>,
    ) -> Result<LayerValue, ProviderError> {
        let doc = context.document.ok_or(ProviderError::MissingContext {
            layer: LayerId::Unit,
            what: "document",
        })?;
        Ok(LayerValue::Continuous(self.evaluator.score(doc)))
    }
}
