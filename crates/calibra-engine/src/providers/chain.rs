use tracing::debug;

use calibra_core::errors::ProviderError;
use calibra_core::traits::{CalibrationContext, LayerScoreProvider};
use calibra_core::types::{LayerId, LayerValue};

/// `@chain`: conjunction of the five data-flow integrity checks carried on
/// the context. No partial credit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainLayerProvider;

impl LayerScoreProvider for ChainLayerProvider {
    fn layer(&self) -> LayerId {
        LayerId::Chain
    }

    fn provide(
        &self,
        method_id: &str,
        context: &CalibrationContext<'_>,
    ) -> Result<LayerValue, ProviderError> {
        let checks = context.chain_checks.ok_or(ProviderError::MissingContext {
            layer: LayerId::Chain,
            what: "chain checks",
        })?;
        let passed = checks.passed();
        if !passed {
            debug!(method_id, failed = ?checks.failures(), "chain checks failed");
        }
        Ok(LayerValue::Binary(passed))
    }
}
