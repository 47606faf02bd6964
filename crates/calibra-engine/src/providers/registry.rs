use std::collections::BTreeMap;
use std::sync::Arc;

use calibra_core::errors::ProviderError;
use calibra_core::traits::{CalibrationContext, LayerScoreProvider};
use calibra_core::types::{LayerId, LayerValue};

/// One provider per layer. Registering a second provider for a layer
/// replaces the first.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<LayerId, Arc<dyn LayerScoreProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: impl LayerScoreProvider + 'static) -> &mut Self {
        self.providers.insert(provider.layer(), Arc::new(provider));
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, provider: impl LayerScoreProvider + 'static) -> Self {
        self.register(provider);
        self
    }

    pub fn get(&self, layer: LayerId) -> Option<&Arc<dyn LayerScoreProvider>> {
        self.providers.get(&layer)
    }

    pub fn contains(&self, layer: LayerId) -> bool {
        self.providers.contains_key(&layer)
    }

    /// Registered layers in canonical order.
    pub fn layers(&self) -> Vec<LayerId> {
        self.providers.keys().copied().collect()
    }

    /// Ask the provider for `layer`, or fail with `NotRegistered`.
    pub fn provide(
        &self,
        layer: LayerId,
        method_id: &str,
        context: &CalibrationContext<'_>,
    ) -> Result<LayerValue, ProviderError> {
        self.providers
            .get(&layer)
            .ok_or(ProviderError::NotRegistered { layer })?
            .provide(method_id, context)
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("layers", &self.layers())
            .finish()
    }
}
