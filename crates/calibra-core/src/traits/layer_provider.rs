//! LayerScoreProvider trait.
//!
//! One provider answers for one quality axis. Providers are synchronous and
//! pure from the engine's point of view; anything that waits on external
//! systems happens before the engine is called.

use std::collections::BTreeMap;

use crate::errors::ProviderError;
use crate::types::{ChainChecks, LayerId, LayerValue, PdtStructure};

/// Everything a provider may look at for one calibration.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalibrationContext<'a> {
    /// Question the method is applied to, if any.
    pub question_id: Option<&'a str>,
    /// Document under evaluation, required by the `@u` provider.
    pub document: Option<&'a PdtStructure>,
    /// Data-flow integrity checks, required by the `@chain` provider.
    pub chain_checks: Option<ChainChecks>,
    /// Free-form numeric attributes for external providers.
    pub attributes: Option<&'a BTreeMap<String, f64>>,
}

impl<'a> CalibrationContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_question(mut self, question_id: &'a str) -> Self {
        self.question_id = Some(question_id);
        self
    }

    pub fn with_document(mut self, document: &'a PdtStructure) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_chain_checks(mut self, checks: ChainChecks) -> Self {
        self.chain_checks = Some(checks);
        self
    }

    pub fn with_attributes(mut self, attributes: &'a BTreeMap<String, f64>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Look up a numeric attribute.
    pub fn attribute(&self, key: &str) -> Option<f64> {
        self.attributes.and_then(|a| a.get(key).copied())
    }
}

/// Supplies one scalar for one named quality axis.
pub trait LayerScoreProvider: Send + Sync {
    /// The axis this provider answers for.
    fn layer(&self) -> LayerId;

    /// Score `method_id` on this provider's axis.
    ///
    /// Continuous values must lie in [0, 1]; the scorer rejects anything else
    /// as a fatal precondition violation.
    fn provide(
        &self,
        method_id: &str,
        context: &CalibrationContext<'_>,
    ) -> Result<LayerValue, ProviderError>;
}
