//! Layer score providers and the registry the calibrator draws from.

pub mod chain;
pub mod registry;
pub mod static_values;
pub mod unit;

pub use chain::ChainLayerProvider;
pub use registry::ProviderRegistry;
pub use static_values::StaticLayerProvider;
pub use unit::UnitLayerProvider;
