use calibra_core::traits::CalibrationContext;
use calibra_core::types::Role;

/// One method to calibrate in a batch.
#[derive(Debug, Clone)]
pub struct CalibrationRequest<'a> {
    pub method_id: String,
    pub role: Role,
    pub context: CalibrationContext<'a>,
}

impl<'a> CalibrationRequest<'a> {
    pub fn new(method_id: impl Into<String>, role: Role, context: CalibrationContext<'a>) -> Self {
        Self {
            method_id: method_id.into(),
            role,
            context,
        }
    }
}
