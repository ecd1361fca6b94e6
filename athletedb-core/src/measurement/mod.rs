//! Measurement value shapes, validation and best-of-attempts derivation

mod best;
mod validate;
mod value;

pub use best::compute_best;
pub use validate::validate_value;
pub use value::{MeasurementValue, SideOutcome};
