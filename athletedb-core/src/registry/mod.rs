//! Admin-managed measurement type registry
//!
//! Descriptors define which measurements exist, how they are recorded
//! (sides, attempts, units, score ranges) and how recorded values are
//! validated. A fixed built-in set can be reseeded at any time without
//! disturbing custom descriptors.

mod defaults;
mod store;
mod types;

pub use defaults::builtin_defaults;
pub use store::MeasurementTypeStore;
pub use types::{
    AttemptPolicy, Category, Directionality, MeasurementType, MeasurementTypeDraft,
    MeasurementTypeUpdate, TypeFilter, ValueFamily, ValueKind,
};
