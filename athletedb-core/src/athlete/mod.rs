//! Athlete records

mod store;
mod types;

pub use store::AthleteStore;
pub use types::{
    Athlete, AthleteDraft, AthleteListResult, AthleteQuery, AthleteSummary, AthleteUpdate,
    LengthUnit, Quantity, WeightUnit,
};
