//! athletedb-core: Core library for AthleteDB
//!
//! This crate provides the storage and domain logic behind the AthleteDB
//! REST API:
//!
//! - **Measurement registry** - [`MeasurementType`] descriptors that drive
//!   form rendering and record validation, with an idempotent built-in
//!   default set
//! - **Measurement values** - [`MeasurementValue`] tagged variants (score,
//!   pass/fail, numeric with attempts) validated against their descriptor,
//!   and [`compute_best`] for best-of-attempts derivation
//! - **Athletes and assessments** - SQLite-backed CRUD with an
//!   application-level cascade from athlete to assessment records
//! - **Aggregation** - [`StatsEngine`] for trends, comparisons and the
//!   dashboard summary
//!
//! Persistence is a single [`SqliteStore`] implementing the per-domain store
//! traits; services and the stats engine take the store as an injected
//! `Arc` so tests can run against `SqliteStore::open_in_memory()`.

pub mod assessment;
pub mod athlete;
pub mod db;
pub mod error;
pub mod measurement;
pub mod registry;
pub mod stats;
pub mod validation;

// Re-export key types for convenience
pub use assessment::{
    Assessment, AssessmentDetail, AssessmentDraft, AssessmentListResult, AssessmentQuery,
    AssessmentService, AssessmentStore, AssessmentSummary, AthleteRef,
};
pub use athlete::{
    Athlete, AthleteDraft, AthleteListResult, AthleteQuery, AthleteStore, AthleteSummary,
    AthleteUpdate, LengthUnit, Quantity, WeightUnit,
};
pub use db::SqliteStore;
pub use error::StoreError;
pub use measurement::{MeasurementValue, SideOutcome, compute_best, validate_value};
pub use registry::{
    AttemptPolicy, Category, Directionality, MeasurementType, MeasurementTypeDraft,
    MeasurementTypeStore, MeasurementTypeUpdate, TypeFilter, ValueKind,
};
pub use stats::{
    AthleteStats, ComparisonRow, DashboardSummary, HistoryPoint, StatsEngine, TrendPoint,
    TrendSample,
};
pub use validation::{FieldError, ValidationErrors};
