pub mod aggregate;
pub mod defaults;
pub mod snapshot;

pub use aggregate::{
    EmissionCategory, MonthlyTrendPoint, ReductionTarget, ScopeOneAggregate, YearOverYearPoint,
};
pub use defaults::default_aggregate;
pub use snapshot::Snapshot;
