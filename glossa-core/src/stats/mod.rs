//! Frequency, lift and context statistics.

pub mod context;
pub mod frequency;
pub mod lift;
pub mod patterns;

pub use frequency::FrequencyTable;
pub use lift::{lift_ratio, LiftEngine, LiftRow, LiftTable, Observations};
pub use patterns::{GrammarCoverage, RelationEdge, RolePatterns};
