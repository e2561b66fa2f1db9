pub mod classify;
pub mod due_date;
pub mod error;
pub mod import;
pub mod logging;
pub mod models;
pub mod priority;
pub mod report;
pub mod settings;
pub mod weights;

pub use models::{AssignmentRecord, AssignmentType, PriorityLevel, PriorityResult, ScoredAssignment};
pub use priority::{calculate_priority, rank_assignments, PriorityCalculator};
pub use weights::{PartialWeights, ScoringConfig, WeightConfig};
