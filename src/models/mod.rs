pub mod candidate;
pub mod generation_result;

pub use candidate::{Candidate, NodeId, ScannedNode};
pub use generation_result::{GenerationResult, REFUSAL_PREFIXES};
