pub mod alt_text_flow;
pub mod state;

pub use alt_text_flow::AltTextFlow;
pub use state::{Phase, WorkflowState};
