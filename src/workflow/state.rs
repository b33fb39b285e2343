//! Workflow state
//!
//! Everything the plugin UI used to keep in component state, in one struct:
//! phase, candidates, selection, status line and the re-apply seen-set.

use std::collections::HashSet;
use std::fmt::{self, Display};

use crate::error::WorkflowError;
use crate::models::{Candidate, NodeId};
use crate::services::applier::ApplySummary;
use crate::services::generator::GenerationSummary;
use crate::services::selection::SelectionSet;

/// Phase of one generation cycle
///
/// `Idle → Scanning → Scanned → Generating → Generated → Applying → Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Scanning,
    Scanned,
    Generating,
    Generated,
    Applying,
}

impl Phase {
    /// Scanning, generating and applying exclude each other.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Scanning | Phase::Generating | Phase::Applying)
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Scanning => "scanning",
            Phase::Scanned => "scanned",
            Phase::Generating => "generating",
            Phase::Generated => "generated",
            Phase::Applying => "applying",
        };
        f.write_str(name)
    }
}

/// Mutable workflow state
#[derive(Debug, Default)]
pub struct WorkflowState {
    pub phase: Phase,
    pub candidates: Vec<Candidate>,
    pub selection: SelectionSet,
    pub status: Option<String>,
    pub error: Option<String>,
    /// Nodes written by re-apply in this session
    pub applied: HashSet<NodeId>,
    pub last_generation: Option<GenerationSummary>,
    pub last_apply: Option<ApplySummary>,
}

impl WorkflowState {
    /// Enter a busy phase.
    ///
    /// `allowed_from` lists the phases the action may start from.
    pub fn begin(
        &mut self,
        next: Phase,
        action: &str,
        allowed_from: &[Phase],
    ) -> Result<(), WorkflowError> {
        if self.phase.is_busy() {
            return Err(WorkflowError::Busy {
                phase: self.phase.to_string(),
            });
        }
        if !allowed_from.contains(&self.phase) {
            return Err(WorkflowError::InvalidTransition {
                action: action.to_string(),
                phase: self.phase.to_string(),
            });
        }
        self.phase = next;
        self.error = None;
        Ok(())
    }

    /// New scan result: replaces candidates and pre-selects all of them.
    pub fn replace_candidates(&mut self, candidates: Vec<Candidate>) {
        self.selection = SelectionSet::for_candidates(&candidates);
        self.candidates = candidates;
    }

    /// Drop candidates and selection together.
    pub fn clear_working_set(&mut self) {
        self.candidates.clear();
        self.selection.reset();
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn has_generated(&self) -> bool {
        self.candidates
            .iter()
            .any(|c| c.generated_description().is_some())
    }
}
