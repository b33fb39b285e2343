//! Selection tracker
//!
//! Which scanned candidates the user wants descriptions for. Membership is
//! always a subset of the current candidate ids.

use std::collections::HashSet;

use crate::models::{Candidate, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    universe: HashSet<NodeId>,
    members: HashSet<NodeId>,
}

impl SelectionSet {
    /// Fresh selection for a new scan: every candidate pre-selected.
    pub fn for_candidates(candidates: &[Candidate]) -> Self {
        let universe: HashSet<NodeId> = candidates.iter().map(|c| c.node_id.clone()).collect();
        Self {
            members: universe.clone(),
            universe,
        }
    }

    /// Flip one id. Ids outside the current candidate set are ignored.
    ///
    /// Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: &NodeId) -> bool {
        if !self.universe.contains(id) {
            return false;
        }
        if !self.members.remove(id) {
            self.members.insert(id.clone());
            return true;
        }
        false
    }

    pub fn select_all(&mut self) {
        self.members = self.universe.clone();
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// "Select All" / "Deselect All" button.
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.clear();
        } else {
            self.select_all();
        }
    }

    /// Forget the candidate set entirely.
    pub fn reset(&mut self) {
        self.universe.clear();
        self.members.clear();
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_all_selected(&self) -> bool {
        self.members.len() == self.universe.len()
    }

    /// Indices of selected candidates, in candidate order.
    pub fn selected_indices(&self, candidates: &[Candidate]) -> Vec<usize> {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| self.members.contains(&c.node_id))
            .map(|(i, _)| i)
            .collect()
    }
}
