/*!
The trail: assignments, in the order they were made.

The trail records every literal made true, with `level_indices` marking where each decision level begins --- the literal at `assignments[level_indices[d]]` opened level `d + 1`.
A cursor `q_head` marks the next literal to propagate, so the tail of the trail doubles as the propagation queue: between operations `q_head == assignments.len()` exactly when propagation has reached fixpoint.
*/

use crate::{db::LevelIndex, structures::literal::Lit};

#[derive(Default)]
pub struct Trail {
    /// Assignments, in order.
    assignments: Vec<Lit>,

    /// The position in `assignments` at which each decision level begins.
    level_indices: Vec<usize>,

    /// The next assignment to propagate.
    pub q_head: usize,
}

impl Trail {
    /// The current decision level.
    pub fn level(&self) -> LevelIndex {
        self.level_indices.len() as LevelIndex
    }

    /// Opens a fresh decision level at the current end of the trail.
    pub fn new_level(&mut self) {
        self.level_indices.push(self.assignments.len());
    }

    /// Stores an assignment at the current level.
    pub fn push(&mut self, literal: Lit) {
        self.assignments.push(literal);
    }

    /// A count of assignments made.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// The assignment at `position`.
    pub fn assignment(&self, position: usize) -> Lit {
        self.assignments[position]
    }

    /// All assignments, in order.
    pub fn assignments(&self) -> &[Lit] {
        &self.assignments
    }

    /// The position at which `level` begins, or the length of the trail for levels yet to be opened.
    pub fn level_start(&self, level: LevelIndex) -> usize {
        match self.level_indices.get(level as usize) {
            Some(start) => *start,
            None => self.assignments.len(),
        }
    }

    /// The position at which the top level begins, or zero if no level is open.
    pub fn top_level_start(&self) -> usize {
        self.level_indices.last().copied().unwrap_or(0)
    }

    /// True if propagation has consumed every assignment.
    pub fn fixpoint(&self) -> bool {
        self.q_head == self.assignments.len()
    }

    /// Dequeues the next assignment to propagate, if any.
    pub fn next_to_propagate(&mut self) -> Option<Lit> {
        match self.assignments.get(self.q_head) {
            Some(literal) => {
                self.q_head += 1;
                Some(*literal)
            }
            None => None,
        }
    }

    /// Closes the propagation queue, e.g. on a conflict.
    pub fn close_queue(&mut self) {
        self.q_head = self.assignments.len();
    }

    /// Drops all assignments above `level` and returns the propagation cursor to the end of the shortened trail.
    ///
    /// # Soundness
    /// Does not clear the valuation of the dropped assignments.
    pub fn clear_above(&mut self, level: LevelIndex) {
        if let Some(&level_start) = self.level_indices.get(level as usize) {
            self.assignments.truncate(level_start);
            self.level_indices.truncate(level as usize);
            self.q_head = level_start;
        }
    }

    /// Removes assignments for which `drop` holds, compacting the trail.
    ///
    /// To be used at level zero only, where level indices need no adjustment.
    pub fn retain_level_zero(&mut self, drop: impl Fn(Lit) -> bool) {
        debug_assert!(self.level_indices.is_empty());
        self.assignments.retain(|literal| !drop(*literal));
        self.q_head = self.assignments.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_partition_the_trail() {
        let mut trail = Trail::default();
        trail.push(Lit::positive(0));
        trail.new_level();
        trail.push(Lit::positive(1));
        trail.push(Lit::negative(2));
        trail.new_level();
        trail.push(Lit::positive(3));

        assert_eq!(trail.level(), 2);
        assert_eq!(trail.level_start(0), 1);
        assert_eq!(trail.level_start(1), 3);
        assert_eq!(trail.top_level_start(), 3);

        trail.clear_above(1);
        assert_eq!(trail.level(), 1);
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.q_head, 3);
    }

    #[test]
    fn queue_cursor() {
        let mut trail = Trail::default();
        assert!(trail.fixpoint());
        trail.push(Lit::positive(0));
        assert!(!trail.fixpoint());
        assert_eq!(trail.next_to_propagate(), Some(Lit::positive(0)));
        assert!(trail.fixpoint());
        assert_eq!(trail.next_to_propagate(), None);
    }
}
