/*!
Recovery from a conflict.

A backjump is a 'jump' from some (higher) decision level to some previous (lower) decision level.

Typically, a backjump is made from level *l* to level *l - i* because a conflict was found at level *l* and analysis produced a clause which asserts some literal at level *l - i*.
In this case, all assignments above the target level are undone, the atoms of those assignments return to the activity heap, and --- subject to the phase saving configuration --- the value each atom held is saved for future decisions.

Passing a target level at or above the current level is safe: nothing happens.
*/

use crate::{
    context::GenericSolver,
    db::LevelIndex,
    misc::log::targets::{self},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Reverts to the state at the given level, keeping all assignments at the level but none beyond.
    pub fn backjump(&mut self, target: LevelIndex) {
        if self.decision_level() <= target {
            return;
        }
        log::trace!(target: targets::BACKJUMP, "Backjump from {} to {}", self.decision_level(), target);

        let top_start = self.trail.top_level_start();
        for position in (self.trail.level_start(target)..self.trail.len()).rev() {
            let literal = self.trail.assignment(position);
            let atom = literal.atom();

            self.atom_db.clear_value(atom);

            let save = match self.config.phase_saving.value {
                2 => true,
                1 => position > top_start,
                _ => false,
            };
            if save {
                self.atom_db.save_phase(atom, literal.polarity());
            }

            self.atom_db.heap_insert(atom);
        }

        self.trail.clear_above(target);
    }
}
