/*!
Choice of a branch literal.

# Atom

With probability [random_variable_frequency](crate::config::Config::random_variable_frequency) an atom is drawn uniformly from the activity heap; otherwise atoms are popped from the heap until an unassigned decision atom surfaces.

The heap is lazy: atoms are not removed on assignment, so a popped atom may already hold a value and is then discarded.
Removal on assignment would dominate cost; filtering at pop is cheap.

# Polarity

In order of precedence:
- A user-supplied polarity for the atom, if set.
- A coin flip, if [random_polarity](crate::config::Config::random_polarity) is set.
- The value the atom last held (phase saving), `false` for a fresh atom.
*/

use crate::{context::GenericSolver, structures::{atom::Atom, literal::Lit}};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// The next branch literal, or `None` if every decision atom is assigned.
    pub fn pick_branch_literal(&mut self) -> Option<Lit> {
        let mut next: Option<Atom> = None;

        // Random decision.
        let frequency = self.config.random_variable_frequency.value;
        if frequency > 0.0
            && self.rng.random_bool(frequency)
            && self.atom_db.heap_active_count() > 0
        {
            let position = self.rng.random_range(0..self.atom_db.heap_active_count());
            next = self.atom_db.heap_nth(position);
            if let Some(atom) = next {
                if self.atom_db.value_of(atom).is_none() && self.atom_db.is_decision(atom) {
                    self.counters.random_decisions += 1;
                }
            }
        }

        // Activity based decision.
        loop {
            match next {
                Some(atom)
                    if self.atom_db.value_of(atom).is_none()
                        && self.atom_db.is_decision(atom) =>
                {
                    break;
                }
                _ => match self.atom_db.heap_pop_most_active() {
                    None => return None,
                    Some(atom) => next = Some(atom),
                },
            }
        }
        let atom = next?;

        // Choose polarity based on the different polarity modes.
        let polarity = match self.atom_db.user_value(atom) {
            Some(user) => user,
            None => {
                if self.config.random_polarity.value {
                    self.rng.random_bool(0.5)
                } else {
                    self.atom_db.previous_value(atom)
                }
            }
        };

        Some(Lit::new(atom, polarity))
    }
}
