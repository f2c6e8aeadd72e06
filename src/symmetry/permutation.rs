/*!
Permutations over atoms.

A permutation is stored as an image for each atom together with its *support* --- the atoms not mapped to themselves.
Images are literals: a permutation may map an atom to the complement of an atom (a phase shift), in which case the image of the positive literal is negative.

Permutations arrive in one of two forms:

- As a [cycle decomposition](Permutation::from_cycles), in which case the generator is normalized first: each cycle is rotated to start at its smallest literal, a cycle starting with a negative literal is negated, cycles are sorted by their leading literal, and duplicate cycles are discarded.
- As a [list of pairs](Permutation::from_pairs), the form taken by permutation files, where each pair names that the variable with the smaller absolute value maps to the variable with the larger absolute value, signs indicating phase.

Either way, the support is kept sorted ascending --- symmetry-breaking predicates rely on the order.
*/

use crate::structures::{atom::Atom, literal::Lit};

/// A permutation: an image for each atom, the identity outside the support.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    /// The image of (the positive literal of) each atom.
    image: Vec<Lit>,

    /// The atoms not mapped to themselves, ascending.
    support: Vec<Atom>,
}

impl Permutation {
    /// The identity permutation over `atoms` atoms.
    pub fn identity(atoms: Atom) -> Self {
        Permutation {
            image: (0..atoms).map(Lit::positive).collect(),
            support: Vec::default(),
        }
    }

    /// A permutation from mappings `atom → image`, e.g. as read from a permutation file.
    ///
    /// Every source is an atom: a mapping of a negative literal is recorded for the atom with the image negated, as the two forms are semantically the same.
    pub fn from_mappings(mappings: &[(Lit, Lit)], atoms: Atom) -> Self {
        let mut permutation = Permutation::identity(atoms);

        for (from, to) in mappings {
            let (from, to) = match from.polarity() {
                true => (*from, *to),
                false => (!*from, !*to),
            };
            // Mappings beyond the expected atoms extend the table; whether such atoms are
            // meaningful is for the installer to decide.
            while permutation.image.len() <= from.atom() as usize {
                permutation.image.push(Lit::positive(permutation.image.len() as Atom));
            }
            permutation.image[from.atom() as usize] = to;
            permutation.support.push(from.atom());
        }

        permutation.support.sort_unstable();
        permutation.support.dedup();
        permutation
    }

    /// A permutation from a list of signed pairs, the form taken by permutation files.
    ///
    /// Each pair names that the variable with the smaller absolute value maps to the variable with the larger absolute value, signs indicating phase.
    /// Only pairs whose smaller side is positive are recorded: a pair with a negative smaller side is the negation of some recorded pair, and contributes nothing new.
    pub fn from_pairs(pairs: &[(i32, i32)], atoms: Atom) -> Self {
        let mut mappings = Vec::with_capacity(pairs.len());

        for (a, b) in pairs {
            let (small, large) = match a.unsigned_abs() <= b.unsigned_abs() {
                true => (*a, *b),
                false => (*b, *a),
            };
            if small > 0 {
                mappings.push((Lit::from_dimacs(small), Lit::from_dimacs(large)));
            }
        }

        Permutation::from_mappings(&mappings, atoms)
    }

    /// A permutation from a cycle decomposition, normalized.
    ///
    /// Each cycle is rotated to start at its smallest literal and negated if that literal is negative; cycles are then sorted by their leading literal and duplicates discarded.
    pub fn from_cycles(mut cycles: Vec<Vec<Lit>>, atoms: Atom) -> Self {
        for cycle in cycles.iter_mut() {
            debug_assert!(cycle.len() > 1);

            let min = match cycle.iter().enumerate().min_by_key(|(_, l)| **l) {
                Some((index, _)) => index,
                None => continue,
            };
            cycle.rotate_left(min);

            if !cycle[0].polarity() {
                for literal in cycle.iter_mut() {
                    *literal = !*literal;
                }
            }
        }

        cycles.sort_by_key(|cycle| cycle[0]);
        cycles.dedup_by(|current, prev| {
            if current[0] == prev[0] {
                debug_assert_eq!(current, prev);
                true
            } else {
                false
            }
        });

        let mut mappings = Vec::default();
        for cycle in &cycles {
            for (position, literal) in cycle.iter().enumerate() {
                let image = cycle[(position + 1) % cycle.len()];
                mappings.push((*literal, image));
            }
        }

        Permutation::from_mappings(&mappings, atoms)
    }

    /// The image of (the positive literal of) `atom`.
    pub fn image_of(&self, atom: Atom) -> Lit {
        match self.image.get(atom as usize) {
            Some(image) => *image,
            None => Lit::positive(atom),
        }
    }

    /// The image of a literal, the image of the complement being the complement of the image.
    pub fn image_of_lit(&self, literal: Lit) -> Lit {
        match literal.polarity() {
            true => self.image_of(literal.atom()),
            false => !self.image_of(literal.atom()),
        }
    }

    /// The atoms not mapped to themselves, ascending.
    pub fn support(&self) -> &[Atom] {
        &self.support
    }

    /// A count of the atoms moved.
    pub fn support_size(&self) -> usize {
        self.support.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(int: i32) -> Lit {
        Lit::from_dimacs(int)
    }

    #[test]
    fn cycle_normalization_rotates_to_the_smallest_literal() {
        let a = Permutation::from_cycles(vec![vec![lit(3), lit(1), lit(2)]], 4);
        let b = Permutation::from_cycles(vec![vec![lit(1), lit(2), lit(3)]], 4);

        assert_eq!(a, b);
        assert_eq!(a.image_of_lit(lit(1)), lit(2));
        assert_eq!(a.image_of_lit(lit(2)), lit(3));
        assert_eq!(a.image_of_lit(lit(3)), lit(1));
        assert_eq!(a.support(), &[0, 1, 2]);
    }

    #[test]
    fn cycle_normalization_negates_a_negative_leader() {
        // (-1 -2) is semantically (1 2).
        let negated = Permutation::from_cycles(vec![vec![lit(-1), lit(-2)]], 3);
        let plain = Permutation::from_cycles(vec![vec![lit(1), lit(2)]], 3);
        assert_eq!(negated, plain);
    }

    #[test]
    fn duplicate_cycles_are_discarded() {
        let doubled =
            Permutation::from_cycles(vec![vec![lit(2), lit(1)], vec![lit(1), lit(2)]], 3);
        let single = Permutation::from_cycles(vec![vec![lit(1), lit(2)]], 3);
        assert_eq!(doubled, single);
    }

    #[test]
    fn phase_shift_images() {
        // 1 ↦ -2, so -1 ↦ 2.
        let phase = Permutation::from_cycles(vec![vec![lit(1), lit(-2)]], 3);
        assert_eq!(phase.image_of_lit(lit(1)), lit(-2));
        assert_eq!(phase.image_of_lit(lit(-1)), lit(2));
    }

    #[test]
    fn pairs_keep_the_smaller_side_as_source() {
        let permutation = Permutation::from_pairs(&[(4, 2), (1, -3)], 5);
        assert_eq!(permutation.image_of(1), lit(4));
        assert_eq!(permutation.image_of(0), lit(-3));
        assert_eq!(permutation.support(), &[0, 1]);
    }

    #[test]
    fn negative_smaller_sides_are_skipped() {
        // (-1 -3) is the negation of (1 3), which is expected alongside.
        let permutation = Permutation::from_pairs(&[(1, 3), (-1, -3)], 4);
        assert_eq!(permutation.image_of(0), lit(3));
        assert_eq!(permutation.support(), &[0]);
    }

    #[test]
    fn identity_outside_the_support() {
        let permutation = Permutation::from_pairs(&[(1, 2)], 4);
        assert_eq!(permutation.image_of(2), lit(3));
        assert_eq!(permutation.image_of(3), lit(4));
    }
}
