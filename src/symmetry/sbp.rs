/*!
Emission of symmetry-breaking predicates.

Two encodings of the lex-leader constraint are supported, each chaining fresh auxiliary atoms `p₀, p₁, …` through the support of a permutation.

# Shatter

Following the Shatter tool.
For support `x₁ < x₂ < … < xₙ` with image `f`:
- Initially, `¬x₁ ∨ f(x₁)` and the unit `p₀`.
- At each later position, with `p` the previous chain atom and `p'` fresh:
  `¬p ∨ ¬x_prev ∨ ¬x ∨ f(x)`, then `¬p ∨ ¬x_prev ∨ p'`, then `¬p ∨ f(x_prev) ∨ ¬x ∨ f(x)`, then `¬p ∨ f(x_prev) ∨ p'`.

The two flavours of step clause are emitted in exactly this order --- precedence between them is order-sensitive.

# Chaining

A simpler per-step encoding:
- Initially, `¬x₁ ∨ f(x₁)`, `¬x₁ ∨ p₀`, and `f(x₁) ∨ p₀`.
- At each later position: `¬p ∨ ¬x ∨ f(x)`, `¬p ∨ f(x) ∨ p'`, and `¬p ∨ ¬x ∨ p'`.

# Equality auxiliaries

Either encoding may route through a pair of auxiliary atoms `(eq, eq⁺)` per mapping `x → ℓ`, defined once by the Plaisted–Greenbaum half-definitions actually needed:
`¬eq ∨ ¬x ∨ ℓ`, `ℓ ∨ eq⁺`, and `¬x ∨ eq⁺`.
The step clauses are then expressed over `eq`/`eq⁺` rather than inlined atoms.

# Addition

Every SBP clause goes through the [standard addition path](crate::builder), flagged as an SBP, and is subject to the same unit propagation and contradiction signalling.
*/

use crate::{
    context::GenericSolver,
    misc::log::targets::{self},
    structures::{atom::Atom, literal::Lit},
    symmetry::{PermIndex, Permutation},
    types::err::{ErrorKind, SymmetryError},
};

/// Counts over the symmetry-breaking instrumentation bits of the clause database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SbpStatistics {
    /// A count of SBP clauses held.
    pub sbp_count: usize,

    /// SBP clauses never inspected during propagation.
    pub sbp_never_propagated: usize,

    /// SBP clauses never resolved on during conflict analysis.
    pub sbp_never_resolved: usize,

    /// A count of non-SBP original clauses held.
    pub plain_count: usize,

    /// Non-SBP clauses never inspected during propagation.
    pub plain_never_propagated: usize,

    /// Non-SBP clauses never resolved on during conflict analysis.
    pub plain_never_resolved: usize,
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Installs permutations from the pair lists of a permutation file.
    ///
    /// `declared` is the count the file declares; reading is not bounded by it, and neither is installation.
    pub fn install_generators_from_pairs(
        &mut self,
        declared: usize,
        pair_lists: Vec<Vec<(i32, i32)>>,
    ) -> Result<(), ErrorKind> {
        log::debug!(target: targets::SYMMETRY, "{declared} permutations declared");
        let atoms = self.atom_db.count() as Atom;
        for pairs in pair_lists {
            let permutation = Permutation::from_pairs(&pairs, atoms);
            self.install_generator(permutation)?;
        }
        Ok(())
    }

    /// Installs a permutation, emitting symmetry-breaking predicates according to the configured mode.
    ///
    /// An `Err` is returned when the requested mode combination is unsupported, the permutation moves atoms the solver has not seen, or the formula became unsatisfiable during emission.
    pub fn install_generator(&mut self, permutation: Permutation) -> Result<(), ErrorKind> {
        if !self.ok {
            return Err(ErrorKind::FundamentalConflict);
        }

        let modes = self.symmetry.config;
        if modes.dynamic && modes.shatter {
            // Dynamic injection is only implemented for the chaining encoding.
            return Err(ErrorKind::from(SymmetryError::UnsupportedMode));
        }

        if permutation.support().is_empty() {
            log::warn!(target: targets::SYMMETRY, "An identity generator was skipped");
            return Ok(());
        }

        for atom in permutation.support() {
            let known = (*atom as usize) < self.atom_db.count()
                && (permutation.image_of(*atom).atom() as usize) < self.atom_db.count();
            if !known {
                return Err(ErrorKind::from(SymmetryError::UnknownAtom));
            }
        }

        // Atoms present before any generator are the atoms subject to symmetry.
        self.symmetry.fix_original_atoms(self.atom_db.count() as Atom);
        let perm_index = self.symmetry.permutations.len();

        if modes.equality_aux || modes.dynamic {
            for atom in permutation.support() {
                let image = permutation.image_of(*atom);
                self.symmetry.ensure_eq(*atom, image);
            }
        }

        if modes.dynamic && modes.chaining {
            // The permutation, its watches, and its chain cursor are in place before any
            // clause is emitted: unit propagation from the head clauses may re-enter the
            // dynamic layer for this permutation.
            self.init_eq_watches(&permutation, perm_index)?;
            let head = permutation.support()[0];
            let head_image = permutation.image_of(head);
            let support_size = permutation.support_size();

            let chain_head = self.fresh_symmetry_atom();
            self.symmetry.chain_cursor.push(Some(chain_head));
            self.symmetry.permutations.push(permutation);

            self.emit_init_chaining_clauses(head, head_image, chain_head)?;

            log::info!(target: targets::SYMMETRY,
                "Installed a dynamic generator over {support_size} atoms");
            return Ok(());
        }

        if modes.shatter {
            self.add_all_shatter_sbps(&permutation)?;
        } else if modes.chaining {
            self.add_all_chaining_sbps(&permutation)?;
        }
        self.symmetry.chain_cursor.push(None);

        log::info!(target: targets::SYMMETRY,
            "Installed a generator over {} atoms", permutation.support_size());
        self.symmetry.permutations.push(permutation);
        Ok(())
    }

    /// A fresh auxiliary atom for the symmetry encodings.
    ///
    /// Whether the atom joins the decision heap follows the `aux_decide` switch.
    pub(crate) fn fresh_symmetry_atom(&mut self) -> Atom {
        let decide = self.symmetry.config.aux_decide;
        match self.new_atom(None, decide) {
            Ok(atom) => atom,
            Err(_) => panic!("! The atom limit has been reached"),
        }
    }

    // The Shatter encoding.

    fn add_all_shatter_sbps(&mut self, permutation: &Permutation) -> Result<(), ErrorKind> {
        let support = permutation.support();
        let mut chain =
            self.add_init_shatter_sbp(support[0], permutation.image_of(support[0]))?;

        for window in support.windows(2) {
            let (previous, current) = (window[0], window[1]);
            chain = self.add_shatter_sbp(
                previous,
                permutation.image_of(previous),
                current,
                permutation.image_of(current),
                chain,
            )?;
        }
        Ok(())
    }

    fn add_init_shatter_sbp(&mut self, head: Atom, image: Lit) -> Result<Atom, ErrorKind> {
        let chain_head = self.fresh_symmetry_atom();

        if self.symmetry.config.equality_aux {
            let (eq, _) = self.ensure_eq_aux_atoms(head, image)?;
            self.add_clause_inner(vec![Lit::positive(eq)], true)?;
            self.add_clause_inner(vec![Lit::positive(chain_head)], true)?;
        } else {
            self.add_clause_inner(vec![Lit::negative(head), image], true)?;
            self.add_clause_inner(vec![Lit::positive(chain_head)], true)?;
        }

        Ok(chain_head)
    }

    fn add_shatter_sbp(
        &mut self,
        previous: Atom,
        previous_image: Lit,
        current: Atom,
        current_image: Lit,
        chain: Atom,
    ) -> Result<Atom, ErrorKind> {
        let next = self.fresh_symmetry_atom();
        let not_chain = Lit::negative(chain);

        if self.symmetry.config.equality_aux {
            let (_, previous_ordered) = self.ensure_eq_aux_atoms(previous, previous_image)?;
            let (current_eq, _) = self.ensure_eq_aux_atoms(current, current_image)?;

            self.add_clause_inner(
                vec![not_chain, Lit::negative(previous_ordered), Lit::positive(current_eq)],
                true,
            )?;
            self.add_clause_inner(
                vec![not_chain, Lit::negative(previous_ordered), Lit::positive(next)],
                true,
            )?;
        } else {
            self.add_clause_inner(
                vec![not_chain, Lit::negative(previous), Lit::negative(current), current_image],
                true,
            )?;
            self.add_clause_inner(
                vec![not_chain, Lit::negative(previous), Lit::positive(next)],
                true,
            )?;
            self.add_clause_inner(
                vec![not_chain, previous_image, Lit::negative(current), current_image],
                true,
            )?;
            self.add_clause_inner(vec![not_chain, previous_image, Lit::positive(next)], true)?;
        }

        Ok(next)
    }

    // The chaining encoding.

    fn add_all_chaining_sbps(&mut self, permutation: &Permutation) -> Result<(), ErrorKind> {
        let support = permutation.support();
        let mut chain =
            self.add_init_chaining_sbp(support[0], permutation.image_of(support[0]))?;

        for atom in &support[1..] {
            chain = self.add_chaining_sbp(*atom, permutation.image_of(*atom), chain)?;
        }
        Ok(())
    }

    fn add_init_chaining_sbp(&mut self, head: Atom, image: Lit) -> Result<Atom, ErrorKind> {
        let chain_head = self.fresh_symmetry_atom();
        self.emit_init_chaining_clauses(head, image, chain_head)?;
        Ok(chain_head)
    }

    fn emit_init_chaining_clauses(
        &mut self,
        head: Atom,
        image: Lit,
        chain_head: Atom,
    ) -> Result<(), ErrorKind> {
        if self.symmetry.config.equality_aux {
            let (eq, ordered) = self.ensure_eq_aux_atoms(head, image)?;
            self.add_clause_inner(vec![Lit::positive(eq)], true)?;
            self.add_clause_inner(
                vec![Lit::negative(ordered), Lit::positive(chain_head)],
                true,
            )?;
        } else {
            self.add_clause_inner(vec![Lit::negative(head), image], true)?;
            self.add_clause_inner(vec![Lit::negative(head), Lit::positive(chain_head)], true)?;
            self.add_clause_inner(vec![image, Lit::positive(chain_head)], true)?;
        }

        Ok(())
    }

    pub(crate) fn add_chaining_sbp(
        &mut self,
        atom: Atom,
        image: Lit,
        chain: Atom,
    ) -> Result<Atom, ErrorKind> {
        let next = self.fresh_symmetry_atom();
        let not_chain = Lit::negative(chain);

        if self.symmetry.config.equality_aux {
            let (eq, ordered) = self.ensure_eq_aux_atoms(atom, image)?;
            self.add_clause_inner(vec![not_chain, Lit::positive(eq)], true)?;
            self.add_clause_inner(
                vec![not_chain, Lit::negative(ordered), Lit::positive(next)],
                true,
            )?;
        } else {
            self.add_clause_inner(vec![not_chain, Lit::negative(atom), image], true)?;
            self.add_clause_inner(vec![not_chain, image, Lit::positive(next)], true)?;
            self.add_clause_inner(
                vec![not_chain, Lit::negative(atom), Lit::positive(next)],
                true,
            )?;
        }

        Ok(next)
    }

    // Equality auxiliaries.

    /// The auxiliary atom pair for the mapping `atom → image`, with the defining clauses added on first use.
    fn ensure_eq_aux_atoms(&mut self, atom: Atom, image: Lit) -> Result<(Atom, Atom), ErrorKind> {
        let index = match self.symmetry.find_eq(atom, image) {
            Some(index) => index,
            None => return Err(ErrorKind::from(SymmetryError::MissingEquality)),
        };

        if let Some(aux) = self.symmetry.eq(index).aux {
            return Ok(aux);
        }

        let eq = self.fresh_symmetry_atom();
        self.add_clause_inner(
            vec![Lit::negative(eq), Lit::negative(atom), image],
            true,
        )?;

        let ordered = self.fresh_symmetry_atom();
        self.add_clause_inner(vec![image, Lit::positive(ordered)], true)?;
        self.add_clause_inner(vec![Lit::negative(atom), Lit::positive(ordered)], true)?;

        let entry = self.symmetry.eq_mut(index);
        entry.def_added = true;
        entry.aux = Some((eq, ordered));

        Ok((eq, ordered))
    }

    /// Links the equality chain of a permutation and sets the initial watch at its head.
    fn init_eq_watches(
        &mut self,
        permutation: &Permutation,
        perm_index: PermIndex,
    ) -> Result<(), ErrorKind> {
        let support = permutation.support();

        let head = match self.symmetry.find_eq(support[0], permutation.image_of(support[0])) {
            Some(index) => index,
            None => return Err(ErrorKind::from(SymmetryError::MissingEquality)),
        };
        self.symmetry.watch_eq(head, perm_index);

        let mut previous = head;
        for atom in &support[1..] {
            let current = match self.symmetry.find_eq(*atom, permutation.image_of(*atom)) {
                Some(index) => index,
                None => return Err(ErrorKind::from(SymmetryError::MissingEquality)),
            };
            self.symmetry.chain(perm_index, previous, current);
            previous = current;
        }

        Ok(())
    }

    /// Counts over the symmetry-breaking instrumentation bits of the original clauses.
    pub fn sbp_statistics(&self) -> SbpStatistics {
        let mut statistics = SbpStatistics::default();

        for clause in &self.clause_db.originals {
            let clause = *clause;
            if self.clause_db.arena.is_sbp(clause) {
                statistics.sbp_count += 1;
                if !self.clause_db.arena.propagated(clause) {
                    statistics.sbp_never_propagated += 1;
                }
                if !self.clause_db.arena.in_resolution(clause) {
                    statistics.sbp_never_resolved += 1;
                }
            } else {
                statistics.plain_count += 1;
                if !self.clause_db.arena.propagated(clause) {
                    statistics.plain_never_propagated += 1;
                }
                if !self.clause_db.arena.in_resolution(clause) {
                    statistics.plain_never_resolved += 1;
                }
            }
        }

        statistics
    }
}
