use orbit_sat::{
    config::Config,
    context::Solver,
    reports::Report,
    structures::literal::Lit,
    symmetry::Permutation,
    types::err::{ErrorKind, SymmetryError},
};

/// Adds the pigeonhole principle clauses over `pigeons * holes` fresh atoms, returning the clauses.
fn pigeonhole(solver: &mut Solver, pigeons: u32, holes: u32) -> Vec<Vec<Lit>> {
    for _ in 0..pigeons * holes {
        solver.fresh_atom();
    }
    let place = |pigeon: u32, hole: u32| Lit::positive(pigeon * holes + hole);

    let mut clauses = Vec::new();
    for pigeon in 0..pigeons {
        clauses.push((0..holes).map(|hole| place(pigeon, hole)).collect());
    }
    for hole in 0..holes {
        for first in 0..pigeons {
            for second in first + 1..pigeons {
                clauses.push(vec![!place(first, hole), !place(second, hole)]);
            }
        }
    }

    for clause in &clauses {
        assert!(solver.add_clause(clause.clone()).is_ok());
    }
    clauses
}

/// The permutation swapping two pigeons across every hole.
fn pigeon_swap(first: u32, second: u32, holes: u32, atoms: u32) -> Permutation {
    let place = |pigeon: u32, hole: u32| Lit::positive(pigeon * holes + hole);
    let cycles = (0..holes)
        .map(|hole| vec![place(first, hole), place(second, hole)])
        .collect();
    Permutation::from_cycles(cycles, atoms)
}

fn chaining_config() -> Config {
    let mut config = Config::default();
    config.symmetry.chaining = true;
    config
}

mod static_breaking {
    use super::*;

    #[test]
    fn chaining_preserves_satisfiability() {
        let mut solver = Solver::from_config(chaining_config());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        let clauses = vec![vec![p, q], vec![!p, !q]];
        for clause in &clauses {
            assert!(solver.add_clause(clause.clone()).is_ok());
        }

        let swap = Permutation::from_cycles(vec![vec![p, q]], 2);
        assert!(solver.install_generator(swap).is_ok());

        assert_eq!(solver.solve(), Report::Satisfiable);
        for clause in &clauses {
            assert!(clause
                .iter()
                .any(|literal| solver.model_value(literal.atom()) == Some(literal.polarity())));
        }
    }

    #[test]
    fn chaining_emits_three_clauses_per_step() {
        let mut solver = Solver::from_config(chaining_config());
        for _ in 0..4 {
            solver.fresh_atom();
        }
        // No clauses, so nothing simplifies the emitted predicates.
        let rotation = Permutation::from_cycles(
            vec![vec![Lit::positive(0), Lit::positive(1), Lit::positive(2), Lit::positive(3)]],
            4,
        );
        assert!(solver.install_generator(rotation).is_ok());

        let statistics = solver.sbp_statistics();
        assert_eq!(statistics.sbp_count, 3 * 4);
        assert_eq!(statistics.plain_count, 0);
    }

    #[test]
    fn shatter_emits_four_clauses_per_step() {
        let mut config = Config::default();
        config.symmetry.shatter = true;
        let mut solver = Solver::from_config(config);
        for _ in 0..4 {
            solver.fresh_atom();
        }
        let swaps = Permutation::from_cycles(
            vec![
                vec![Lit::positive(0), Lit::positive(2)],
                vec![Lit::positive(1), Lit::positive(3)],
            ],
            4,
        );
        assert!(solver.install_generator(swaps).is_ok());

        // One stored clause at the head (the chain unit is enqueued), four per later step.
        let statistics = solver.sbp_statistics();
        assert_eq!(statistics.sbp_count, 1 + 4 * 3);
    }

    #[test]
    fn equality_auxiliaries() {
        let mut config = chaining_config();
        config.symmetry.equality_aux = true;
        let mut solver = Solver::from_config(config);
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        assert!(solver.add_clause(vec![p, q]).is_ok());
        assert!(solver.add_clause(vec![!p, !q]).is_ok());

        let swap = Permutation::from_cycles(vec![vec![p, q]], 2);
        assert!(solver.install_generator(swap).is_ok());

        assert!(solver.sbp_statistics().sbp_count > 0);
        assert_eq!(solver.solve(), Report::Satisfiable);
    }

    #[test]
    fn pigeonhole_with_chaining() {
        let mut solver = Solver::from_config(chaining_config());
        let _ = pigeonhole(&mut solver, 4, 3);

        for pigeon in 0..3 {
            let swap = pigeon_swap(pigeon, pigeon + 1, 3, 12);
            assert!(solver.install_generator(swap).is_ok());
        }

        assert_eq!(solver.solve(), Report::Unsatisfiable);
    }

    #[test]
    fn permuted_models_satisfy_the_formula() {
        let mut solver = Solver::from_config(chaining_config());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());
        let r = Lit::positive(solver.fresh_atom());

        let clauses = vec![vec![p, q, r], vec![!p, !q]];
        for clause in &clauses {
            assert!(solver.add_clause(clause.clone()).is_ok());
        }

        let swap = Permutation::from_cycles(vec![vec![p, q]], 3);
        assert!(solver.install_generator(swap).is_ok());
        assert_eq!(solver.solve(), Report::Satisfiable);

        // Push the model through the generator and check the original clauses again.
        let swap = Permutation::from_cycles(vec![vec![p, q]], 3);
        let mut permuted = vec![None; 3];
        for atom in 0..3 {
            let image = swap.image_of(atom);
            permuted[image.atom() as usize] = solver
                .model_value(atom)
                .map(|value| if image.polarity() { value } else { !value });
        }

        for clause in &clauses {
            assert!(clause
                .iter()
                .any(|literal| permuted[literal.atom() as usize] == Some(literal.polarity())));
        }
    }
}

mod dynamic_breaking {
    use super::*;

    fn dynamic_config() -> Config {
        let mut config = chaining_config();
        config.symmetry.dynamic = true;
        config
    }

    #[test]
    fn dynamic_shatter_is_rejected() {
        let mut config = Config::default();
        config.symmetry.shatter = true;
        config.symmetry.dynamic = true;
        let mut solver = Solver::from_config(config);
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        let swap = Permutation::from_cycles(vec![vec![p, q]], 2);
        assert_eq!(
            solver.install_generator(swap),
            Err(ErrorKind::Symmetry(SymmetryError::UnsupportedMode))
        );
    }

    #[test]
    fn dynamic_chaining_preserves_satisfiability() {
        let mut solver = Solver::from_config(dynamic_config());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        assert!(solver.add_clause(vec![p, q]).is_ok());
        assert!(solver.add_clause(vec![!p, !q]).is_ok());

        let swap = Permutation::from_cycles(vec![vec![p, q]], 2);
        assert!(solver.install_generator(swap).is_ok());

        assert_eq!(solver.solve(), Report::Satisfiable);
    }

    #[test]
    fn pigeonhole_closes_no_slower_with_dynamic_chaining() {
        let mut plain = Solver::from_config(Config::default());
        let _ = pigeonhole(&mut plain, 3, 2);
        assert_eq!(plain.solve(), Report::Unsatisfiable);

        let mut breaking = Solver::from_config(dynamic_config());
        let _ = pigeonhole(&mut breaking, 3, 2);
        let swap = pigeon_swap(0, 1, 2, 6);
        assert!(breaking.install_generator(swap).is_ok());
        assert_eq!(breaking.solve(), Report::Unsatisfiable);

        // Only the head of the chain is emitted up front.
        assert!(breaking.sbp_statistics().sbp_count >= 1);
        assert!(breaking.counters.conflicts <= plain.counters.conflicts);
    }

    #[test]
    fn pigeonhole_with_dynamic_chaining() {
        let mut solver = Solver::from_config(dynamic_config());
        let _ = pigeonhole(&mut solver, 4, 3);

        for pigeon in 0..3 {
            let swap = pigeon_swap(pigeon, pigeon + 1, 3, 12);
            assert!(solver.install_generator(swap).is_ok());
        }

        assert_eq!(solver.solve(), Report::Unsatisfiable);
    }
}
