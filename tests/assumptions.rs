use orbit_sat::{config::Config, context::Solver, reports::Report, structures::literal::Lit};

mod basic_assumptions {
    use super::*;

    #[test]
    fn contradictory_assumptions() {
        let mut solver = Solver::from_config(Config::default());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        assert!(solver.add_clause(vec![p, q]).is_ok());

        assert_eq!(solver.solve_given(&[p, !p]), Report::Unsatisfiable);

        let conflict = solver.failed_assumptions();
        assert_eq!(conflict.len(), 2);
        assert!(conflict.contains(&p));
        assert!(conflict.contains(&!p));
    }

    #[test]
    fn direct() {
        let mut solver = Solver::from_config(Config::default());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        assert!(solver.add_clause(vec![!p, q]).is_ok());
        assert!(solver.add_clause(vec![!q]).is_ok());

        assert_eq!(solver.solve_given(&[p]), Report::Unsatisfiable);
        assert!(solver.failed_assumptions().contains(&!p));
    }

    #[test]
    fn small_chain() {
        let mut solver = Solver::from_config(Config::default());
        let atoms: Vec<_> = (0..5).map(|_| Lit::positive(solver.fresh_atom())).collect();

        for window in atoms.windows(2) {
            assert!(solver.add_clause(vec![!window[0], window[1]]).is_ok());
        }
        assert!(solver.add_clause(vec![!atoms[4]]).is_ok());

        assert_eq!(solver.solve_given(&[atoms[0]]), Report::Unsatisfiable);
        assert!(solver.failed_assumptions().contains(&!atoms[0]));
    }

    #[test]
    fn consistent_assumptions() {
        let mut solver = Solver::from_config(Config::default());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        assert!(solver.add_clause(vec![p, q]).is_ok());

        assert_eq!(solver.solve_given(&[!p]), Report::Satisfiable);
        assert_eq!(solver.model_value(p.atom()), Some(false));
        assert_eq!(solver.model_value(q.atom()), Some(true));
    }

    #[test]
    fn usable_after_a_failed_assumption() {
        let mut solver = Solver::from_config(Config::default());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        assert!(solver.add_clause(vec![!p, q]).is_ok());
        assert!(solver.add_clause(vec![!q]).is_ok());

        assert_eq!(solver.solve_given(&[p]), Report::Unsatisfiable);

        // The failure is relative to the assumptions: the formula itself remains satisfiable.
        assert_eq!(solver.solve(), Report::Satisfiable);
        assert_eq!(solver.model_value(p.atom()), Some(false));
    }

    #[test]
    fn assumption_conflicts_are_subsets() {
        let mut solver = Solver::from_config(Config::default());
        let atoms: Vec<_> = (0..4).map(|_| Lit::positive(solver.fresh_atom())).collect();

        // Only the first two assumptions matter to the conflict.
        assert!(solver.add_clause(vec![!atoms[0], !atoms[1]]).is_ok());

        let assumptions = [atoms[0], atoms[1], atoms[2], atoms[3]];
        assert_eq!(solver.solve_given(&assumptions), Report::Unsatisfiable);

        for literal in solver.failed_assumptions() {
            assert!(assumptions.contains(&!*literal));
        }
    }
}
