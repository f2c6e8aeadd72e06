use orbit_sat::{
    builder::ClauseOk,
    config::Config,
    context::Solver,
    reports::Report,
    structures::literal::Lit,
};

mod basic {
    use super::*;

    #[test]
    fn empty_formula() {
        let mut solver = Solver::from_config(Config::default());

        assert_eq!(solver.solve(), Report::Satisfiable);
        assert!(solver.model.is_empty());
    }

    #[test]
    fn empty_clause() {
        let mut solver = Solver::from_config(Config::default());
        let _ = solver.fresh_atom();

        assert!(solver.add_clause(vec![]).is_err());
        assert_eq!(solver.solve(), Report::Unsatisfiable);
        assert!(solver.failed_assumptions().is_empty());
    }

    #[test]
    fn one_literal() {
        let mut solver = Solver::from_config(Config::default());
        let p = solver.fresh_atom();

        assert_eq!(solver.add_clause(vec![Lit::positive(p)]), Ok(ClauseOk::Added));
        assert_eq!(solver.solve(), Report::Satisfiable);
        assert_eq!(solver.model_value(p), Some(true));
    }

    #[test]
    fn contradictory_units() {
        let mut solver = Solver::from_config(Config::default());
        let p = solver.fresh_atom();

        assert!(solver.add_clause(vec![Lit::positive(p)]).is_ok());
        assert!(solver.add_clause(vec![Lit::negative(p)]).is_err());

        assert_eq!(solver.solve(), Report::Unsatisfiable);
        assert!(solver.failed_assumptions().is_empty());
    }

    #[test]
    fn two_atom_conflict() {
        let mut solver = Solver::from_config(Config::default());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        assert!(solver.add_clause(vec![p, q]).is_ok());
        assert!(solver.add_clause(vec![!p, q]).is_ok());
        assert!(solver.add_clause(vec![p, !q]).is_ok());
        assert!(solver.add_clause(vec![!p, !q]).is_ok());

        assert_eq!(solver.solve(), Report::Unsatisfiable);
    }

    #[test]
    fn unit_conjunct() {
        let mut solver = Solver::from_config(Config::default());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        assert!(solver.add_clause(vec![p, q]).is_ok());
        assert!(solver.add_clause(vec![!p]).is_ok());

        assert_eq!(solver.solve(), Report::Satisfiable);
        assert_eq!(solver.model_value(p.atom()), Some(false));
        assert_eq!(solver.model_value(q.atom()), Some(true));
    }

    #[test]
    fn duplicates_and_tautologies() {
        let mut solver = Solver::from_config(Config::default());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        // A duplicated clause is stored with the duplicate literals dropped.
        assert_eq!(solver.add_clause(vec![p, p, q, q]), Ok(ClauseOk::Added));
        let stored = solver.clause_db.originals.last().copied().unwrap();
        assert_eq!(solver.clause_db.arena.length(stored), 2);

        // A tautology is skipped.
        assert_eq!(solver.add_clause(vec![p, !q, !p]), Ok(ClauseOk::Skipped));
        assert_eq!(solver.clause_db.original_count(), 1);
    }

    #[test]
    fn model_satisfies_every_clause() {
        let mut solver = Solver::from_config(Config::default());
        let atoms: Vec<_> = (0..8).map(|_| solver.fresh_atom()).collect();

        let clauses = vec![
            vec![Lit::positive(atoms[0]), Lit::positive(atoms[1]), Lit::negative(atoms[2])],
            vec![Lit::negative(atoms[0]), Lit::positive(atoms[3])],
            vec![Lit::negative(atoms[3]), Lit::positive(atoms[4]), Lit::positive(atoms[5])],
            vec![Lit::negative(atoms[4]), Lit::negative(atoms[5])],
            vec![Lit::positive(atoms[6]), Lit::negative(atoms[7])],
            vec![Lit::negative(atoms[6]), Lit::positive(atoms[7])],
            vec![Lit::positive(atoms[2]), Lit::positive(atoms[5]), Lit::positive(atoms[7])],
        ];
        for clause in &clauses {
            assert!(solver.add_clause(clause.clone()).is_ok());
        }

        assert_eq!(solver.solve(), Report::Satisfiable);

        for clause in &clauses {
            assert!(clause
                .iter()
                .any(|literal| solver.model_value(literal.atom()) == Some(literal.polarity())));
        }
    }

    #[test]
    fn further_clauses_after_a_solve() {
        let mut solver = Solver::from_config(Config::default());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());

        assert!(solver.add_clause(vec![p, q]).is_ok());
        assert_eq!(solver.solve(), Report::Satisfiable);

        assert!(solver.add_clause(vec![!p]).is_ok());
        assert!(solver.add_clause(vec![!q]).is_err());
        assert_eq!(solver.solve(), Report::Unsatisfiable);
    }

    #[test]
    fn watches_cover_attached_clauses() {
        let mut solver = Solver::from_config(Config::default());
        let atoms: Vec<_> = (0..6).map(|_| solver.fresh_atom()).collect();

        for window in atoms.windows(3) {
            let clause = vec![
                Lit::positive(window[0]),
                Lit::negative(window[1]),
                Lit::positive(window[2]),
            ];
            assert!(solver.add_clause(clause).is_ok());
        }
        assert_eq!(solver.solve(), Report::Satisfiable);

        // Each attached clause is watched through its first two literals.
        for clause in &solver.clause_db.originals {
            let zero = solver.clause_db.arena.literal(*clause, 0);
            let one = solver.clause_db.arena.literal(*clause, 1);
            assert!(solver.watch_db.list(!zero).iter().any(|w| w.clause == *clause));
            assert!(solver.watch_db.list(!one).iter().any(|w| w.clause == *clause));
        }
    }

    #[test]
    fn implication_probe() {
        let mut solver = Solver::from_config(Config::default());
        let p = Lit::positive(solver.fresh_atom());
        let q = Lit::positive(solver.fresh_atom());
        let r = Lit::positive(solver.fresh_atom());

        assert!(solver.add_clause(vec![!p, q]).is_ok());
        assert!(solver.add_clause(vec![!q, r]).is_ok());

        let consequences = solver.implies(&[p]).unwrap();
        assert!(consequences.contains(&q));
        assert!(consequences.contains(&r));

        assert!(solver.add_clause(vec![!r]).is_ok());
        assert!(solver.implies(&[p]).is_none());
    }
}
