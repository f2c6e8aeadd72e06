/*!
Reading and writing formulas in the DIMACS format.

The reader accepts the conventional layout: comment lines beginning `c`, an optional `p cnf <atoms> <clauses>` problem line, and clauses as whitespace-separated signed integers terminated by `0`.
A `%` line ends the formula, as in the SATLIB benchmark files.

The writer emits the original clauses not yet satisfied at level zero, with atoms renumbered to drop those absent or settled, and any assumptions as unit clauses.
*/

use std::io::{BufRead, Write};

use crate::{
    context::GenericSolver,
    structures::{
        atom::Atom,
        clause::CClause,
        literal::Lit,
    },
    types::err::{ErrorKind, ParseError},
};

/// Details of a parsed DIMACS input.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParserInfo {
    pub expected_atoms: Option<usize>,
    pub expected_clauses: Option<usize>,
    pub added_atoms: usize,
    pub added_clauses: usize,
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Reads a DIMACS formula into the solver.
    ///
    /// An `Err` from clause addition --- in particular, unsatisfiability identified while reading --- is passed to the caller as soon as it is noticed.
    ///
    /// ```rust
    /// # use orbit_sat::config::Config;
    /// # use orbit_sat::context::Solver;
    /// # use orbit_sat::reports::Report;
    /// # use std::io::Write;
    /// let mut solver = Solver::from_config(Config::default());
    ///
    /// let mut dimacs = vec![];
    /// let _ = dimacs.write(b"
    /// p cnf 2 4
    ///  1  2 0
    /// -1  2 0
    /// -1 -2 0
    ///  1 -2 0
    /// ");
    ///
    /// assert!(solver.read_dimacs(dimacs.as_slice()).is_ok());
    /// assert_eq!(solver.solve(), Report::Unsatisfiable);
    /// ```
    pub fn read_dimacs(&mut self, mut reader: impl BufRead) -> Result<ParserInfo, ErrorKind> {
        let mut buffer = String::default();
        let mut clause_buffer: CClause = Vec::default();
        let mut info = ParserInfo::default();

        let atoms_before = self.atom_db.count();
        let clauses_before = self.clause_db.original_count();
        let mut lines = 0;

        // First phase: read until the formula begins.
        'preamble_loop: loop {
            buffer.clear();
            match reader.read_line(&mut buffer) {
                Ok(0) => break 'preamble_loop,
                Ok(_) => lines += 1,
                Err(_) => return Err(ErrorKind::from(ParseError::Line(lines))),
            }

            match buffer.trim_start().chars().next() {
                None | Some('c') => continue 'preamble_loop,

                Some('p') => {
                    let mut problem_details = buffer.split_whitespace();
                    let atoms: usize = match problem_details.nth(2).map(str::parse) {
                        Some(Ok(count)) => count,
                        _ => return Err(ErrorKind::from(ParseError::ProblemSpecification)),
                    };
                    let clauses: usize = match problem_details.next().map(str::parse) {
                        Some(Ok(count)) => count,
                        _ => return Err(ErrorKind::from(ParseError::ProblemSpecification)),
                    };

                    self.ensure_atoms(atoms as Atom);
                    info.expected_atoms = Some(atoms);
                    info.expected_clauses = Some(clauses);

                    buffer.clear();
                    match reader.read_line(&mut buffer) {
                        Ok(_) => lines += 1,
                        Err(_) => return Err(ErrorKind::from(ParseError::Line(lines))),
                    }
                    break 'preamble_loop;
                }

                Some(_) => break 'preamble_loop,
            }
        }

        // Second phase: read until the formula ends.
        'formula_loop: loop {
            match buffer.trim_start().chars().next() {
                Some('%') => break 'formula_loop,
                Some('c') => {}
                _ => {
                    for token in buffer.split_whitespace() {
                        match token {
                            "0" => {
                                let clause = std::mem::take(&mut clause_buffer);
                                self.add_clause(clause)?;
                            }
                            _ => {
                                let int = match token.parse::<i32>() {
                                    Ok(int) => int,
                                    Err(_) => {
                                        return Err(ErrorKind::from(ParseError::BadInteger))
                                    }
                                };
                                self.ensure_atoms(int.unsigned_abs() as Atom);
                                clause_buffer.push(Lit::from_dimacs(int));
                            }
                        }
                    }
                }
            }

            buffer.clear();
            match reader.read_line(&mut buffer) {
                Ok(0) => break 'formula_loop,
                Ok(_) => lines += 1,
                Err(_) => return Err(ErrorKind::from(ParseError::Line(lines))),
            }
        }

        if !clause_buffer.is_empty() {
            return Err(ErrorKind::from(ParseError::MissingDelimiter));
        }

        info.added_atoms = self.atom_db.count() - atoms_before;
        info.added_clauses = self.clause_db.original_count() - clauses_before;

        Ok(info)
    }

    /// Writes the formula in DIMACS form: the original clauses not yet satisfied, plus each assumption as a unit.
    ///
    /// Atoms are renumbered to drop those absent from the written clauses or settled at level zero.
    /// A solver latched unsatisfiable is written as the canonical contradiction over one atom.
    pub fn write_dimacs(
        &self,
        writer: &mut impl Write,
        assumptions: &[Lit],
    ) -> std::io::Result<()> {
        if !self.ok {
            return write!(writer, "p cnf 1 2\n1 0\n-1 0\n");
        }

        let mut map: Vec<Option<Atom>> = vec![None; self.atom_db.count()];
        let mut mapped: Atom = 0;
        let map_atom = |atom: Atom, map: &mut Vec<Option<Atom>>, mapped: &mut Atom| -> Atom {
            match map[atom as usize] {
                Some(target) => target,
                None => {
                    let target = *mapped;
                    map[atom as usize] = Some(target);
                    *mapped += 1;
                    target
                }
            }
        };

        let mut count = 0;
        for clause in &self.clause_db.originals {
            if !self.clause_satisfied(*clause) {
                count += 1;
                for literal in self.clause_db.arena.literals(*clause) {
                    if self.atom_db.value_of_lit(*literal) != Some(false) {
                        map_atom(literal.atom(), &mut map, &mut mapped);
                    }
                }
            }
        }

        // Assumptions are written as unit clauses.
        count += assumptions.len();
        for assumption in assumptions {
            map_atom(assumption.atom(), &mut map, &mut mapped);
        }

        writeln!(writer, "p cnf {mapped} {count}")?;

        for assumption in assumptions {
            debug_assert!(self.atom_db.value_of_lit(*assumption) != Some(false));
            let atom = map_atom(assumption.atom(), &mut map, &mut mapped) + 1;
            match assumption.polarity() {
                true => writeln!(writer, "{atom} 0")?,
                false => writeln!(writer, "-{atom} 0")?,
            }
        }

        for clause in &self.clause_db.originals {
            if self.clause_satisfied(*clause) {
                continue;
            }
            for literal in self.clause_db.arena.literals(*clause) {
                if self.atom_db.value_of_lit(*literal) != Some(false) {
                    let atom = map_atom(literal.atom(), &mut map, &mut mapped) + 1;
                    match literal.polarity() {
                        true => write!(writer, "{atom} ")?,
                        false => write!(writer, "-{atom} ")?,
                    }
                }
            }
            writeln!(writer, "0")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod dimacs_parser_tests {
    use std::io::Write;

    use crate::{config::Config, context::Solver, reports::Report};

    use super::*;

    #[test]
    fn bad_delimiter() {
        let mut solver = Solver::from_config(Config::default());

        let mut dimacs = vec![];
        let _ = dimacs.write(b"1  2");

        assert_eq!(
            solver.read_dimacs(dimacs.as_slice()),
            Err(ErrorKind::Parse(ParseError::MissingDelimiter))
        );
    }

    #[test]
    fn bad_problem_spec() {
        let mut solver = Solver::from_config(Config::default());

        let mut dimacs = vec![];
        let _ = dimacs.write(
            b"
p cnf
  1  2 0",
        );

        assert_eq!(
            solver.read_dimacs(dimacs.as_slice()),
            Err(ErrorKind::Parse(ParseError::ProblemSpecification))
        );
    }

    #[test]
    fn empty_ok() {
        let mut solver = Solver::from_config(Config::default());

        let mut dimacs = vec![];
        let _ = dimacs.write(
            b"

",
        );

        assert!(solver.read_dimacs(dimacs.as_slice()).is_ok());
    }

    #[test]
    fn atoms_ensured() {
        let mut solver = Solver::from_config(Config::default());

        let required_atoms = 10;

        let mut dimacs = vec![];
        let _ = dimacs.write(format!("p cnf {required_atoms} 0").as_bytes());
        let _ = solver.read_dimacs(dimacs.as_slice());

        assert_eq!(solver.atom_db.count(), required_atoms);
    }

    #[test]
    fn unsatisfiable_while_reading() {
        let mut solver = Solver::from_config(Config::default());

        let mut dimacs = vec![];
        let _ = dimacs.write(
            b"
 1     0
-1  2  0
-2     0
",
        );

        assert_eq!(
            solver.read_dimacs(dimacs.as_slice()),
            Err(ErrorKind::FundamentalConflict)
        );
        assert_eq!(solver.solve(), Report::Unsatisfiable);
    }

    #[test]
    fn writeback_round_trip() {
        let mut solver = Solver::from_config(Config::default());

        let mut dimacs = vec![];
        let _ = dimacs.write(
            b"p cnf 3 2
 1  2 0
-2  3 0
",
        );
        assert!(solver.read_dimacs(dimacs.as_slice()).is_ok());

        let mut written = Vec::new();
        solver.write_dimacs(&mut written, &[]).unwrap();

        let mut reread = Solver::from_config(Config::default());
        let info = reread.read_dimacs(written.as_slice()).unwrap();
        assert_eq!(info.added_clauses, 2);
        assert_eq!(reread.solve(), Report::Satisfiable);
    }
}
