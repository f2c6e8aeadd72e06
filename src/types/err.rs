/*!
Error types used in the library.

- Most of these are very unlikely to occur during use.
- Some of these are internally expected --- e.g. a fundamental conflict is used to note the formula in a solver is unsatisfiable, regardless of how the observation was made.
- Others are external --- e.g. a parse error surfaces a malformed DIMACS or permutation file.

Names of the error enums --- for the most part --- overlap with corresponding structs.
*/

/// A union of varied error kinds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An error in the clause database.
    ClauseDB(ClauseDBError),

    /// An error in the atom database.
    AtomDB(AtomDBError),

    /// An error related to parsing.
    Parse(ParseError),

    /// An error related to the symmetry layer.
    Symmetry(SymmetryError),

    /// A fundamental conflict has been observed (and recorded).
    ///
    /// In other words, the formula held is unsatisfiable without any decision having been made.
    FundamentalConflict,
}

/// Errors in the clause database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClauseDBError {
    /// Some attempt was made to store an empty clause.
    EmptyClause,

    /// All possible arena offsets have been used.
    StorageExhausted,
}

impl From<ClauseDBError> for ErrorKind {
    fn from(e: ClauseDBError) -> Self {
        ErrorKind::ClauseDB(e)
    }
}

/// Errors in the atom database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AtomDBError {
    /// There are no more fresh atoms.
    AtomsExhausted,
}

impl From<AtomDBError> for ErrorKind {
    fn from(e: AtomDBError) -> Self {
        ErrorKind::AtomDB(e)
    }
}

/// Errors during parsing, of DIMACS or permutation files.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// Some issue with the problem specification in a DIMACS input.
    ProblemSpecification,

    /// Some unspecific problem at a specific line.
    Line(usize),

    /// A required delimiter was not found.
    MissingDelimiter,

    /// A token which could not be read as an integer.
    BadInteger,

    /// The permutation count of a permutation file is missing or malformed.
    PermutationCount,
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

/// Errors related to the symmetry layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SymmetryError {
    /// A generator was given after solving started, or over atoms the solver has not seen.
    UnknownAtom,

    /// A requested combination of symmetry modes is not supported.
    ///
    /// At present, dynamic injection is only implemented for the chaining encoding.
    UnsupportedMode,

    /// An equality was expected in the equality table, but not found.
    MissingEquality,
}

impl From<SymmetryError> for ErrorKind {
    fn from(e: SymmetryError) -> Self {
        ErrorKind::Symmetry(e)
    }
}
