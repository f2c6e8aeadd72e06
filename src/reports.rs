//! High-level reports on the state of a solve.

/// A report on a solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Report {
    /// The formula of the solver is satisfiable, and a model has been stored.
    Satisfiable,

    /// The formula of the solver is unsatisfiable, perhaps relative to a set of assumptions.
    Unsatisfiable,

    /// Satisfiability was not determined, e.g. due to a budget or an interrupt.
    Unknown,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
