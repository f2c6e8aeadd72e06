/// Counts for various things which count, roughly.
#[derive(Default)]
pub struct Counters {
    /// A count of calls to solve.
    pub solves: usize,

    /// A count of searches started, i.e. restarts plus one per solve.
    pub restarts: usize,

    /// A count of every conflict seen during a solve.
    pub conflicts: u64,

    /// A count of all decisions made.
    pub decisions: u64,

    /// A count of decisions which were made at random.
    pub random_decisions: u64,

    /// A count of literals propagated.
    pub propagations: u64,

    /// A count of literals across learnt clauses, before minimization.
    pub learnt_literals_max: u64,

    /// A count of literals across learnt clauses, after minimization.
    pub learnt_literals_total: u64,
}
