/*!
Configuration of a solver.

All configuration for a solver is contained within a [Config] struct, handed over when the solver is created.
Each option records its name and limits alongside the current value, so external surfaces (such as the CLI) can validate requests uniformly.

Defaults are those of the MiniSAT option block, together with the symmetry-breaking switches.
*/

mod option;
pub use option::ConfigOption;

/// The representation of atom and clause activity.
pub type Activity = f64;

/// The primary configuration structure.
#[derive(Clone)]
pub struct Config {
    /// The atom activity decay factor, applied each conflict.
    pub variable_decay: ConfigOption<Activity>,

    /// The clause activity decay factor, applied each conflict.
    pub clause_decay: ConfigOption<Activity>,

    /// The frequency with which the decision heuristic tries to choose a random atom.
    pub random_variable_frequency: ConfigOption<f64>,

    /// The seed used by the random decision heuristics.
    pub random_seed: ConfigOption<u64>,

    /// Controls conflict clause minimization (0 = none, 1 = basic, 2 = deep).
    pub ccmin_mode: ConfigOption<u8>,

    /// Controls the level of phase saving (0 = none, 1 = limited, 2 = full).
    pub phase_saving: ConfigOption<u8>,

    /// Randomize the initial activity of atoms.
    pub random_initial_activity: ConfigOption<bool>,

    /// Choose the polarity of a decision at random.
    pub random_polarity: ConfigOption<bool>,

    /// Use the Luby restart sequence rather than geometric growth.
    pub luby_restarts: ConfigOption<bool>,

    /// The base restart interval, in conflicts.
    pub restart_first: ConfigOption<u32>,

    /// The restart interval growth factor.
    pub restart_inc: ConfigOption<f64>,

    /// The fraction of wasted arena memory allowed before a garbage collection is triggered.
    pub garbage_fraction: ConfigOption<f64>,

    /// A floor on the learnt clause limit.
    pub min_learnts: ConfigOption<u32>,

    /// The initial learnt clause limit, as a fraction of the original clause count.
    pub learntsize_factor: ConfigOption<f64>,

    /// The growth factor applied to the learnt clause limit on each adjustment.
    pub learntsize_inc: ConfigOption<f64>,

    /// Switches for the symmetry-breaking layer.
    pub symmetry: SymmetryConfig,
}

/// Switches for the symmetry-breaking layer.
///
/// The static encodings (`shatter`, `chaining`) are mutually exclusive, and `dynamic` is only supported together with `chaining`.
#[derive(Clone, Copy, Default)]
pub struct SymmetryConfig {
    /// Break symmetries by emulating Shatter's lex-leader encoding.
    pub shatter: bool,

    /// Break symmetries via implication chaining SBPs.
    pub chaining: bool,

    /// Add the symmetry-breaking clauses dynamically, as their antecedents become true.
    pub dynamic: bool,

    /// Express SBPs over auxiliary equality variables.
    pub equality_aux: bool,

    /// Include SBP auxiliary variables in the decision heap.
    pub aux_decide: bool,
}

impl SymmetryConfig {
    /// True if some symmetry breaking has been requested.
    pub fn any(&self) -> bool {
        self.shatter || self.chaining || self.dynamic
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            variable_decay: ConfigOption {
                name: "var-decay",
                min: f64::MIN_POSITIVE,
                max: 1.0,
                value: 0.95,
            },

            clause_decay: ConfigOption {
                name: "cla-decay",
                min: f64::MIN_POSITIVE,
                max: 1.0,
                value: 0.999,
            },

            random_variable_frequency: ConfigOption {
                name: "rnd-freq",
                min: 0.0,
                max: 1.0,
                value: 0.0,
            },

            random_seed: ConfigOption {
                name: "rnd-seed",
                min: 1,
                max: u64::MAX,
                value: 91648253,
            },

            ccmin_mode: ConfigOption {
                name: "ccmin-mode",
                min: 0,
                max: 2,
                value: 2,
            },

            phase_saving: ConfigOption {
                name: "phase-saving",
                min: 0,
                max: 2,
                value: 2,
            },

            random_initial_activity: ConfigOption {
                name: "rnd-init",
                min: false,
                max: true,
                value: false,
            },

            random_polarity: ConfigOption {
                name: "rnd-pol",
                min: false,
                max: true,
                value: false,
            },

            luby_restarts: ConfigOption {
                name: "luby",
                min: false,
                max: true,
                value: true,
            },

            restart_first: ConfigOption {
                name: "rfirst",
                min: 1,
                max: u32::MAX,
                value: 100,
            },

            restart_inc: ConfigOption {
                name: "rinc",
                min: 1.0,
                max: f64::MAX,
                value: 2.0,
            },

            garbage_fraction: ConfigOption {
                name: "gc-frac",
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
                value: 0.20,
            },

            min_learnts: ConfigOption {
                name: "min-learnts",
                min: 0,
                max: u32::MAX,
                value: 0,
            },

            learntsize_factor: ConfigOption {
                name: "lsize-factor",
                min: 0.0,
                max: f64::MAX,
                value: 1.0 / 3.0,
            },

            learntsize_inc: ConfigOption {
                name: "lsize-inc",
                min: 1.0,
                max: f64::MAX,
                value: 1.1,
            },

            symmetry: SymmetryConfig::default(),
        }
    }
}
