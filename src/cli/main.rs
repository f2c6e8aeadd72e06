#![allow(clippy::collapsible_if)]

use std::{io::BufReader, path::PathBuf};

use clap::{value_parser, Arg, ArgAction, Command};

use orbit_sat::{
    config::Config,
    context::Solver,
    reports::Report,
    symmetry::parse::read_permutation_pairs,
    types::err::ErrorKind,
};

fn cli() -> Command {
    Command::new("orbit_sat")
        .about("Determines whether a formula is satisfiable or unsatisfiable, breaking symmetries given as permutation generators")
        .version(env!("CARGO_PKG_VERSION"))

        .arg(Arg::new("path")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("The DIMACS form CNF file to solve (xz compression recognised by extension)."))

        .arg(Arg::new("model")
            .short('m')
            .long("model")
            .action(ArgAction::SetTrue)
            .help("Display a model, if one exists."))

        .arg(Arg::new("stats")
            .short('s')
            .long("stats")
            .action(ArgAction::SetTrue)
            .help("Display search statistics after the solve."))

        // The remaining cases follow a common template.
        // If a value is present, may be parsed appropriately, and is valid, the config is updated.
        // Otherwise, a message is sent.

        .arg(Arg::new("var_decay")
            .long("var-decay")
            .value_parser(value_parser!(f64))
            .num_args(1)
            .help("The variable activity decay factor."))

        .arg(Arg::new("cla_decay")
            .long("cla-decay")
            .value_parser(value_parser!(f64))
            .num_args(1)
            .help("The clause activity decay factor."))

        .arg(Arg::new("rnd_freq")
            .long("rnd-freq")
            .value_parser(value_parser!(f64))
            .num_args(1)
            .help("The frequency with which the decision heuristic tries to choose a random variable."))

        .arg(Arg::new("rnd_seed")
            .long("rnd-seed")
            .value_parser(value_parser!(u64))
            .num_args(1)
            .help("The seed used by the random variable selection."))

        .arg(Arg::new("ccmin_mode")
            .long("ccmin-mode")
            .value_parser(value_parser!(u8))
            .num_args(1)
            .help("Controls conflict clause minimization (0=none, 1=basic, 2=deep)."))

        .arg(Arg::new("phase_saving")
            .long("phase-saving")
            .value_parser(value_parser!(u8))
            .num_args(1)
            .help("Controls the level of phase saving (0=none, 1=limited, 2=full)."))

        .arg(Arg::new("rnd_init")
            .long("rnd-init")
            .action(ArgAction::SetTrue)
            .help("Randomize the initial activity."))

        .arg(Arg::new("no_luby")
            .long("no-luby")
            .action(ArgAction::SetTrue)
            .help("Use geometric restarts in place of the Luby sequence."))

        .arg(Arg::new("rfirst")
            .long("rfirst")
            .value_parser(value_parser!(u32))
            .num_args(1)
            .help("The base restart interval."))

        .arg(Arg::new("rinc")
            .long("rinc")
            .value_parser(value_parser!(f64))
            .num_args(1)
            .help("The restart interval increase factor."))

        .arg(Arg::new("gc_frac")
            .long("gc-frac")
            .value_parser(value_parser!(f64))
            .num_args(1)
            .help("The fraction of wasted memory allowed before a garbage collection is triggered."))

        .arg(Arg::new("min_learnts")
            .long("min-learnts")
            .value_parser(value_parser!(u32))
            .num_args(1)
            .help("Minimum learnt clause limit."))

        .arg(Arg::new("symm")
            .long("symm")
            .value_parser(value_parser!(PathBuf))
            .num_args(1)
            .help("Permutations file."))

        .arg(Arg::new("symm_shatter")
            .long("symm-shatter")
            .action(ArgAction::SetTrue)
            .help("Break symmetries via emulating Shatter."))

        .arg(Arg::new("symm_chain")
            .long("symm-chain")
            .action(ArgAction::SetTrue)
            .help("Break symmetries via implication chaining SBPs."))

        .arg(Arg::new("symm_dynamic")
            .long("symm-dynamic")
            .action(ArgAction::SetTrue)
            .help("Add the symmetry breaking clauses dynamically."))

        .arg(Arg::new("symm_eq_aux")
            .long("symm-eq-aux")
            .action(ArgAction::SetTrue)
            .help("Use equality table auxiliary variables."))

        .arg(Arg::new("symm_aux_decide")
            .long("symm-aux-decide")
            .action(ArgAction::SetTrue)
            .help("Decide on symmetry added auxiliary variables."))
}

fn main() {
    env_logger::init();

    let matches = cli().get_matches();
    let mut config = Config::default();

    if let Some(value) = matches.get_one::<f64>("var_decay") {
        if config.variable_decay.set(*value).is_err() {
            let (min, max) = config.variable_decay.min_max();
            println!("var-decay requires a value within ({min}, {max})");
            std::process::exit(1);
        }
    }

    if let Some(value) = matches.get_one::<f64>("cla_decay") {
        if config.clause_decay.set(*value).is_err() {
            let (min, max) = config.clause_decay.min_max();
            println!("cla-decay requires a value within ({min}, {max})");
            std::process::exit(1);
        }
    }

    if let Some(value) = matches.get_one::<f64>("rnd_freq") {
        if config.random_variable_frequency.set(*value).is_err() {
            let (min, max) = config.random_variable_frequency.min_max();
            println!("rnd-freq requires a value within [{min}, {max}]");
            std::process::exit(1);
        }
    }

    if let Some(value) = matches.get_one::<u64>("rnd_seed") {
        if config.random_seed.set(*value).is_err() {
            println!("rnd-seed requires a positive value");
            std::process::exit(1);
        }
    }

    if let Some(value) = matches.get_one::<u8>("ccmin_mode") {
        if config.ccmin_mode.set(*value).is_err() {
            println!("ccmin-mode requires a value of 0, 1, or 2");
            std::process::exit(1);
        }
    }

    if let Some(value) = matches.get_one::<u8>("phase_saving") {
        if config.phase_saving.set(*value).is_err() {
            println!("phase-saving requires a value of 0, 1, or 2");
            std::process::exit(1);
        }
    }

    if matches.get_flag("rnd_init") {
        config.random_initial_activity.value = true;
    }

    if matches.get_flag("no_luby") {
        config.luby_restarts.value = false;
    }

    if let Some(value) = matches.get_one::<u32>("rfirst") {
        if config.restart_first.set(*value).is_err() {
            println!("rfirst requires a positive value");
            std::process::exit(1);
        }
    }

    if let Some(value) = matches.get_one::<f64>("rinc") {
        if config.restart_inc.set(*value).is_err() {
            println!("rinc requires a value of at least 1");
            std::process::exit(1);
        }
    }

    if let Some(value) = matches.get_one::<f64>("gc_frac") {
        if config.garbage_fraction.set(*value).is_err() {
            println!("gc-frac requires a positive value");
            std::process::exit(1);
        }
    }

    if let Some(value) = matches.get_one::<u32>("min_learnts") {
        if config.min_learnts.set(*value).is_err() {
            println!("min-learnts requires a non-negative value");
            std::process::exit(1);
        }
    }

    config.symmetry.shatter = matches.get_flag("symm_shatter");
    config.symmetry.chaining = matches.get_flag("symm_chain");
    config.symmetry.dynamic = matches.get_flag("symm_dynamic");
    config.symmetry.equality_aux = matches.get_flag("symm_eq_aux");
    config.symmetry.aux_decide = matches.get_flag("symm_aux_decide");

    if config.symmetry.shatter && config.symmetry.chaining {
        println!("symm-shatter and symm-chain are mutually exclusive");
        std::process::exit(1);
    }
    if config.symmetry.dynamic && !config.symmetry.chaining {
        println!("symm-dynamic requires symm-chain");
        std::process::exit(1);
    }
    if config.symmetry.any() && matches.get_one::<PathBuf>("symm").is_none() {
        println!("symmetry breaking requires a permutations file (--symm)");
        std::process::exit(1);
    }

    let show_model = matches.get_flag("model");
    let show_stats = matches.get_flag("stats");

    let mut solver = Solver::from_config(config);

    // Read the formula.
    let path = matches
        .get_one::<PathBuf>("path")
        .expect("path is a required argument");
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            println!("c Failed to open CNF file {path:?}: {e}");
            std::process::exit(1);
        }
    };

    let parse_result = match path.extension() {
        Some(extension) if *extension == *"xz" => {
            solver.read_dimacs(BufReader::new(xz2::read::XzDecoder::new(&file)))
        }
        _ => solver.read_dimacs(BufReader::new(&file)),
    };

    match parse_result {
        Ok(info) => {
            println!(
                "c Read {} clauses over {} atoms",
                info.added_clauses, info.added_atoms
            );
        }
        Err(ErrorKind::FundamentalConflict) => {
            println!("s UNSATISFIABLE");
            std::process::exit(20);
        }
        Err(e) => {
            println!("c Error reading DIMACS: {e:?}");
            std::process::exit(1);
        }
    }

    // Read and install permutations.
    if let Some(symm_path) = matches.get_one::<PathBuf>("symm") {
        let symm_file = match std::fs::File::open(symm_path) {
            Ok(file) => file,
            Err(e) => {
                println!("c Failed to open permutations file {symm_path:?}: {e}");
                std::process::exit(1);
            }
        };

        let (declared, pair_lists) = match read_permutation_pairs(BufReader::new(&symm_file)) {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("c Error reading permutations: {e:?}");
                std::process::exit(1);
            }
        };
        println!("c Read {} permutations ({} declared)", pair_lists.len(), declared);

        match solver.install_generators_from_pairs(declared, pair_lists) {
            Ok(()) => {}
            Err(ErrorKind::FundamentalConflict) => {
                println!("s UNSATISFIABLE");
                std::process::exit(20);
            }
            Err(e) => {
                println!("c Error installing permutations: {e:?}");
                std::process::exit(1);
            }
        }
    }

    let report = solver.solve();

    if show_stats {
        print_statistics(&solver);
    }

    match report {
        Report::Satisfiable => {
            if show_model {
                let mut model_line = String::from("v");
                for atom in 0..solver.atom_db.count() {
                    let int = atom as i64 + 1;
                    match solver.model_value(atom as u32) {
                        Some(true) => model_line.push_str(&format!(" {int}")),
                        Some(false) => model_line.push_str(&format!(" -{int}")),
                        None => {}
                    }
                }
                model_line.push_str(" 0");
                println!("{model_line}");
            }
            println!("s SATISFIABLE");
            std::process::exit(10);
        }
        Report::Unsatisfiable => {
            println!("s UNSATISFIABLE");
            std::process::exit(20);
        }
        Report::Unknown => {
            println!("s UNKNOWN");
            std::process::exit(0);
        }
    }
}

fn print_statistics(solver: &Solver) {
    let counters = &solver.counters;
    println!("c restarts              : {}", counters.restarts);
    println!("c conflicts             : {}", counters.conflicts);
    let random_percent = match counters.decisions {
        0 => 0.0,
        _ => counters.random_decisions as f64 * 100.0 / counters.decisions as f64,
    };
    println!(
        "c decisions             : {} ({:.2} % random)",
        counters.decisions, random_percent
    );
    println!("c propagations          : {}", counters.propagations);
    let deleted_percent = match counters.learnt_literals_max {
        0 => 0.0,
        _ => {
            (counters.learnt_literals_max - counters.learnt_literals_total) as f64 * 100.0
                / counters.learnt_literals_max as f64
        }
    };
    println!(
        "c conflict literals     : {} ({:.2} % deleted)",
        counters.learnt_literals_total, deleted_percent
    );
    println!("c progress estimate     : {:.4} %", solver.progress_estimate * 100.0);

    if solver.symmetry.active() {
        let sbp = solver.sbp_statistics();
        println!("c permutations          : {}", solver.symmetry.permutations.len());
        println!(
            "c equalities            : {} ({} offered)",
            solver.symmetry.equality_count, solver.symmetry.naive_equality_count
        );
        println!("c dynamic SBP steps     : {}", solver.symmetry.dynamic_steps);
        println!(
            "c SBP clauses           : {} ({} never propagated, {} never resolved)",
            sbp.sbp_count, sbp.sbp_never_propagated, sbp.sbp_never_resolved
        );
        println!(
            "c plain clauses         : {} ({} never propagated, {} never resolved)",
            sbp.plain_count, sbp.plain_never_propagated, sbp.plain_never_resolved
        );
    }
}
