use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod physics;
pub mod utils;
pub mod workflow;

use config::Config;
use error::Result;
use utils::{logger, report};
use workflow::{add_pairs, integrate_pdos, scan, BatchSummary, Category, PairInsertionParams};

/// Batch tools for delafossite surface workflows: adsorbate pairs and PDOS integration
#[derive(Parser, Debug)]
#[command(name = "dwf", author, version, about, long_about = None)]
struct Cli {
    /// Settings file (default: OS config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print per-file detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show candidate pair elements and the pairs of the first structure
    ListPairs {
        base: PathBuf,
        #[arg(long, value_enum)]
        category: Category,
        /// Element to pair (defaults to every element from *_pairs.txt)
        #[arg(long)]
        element: Option<String>,
    },

    /// Insert a species above and below the selected pairs
    AddPairs {
        base: PathBuf,
        #[arg(long, value_enum)]
        category: Category,
        /// Pairing element, e.g. Cu
        #[arg(long)]
        element: String,
        /// Pair indices, e.g. "0,2"
        #[arg(long)]
        pairs: String,
        /// Inserted species, e.g. H
        #[arg(long)]
        species: String,
        /// In-plane offset "x,y" in lattice fractions
        #[arg(long, default_value = "0,0", value_parser = add_pairs::parse_offset)]
        offset: (f64, f64),
        /// Warn about pairs that do not share an inversion centre
        #[arg(long)]
        check_symmetry: bool,
    },

    /// Integrate every *_total.dat file and write one CSV per PDOS directory
    IntegratePdos {
        base: PathBuf,
        /// Process directories in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Write the default settings file
    InitConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = logger::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => match Config::load_from(path) {
            Ok(cfg) => {
                log::debug!("Config loaded from {:?}", path);
                cfg
            }
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let (cfg, msg) = Config::load();
            log::debug!("{}", msg);
            cfg
        }
    };

    match run(cli.command, cli.config.as_deref(), config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config_path: Option<&Path>, mut config: Config) -> Result<()> {
    match command {
        Command::ListPairs {
            base,
            category,
            element,
        } => list_pairs(&base, category, element, &config),

        Command::AddPairs {
            base,
            category,
            element,
            pairs,
            species,
            offset,
            check_symmetry,
        } => {
            let selected = add_pairs::parse_selection(&pairs);
            if selected.is_empty() {
                log::warn!("No valid pair indices in '{}'", pairs);
            }
            let mut params = PairInsertionParams::new(
                category,
                &element,
                &species,
                selected,
                offset,
                &config.pairs,
            );
            params.check_symmetry = check_symmetry;

            let summary = add_pairs::run(&base, &params, &config.pairs)?;
            finish(&summary);
            Ok(())
        }

        Command::IntegratePdos { base, parallel } => {
            config.pdos.parallel |= parallel;
            let summary = integrate_pdos::run(&base, &config.pdos)?;
            finish(&summary);
            Ok(())
        }

        Command::InitConfig => {
            let path = config.save(config_path)?;
            log::info!("Settings written to {:?}", path);
            Ok(())
        }
    }
}

fn list_pairs(base: &Path, category: Category, element: Option<String>, config: &Config) -> Result<()> {
    let settings = &config.pairs;
    let candidates = scan::pair_elements(base, settings)?;
    if candidates.is_empty() {
        log::info!("No *{} files in {:?}", settings.pair_file_suffix, base);
    } else {
        log::info!("Pair elements: {}", candidates.join(", "));
    }

    let dirs = add_pairs::category_dirs(base, category, settings)?;
    let poscar_path = dirs[0].join(&settings.poscar_name);
    let structure = io::poscar::parse(&poscar_path)?;
    print!("{}", report::structure_summary(&structure, &poscar_path.display().to_string()));

    let elements = match element {
        Some(el) => vec![scan::capitalize(&el)],
        None => candidates,
    };
    for el in elements {
        let pairs = physics::find_pairs(&structure, &el);
        print!("{}", report::pair_listing(&structure, &el, &pairs));
    }
    Ok(())
}

fn finish(summary: &BatchSummary) {
    let text = report::batch_summary(summary);
    if summary.is_clean() {
        log::info!("{}", text.trim_end());
    } else {
        log::warn!("{}", text.trim_end());
    }
}
