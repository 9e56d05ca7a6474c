// src/workflow/add_pairs.rs

//! Batch driver: insert adsorbate pairs into every structure of a category.

use super::outcome::{BatchSummary, ItemOutcome};
use super::scan::{self, Category};
use crate::config::PairSettings;
use crate::error::{Result, WorkflowError};
use crate::io::poscar;
use crate::model::Structure;
use crate::physics::{check_inversion_pairs, find_pairs, insert_adsorbates, InsertionParams, Pair};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the operator chooses for one insertion run.
#[derive(Debug, Clone)]
pub struct PairInsertionParams {
    pub category: Category,
    /// Species whose pairs anchor the insertion.
    pub element: String,
    /// Positions in the pair list.
    pub selected: Vec<usize>,
    pub insertion: InsertionParams,
    pub check_symmetry: bool,
}

impl PairInsertionParams {
    /// Builds the parameters, taking vacuum, distance and height reference
    /// from the settings.
    pub fn new(
        category: Category,
        element: &str,
        species: &str,
        selected: Vec<usize>,
        offset: (f64, f64),
        settings: &PairSettings,
    ) -> Self {
        let mut insertion = InsertionParams::new(&scan::capitalize(species), offset);
        insertion.vacuum = settings.vacuum;
        insertion.distance = settings.distance;
        insertion.reference = settings.height_reference;

        Self {
            category,
            element: scan::capitalize(element),
            selected,
            insertion,
            check_symmetry: false,
        }
    }
}

/// Qualifying directories of `category` under `base`.
pub fn category_dirs(base: &Path, category: Category, settings: &PairSettings) -> Result<Vec<PathBuf>> {
    let dirs = scan::find_vasp_dirs(base, settings)?;
    let dirs = scan::filter_category(&dirs, category, settings);
    if dirs.is_empty() {
        return Err(WorkflowError::NoDirectories(base.to_path_buf()));
    }
    Ok(dirs)
}

/// Pairs of `element` in the POSCAR of the first qualifying directory.
pub fn reference_pairs(dirs: &[PathBuf], element: &str, settings: &PairSettings) -> Result<Vec<Pair>> {
    let first = dirs
        .first()
        .ok_or_else(|| WorkflowError::NoDirectories(PathBuf::new()))?;
    let structure = poscar::parse(&first.join(&settings.poscar_name))?;
    Ok(find_pairs(&structure, element))
}

/// Runs the insertion over every directory of the chosen category.
///
/// The pair list comes from the first directory and is applied to all of
/// them. A directory that fails is logged and counted; the rest continue.
pub fn run(base: &Path, params: &PairInsertionParams, settings: &PairSettings) -> Result<BatchSummary> {
    let dirs = category_dirs(base, params.category, settings)?;
    let pairs = reference_pairs(&dirs, &params.element, settings)?;

    if pairs.is_empty() {
        log::warn!(
            "No {} pairs in {} (missing or odd count); nothing to insert",
            params.element,
            dirs[0].display()
        );
    } else {
        log::info!("{} {} pairs: {:?}", pairs.len(), params.element, pairs);
    }

    let mut summary = BatchSummary::default();

    for dir in &dirs {
        log::info!("Processing {}", dir.display());
        match process_addition(dir, &pairs, params, settings) {
            Ok(ItemOutcome::Processed(path)) => {
                log::info!("Wrote {}", path.display());
                summary.directories_done += 1;
                summary.items_written += 1;
            }
            Ok(ItemOutcome::Skipped { item, reason }) => summary.record_skip(item, reason),
            Err(e) => summary.record_failure(dir.clone(), e),
        }
    }

    Ok(summary)
}

/// Inserts into one directory's POSCAR and writes the new input deck.
///
/// Returns the path of the `.vasp` file written.
pub fn process_addition(
    dir: &Path,
    pairs: &[Pair],
    params: &PairInsertionParams,
    settings: &PairSettings,
) -> Result<ItemOutcome<PathBuf>> {
    let structure = poscar::parse(&dir.join(&settings.poscar_name))?;

    if params.check_symmetry {
        report_symmetry(dir, &structure, pairs, settings.symmetry_tolerance);
    }

    let valid: Vec<usize> = params
        .selected
        .iter()
        .copied()
        .filter(|&i| i < pairs.len())
        .collect();
    if valid.is_empty() {
        return Ok(ItemOutcome::skipped(
            dir.display().to_string(),
            format!("none of the selected pairs {:?} exist", params.selected),
        ));
    }

    let modified = insert_adsorbates(&structure, pairs, &params.selected, &params.insertion);

    let species = &params.insertion.species;
    let out_dir = dir.join(format!("{}_Pairs_Added", species));
    fs::create_dir_all(&out_dir)?;

    let vasp_path = out_dir.join(format!("POSCAR_added_{}.vasp", species));
    poscar::write(&vasp_path, &modified, settings.coordinates)?;
    fs::copy(&vasp_path, out_dir.join(&settings.poscar_name))?;

    copy_aux_files(dir, &out_dir, &settings.aux_files)?;

    Ok(ItemOutcome::Processed(vasp_path))
}

fn report_symmetry(dir: &Path, structure: &Structure, pairs: &[Pair], tol: f64) {
    let suspicious = check_inversion_pairs(structure, pairs, tol);
    if suspicious.is_empty() {
        log::debug!("{}: all pairs share an inversion centre", dir.display());
    }
    for n in suspicious {
        log::warn!(
            "{}: pair {} {:?} does not share the inversion centre of pair 0",
            dir.display(),
            n,
            pairs[n]
        );
    }
}

/// Copies each named file from `src` into `dst`; missing ones are warned.
pub fn copy_aux_files(src: &Path, dst: &Path, names: &[String]) -> Result<usize> {
    let mut copied = 0;
    for name in names {
        let from = src.join(name);
        if from.is_file() {
            fs::copy(&from, dst.join(name))?;
            copied += 1;
        } else {
            log::warn!("{} not found in {}", name, src.display());
        }
    }
    Ok(copied)
}

/// Parses a pair selection such as `0,2` or `0 2`.
///
/// Tokens that are not non-negative integers are dropped with a warning.
pub fn parse_selection(text: &str) -> Vec<usize> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .filter_map(|t| match t.parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                log::warn!("Ignoring pair index '{}'", t);
                None
            }
        })
        .collect()
}

/// Parses a planar offset `x,y` given in lattice fractions.
pub fn parse_offset(text: &str) -> std::result::Result<(f64, f64), String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(format!("expected 'x,y', got '{}'", text));
    }
    let x = parts[0]
        .parse::<f64>()
        .map_err(|e| format!("bad x offset '{}': {}", parts[0], e))?;
    let y = parts[1]
        .parse::<f64>()
        .map_err(|e| format!("bad y offset '{}': {}", parts[1], e))?;
    Ok((x, y))
}
