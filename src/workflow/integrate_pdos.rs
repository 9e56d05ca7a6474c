// src/workflow/integrate_pdos.rs

//! Batch driver: integrate every per-atom PDOS file into a CSV per directory.

use super::outcome::{BatchSummary, ItemOutcome};
use super::scan;
use crate::config::PdosSettings;
use crate::error::{Result, WorkflowError};
use crate::io::{csv, pdos};
use crate::model::elements;
use crate::model::result::sort_by_index;
use crate::model::AtomResult;
use crate::physics::integrate_block;
use crate::physics::oxidation;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Rows and skips gathered from one directory.
#[derive(Debug, Default)]
pub struct DirReport {
    pub csv_path: PathBuf,
    pub rows: Vec<AtomResult>,
    pub skipped: Vec<(String, String)>,
}

/// Integrates one `<element><index>_total.dat` file.
///
/// Unknown elements, ambiguous valences and labels without an index are
/// skipped; unreadable files and empty windows are errors.
pub fn process_file(path: &Path, settings: &PdosSettings) -> Result<ItemOutcome<AtomResult>> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let label = pdos::parse_atom_label(&name);
    let Some(sort_key) = label.sort_key() else {
        return Ok(ItemOutcome::skipped(name, "no atom index in filename"));
    };

    let element = match elements::lookup(&label.element) {
        Ok(el) => el,
        Err(e) => return Ok(ItemOutcome::skipped(name, e.to_string())),
    };
    let block = element.block();

    let spectrum = pdos::load(path, settings.layout)?;
    let integral = integrate_block(&spectrum, block, &settings.bounds, true)?;

    let oxidation_state = match oxidation::estimate(&element, integral.total) {
        Ok(os) => os,
        Err(WorkflowError::Lookup { reason, .. }) => return Ok(ItemOutcome::skipped(name, reason)),
        Err(e) => return Err(e),
    };

    log::debug!(
        "{}: {}{} block {} e_tot {:.4} OS {:.4}",
        name,
        element,
        label.index,
        block,
        integral.total,
        oxidation_state
    );

    Ok(ItemOutcome::Processed(AtomResult {
        element: element.symbol().to_string(),
        index: label.index,
        sort_key,
        e_tot: integral.total,
        oxidation_state,
        spin: integral.spin.unwrap_or(0.0),
        block,
    }))
}

/// Integrates every data file in `dir` and writes the sorted CSV there.
pub fn process_dir(dir: &Path, settings: &PdosSettings) -> Result<DirReport> {
    let files = scan::list_data_files(dir, &settings.data_suffix)?;
    let mut report = DirReport {
        csv_path: dir.join(&settings.csv_name),
        ..Default::default()
    };

    for file in &files {
        match process_file(file, settings)? {
            ItemOutcome::Processed(row) => report.rows.push(row),
            ItemOutcome::Skipped { item, reason } => report.skipped.push((item, reason)),
        }
    }

    sort_by_index(&mut report.rows);
    csv::write(&report.csv_path, &report.rows)?;
    Ok(report)
}

/// Runs the integration over every parsed PDOS directory under `base`.
pub fn run(base: &Path, settings: &PdosSettings) -> Result<BatchSummary> {
    let dirs = scan::find_pdos_dirs(base, settings)?;
    if dirs.is_empty() {
        return Err(WorkflowError::NoDirectories(base.to_path_buf()));
    }
    log::info!("Found {} PDOS directories", dirs.len());

    let results: Vec<(PathBuf, Result<DirReport>)> = if settings.parallel {
        dirs.par_iter()
            .map(|d| (d.clone(), process_dir(d, settings)))
            .collect()
    } else {
        dirs.iter()
            .map(|d| (d.clone(), process_dir(d, settings)))
            .collect()
    };

    let mut summary = BatchSummary::default();
    for (dir, result) in results {
        match result {
            Ok(report) => {
                log::info!(
                    "Wrote {} ({} rows)",
                    report.csv_path.display(),
                    report.rows.len()
                );
                summary.directories_done += 1;
                summary.items_written += report.rows.len();
                for (item, reason) in report.skipped {
                    summary.record_skip(format!("{}/{}", dir.display(), item), reason);
                }
            }
            Err(e) => summary.record_failure(dir, e),
        }
    }

    Ok(summary)
}
