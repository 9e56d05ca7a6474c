// src/workflow/scan.rs

//! Directory discovery for both batch pipelines.

use crate::config::{PairSettings, PdosSettings};
use crate::error::Result;
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of structure directory the pair pipeline works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    /// `.../VASP_inputs`
    Pristine,
    /// `..._Removed`
    Vacancy,
    /// `..._Added`
    Adsorption,
}

impl Category {
    pub fn suffix<'a>(&self, settings: &'a PairSettings) -> &'a str {
        match self {
            Category::Pristine => &settings.pristine_suffix,
            Category::Vacancy => &settings.vacancy_suffix,
            Category::Adsorption => &settings.adsorption_suffix,
        }
    }
}

/// `base` followed by every directory below it, depth-first with siblings
/// in name order.
///
/// Symbolic links are not followed. A subdirectory that cannot be read is
/// reported and left out; only an unreadable `base` is an error.
pub fn walk_dirs(base: &Path) -> Result<Vec<PathBuf>> {
    let mut out = vec![base.to_path_buf()];
    walk_into(base, &mut out)?;
    Ok(out)
}

fn walk_into(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut children: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map_or(false, |t| t.is_dir()))
        .map(|entry| entry.path())
        .collect();
    children.sort();

    for child in children {
        out.push(child.clone());
        if let Err(e) = walk_into(&child, out) {
            log::warn!("Cannot read {}: {}", child.display(), e);
        }
    }
    Ok(())
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Directories whose path mentions the input marker and that hold a POSCAR.
pub fn find_vasp_dirs(base: &Path, settings: &PairSettings) -> Result<Vec<PathBuf>> {
    Ok(walk_dirs(base)?
        .into_iter()
        .filter(|d| path_text(d).contains(&settings.input_marker))
        .filter(|d| d.join(&settings.poscar_name).is_file())
        .collect())
}

/// Keeps the directories whose path ends with the category suffix.
pub fn filter_category(dirs: &[PathBuf], category: Category, settings: &PairSettings) -> Vec<PathBuf> {
    let suffix = category.suffix(settings);
    dirs.iter()
        .filter(|d| path_text(d).ends_with(suffix))
        .cloned()
        .collect()
}

/// PDOS directories that already contain parsed output.
///
/// Matching directories without the marker file are reported and left out.
pub fn find_pdos_dirs(base: &Path, settings: &PdosSettings) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for dir in walk_dirs(base)? {
        if !path_text(&dir).ends_with(&settings.dir_suffix) {
            continue;
        }
        if dir.join(&settings.marker_file).is_file() {
            found.push(dir);
        } else {
            log::warn!("{}: PDOS data hasn't been parsed yet", dir.display());
        }
    }
    Ok(found)
}

/// Files in `dir` whose name ends with `suffix`, sorted by name.
pub fn list_data_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with(suffix))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Element names offered for pairing, taken from `<element>_pairs.txt`
/// files directly inside `base`.
pub fn pair_elements(base: &Path, settings: &PairSettings) -> Result<Vec<String>> {
    let mut elements: Vec<String> = list_data_files(base, &settings.pair_file_suffix)?
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .filter_map(|n| n.split('_').next())
        .filter(|prefix| !prefix.is_empty())
        .map(capitalize)
        .collect();
    elements.dedup();
    Ok(elements)
}

/// `cu` -> `Cu`, `CU` -> `Cu`.
pub fn capitalize(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("cu"), "Cu");
        assert_eq!(capitalize("FE"), "Fe");
        assert_eq!(capitalize("h"), "H");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_category_filtering() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        let settings = PairSettings::default();

        touch(&base.join("CuFeO2/VASP_inputs/POSCAR"));
        touch(&base.join("CuFeO2/VASP_inputs/Cu_Removed/POSCAR"));
        touch(&base.join("CuFeO2/VASP_inputs/H_Added/POSCAR"));
        // No POSCAR: not a candidate
        fs::create_dir_all(base.join("CuFeO2/VASP_inputs/O_Removed")).unwrap();
        // No marker in path
        touch(&base.join("CuAlO2/relax/POSCAR"));

        let dirs = find_vasp_dirs(base, &settings).unwrap();
        assert_eq!(dirs.len(), 3);

        let pristine = filter_category(&dirs, Category::Pristine, &settings);
        assert_eq!(pristine, vec![base.join("CuFeO2/VASP_inputs")]);

        let vac = filter_category(&dirs, Category::Vacancy, &settings);
        assert_eq!(vac, vec![base.join("CuFeO2/VASP_inputs/Cu_Removed")]);

        let ads = filter_category(&dirs, Category::Adsorption, &settings);
        assert_eq!(ads, vec![base.join("CuFeO2/VASP_inputs/H_Added")]);
    }

    #[test]
    fn test_pdos_dirs_need_marker() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        let settings = PdosSettings::default();

        touch(&base.join("a/CuFeO2s/PDOS/TotalDos.dat"));
        fs::create_dir_all(base.join("b/CuAlO2s/PDOS")).unwrap();
        fs::create_dir_all(base.join("c/PDOS")).unwrap();

        let dirs = find_pdos_dirs(base, &settings).unwrap();
        assert_eq!(dirs, vec![base.join("a/CuFeO2s/PDOS")]);
    }

    #[test]
    fn test_base_itself_qualifies() {
        let tmp = TempDir::new().unwrap();
        let pdos = tmp.path().join("CuFeO2s/PDOS");
        touch(&pdos.join("TotalDos.dat"));
        assert_eq!(find_pdos_dirs(&pdos, &PdosSettings::default()).unwrap(), vec![pdos.clone()]);

        let inputs = tmp.path().join("CuFeO2/VASP_inputs");
        touch(&inputs.join("POSCAR"));
        let settings = PairSettings::default();
        let dirs = find_vasp_dirs(&inputs, &settings).unwrap();
        assert_eq!(filter_category(&dirs, Category::Pristine, &settings), vec![inputs]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_not_followed() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        touch(&base.join("a/CuFeO2s/PDOS/TotalDos.dat"));
        std::os::unix::fs::symlink("..", base.join("a/loop")).unwrap();
        std::os::unix::fs::symlink(base.join("a/CuFeO2s"), base.join("b_s")).unwrap();

        let dirs = walk_dirs(base).unwrap();
        assert_eq!(
            dirs,
            vec![
                base.to_path_buf(),
                base.join("a"),
                base.join("a/CuFeO2s"),
                base.join("a/CuFeO2s/PDOS"),
            ]
        );
        assert_eq!(find_pdos_dirs(base, &PdosSettings::default()).unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_child_does_not_abort() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        let locked = base.join("a_locked");
        fs::create_dir_all(locked.join("inner")).unwrap();
        fs::create_dir_all(base.join("b/CuFeO2s/PDOS")).unwrap();
        touch(&base.join("b/CuFeO2s/PDOS/TotalDos.dat"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let found = find_pdos_dirs(base, &PdosSettings::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(found.unwrap(), vec![base.join("b/CuFeO2s/PDOS")]);
    }

    #[test]
    fn test_data_files_sorted() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        for name in ["O3_total.dat", "Fe1_total.dat", "TotalDos.dat", "Cu2_up.dat"] {
            touch(&dir.join(name));
        }
        let files = list_data_files(dir, "_total.dat").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Fe1_total.dat", "O3_total.dat"]);
    }

    #[test]
    fn test_pair_elements_from_files() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        touch(&base.join("cu_pairs.txt"));
        touch(&base.join("fe_pairs.txt"));
        touch(&base.join("notes.txt"));

        let settings = PairSettings::default();
        assert_eq!(pair_elements(base, &settings).unwrap(), vec!["Cu", "Fe"]);
    }
}
