// src/config.rs

use crate::error::{Result, WorkflowError};
use crate::io::pdos::SpectrumLayout;
use crate::io::poscar::CoordinateMode;
use crate::physics::{HeightReference, IntegrationBounds};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

// --- Pair insertion ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairSettings {
  /// Vacuum added along the surface normal before insertion (Angstrom)
  pub vacuum: f64,
  /// Anchor to new-atom distance (Angstrom)
  pub distance: f64,
  pub height_reference: HeightReference,
  pub coordinates: CoordinateMode,
  /// Tolerance (fractional units) for the optional inversion check
  pub symmetry_tolerance: f64,

  /// Path component marking structure input directories
  pub input_marker: String,
  pub poscar_name: String,
  pub aux_files: Vec<String>,
  pub pair_file_suffix: String,

  pub pristine_suffix: String,
  pub vacancy_suffix: String,
  pub adsorption_suffix: String,
}

impl Default for PairSettings {
  fn default() -> Self {
    Self {
      vacuum: 2.0,
      distance: 2.0,
      height_reference: HeightReference::Pair,
      coordinates: CoordinateMode::Cartesian,
      symmetry_tolerance: 1e-3,
      input_marker: "VASP_inputs".to_string(),
      poscar_name: "POSCAR".to_string(),
      aux_files: vec!["INCAR".to_string(), "KPOINTS".to_string(), "POTCAR".to_string()],
      pair_file_suffix: "_pairs.txt".to_string(),
      pristine_suffix: "VASP_inputs".to_string(),
      vacancy_suffix: "_Removed".to_string(),
      adsorption_suffix: "_Added".to_string(),
    }
  }
}

// --- PDOS integration ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdosSettings {
  /// Trailing path segments of a PDOS directory
  pub dir_suffix: String,
  /// File whose presence marks parsed PDOS output
  pub marker_file: String,
  pub data_suffix: String,
  pub csv_name: String,
  pub bounds: IntegrationBounds,
  pub layout: SpectrumLayout,
  /// Process directories in parallel
  pub parallel: bool,
}

impl Default for PdosSettings {
  fn default() -> Self {
    Self {
      dir_suffix: "s/PDOS".to_string(),
      marker_file: "TotalDos.dat".to_string(),
      data_suffix: "_total.dat".to_string(),
      csv_name: "integrated-pdos.csv".to_string(),
      bounds: IntegrationBounds::default(),
      layout: SpectrumLayout::Auto,
      parallel: false,
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
  #[serde(default)]
  pub pairs: PairSettings,

  #[serde(default)]
  pub pdos: PdosSettings,
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/delafossite-wf/settings.json)
  pub fn load() -> (Self, String) {
    let path = Self::get_path();
    if path.exists() {
      match Self::load_from(&path) {
        Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
        Err(e) => (Self::default(), format!("{}; using defaults", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  /// Loads an explicitly named config file; errors are not swallowed.
  pub fn load_from(path: &Path) -> Result<Self> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
      .map_err(|e| WorkflowError::Config(format!("Error parsing {:?}: {}", path, e)))
  }

  /// Saves config to `path`, or the standard OS location when `None`.
  pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(Self::get_path);
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
      }
    }

    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, self)
      .map_err(|e| WorkflowError::Config(format!("Failed to save config: {}", e)))?;
    Ok(path)
  }

  pub fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "delafossite", "delafossite-wf") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_partial_json_uses_defaults() {
    let cfg: Config =
      serde_json::from_str(r#"{ "pdos": { "parallel": true, "layout": "rows" } }"#).unwrap();
    assert!(cfg.pdos.parallel);
    assert_eq!(cfg.pdos.layout, SpectrumLayout::Rows);
    assert_eq!(cfg.pdos.bounds.d, -10.0);
    assert_eq!(PdosSettings::default().layout, SpectrumLayout::Auto);
    assert_eq!(cfg.pairs, PairSettings::default());
  }

  #[test]
  fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut cfg = Config::default();
    cfg.pairs.height_reference = HeightReference::TopLayer;
    cfg.pdos.bounds.f = -12.0;
    assert_eq!(cfg.save(Some(&path)).unwrap(), path);

    let back = Config::load_from(&path).unwrap();
    assert_eq!(back, cfg);
  }

  #[test]
  fn test_bad_json_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(Config::load_from(&path), Err(WorkflowError::Config(_))));
  }
}
