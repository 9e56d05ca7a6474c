// src/io/poscar.rs

use crate::error::{Result, WorkflowError};
use crate::model::{Atom, Structure};
use crate::utils::linalg;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Coordinate convention used when writing atomic positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    Cartesian,
    Direct,
}

pub fn parse(path: &Path) -> Result<Structure> {
    let text = fs::read_to_string(path)?;
    parse_str(&text).map_err(|msg| WorkflowError::parse(path, msg))
}

fn next_line<'a>(lines: &mut impl Iterator<Item = &'a str>, what: &str) -> std::result::Result<&'a str, String> {
    lines.next().ok_or_else(|| format!("Unexpected EOF: missing {}", what))
}

fn parse_f64(token: &str, what: &str) -> std::result::Result<f64, String> {
    token
        .parse::<f64>()
        .map_err(|_| format!("Invalid {}: '{}'", what, token))
}

fn parse_flag(token: &str) -> std::result::Result<bool, String> {
    match token.chars().next() {
        Some('T') | Some('t') => Ok(true),
        Some('F') | Some('f') => Ok(false),
        _ => Err(format!("Invalid selective dynamics flag: '{}'", token)),
    }
}

/// Parses POSCAR text. Positions are returned in Cartesian Angstrom.
pub fn parse_str(text: &str) -> std::result::Result<Structure, String> {
    let mut lines = text.lines();

    let comment = next_line(&mut lines, "comment")?.trim().to_string();

    // Scale
    let scale_line = next_line(&mut lines, "scale")?;
    let scale_tok = scale_line.split_whitespace().next().ok_or("Empty scale line")?;
    let scale_raw = parse_f64(scale_tok, "scale")?;

    // Lattice
    let mut lattice = [[0.0; 3]; 3];
    for row in lattice.iter_mut() {
        let line = next_line(&mut lines, "lattice vector")?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            return Err("Invalid Lattice Line".to_string());
        }
        for k in 0..3 {
            row[k] = parse_f64(parts[k], "lattice component")?;
        }
    }

    // Negative scale is the target cell volume
    let scale = if scale_raw < 0.0 {
        let det = linalg::lattice_matrix(lattice).determinant().abs();
        if det < 1e-12 {
            return Err("Degenerate lattice".to_string());
        }
        (scale_raw.abs() / det).cbrt()
    } else {
        scale_raw
    };
    for row in lattice.iter_mut() {
        for v in row.iter_mut() {
            *v *= scale;
        }
    }

    // Elements & Counts (VASP 4 files have no species line)
    let line6 = next_line(&mut lines, "species or counts")?;
    let starts_alpha = line6
        .trim()
        .chars()
        .next()
        .map(|c| c.is_alphabetic())
        .unwrap_or(false);
    let (element_names, counts_line): (Vec<String>, &str) = if starts_alpha {
        let names = line6
            .split_whitespace()
            // POTCAR-style labels such as "Fe_pv" or "O/4a0b" carry suffixes
            .map(|s| s.split(['_', '/']).next().unwrap_or(s).to_string())
            .collect();
        (names, next_line(&mut lines, "counts")?)
    } else {
        (Vec::new(), line6)
    };

    let counts: Vec<usize> = counts_line
        .split_whitespace()
        .map(|x| x.parse::<usize>().map_err(|_| format!("Invalid count: '{}'", x)))
        .collect::<std::result::Result<_, _>>()?;

    // Optional selective dynamics, then coordinate mode
    let mut mode_line = next_line(&mut lines, "coordinate mode")?;
    let selective = mode_line.trim().to_lowercase().starts_with('s');
    if selective {
        mode_line = next_line(&mut lines, "coordinate mode")?;
    }
    let mode = mode_line.trim().to_lowercase();
    let is_direct = !(mode.starts_with('c') || mode.starts_with('k'));

    // Atoms
    let mut atoms = Vec::new();
    for (elem_idx, &count) in counts.iter().enumerate() {
        let elem_name = element_names
            .get(elem_idx)
            .cloned()
            .unwrap_or_else(|| "X".to_string());
        for _ in 0..count {
            let line = next_line(&mut lines, "atom position")?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(format!("Invalid position line: '{}'", line));
            }
            let mut p = [
                parse_f64(parts[0], "x")?,
                parse_f64(parts[1], "y")?,
                parse_f64(parts[2], "z")?,
            ];

            if is_direct {
                p = linalg::frac_to_cart(p, lattice);
            } else {
                for v in p.iter_mut() {
                    *v *= scale;
                }
            }

            let flags = if selective {
                if parts.len() < 6 {
                    return Err(format!("Missing selective dynamics flags: '{}'", line));
                }
                Some([parse_flag(parts[3])?, parse_flag(parts[4])?, parse_flag(parts[5])?])
            } else {
                None
            };

            atoms.push(Atom {
                element: elem_name.clone(),
                position: p,
                selective: flags,
            });
        }
    }

    Ok(Structure {
        comment,
        lattice,
        atoms,
    })
}

/// Groups consecutive atoms sharing a symbol, preserving order.
fn species_runs(structure: &Structure) -> Vec<(String, usize)> {
    let mut runs: Vec<(String, usize)> = Vec::new();
    for atom in &structure.atoms {
        match runs.last_mut() {
            Some((el, n)) if *el == atom.element => *n += 1,
            _ => runs.push((atom.element.clone(), 1)),
        }
    }
    runs
}

pub fn write(path: &Path, structure: &Structure, mode: CoordinateMode) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_to(&mut out, structure, mode)?;
    out.flush()?;
    Ok(())
}

/// Writes a VASP 5 POSCAR. Atom order is kept as-is so pair indices stay
/// valid when the file is read back; a symbol reappearing later starts a
/// new species run.
pub fn write_to<W: Write>(out: &mut W, structure: &Structure, mode: CoordinateMode) -> Result<()> {
    // 1. Header
    let comment = if structure.comment.is_empty() {
        structure.formula()
    } else {
        structure.comment.clone()
    };
    writeln!(out, "{}", comment)?;
    writeln!(out, "1.0")?;

    // 2. Lattice Vectors
    for vec in &structure.lattice {
        writeln!(out, " {:21.16} {:21.16} {:21.16}", vec[0], vec[1], vec[2])?;
    }

    // 3. Species runs
    let runs = species_runs(structure);
    for (label, _) in &runs {
        write!(out, " {:<4}", label)?;
    }
    writeln!(out)?;
    for (_, count) in &runs {
        write!(out, " {:<4}", count)?;
    }
    writeln!(out)?;

    // 4. Atomic Positions
    let selective = structure.uses_selective_dynamics();
    if selective {
        writeln!(out, "Selective dynamics")?;
    }
    match mode {
        CoordinateMode::Cartesian => writeln!(out, "Cartesian")?,
        CoordinateMode::Direct => writeln!(out, "Direct")?,
    }

    for atom in &structure.atoms {
        let p = match mode {
            CoordinateMode::Cartesian => atom.position,
            CoordinateMode::Direct => linalg::cart_to_frac(atom.position, structure.lattice)
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "Singular lattice"))?,
        };
        write!(out, " {:21.16} {:21.16} {:21.16}", p[0], p[1], p[2])?;
        if selective {
            let f = atom.selective.unwrap_or([true; 3]);
            let t = |b: bool| if b { "T" } else { "F" };
            write!(out, " {:>3} {:>3} {:>3}", t(f[0]), t(f[1]), t(f[2]))?;
        }
        writeln!(out)?;
    }

    Ok(())
}
