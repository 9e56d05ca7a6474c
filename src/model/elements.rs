// src/model/elements.rs

//! Periodic-table lookups: block classification and valence-electron counts.
//!
//! Valence counts follow the outermost-subshell convention: the electron
//! count of the single partially filled subshell of the ground-state
//! configuration, or of the last subshell when every subshell is full.
//! Noble gases report zero.

use crate::error::{Result, WorkflowError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

const SYMBOLS: [&str; 118] = [
    "H", "He",
    "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe",
    "Cs", "Ba",
    "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu",
    "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    "Fr", "Ra",
    "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
    "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Madelung filling order as (n, l).
const AUFBAU: [(u8, u8); 19] = [
    (1, 0), (2, 0), (2, 1), (3, 0), (3, 1), (4, 0), (3, 2), (4, 1), (5, 0), (4, 2),
    (5, 1), (6, 0), (4, 3), (5, 2), (6, 1), (7, 0), (5, 3), (6, 2), (7, 1),
];

/// Ground states that deviate from Madelung filling: (Z, [(n, l, occupancy)]).
const CONFIG_EXCEPTIONS: &[(u8, &[(u8, u8, u8)])] = &[
    (24, &[(3, 2, 5), (4, 0, 1)]),            // Cr
    (29, &[(3, 2, 10), (4, 0, 1)]),           // Cu
    (41, &[(4, 2, 4), (5, 0, 1)]),            // Nb
    (42, &[(4, 2, 5), (5, 0, 1)]),            // Mo
    (44, &[(4, 2, 7), (5, 0, 1)]),            // Ru
    (45, &[(4, 2, 8), (5, 0, 1)]),            // Rh
    (46, &[(4, 2, 10), (5, 0, 0)]),           // Pd
    (47, &[(4, 2, 10), (5, 0, 1)]),           // Ag
    (57, &[(4, 3, 0), (5, 2, 1)]),            // La
    (58, &[(4, 3, 1), (5, 2, 1)]),            // Ce
    (64, &[(4, 3, 7), (5, 2, 1)]),            // Gd
    (78, &[(5, 2, 9), (6, 0, 1)]),            // Pt
    (79, &[(5, 2, 10), (6, 0, 1)]),           // Au
    (89, &[(5, 3, 0), (6, 2, 1)]),            // Ac
    (90, &[(5, 3, 0), (6, 2, 2)]),            // Th
    (91, &[(5, 3, 2), (6, 2, 1)]),            // Pa
    (92, &[(5, 3, 3), (6, 2, 1)]),            // U
    (93, &[(5, 3, 4), (6, 2, 1)]),            // Np
    (96, &[(5, 3, 7), (6, 2, 1)]),            // Cm
    (103, &[(6, 2, 0), (7, 1, 1)]),           // Lr
];

static SYMBOL_MAP: OnceLock<HashMap<&'static str, u8>> = OnceLock::new();

fn symbol_map() -> &'static HashMap<&'static str, u8> {
    SYMBOL_MAP.get_or_init(|| {
        SYMBOLS
            .iter()
            .enumerate()
            .map(|(i, &s)| (s, (i + 1) as u8))
            .collect()
    })
}

/// Valence orbital type of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Block {
    S,
    P,
    D,
    F,
}

impl Block {
    pub fn letter(&self) -> char {
        match self {
            Block::S => 's',
            Block::P => 'p',
            Block::D => 'd',
            Block::F => 'f',
        }
    }

    /// Angular momentum quantum number.
    pub fn l(&self) -> u8 {
        match self {
            Block::S => 0,
            Block::P => 1,
            Block::D => 2,
            Block::F => 3,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    z: u8,
}

impl Element {
    /// Exact, case-sensitive symbol lookup ("Fe", not "fe").
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        symbol_map().get(symbol).map(|&z| Element { z })
    }

    pub fn symbol(&self) -> &'static str {
        SYMBOLS[(self.z - 1) as usize]
    }

    pub fn is_lanthanoid(&self) -> bool {
        (57..=71).contains(&self.z)
    }

    pub fn is_actinoid(&self) -> bool {
        (89..=103).contains(&self.z)
    }

    /// IUPAC group (1-18); `None` inside the f-block rows.
    pub fn group(&self) -> Option<u8> {
        let z = self.z;
        let g = match z {
            1 => 1,
            2 => 18,
            3..=4 => z - 2,
            5..=10 => z + 8,
            11..=12 => z - 10,
            13..=18 => z,
            19..=36 => z - 18,
            37..=54 => z - 36,
            55..=56 => z - 54,
            72..=86 => z - 68,
            87..=88 => z - 86,
            104..=118 => z - 100,
            _ => return None,
        };
        Some(g)
    }

    pub fn block(&self) -> Block {
        if (self.is_lanthanoid() || self.is_actinoid()) && self.z != 71 && self.z != 103 {
            return Block::F;
        }
        if self.is_lanthanoid() || self.is_actinoid() {
            return Block::D;
        }
        match self.group() {
            Some(1) | Some(2) => Block::S,
            Some(g) if g >= 13 => Block::P,
            _ => Block::D,
        }
    }

    /// Ground-state configuration as (n, l, electrons), ordered by (n, l).
    pub fn electron_configuration(&self) -> Vec<(u8, u8, u8)> {
        let mut occ = [0u8; AUFBAU.len()];
        let mut remaining = self.z;
        for (slot, &(_, l)) in AUFBAU.iter().enumerate() {
            if remaining == 0 {
                break;
            }
            let cap = 2 * (2 * l + 1);
            let take = remaining.min(cap);
            occ[slot] = take;
            remaining -= take;
        }

        if let Some((_, fixes)) = CONFIG_EXCEPTIONS.iter().find(|(z, _)| *z == self.z) {
            for &(n, l, count) in fixes.iter() {
                if let Some(slot) = AUFBAU.iter().position(|&s| s == (n, l)) {
                    occ[slot] = count;
                }
            }
        }

        let mut config: Vec<(u8, u8, u8)> = AUFBAU
            .iter()
            .zip(occ.iter())
            .filter(|(_, e)| **e > 0)
            .map(|(&(n, l), &e)| (n, l, e))
            .collect();
        config.sort_by_key(|&(n, l, _)| (n, l));
        config
    }

    /// Number of valence electrons in the outermost subshell.
    pub fn valence(&self) -> Result<u32> {
        if self.group() == Some(18) {
            return Ok(0);
        }
        let config = self.electron_configuration();
        let mut open: Vec<u8> = config
            .iter()
            .filter(|&&(_, l, e)| e < 2 * (2 * l + 1))
            .map(|&(_, _, e)| e)
            .collect();

        match open.len() {
            0 => config
                .last()
                .map(|&(_, _, e)| e as u32)
                .ok_or_else(|| self.lookup_error("empty electron configuration")),
            1 => Ok(open.remove(0) as u32),
            _ => Err(self.lookup_error("ambiguous valence, several open subshells")),
        }
    }

    fn lookup_error(&self, reason: &str) -> WorkflowError {
        WorkflowError::Lookup {
            symbol: self.symbol().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Looks up a symbol and returns an error naming it when unknown.
pub fn lookup(symbol: &str) -> Result<Element> {
    Element::from_symbol(symbol).ok_or_else(|| WorkflowError::Lookup {
        symbol: symbol.to_string(),
        reason: "not an element symbol".to_string(),
    })
}
