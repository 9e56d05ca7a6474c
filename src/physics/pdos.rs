// src/physics/pdos.rs

//! Windowed integration of spin-resolved projected DOS.

use crate::error::{Result, WorkflowError};
use crate::model::spectrum::spin_columns;
use crate::model::{Block, Spectrum};
use crate::utils::quadrature::simpson;
use serde::{Deserialize, Serialize};

/// Integrated electron count and, when requested, the net spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowIntegral {
    pub total: f64,
    pub spin: Option<f64>,
}

/// Lower integration bound per orbital block; the upper bound is shared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationBounds {
    pub s: f64,
    pub p: f64,
    pub d: f64,
    pub f: f64,
    pub upper: f64,
}

impl Default for IntegrationBounds {
    fn default() -> Self {
        Self {
            s: -20.0,
            p: -10.0,
            d: -10.0,
            f: -15.0,
            upper: 0.0,
        }
    }
}

impl IntegrationBounds {
    pub fn lower(&self, block: Block) -> f64 {
        match block {
            Block::S => self.s,
            Block::P => self.p,
            Block::D => self.d,
            Block::F => self.f,
        }
    }
}

/// Row range [a, b) of the integration window.
///
/// `a` is the first row with energy >= `lower`, `b` the first row with
/// energy > `upper` (the row count when no row exceeds it).
pub fn window_bounds(energy: &[f64], lower: f64, upper: f64) -> Result<(usize, usize)> {
    let empty = WorkflowError::EmptyWindow { lower, upper };
    let a = energy.iter().position(|&e| e >= lower).ok_or(empty)?;
    let b = energy.iter().position(|&e| e > upper).unwrap_or(energy.len());
    if a >= b {
        return Err(WorkflowError::EmptyWindow { lower, upper });
    }
    Ok((a, b))
}

/// Integrates the (up, down) columns over `[lower, upper]`.
///
/// Down-spin densities are stored negative, so the total is
/// `up + |down|`. For p-block atoms the s columns are added over every row
/// below `b`, ignoring `lower`: shallow s states of p-block elements are
/// always counted in full. With `with_spin`, the net spin is
/// `|up + down|` using the signed down integral.
///
/// An energy axis that decreases anywhere, or a non-finite result, is a
/// [`WorkflowError::MalformedSpectrum`].
pub fn integrate_window(
    spectrum: &Spectrum,
    up_idx: usize,
    down_idx: usize,
    lower: f64,
    upper: f64,
    block: Block,
    with_spin: bool,
) -> Result<WindowIntegral> {
    let energy = spectrum.energy()?;
    let up = spectrum.column(up_idx)?;
    let down = spectrum.column(down_idx)?;

    // NaN energies fail the comparison too
    if let Some(i) = (1..energy.len()).find(|&i| !(energy[i - 1] <= energy[i])) {
        return Err(WorkflowError::MalformedSpectrum(format!(
            "energy decreases at row {} ({} after {})",
            i,
            energy[i],
            energy[i - 1]
        )));
    }

    let (a, b) = window_bounds(energy, lower, upper)?;

    let mut up_e = simpson(&up[a..b], &energy[a..b]);
    let mut down_e = simpson(&down[a..b], &energy[a..b]);

    if block == Block::P {
        let (s_up_idx, s_down_idx) = spin_columns(Block::S);
        let s_up = spectrum.column(s_up_idx)?;
        let s_down = spectrum.column(s_down_idx)?;
        up_e += simpson(&s_up[..b], &energy[..b]);
        down_e += simpson(&s_down[..b], &energy[..b]);
    }

    let total = up_e + down_e.abs();
    if !total.is_finite() {
        return Err(WorkflowError::MalformedSpectrum(format!(
            "non-finite integral over [{}, {}]",
            lower, upper
        )));
    }
    let spin = if with_spin {
        Some((up_e + down_e).abs())
    } else {
        None
    };

    Ok(WindowIntegral { total, spin })
}

/// Integrates the block's own columns with the configured bounds.
pub fn integrate_block(
    spectrum: &Spectrum,
    block: Block,
    bounds: &IntegrationBounds,
    with_spin: bool,
) -> Result<WindowIntegral> {
    let (up_idx, down_idx) = spin_columns(block);
    integrate_window(
        spectrum,
        up_idx,
        down_idx,
        bounds.lower(block),
        bounds.upper,
        block,
        with_spin,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Energies from -20 to 5 in 0.25 steps; every density column is
    /// `up`/`down` constants.
    fn flat_spectrum(s: (f64, f64), p: (f64, f64), d: (f64, f64)) -> Spectrum {
        let energy: Vec<f64> = (0..=100).map(|i| -20.0 + 0.25 * i as f64).collect();
        let n = energy.len();
        Spectrum::from_columns(vec![
            energy,
            vec![s.0; n],
            vec![s.1; n],
            vec![p.0; n],
            vec![p.1; n],
            vec![d.0; n],
            vec![d.1; n],
            vec![0.0; n],
            vec![0.0; n],
        ])
        .unwrap()
    }

    #[test]
    fn test_constant_density_width_ten() {
        let spec = flat_spectrum((0.0, 0.0), (0.0, 0.0), (1.0, 0.0));
        let r = integrate_window(&spec, 5, 6, -10.0, 0.0, Block::D, false).unwrap();
        assert!((r.total - 10.0).abs() < 1e-6);
        assert!(r.spin.is_none());
    }

    #[test]
    fn test_spin_and_down_sign() {
        let spec = flat_spectrum((0.0, 0.0), (0.0, 0.0), (0.5, -0.3));
        let r = integrate_window(&spec, 5, 6, -10.0, 0.0, Block::D, true).unwrap();
        assert!((r.total - 8.0).abs() < 1e-9);
        assert!((r.spin.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_p_block_adds_full_range_s() {
        // s columns span -20..0 (width 20), p window spans -10..0 (width 10)
        let spec = flat_spectrum((0.1, -0.1), (0.2, -0.2), (9.0, -9.0));
        let r = integrate_window(&spec, 3, 4, -10.0, 0.0, Block::P, true).unwrap();
        // up = 2 + 2, down = -2 - 2
        assert!((r.total - 8.0).abs() < 1e-9);
        assert!(r.spin.unwrap().abs() < 1e-9);

        // Same columns for a d-block caller: no s correction
        let r = integrate_window(&spec, 3, 4, -10.0, 0.0, Block::D, false).unwrap();
        assert!((r.total - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_density_exact() {
        let energy: Vec<f64> = (0..=40).map(|i| -10.0 + 0.5 * i as f64).collect();
        let up: Vec<f64> = energy.iter().map(|e| e + 10.0).collect();
        let n = energy.len();
        let spec = Spectrum::from_columns(vec![energy, up, vec![0.0; n]]).unwrap();
        let r = integrate_window(&spec, 1, 2, -10.0, 0.0, Block::S, false).unwrap();
        assert!((r.total - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_bounds_edges() {
        let e = [-3.0, -2.0, -1.0, 0.0, 1.0];
        assert_eq!(window_bounds(&e, -2.0, 0.0).unwrap(), (1, 4));
        // Upper bound beyond the data: window runs to the end
        assert_eq!(window_bounds(&e, -2.0, 5.0).unwrap(), (1, 5));
    }

    #[test]
    fn test_empty_window_is_error() {
        let e = [-3.0, -2.0, -1.0];
        // Lower bound above every energy
        assert!(matches!(
            window_bounds(&e, 1.0, 2.0),
            Err(WorkflowError::EmptyWindow { .. })
        ));
        // a == b: nothing between the bounds
        assert!(matches!(
            window_bounds(&e, -1.5, -1.8),
            Err(WorkflowError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn test_unsorted_energy_rejected() {
        let energy = vec![-10.0, -5.0, -7.0, -2.0, 0.0];
        let n = energy.len();
        let spec = Spectrum::from_columns(vec![energy, vec![1.0; n], vec![0.0; n]]).unwrap();
        let err = integrate_window(&spec, 1, 2, -10.0, 0.0, Block::S, false).unwrap_err();
        assert!(matches!(err, WorkflowError::MalformedSpectrum(_)));
    }

    #[test]
    fn test_unsorted_rows_outside_window_rejected() {
        let energy = vec![-15.0, -18.0, -10.0, -5.0, 0.0, 2.0, 1.0];
        let n = energy.len();
        let spec = Spectrum::from_columns(vec![
            energy,
            vec![0.0; n],
            vec![0.0; n],
            vec![1.0; n],
            vec![0.0; n],
        ])
        .unwrap();
        for block in [Block::P, Block::D] {
            let err = integrate_window(&spec, 3, 4, -10.0, 0.0, block, false).unwrap_err();
            assert!(matches!(err, WorkflowError::MalformedSpectrum(_)));
        }
    }

    #[test]
    fn test_non_finite_density_rejected() {
        let energy: Vec<f64> = (0..=4).map(|i| -4.0 + i as f64).collect();
        let spec = Spectrum::from_columns(vec![
            energy,
            vec![1.0, f64::NAN, 1.0, 1.0, 1.0],
            vec![0.0; 5],
        ])
        .unwrap();
        let err = integrate_window(&spec, 1, 2, -4.0, 0.0, Block::S, false).unwrap_err();
        assert!(matches!(err, WorkflowError::MalformedSpectrum(_)));
    }

    #[test]
    fn test_missing_columns() {
        let spec = Spectrum::from_columns(vec![vec![-1.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]]).unwrap();
        let err = integrate_block(&spec, Block::D, &IntegrationBounds::default(), true).unwrap_err();
        assert!(matches!(err, WorkflowError::MissingColumn { requested: 5, .. }));
    }
}
