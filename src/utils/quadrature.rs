// src/utils/quadrature.rs

//! Composite Simpson quadrature on sampled data.

/// Integrates `y(x)` sampled on a (possibly non-uniform) grid.
///
/// Odd point counts use the three-point parabolic rule on each pair of
/// intervals. Even counts integrate the first `n - 1` points that way and
/// add the Cartwright correction for the last interval, so quadratics are
/// integrated exactly either way. One point integrates to zero and two
/// points fall back to the trapezoid rule, as does any interval pair that
/// contains a zero-width step (repeated abscissa).
///
/// Panics if `x` and `y` differ in length.
pub fn simpson(y: &[f64], x: &[f64]) -> f64 {
    assert_eq!(y.len(), x.len(), "simpson: x and y lengths differ");

    let n = y.len();
    match n {
        0 | 1 => return 0.0,
        2 => return 0.5 * (x[1] - x[0]) * (y[0] + y[1]),
        _ => {}
    }

    let odd_end = if n % 2 == 1 { n } else { n - 1 };
    let mut s = 0.0;

    for i in (0..odd_end - 2).step_by(2) {
        let h0 = x[i + 1] - x[i];
        let h1 = x[i + 2] - x[i + 1];
        s += if h0 == 0.0 || h1 == 0.0 {
            0.5 * h0 * (y[i] + y[i + 1]) + 0.5 * h1 * (y[i + 1] + y[i + 2])
        } else {
            parabolic_segment(h0, h1, y[i], y[i + 1], y[i + 2])
        };
    }

    if n % 2 == 0 {
        let h1 = x[n - 2] - x[n - 3];
        let h2 = x[n - 1] - x[n - 2];
        if h1 == 0.0 || h2 == 0.0 {
            return s + 0.5 * h2 * (y[n - 2] + y[n - 1]);
        }
        let alpha = (2.0 * h2 * h2 + 3.0 * h1 * h2) / (6.0 * (h1 + h2));
        let beta = (h2 * h2 + 3.0 * h1 * h2) / (6.0 * h1);
        let eta = h2 * h2 * h2 / (6.0 * h1 * (h1 + h2));
        s += alpha * y[n - 1] + beta * y[n - 2] - eta * y[n - 3];
    }

    s
}

fn parabolic_segment(h0: f64, h1: f64, y0: f64, y1: f64, y2: f64) -> f64 {
    let hsum = h0 + h1;
    let hprod = h0 * h1;
    let h0_over_h1 = h0 / h1;
    hsum / 6.0 * (y0 * (2.0 - 1.0 / h0_over_h1) + y1 * (hsum * hsum / hprod) + y2 * (2.0 - h0_over_h1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(a: f64, b: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| a + (b - a) * i as f64 / (n - 1) as f64).collect()
    }

    #[test]
    fn test_constant_over_width_ten() {
        let x = grid(-10.0, 0.0, 101);
        let y = vec![1.0; x.len()];
        assert!((simpson(&y, &x) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_quadratic_exact_odd_and_even() {
        for n in [5usize, 6, 11, 12] {
            let x = grid(0.0, 3.0, n);
            let y: Vec<f64> = x.iter().map(|v| v * v).collect();
            let got = simpson(&y, &x);
            assert!((got - 9.0).abs() < 1e-10, "n={} got {}", n, got);
        }
    }

    #[test]
    fn test_non_uniform_quadratic() {
        let x = vec![0.0, 0.3, 1.0, 1.2, 2.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v * v + 1.0).collect();
        // integral of 3x^2 + 1 on [0, 2] = 10
        assert!((simpson(&y, &x) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_short_inputs() {
        assert_eq!(simpson(&[4.0], &[1.0]), 0.0);
        assert!((simpson(&[1.0, 3.0], &[0.0, 2.0]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_abscissa_stays_finite() {
        // Constant 1 over [0, 4] with a duplicated point at x = 2
        let x = [0.0, 1.0, 2.0, 2.0, 3.0, 4.0];
        let y = [1.0; 6];
        let r = simpson(&y, &x);
        assert!(r.is_finite());
        assert!((r - 4.0).abs() < 1e-12);

        // Duplicate in the last interval of an even-count grid
        let x = [0.0, 1.0, 2.0, 2.0];
        let r = simpson(&[1.0; 4], &x);
        assert!((r - 2.0).abs() < 1e-12);

        let x = [0.0, 1.0, 1.0, 2.0];
        let r = simpson(&[1.0; 4], &x);
        assert!((r - 2.0).abs() < 1e-12);
    }
}
