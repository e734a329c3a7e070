/// Placement of lower dimensional rules onto the faces and subfaces of the reference cell
pub mod projection;

use nalgebra::{DMatrix, Point, SymmetricEigen};
use std::cmp::Ordering;

/// A set of points and weights on the reference cell `[0, 1]^D`
#[derive(Clone, Debug, PartialEq)]
pub struct Quadrature<const D: usize> {
    points: Vec<Point<f64, D>>,
    weights: Vec<f64>,
}

impl<const D: usize> Quadrature<D> {
    pub fn new(points: Vec<Point<f64, D>>, weights: Vec<f64>) -> Self {
        assert_eq!(
            points.len(),
            weights.len(),
            "Number of points and weights must match; cannot build Quadrature!"
        );
        Self { points, weights }
    }

    /// Tensor product of one 1D rule per axis. The index of axis 0 runs fastest.
    pub fn anisotropic(rules: [&Quadrature<1>; D]) -> Self {
        let n_points: usize = rules.iter().map(|r| r.size()).product();
        let mut points = Vec::with_capacity(n_points);
        let mut weights = Vec::with_capacity(n_points);

        for q in 0..n_points {
            let mut rest = q;
            let mut coords = [0.0; D];
            let mut weight = 1.0;
            for (axis, rule) in rules.iter().enumerate() {
                let idx = rest % rule.size();
                rest /= rule.size();
                coords[axis] = rule.points[idx][0];
                weight *= rule.weights[idx];
            }
            points.push(Point::from(coords));
            weights.push(weight);
        }

        Self { points, weights }
    }

    /// Tensor product of the same 1D rule along every axis
    pub fn isotropic(rule: &Quadrature<1>) -> Self {
        Self::anisotropic([rule; D])
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn point(&self, i: usize) -> &Point<f64, D> {
        &self.points[i]
    }

    #[inline]
    pub fn weight(&self, i: usize) -> f64 {
        self.weights[i]
    }

    pub fn points(&self) -> &[Point<f64, D>] {
        &self.points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Quadrature<1> {
    /// Gauss-Legendre rule with `n` points
    pub fn gauss(n: usize) -> Self {
        assert!(n > 0, "Gauss rule needs at least one point; cannot build Quadrature!");
        let (points, weights) = gauss_quadrature_points(n);
        Self::from_unit_interval(&points, &weights)
    }

    /// Gauss-Lobatto rule with `n` points (including both end points)
    pub fn gauss_lobatto(n: usize) -> Self {
        assert!(
            n >= 2,
            "Gauss-Lobatto rule needs at least two points; cannot build Quadrature!"
        );
        let (points, weights) = gauss_lobatto_points(n);
        Self::from_unit_interval(&points, &weights)
    }

    /// One point at the center of the interval
    pub fn midpoint() -> Self {
        Self {
            points: vec![Point::from([0.5])],
            weights: vec![1.0],
        }
    }

    /// Abscissae of a 1D rule
    pub fn coordinates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p[0]).collect()
    }

    // map a rule on [-1, 1] onto [0, 1]
    fn from_unit_interval(points: &[f64], weights: &[f64]) -> Self {
        Self {
            points: points.iter().map(|x| Point::from([0.5 * (x + 1.0)])).collect(),
            weights: weights.iter().map(|w| 0.5 * w).collect(),
        }
    }
}

/// Off-diagonal of the (zero-diagonal) Jacobi matrix whose eigenvalues are the roots of the
/// `n`-th orthogonal polynomial of a symmetric weight on [-1, 1]
#[derive(Clone, Copy, Debug)]
enum Recurrence {
    /// Legendre polynomials (weight 1)
    Legendre,
    /// Jacobi(1, 1) polynomials (weight 1 - x^2), whose roots are those of `P'_{n+1}`
    Jacobi11,
}

impl Recurrence {
    fn beta(&self, k: usize) -> f64 {
        let k = k as f64;
        match self {
            Self::Legendre => k / (4.0 * k * k - 1.0).sqrt(),
            Self::Jacobi11 => (k * (k + 2.0) / ((2.0 * k + 1.0) * (2.0 * k + 3.0))).sqrt(),
        }
    }

    /// Golub-Welsch: sorted roots of the `n`-th polynomial with the squared first components
    /// of the normalized eigenvectors (the weights, up to the total mass of the weight function)
    fn roots(&self, n: usize) -> Vec<(f64, f64)> {
        if n == 0 {
            return Vec::new();
        }
        let jacobi = DMatrix::from_fn(n, n, |r, c| {
            if r.abs_diff(c) == 1 {
                self.beta(r.max(c))
            } else {
                0.0
            }
        });
        let eigen = SymmetricEigen::new(jacobi);

        let mut roots: Vec<(f64, f64)> = eigen
            .eigenvalues
            .iter()
            .zip(eigen.eigenvectors.row(0).iter())
            .map(|(x, v0)| (*x, v0 * v0))
            .collect();
        roots.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        symmetrize(&mut roots);
        roots
    }
}

// both recurrences have weights symmetric about 0; make the computed nodes exactly symmetric
fn symmetrize(roots: &mut [(f64, f64)]) {
    let n = roots.len();
    for i in 0..n / 2 {
        let x = 0.5 * (roots[n - 1 - i].0 - roots[i].0);
        roots[i].0 = -x;
        roots[n - 1 - i].0 = x;
    }
    if n % 2 == 1 {
        roots[n / 2].0 = 0.0;
    }
}

fn gauss_quadrature_points(n: usize) -> (Vec<f64>, Vec<f64>) {
    Recurrence::Legendre
        .roots(n)
        .into_iter()
        .map(|(x, v0_sq)| (x, 2.0 * v0_sq))
        .unzip()
}

fn gauss_lobatto_points(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut points = Vec::with_capacity(n);
    points.push(-1.0);
    points.extend(Recurrence::Jacobi11.roots(n - 2).into_iter().map(|(x, _)| x));
    points.push(1.0);

    let nf = n as f64;
    let weights = points
        .iter()
        .map(|x| 2.0 / (nf * (nf - 1.0) * legendre(n - 1, *x).powi(2)))
        .collect();

    (points, weights)
}

fn legendre(n: usize, x: f64) -> f64 {
    let (mut p_prev, mut p) = (1.0, x);
    if n == 0 {
        return p_prev;
    }
    for k in 2..=n {
        let k = k as f64;
        let p_next = ((2.0 * k - 1.0) * x * p - (k - 1.0) * p_prev) / k;
        p_prev = p;
        p = p_next;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_ACCURACY: f64 = 1e-13;

    fn integrate_monomial(rule: &Quadrature<1>, k: i32) -> f64 {
        rule.points()
            .iter()
            .zip(rule.weights())
            .map(|(p, w)| w * p[0].powi(k))
            .sum()
    }

    #[test]
    fn gauss_rule_exactness() {
        for n in 1..=8 {
            let rule = Quadrature::gauss(n);
            assert_eq!(rule.size(), n);
            for k in 0..(2 * n as i32) {
                let exact = 1.0 / (k as f64 + 1.0);
                assert!((integrate_monomial(&rule, k) - exact).abs() < QUAD_ACCURACY);
            }
        }
    }

    #[test]
    fn gauss_lobatto_rule_exactness() {
        for n in 2..=8 {
            let rule = Quadrature::gauss_lobatto(n);
            assert_eq!(rule.size(), n);
            assert_eq!(rule.point(0)[0], 0.0);
            assert_eq!(rule.point(n - 1)[0], 1.0);
            for k in 0..(2 * n as i32 - 2) {
                let exact = 1.0 / (k as f64 + 1.0);
                assert!((integrate_monomial(&rule, k) - exact).abs() < QUAD_ACCURACY);
            }
        }
    }

    #[test]
    fn gauss_lobatto_known_points() {
        let rule = Quadrature::gauss_lobatto(4);
        let inner = 0.5 - 0.5 / 5.0_f64.sqrt();
        assert!((rule.point(1)[0] - inner).abs() < 1e-14);
        assert!((rule.point(2)[0] - (1.0 - inner)).abs() < 1e-14);

        let odd = Quadrature::gauss_lobatto(5);
        assert_eq!(odd.point(2)[0], 0.5);
    }

    #[test]
    fn anisotropic_rule_ordering() {
        let high = Quadrature::gauss_lobatto(3);
        let low = Quadrature::midpoint();
        let quad = Quadrature::<2>::anisotropic([&high, &low]);

        assert_eq!(quad.size(), 3);
        for i in 0..3 {
            assert_eq!(quad.point(i)[0], high.point(i)[0]);
            assert_eq!(quad.point(i)[1], 0.5);
        }
        assert!((quad.weights().iter().sum::<f64>() - 1.0).abs() < QUAD_ACCURACY);

        let cube = Quadrature::<3>::isotropic(&Quadrature::gauss(2));
        assert_eq!(cube.size(), 8);
        assert!(cube.point(1)[0] > cube.point(0)[0]);
        assert_eq!(cube.point(1)[1], cube.point(0)[1]);
    }
}
