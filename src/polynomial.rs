/// Tensor products of 1D polynomial bases with a different basis along every axis
pub mod anisotropic;

pub use anisotropic::AnisotropicPolynomials;

/// Gradient of a scalar (or a vector value)
pub type Tensor1<const D: usize> = [f64; D];
/// Rank 2 derivative tensor
pub type Tensor2<const D: usize> = [[f64; D]; D];
/// Rank 3 derivative tensor
pub type Tensor3<const D: usize> = [[[f64; D]; D]; D];
/// Rank 4 derivative tensor
pub type Tensor4<const D: usize> = [[[[f64; D]; D]; D]; D];
/// Rank 5 derivative tensor
pub type Tensor5<const D: usize> = [[[[[f64; D]; D]; D]; D]; D];

/// Highest derivative order supported by the evaluation routines
pub const MAX_DERIVATIVE_ORDER: usize = 4;

/// A 1D polynomial in product form `scale * (x - r_0) * (x - r_1) * ...`
///
/// Lagrange polynomials are kept in this form: expanding them into monomials is
/// ill-conditioned on Gauss-Lobatto nodes once the degree grows.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    roots: Vec<f64>,
    scale: f64,
}

impl Polynomial {
    pub fn from_roots(roots: Vec<f64>, scale: f64) -> Self {
        Self { roots, scale }
    }

    pub fn constant(value: f64) -> Self {
        Self::from_roots(Vec::new(), value)
    }

    pub fn roots(&self) -> &[f64] {
        &self.roots
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn degree(&self) -> usize {
        self.roots.len()
    }

    pub fn value(&self, x: f64) -> f64 {
        self.roots.iter().fold(self.scale, |acc, r| acc * (x - r))
    }

    /// Fill `out[k]` with the `k`-th derivative at `x`, for every `k < out.len()`
    pub fn value_and_derivatives(&self, x: f64, out: &mut [f64]) {
        let m = out.len();
        if m == 0 {
            return;
        }
        out.fill(0.0);
        out[0] = self.scale;

        // Leibniz rule, one linear factor at a time: (p (x - r))^(k) = p^(k) (x - r) + k p^(k-1)
        for r in self.roots.iter() {
            let t = x - r;
            for k in (1..m).rev() {
                out[k] = out[k] * t + k as f64 * out[k - 1];
            }
            out[0] *= t;
        }
    }
}

/// The Lagrange basis over a set of distinct nodes: `L_i(x_j) = δ_ij`
pub fn lagrange_basis(nodes: &[f64]) -> Vec<Polynomial> {
    assert!(!nodes.is_empty(), "Lagrange basis needs at least one node!");
    (0..nodes.len())
        .map(|i| {
            let roots: Vec<f64> = nodes
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, x_j)| *x_j)
                .collect();
            let denominator: f64 = roots.iter().map(|x_j| nodes[i] - x_j).product();
            assert!(
                denominator != 0.0,
                "Lagrange nodes must be distinct; cannot build Lagrange basis!"
            );
            Polynomial::from_roots(roots, 1.0 / denominator)
        })
        .collect()
}
