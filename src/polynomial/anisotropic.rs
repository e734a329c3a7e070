use super::{Polynomial, Tensor1, Tensor2, Tensor3, Tensor4, MAX_DERIVATIVE_ORDER};
use nalgebra::Point;

/// Products `p_0(x_0) * p_1(x_1) * ... ` of 1D polynomials with a separate basis per axis.
///
/// Basis functions are numbered lexicographically with the index along axis 0 running fastest.
#[derive(Clone, Debug)]
pub struct AnisotropicPolynomials<const D: usize> {
    bases: [Vec<Polynomial>; D],
    n: usize,
}

impl<const D: usize> AnisotropicPolynomials<D> {
    pub fn new(bases: [Vec<Polynomial>; D]) -> Self {
        assert!(
            bases.iter().all(|b| !b.is_empty()),
            "Every axis needs at least one polynomial; cannot build AnisotropicPolynomials!"
        );
        let n = bases.iter().map(|b| b.len()).product();
        Self { bases, n }
    }

    /// Number of tensor product polynomials
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn basis(&self, axis: usize) -> &[Polynomial] {
        &self.bases[axis]
    }

    /// Per-axis indices of the `i`-th tensor product polynomial
    pub fn multi_index(&self, i: usize) -> [usize; D] {
        let mut rest = i;
        let mut idx = [0; D];
        for (axis, basis) in self.bases.iter().enumerate() {
            idx[axis] = rest % basis.len();
            rest /= basis.len();
        }
        idx
    }

    /// Values and derivatives of every polynomial at `p`.
    ///
    /// Each output must be either empty (not computed) or of length `n()`.
    pub fn evaluate(
        &self,
        p: &Point<f64, D>,
        values: &mut [f64],
        grads: &mut [Tensor1<D>],
        grad_grads: &mut [Tensor2<D>],
        third_derivatives: &mut [Tensor3<D>],
        fourth_derivatives: &mut [Tensor4<D>],
    ) {
        let sizes = [
            values.len(),
            grads.len(),
            grad_grads.len(),
            third_derivatives.len(),
            fourth_derivatives.len(),
        ];
        for (order, size) in sizes.iter().enumerate() {
            assert!(
                *size == 0 || *size == self.n,
                "Output of derivative order {} has length {} (expected 0 or {}); cannot evaluate polynomials!",
                order,
                size,
                self.n
            );
        }
        let n_orders = match sizes.iter().rposition(|s| *s != 0) {
            Some(highest) => highest + 1,
            None => return,
        };
        debug_assert!(n_orders <= MAX_DERIVATIVE_ORDER + 1);

        // derivatives of every 1D polynomial along every axis: [axis][poly][order]
        let table: Vec<Vec<[f64; MAX_DERIVATIVE_ORDER + 1]>> = self
            .bases
            .iter()
            .enumerate()
            .map(|(axis, basis)| {
                basis
                    .iter()
                    .map(|poly| {
                        let mut d = [0.0; MAX_DERIVATIVE_ORDER + 1];
                        poly.value_and_derivatives(p[axis], &mut d[..n_orders]);
                        d
                    })
                    .collect()
            })
            .collect();

        // product over the axes, differentiating `orders[axis]` times along each axis
        let product = |idx: &[usize; D], orders: [usize; D]| -> f64 {
            (0..D).map(|axis| table[axis][idx[axis]][orders[axis]]).product()
        };
        let orders_of = |dirs: &[usize]| -> [usize; D] {
            let mut orders = [0; D];
            for d in dirs {
                orders[*d] += 1;
            }
            orders
        };

        for i in 0..self.n {
            let idx = self.multi_index(i);

            if !values.is_empty() {
                values[i] = product(&idx, [0; D]);
            }
            if !grads.is_empty() {
                for d1 in 0..D {
                    grads[i][d1] = product(&idx, orders_of(&[d1]));
                }
            }
            if !grad_grads.is_empty() {
                for d1 in 0..D {
                    for d2 in 0..D {
                        grad_grads[i][d1][d2] = product(&idx, orders_of(&[d1, d2]));
                    }
                }
            }
            if !third_derivatives.is_empty() {
                for d1 in 0..D {
                    for d2 in 0..D {
                        for d3 in 0..D {
                            third_derivatives[i][d1][d2][d3] =
                                product(&idx, orders_of(&[d1, d2, d3]));
                        }
                    }
                }
            }
            if !fourth_derivatives.is_empty() {
                for d1 in 0..D {
                    for d2 in 0..D {
                        for d3 in 0..D {
                            for d4 in 0..D {
                                fourth_derivatives[i][d1][d2][d3][d4] =
                                    product(&idx, orders_of(&[d1, d2, d3, d4]));
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::lagrange_basis;

    fn space() -> AnisotropicPolynomials<2> {
        AnisotropicPolynomials::new([
            lagrange_basis(&[0.0, 0.5, 1.0]),
            lagrange_basis(&[0.0, 1.0]),
        ])
    }

    #[test]
    fn lexicographic_numbering() {
        let s = space();
        assert_eq!(s.n(), 6);
        assert_eq!(s.multi_index(0), [0, 0]);
        assert_eq!(s.multi_index(2), [2, 0]);
        assert_eq!(s.multi_index(4), [1, 1]);
    }

    #[test]
    fn nodal_values_and_mixed_derivatives() {
        let s = space();
        let mut values = vec![0.0; 6];
        let mut grads = vec![[0.0; 2]; 6];
        let mut hessians = vec![[[0.0; 2]; 2]; 6];

        s.evaluate(&Point::from([0.5, 1.0]), &mut values, &mut grads, &mut hessians, &mut [], &mut []);
        for (i, v) in values.iter().enumerate() {
            let expected = if i == 4 { 1.0 } else { 0.0 };
            assert!((v - expected).abs() < 1e-14);
        }

        // index 4 = L_1(x) * (y): L_1(x) = 4x(1 - x)
        let p = Point::from([0.25, 0.3]);
        s.evaluate(&p, &mut values, &mut grads, &mut hessians, &mut [], &mut []);
        assert!((values[4] - 4.0 * 0.25 * 0.75 * 0.3).abs() < 1e-14);
        assert!((grads[4][0] - 4.0 * (1.0 - 0.5) * 0.3).abs() < 1e-14);
        assert!((grads[4][1] - 4.0 * 0.25 * 0.75).abs() < 1e-14);
        assert!((hessians[4][0][0] + 8.0 * 0.3).abs() < 1e-13);
        assert!((hessians[4][0][1] - 2.0).abs() < 1e-13);
        assert_eq!(hessians[4][1][0], hessians[4][0][1]);
        assert!(hessians[4][1][1].abs() < 1e-14);
    }

    #[test]
    fn higher_derivatives_of_quartic() {
        let s = AnisotropicPolynomials::<1>::new([lagrange_basis(&[0.0, 0.25, 0.5, 0.75, 1.0])]);
        let mut third = vec![[[[0.0; 1]; 1]; 1]; 5];
        let mut fourth = vec![[[[[0.0; 1]; 1]; 1]; 1]; 5];
        s.evaluate(&Point::from([0.1]), &mut [], &mut [], &mut [], &mut third, &mut fourth);

        // the fourth derivatives of a quartic Lagrange basis are constant and sum to zero
        let sum: f64 = fourth.iter().map(|f| f[0][0][0][0]).sum();
        assert!(sum.abs() < 1e-8);
        assert!(fourth[0][0][0][0][0].abs() > 1.0);
    }

    #[test]
    #[should_panic]
    fn mismatched_buffer_panics() {
        let s = space();
        let mut values = vec![0.0; 5];
        s.evaluate(&Point::from([0.0, 0.0]), &mut values, &mut [], &mut [], &mut [], &mut []);
    }
}
