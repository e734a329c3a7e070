use super::numbering::{invert_permutation, lexicographic_to_hierarchic, renumber_aniso};
use crate::polynomial::{
    lagrange_basis, AnisotropicPolynomials, Polynomial, Tensor1, Tensor2, Tensor3, Tensor4,
    Tensor5,
};
use crate::quadrature::Quadrature;
use nalgebra::Point;

/// The vector valued polynomial space of the nodal Raviart-Thomas element.
///
/// Component `d` is the tensor product of Lagrange polynomials on `degree + 2` Gauss-Lobatto
/// points along `x_d` and on `degree + 1` Gauss-Lobatto points (or the midpoint, for degree 0)
/// along the other axes. Only the space of component 0 is stored; the other components
/// evaluate it at a rotated point.
#[derive(Clone, Debug)]
pub struct RtPolynomials<const D: usize> {
    degree: usize,
    space: AnisotropicPolynomials<D>,
    lexicographic_to_hierarchic: Vec<usize>,
    hierarchic_to_lexicographic: Vec<usize>,
    renumber_aniso: [Vec<usize>; D],
}

impl<const D: usize> RtPolynomials<D> {
    pub fn new(degree: usize) -> Self {
        assert!(
            (1..=3).contains(&D),
            "RT nodal polynomials are only defined for 1 <= dim <= 3; got {}!",
            D
        );
        let space = AnisotropicPolynomials::new(create_rt_polynomials::<D>(degree));
        let lexicographic_to_hierarchic = lexicographic_to_hierarchic::<D>(degree + 1);
        let hierarchic_to_lexicographic = invert_permutation(&lexicographic_to_hierarchic);

        Self {
            degree,
            space,
            lexicographic_to_hierarchic,
            hierarchic_to_lexicographic,
            renumber_aniso: renumber_aniso::<D>(degree),
        }
    }

    /// Number of vector valued polynomials for a given degree
    pub fn n_polynomials(degree: usize) -> usize {
        D * (degree + 2) * (degree + 1).pow(D as u32 - 1)
    }

    #[inline]
    pub fn n(&self) -> usize {
        D * self.space.n()
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The shared scalar space of component 0
    pub fn component_space(&self) -> &AnisotropicPolynomials<D> {
        &self.space
    }

    pub fn lexicographic_to_hierarchic(&self) -> &[usize] {
        &self.lexicographic_to_hierarchic
    }

    pub fn hierarchic_to_lexicographic(&self) -> &[usize] {
        &self.hierarchic_to_lexicographic
    }

    pub fn renumber_aniso(&self, component: usize) -> &[usize] {
        &self.renumber_aniso[component]
    }

    /// Values and derivatives (up to fourth order) of every polynomial at `unit_point`.
    ///
    /// Outputs are indexed `[function][component][derivative directions...]`. Each output
    /// must be either empty (not computed) or of length `n()`.
    pub fn evaluate(
        &self,
        unit_point: &Point<f64, D>,
        values: &mut [Tensor1<D>],
        grads: &mut [Tensor2<D>],
        grad_grads: &mut [Tensor3<D>],
        third_derivatives: &mut [Tensor4<D>],
        fourth_derivatives: &mut [Tensor5<D>],
    ) {
        let n = self.n();
        let sizes = [
            values.len(),
            grads.len(),
            grad_grads.len(),
            third_derivatives.len(),
            fourth_derivatives.len(),
        ];
        for (order, size) in sizes.iter().enumerate() {
            assert!(
                *size == 0 || *size == n,
                "Output of derivative order {} has length {} (expected 0 or {}); cannot evaluate RT polynomials!",
                order,
                size,
                n
            );
        }

        // only one component of each function is nonzero
        values.fill([0.0; D]);
        grads.fill([[0.0; D]; D]);
        grad_grads.fill([[[0.0; D]; D]; D]);
        third_derivatives.fill([[[[0.0; D]; D]; D]; D]);
        fourth_derivatives.fill([[[[[0.0; D]; D]; D]; D]; D]);

        let n_sub = self.space.n();
        let sized = |len: usize| if len == 0 { 0 } else { n_sub };
        let mut p_values = vec![0.0; sized(values.len())];
        let mut p_grads = vec![[0.0; D]; sized(grads.len())];
        let mut p_grad_grads = vec![[[0.0; D]; D]; sized(grad_grads.len())];
        let mut p_third = vec![[[[0.0; D]; D]; D]; sized(third_derivatives.len())];
        let mut p_fourth = vec![[[[[0.0; D]; D]; D]; D]; sized(fourth_derivatives.len())];

        for d in 0..D {
            // component d is polynomial of one degree higher in x_d; rotate x_d onto axis 0
            let p = rotate(unit_point, d);
            self.space.evaluate(
                &p,
                &mut p_values,
                &mut p_grads,
                &mut p_grad_grads,
                &mut p_third,
                &mut p_fourth,
            );

            let target = |i: usize| self.lexicographic_to_hierarchic[i + d * n_sub];
            let source = |i: usize| self.renumber_aniso[d][i];
            // rotated axis a is cell axis (a + d) % D
            let ax = |a: usize| (a + d) % D;

            for i in 0..p_values.len() {
                values[target(i)][d] = p_values[source(i)];
            }

            for i in 0..p_grads.len() {
                for d1 in 0..D {
                    grads[target(i)][d][ax(d1)] = p_grads[source(i)][d1];
                }
            }

            for i in 0..p_grad_grads.len() {
                for d1 in 0..D {
                    for d2 in 0..D {
                        grad_grads[target(i)][d][ax(d1)][ax(d2)] = p_grad_grads[source(i)][d1][d2];
                    }
                }
            }

            for i in 0..p_third.len() {
                for d1 in 0..D {
                    for d2 in 0..D {
                        for d3 in 0..D {
                            third_derivatives[target(i)][d][ax(d1)][ax(d2)][ax(d3)] =
                                p_third[source(i)][d1][d2][d3];
                        }
                    }
                }
            }

            for i in 0..p_fourth.len() {
                for d1 in 0..D {
                    for d2 in 0..D {
                        for d3 in 0..D {
                            for d4 in 0..D {
                                fourth_derivatives[target(i)][d][ax(d1)][ax(d2)][ax(d3)][ax(d4)] =
                                    p_fourth[source(i)][d1][d2][d3][d4];
                            }
                        }
                    }
                }
            }
        }
    }

    /// Vector values of every polynomial at `unit_point`
    pub fn values(&self, unit_point: &Point<f64, D>) -> Vec<Tensor1<D>> {
        let mut values = vec![[0.0; D]; self.n()];
        self.evaluate(unit_point, &mut values, &mut [], &mut [], &mut [], &mut []);
        values
    }

    /// The generalized support points, in hierarchic order.
    ///
    /// The point of each DoF is the node of that DoF's own Lagrange product: the anisotropic
    /// Gauss-Lobatto grid of the shared space, taken through the same renumbering as
    /// [`RtPolynomials::evaluate`] and rotated back into cell coordinates.
    pub fn support_points(&self) -> Vec<Point<f64, D>> {
        let (high, low) = rt_point_rules(self.degree);
        let quad = Quadrature::<D>::anisotropic(std::array::from_fn(|axis| {
            if axis == 0 {
                &high
            } else {
                &low
            }
        }));

        let n_sub = self.space.n();
        let mut points = vec![Point::origin(); self.n()];
        for d in 0..D {
            for i in 0..n_sub {
                let q = quad.point(self.renumber_aniso[d][i]);
                points[self.lexicographic_to_hierarchic[i + d * n_sub]] = unrotate(q, d);
            }
        }
        points
    }
}

/// The point `p` with coordinates cycled by `by` positions: `result[c] = p[(c + by) % D]`
pub fn rotate<const D: usize>(p: &Point<f64, D>, by: usize) -> Point<f64, D> {
    let mut rotated = [0.0; D];
    for (c, r) in rotated.iter_mut().enumerate() {
        *r = p[(c + by) % D];
    }
    Point::from(rotated)
}

/// Inverse of [`rotate`]
pub fn unrotate<const D: usize>(q: &Point<f64, D>, by: usize) -> Point<f64, D> {
    let mut p = [0.0; D];
    for c in 0..D {
        p[(c + by) % D] = q[c];
    }
    Point::from(p)
}

/// 1D rules for the continuous ("high") and transverse ("low") directions
pub(super) fn rt_point_rules(degree: usize) -> (Quadrature<1>, Quadrature<1>) {
    let high = Quadrature::gauss_lobatto(degree + 2);
    let low = if degree == 0 {
        Quadrature::midpoint()
    } else {
        Quadrature::gauss_lobatto(degree + 1)
    };
    (high, low)
}

fn create_rt_polynomials<const D: usize>(degree: usize) -> [Vec<Polynomial>; D] {
    let (high, low) = rt_point_rules(degree);
    let high_basis = lagrange_basis(&high.coordinates());
    let low_basis = lagrange_basis(&low.coordinates());

    std::array::from_fn(|axis| {
        if axis == 0 {
            high_basis.clone()
        } else {
            low_basis.clone()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FD_STEP: f64 = 1e-6;

    fn sample_points_2d() -> Vec<Point<f64, 2>> {
        vec![
            Point::from([0.1, 0.2]),
            Point::from([0.5, 0.5]),
            Point::from([0.73, 0.31]),
            Point::from([0.9, 0.05]),
        ]
    }

    #[test]
    fn polynomial_counts() {
        for degree in 0..=3 {
            assert_eq!(RtPolynomials::<2>::new(degree).n(), RtPolynomials::<2>::n_polynomials(degree));
            assert_eq!(RtPolynomials::<3>::new(degree).n(), RtPolynomials::<3>::n_polynomials(degree));
        }
        assert_eq!(RtPolynomials::<2>::n_polynomials(0), 4);
        assert_eq!(RtPolynomials::<3>::n_polynomials(1), 36);
    }

    #[test]
    fn rotation_round_trip() {
        let p = Point::from([0.1, 0.2, 0.3]);
        assert_eq!(rotate(&p, 1).coords.as_slice(), &[0.2, 0.3, 0.1]);
        assert_eq!(rotate(&p, 2).coords.as_slice(), &[0.3, 0.1, 0.2]);
        for by in 0..3 {
            assert_eq!(unrotate(&rotate(&p, by), by), p);
        }
    }

    /// Vector component carried by hierarchic DoF `h` of an element with `n_face` DoFs per face
    fn component_of<const D: usize>(h: usize, degree: usize, n_face: usize) -> usize {
        let n_face_dofs = 2 * D * n_face;
        if h < n_face_dofs {
            h / (2 * n_face)
        } else {
            (h - n_face_dofs) / (degree * n_face)
        }
    }

    fn assert_nodal<const D: usize>(degree: usize) {
        let rt = RtPolynomials::<D>::new(degree);
        let eps = 2e-13 * (degree + 1) as f64 * (D - 1).max(1) as f64;
        let n_face = (degree + 1).pow(D as u32 - 1);
        for (h, p) in rt.support_points().iter().enumerate() {
            let component = component_of::<D>(h, degree, n_face);
            for (g, v) in rt.values(p).iter().enumerate() {
                let expected = if g == h { 1.0 } else { 0.0 };
                assert!(
                    (v[component] - expected).abs() < eps,
                    "dim {} degree {} dof {} fn {}",
                    D,
                    degree,
                    h,
                    g
                );
            }
        }
    }

    #[test]
    fn basis_is_nodal_at_support_points() {
        for degree in 0..=12 {
            assert_nodal::<2>(degree);
        }
    }

    #[test]
    fn nodal_3d() {
        for degree in 0..=4 {
            assert_nodal::<3>(degree);
        }
    }

    #[test]
    fn gradients_match_finite_differences() {
        for degree in 0..=2 {
            let rt = RtPolynomials::<2>::new(degree);
            let n = rt.n();
            for p in sample_points_2d() {
                let mut grads = vec![[[0.0; 2]; 2]; n];
                let mut hessians = vec![[[[0.0; 2]; 2]; 2]; n];
                rt.evaluate(&p, &mut [], &mut grads, &mut hessians, &mut [], &mut []);

                for axis in 0..2 {
                    let mut plus = p;
                    let mut minus = p;
                    plus[axis] += FD_STEP;
                    minus[axis] -= FD_STEP;
                    let (vp, vm) = (rt.values(&plus), rt.values(&minus));

                    for i in 0..n {
                        for c in 0..2 {
                            let fd = (vp[i][c] - vm[i][c]) / (2.0 * FD_STEP);
                            assert!((fd - grads[i][c][axis]).abs() < 1e-6);
                        }
                    }

                    let mut gp = vec![[[0.0; 2]; 2]; n];
                    let mut gm = vec![[[0.0; 2]; 2]; n];
                    rt.evaluate(&plus, &mut [], &mut gp, &mut [], &mut [], &mut []);
                    rt.evaluate(&minus, &mut [], &mut gm, &mut [], &mut [], &mut []);
                    for i in 0..n {
                        for c in 0..2 {
                            for d1 in 0..2 {
                                let fd = (gp[i][c][d1] - gm[i][c][d1]) / (2.0 * FD_STEP);
                                assert!((fd - hessians[i][c][d1][axis]).abs() < 1e-5);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn gradients_match_finite_differences_3d() {
        let rt = RtPolynomials::<3>::new(1);
        let n = rt.n();
        let p = Point::from([0.3, 0.6, 0.2]);
        let mut grads = vec![[[0.0; 3]; 3]; n];
        rt.evaluate(&p, &mut [], &mut grads, &mut [], &mut [], &mut []);

        for axis in 0..3 {
            let mut plus = p;
            let mut minus = p;
            plus[axis] += FD_STEP;
            minus[axis] -= FD_STEP;
            let (vp, vm) = (rt.values(&plus), rt.values(&minus));
            for i in 0..n {
                for c in 0..3 {
                    let fd = (vp[i][c] - vm[i][c]) / (2.0 * FD_STEP);
                    assert!((fd - grads[i][c][axis]).abs() < 1e-6);
                }
            }
        }
    }

    #[test]
    fn higher_derivatives_are_symmetric_and_consistent() {
        let rt = RtPolynomials::<2>::new(2);
        let n = rt.n();
        let p = Point::from([0.4, 0.7]);
        let mut third = vec![[[[[0.0; 2]; 2]; 2]; 2]; n];
        let mut fourth = vec![[[[[[0.0; 2]; 2]; 2]; 2]; 2]; n];
        rt.evaluate(&p, &mut [], &mut [], &mut [], &mut third, &mut fourth);

        let mut plus = p;
        plus[1] += FD_STEP;
        let mut third_plus = vec![[[[[0.0; 2]; 2]; 2]; 2]; n];
        rt.evaluate(&plus, &mut [], &mut [], &mut [], &mut third_plus, &mut []);

        for i in 0..n {
            for c in 0..2 {
                assert_eq!(third[i][c][0][1][1], third[i][c][1][0][1]);
                assert_eq!(fourth[i][c][0][0][1][1], fourth[i][c][1][1][0][0]);
                let fd = (third_plus[i][c][0][0][1] - third[i][c][0][0][1]) / FD_STEP;
                assert!((fd - fourth[i][c][0][0][1][1]).abs() < 1e-3 * (1.0 + fd.abs()));
            }
        }
    }

    #[test]
    fn reused_buffers_are_reset() {
        let rt = RtPolynomials::<2>::new(0);
        let mut values = vec![[7.0; 2]; 4];
        rt.evaluate(&Point::from([0.0, 0.5]), &mut values, &mut [], &mut [], &mut [], &mut []);
        // lowest order: component 0 of DoF 0 is 1 - x, its component 1 vanishes
        assert!((values[0][0] - 1.0).abs() < 1e-14);
        assert_eq!(values[0][1], 0.0);
        assert_eq!(values[2][0], 0.0);
    }

    #[test]
    #[should_panic]
    fn mismatched_output_panics() {
        let rt = RtPolynomials::<2>::new(1);
        let mut grads = vec![[[0.0; 2]; 2]; 3];
        rt.evaluate(&Point::from([0.5, 0.5]), &mut [], &mut grads, &mut [], &mut [], &mut []);
    }
}
