/// Lazily computed, thread-safe storage of prolongation and restriction matrices
pub mod cache;

pub use cache::TransferCache;

use crate::element::FiniteElement;
use crate::geometry::RefinementCase;
use crate::polynomial::Tensor1;
use crate::quadrature::Quadrature;
use log::trace;
use nalgebra::{DMatrix, Point};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Computes the matrices which move a function between a cell and its children.
///
/// Both methods return one `n_dofs × n_dofs` matrix per child of `case`, in child order.
pub trait TransferSolver<const D: usize>: Send + Sync {
    /// Prolongation: coarse DoF values to the DoF values of each child
    fn embedding_matrices(
        &self,
        fe: &dyn FiniteElement<D>,
        case: RefinementCase<D>,
    ) -> Vec<DMatrix<f64>>;

    /// Restriction: DoF values on each child to their contribution on the coarse cell
    fn projection_matrices(
        &self,
        fe: &dyn FiniteElement<D>,
        case: RefinementCase<D>,
    ) -> Vec<DMatrix<f64>>;
}

/// Transfer matrices for nodal H(div) elements mapped with the contravariant Piola transform.
///
/// * Embedding: interpolate each coarse shape function, pulled back onto the child, at the child's support points.
/// * Projection: child-local L2 projection `R_c = M^-1 B_c`, so that `Σ_c R_c P_c = I`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodalTransferSolver;

impl<const D: usize> TransferSolver<D> for NodalTransferSolver {
    fn embedding_matrices(
        &self,
        fe: &dyn FiniteElement<D>,
        case: RefinementCase<D>,
    ) -> Vec<DMatrix<f64>> {
        for_each_child(case, |child| {
            trace!("embedding matrix for child {} of {}", child, case);
            embedding_matrix(fe, case, child)
        })
    }

    fn projection_matrices(
        &self,
        fe: &dyn FiniteElement<D>,
        case: RefinementCase<D>,
    ) -> Vec<DMatrix<f64>> {
        let rule = Quadrature::<D>::isotropic(&Quadrature::gauss(fe.degree() + 1));
        let coarse_values: Vec<Vec<Tensor1<D>>> =
            rule.points().iter().map(|p| fe.shape_values(p)).collect();

        let n = fe.n_dofs_per_cell();
        let mass = DMatrix::from_fn(n, n, |i, j| {
            coarse_values
                .iter()
                .zip(rule.weights())
                .map(|(vals, w)| w * dot(&vals[i], &vals[j]))
                .sum()
        });
        let mass_chol = match mass.cholesky() {
            Some(chol) => chol,
            None => panic!(
                "Mass matrix of {} is not positive definite; cannot compute projection matrices!",
                fe.name()
            ),
        };

        for_each_child(case, |child| {
            trace!("projection matrix for child {} of {}", child, case);
            let (origin, scale) = case.child_box(child);

            // coarse functions at the mapped points, fine functions at the reference points
            let mut coupling = DMatrix::zeros(n, n);
            for (p, w) in rule.points().iter().zip(rule.weights()) {
                let coarse = fe.shape_values(&map_to_child(p, &origin, &scale));
                let fine = fe.shape_values(p);
                for i in 0..n {
                    for j in 0..n {
                        let sum: f64 = (0..D).map(|k| scale[k] * coarse[i][k] * fine[j][k]).sum();
                        coupling[(i, j)] += w * sum;
                    }
                }
            }

            mass_chol.solve(&coupling)
        })
    }
}

fn embedding_matrix<const D: usize>(
    fe: &dyn FiniteElement<D>,
    case: RefinementCase<D>,
    child: usize,
) -> DMatrix<f64> {
    let (origin, scale) = case.child_box(child);
    let det: f64 = scale.iter().product();
    let n = fe.n_dofs_per_cell();

    let coarse_at_support: Vec<Vec<Tensor1<D>>> = fe
        .generalized_support_points()
        .iter()
        .map(|p| fe.shape_values(&map_to_child(p, &origin, &scale)))
        .collect();

    let mut embedding = DMatrix::zeros(n, n);
    let mut nodal = vec![0.0; n];
    for j in 0..n {
        // contravariant Piola pull-back of coarse function j onto the child
        let pulled_back: Vec<Tensor1<D>> = coarse_at_support
            .iter()
            .map(|vals| {
                let mut v = vals[j];
                for (k, vk) in v.iter_mut().enumerate() {
                    *vk *= det / scale[k];
                }
                v
            })
            .collect();

        fe.convert_generalized_support_point_values_to_dof_values(&pulled_back, &mut nodal);
        embedding.set_column(j, &nalgebra::DVector::from_column_slice(&nodal));
    }

    embedding
}

fn map_to_child<const D: usize>(p: &Point<f64, D>, origin: &[f64; D], scale: &[f64; D]) -> Point<f64, D> {
    let mut mapped = [0.0; D];
    for d in 0..D {
        mapped[d] = origin[d] + scale[d] * p[d];
    }
    Point::from(mapped)
}

#[inline]
fn dot<const D: usize>(a: &Tensor1<D>, b: &Tensor1<D>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(feature = "parallel")]
fn for_each_child<const D: usize, F>(case: RefinementCase<D>, compute: F) -> Vec<DMatrix<f64>>
where
    F: Fn(usize) -> DMatrix<f64> + Send + Sync,
{
    (0..case.n_children()).into_par_iter().map(compute).collect()
}

#[cfg(not(feature = "parallel"))]
fn for_each_child<const D: usize, F>(case: RefinementCase<D>, compute: F) -> Vec<DMatrix<f64>>
where
    F: Fn(usize) -> DMatrix<f64> + Send + Sync,
{
    (0..case.n_children()).map(compute).collect()
}
