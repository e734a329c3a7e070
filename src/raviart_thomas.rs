/// Lexicographic, hierarchic and per-component tensor numberings
pub mod numbering;
/// The vector valued tensor product space and its evaluation
pub mod polynomials;
/// DoF permutations of quadrilateral faces seen in other orientations
pub mod face_orientation;
/// DoF identities and domination between neighboring elements
pub mod hp;
/// Face and subface interpolation matrices
pub mod interpolation;

pub use face_orientation::FaceOrientationTable;
pub use polynomials::RtPolynomials;

use polynomials::rt_point_rules;

use crate::element::{FiniteElement, SiblingKind};
use crate::geometry::{
    faces_per_cell, max_children_per_face, opposite_face, unit_normal_direction, RefinementCase,
};
use crate::polynomial::Tensor1;
use crate::quadrature::projection::{project_to_subface, SubfaceCase};
use crate::quadrature::Quadrature;
use crate::transfer::{NodalTransferSolver, TransferCache, TransferSolver};
use log::debug;
use nalgebra::{DMatrix, Point};
use smallvec::SmallVec;
use std::sync::Arc;

/// Nodal Raviart-Thomas element on the reference cell `[0, 1]^D` (quadrilaterals and hexahedra).
///
/// DoFs are the normal components at the Gauss-Lobatto points of each face, followed by
/// the interior DoFs of every component. The element of degree `k` spans polynomials of
/// degree `k + 1` in `x_d` and `k` in the other directions for component `d`.
pub struct RaviartThomasNodal<const D: usize> {
    degree: usize,
    polynomials: RtPolynomials<D>,
    support_points: Vec<Point<f64, D>>,
    face_rule: Quadrature<1>,
    face_orientation: FaceOrientationTable,
    interface_constraints: DMatrix<f64>,
    transfer: TransferCache<D>,
}

impl<const D: usize> RaviartThomasNodal<D> {
    pub fn new(degree: usize) -> Self {
        Self::with_transfer_solver(degree, Arc::new(NodalTransferSolver))
    }

    /// Build the element with a custom solver for its prolongation and restriction matrices
    pub fn with_transfer_solver(degree: usize, solver: Arc<dyn TransferSolver<D>>) -> Self {
        assert!(
            (2..=3).contains(&D),
            "FE_RaviartThomasNodal is only implemented for dim 2 and 3; got {}!",
            D
        );

        let polynomials = RtPolynomials::<D>::new(degree);
        let support_points = polynomials.support_points();
        let (_, face_rule) = rt_point_rules(degree);
        let face_orientation = if D == 3 {
            FaceOrientationTable::for_quad(degree + 1)
        } else {
            FaceOrientationTable::empty()
        };

        let mut fe = Self {
            degree,
            polynomials,
            support_points,
            face_rule,
            face_orientation,
            interface_constraints: DMatrix::zeros(0, 0),
            transfer: TransferCache::new(solver),
        };
        fe.interface_constraints = fe.compute_interface_constraints();

        debug!(
            "created {} with {} DoFs ({} per face)",
            fe.name(),
            fe.n_dofs_per_cell(),
            fe.n_dofs_per_face()
        );
        fe
    }

    /// The degree the element was constructed with (one less than its maximal degree)
    pub fn raw_degree(&self) -> usize {
        self.degree
    }

    pub fn polynomials(&self) -> &RtPolynomials<D> {
        &self.polynomials
    }

    /// DoFs on each kind of object: vertices, lines, (quads,) cell interior
    pub fn dofs_per_object(&self) -> SmallVec<[usize; 4]> {
        let mut dpo = SmallVec::from_elem(0, D + 1);
        dpo[D - 1] = self.n_dofs_per_face();
        dpo[D] = D * self.degree * self.n_dofs_per_face();
        dpo
    }

    /// DoFs on face `face_no` (every face carries the same number)
    pub fn n_dofs_on_face(&self, face_no: usize) -> usize {
        assert!(
            face_no < faces_per_cell(D),
            "Face {} does not exist on a {}D cell; cannot count face DoFs!",
            face_no,
            D
        );
        self.n_dofs_per_face()
    }

    /// Component `component` of shape function `i` at `p`
    pub fn shape_value_component(&self, i: usize, p: &Point<f64, D>, component: usize) -> f64 {
        assert!(
            i < self.n_dofs_per_cell() && component < D,
            "Shape function {} (component {}) does not exist; cannot evaluate!",
            i,
            component
        );
        self.polynomials.values(p)[i][component]
    }

    /// Cell index of DoF `face_dof` of face `face_no` in the standard face orientation
    pub fn face_to_cell_index(&self, face_dof: usize, face_no: usize) -> usize {
        let n_face = self.n_dofs_per_face();
        assert!(
            face_dof < n_face && face_no < faces_per_cell(D),
            "DoF {} of face {} does not exist; cannot map to cell index!",
            face_dof,
            face_no
        );
        face_no * n_face + face_dof
    }

    /// Cell index of DoF `face_dof` of face `face_no` as seen through a face with the given orientation
    pub fn oriented_face_to_cell_index(
        &self,
        face_dof: usize,
        face_no: usize,
        orientation: bool,
        flip: bool,
        rotation: bool,
    ) -> usize {
        let local = if self.face_orientation.is_empty() {
            face_dof
        } else {
            self.face_orientation.adjust(face_dof, orientation, flip, rotation)
        };
        self.face_to_cell_index(local, face_no)
    }

    /// Whether shape function `shape` may be nonzero on face `face`.
    ///
    /// Only face DoFs are known to vanish somewhere: on the face opposite to their own.
    pub fn has_support_on_face(&self, shape: usize, face: usize) -> bool {
        assert!(
            shape < self.n_dofs_per_cell() && face < faces_per_cell(D),
            "Shape function {} or face {} does not exist; cannot check support!",
            shape,
            face
        );
        let support_face = shape / self.n_dofs_per_face();
        if support_face < faces_per_cell(D) {
            return face != opposite_face(support_face);
        }
        true
    }

    pub fn face_orientation(&self) -> &FaceOrientationTable {
        &self.face_orientation
    }

    /// Values of the DoFs of a fine face (stacked over every child of an isotropically refined
    /// face) in terms of the DoFs of the coarse face
    pub fn interface_constraints(&self) -> &DMatrix<f64> {
        &self.interface_constraints
    }

    /// Embedding matrix of `child` under `case`, computed on first request
    pub fn prolongation_matrix(&self, child: usize, case: RefinementCase<D>) -> &DMatrix<f64> {
        self.transfer.prolongation(self, child, case)
    }

    /// Projection matrix of `child` under `case`, computed on first request
    pub fn restriction_matrix(&self, child: usize, case: RefinementCase<D>) -> &DMatrix<f64> {
        self.transfer.restriction(self, child, case)
    }

    /// Whether the prolongation matrices of `case` are available without computing them
    pub fn has_prolongation_matrices(&self, case: RefinementCase<D>) -> bool {
        self.transfer.has_prolongation(case)
    }

    pub fn has_restriction_matrices(&self, case: RefinementCase<D>) -> bool {
        self.transfer.has_restriction(case)
    }

    fn compute_interface_constraints(&self) -> DMatrix<f64> {
        let n_face = self.n_dofs_per_face();
        let n_children = max_children_per_face(D);
        // contravariant Piola: a child face carries (1/2)^(D-1) of the coarse normal flux density
        let piola = 0.5_f64.powi(D as i32 - 1);

        let mut constraints = DMatrix::zeros(n_children * n_face, n_face);
        for subface in 0..n_children {
            let points = project_to_subface::<D>(&self.face_rule, 0, subface, SubfaceCase::Isotropic);
            let block = self.face_values_at(&points) * piola;
            constraints
                .slice_mut((subface * n_face, 0), (n_face, n_face))
                .copy_from(&block);
        }
        constraints
    }
}

impl<const D: usize> FiniteElement<D> for RaviartThomasNodal<D> {
    fn name(&self) -> String {
        format!("FE_RaviartThomasNodal<{}>({})", D, self.degree)
    }

    fn sibling_kind(&self) -> SiblingKind {
        SiblingKind::RaviartThomasNodal {
            degree: self.degree(),
        }
    }

    fn degree(&self) -> usize {
        self.degree + 1
    }

    fn n_dofs_per_cell(&self) -> usize {
        self.polynomials.n()
    }

    fn n_dofs_per_face(&self) -> usize {
        (self.degree + 1).pow(D as u32 - 1)
    }

    fn shape_values(&self, p: &Point<f64, D>) -> Vec<Tensor1<D>> {
        self.polynomials.values(p)
    }

    fn generalized_support_points(&self) -> &[Point<f64, D>] {
        &self.support_points
    }

    fn generalized_face_support_points(&self) -> &Quadrature<1> {
        &self.face_rule
    }

    fn convert_generalized_support_point_values_to_dof_values(
        &self,
        support_point_values: &[Tensor1<D>],
        nodal_values: &mut [f64],
    ) {
        let n = self.n_dofs_per_cell();
        assert!(
            support_point_values.len() == n && nodal_values.len() == n,
            "Expected {} support point values and nodal values, got {} and {}; cannot convert!",
            n,
            support_point_values.len(),
            nodal_values.len()
        );

        // face DoFs are normal components
        let n_face = self.n_dofs_per_face();
        for face in 0..faces_per_cell(D) {
            let normal = unit_normal_direction(face);
            for i in face * n_face..(face + 1) * n_face {
                nodal_values[i] = support_point_values[i][normal];
            }
        }

        // the rest come in one block per component
        let face_base = faces_per_cell(D) * n_face;
        let block = (n - face_base) / D;
        for d in 0..D {
            for i in face_base + d * block..face_base + (d + 1) * block {
                nodal_values[i] = support_point_values[i][d];
            }
        }
    }
}
