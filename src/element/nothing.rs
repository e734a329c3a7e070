use super::{FiniteElement, SiblingKind};
use crate::polynomial::Tensor1;
use crate::quadrature::Quadrature;
use nalgebra::Point;

/// A zero-dimensional element, used where a part of the domain carries no unknowns.
///
/// When `dominating` is set, neighbors must conform to it (forcing their shared DoFs to zero).
#[derive(Clone, Debug)]
pub struct Nothing<const D: usize> {
    dominating: bool,
    face_rule: Quadrature<1>,
}

impl<const D: usize> Nothing<D> {
    pub fn new(dominating: bool) -> Self {
        Self {
            dominating,
            face_rule: Quadrature::new(Vec::new(), Vec::new()),
        }
    }

    pub fn is_dominating(&self) -> bool {
        self.dominating
    }
}

impl<const D: usize> Default for Nothing<D> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<const D: usize> FiniteElement<D> for Nothing<D> {
    fn name(&self) -> String {
        if self.dominating {
            format!("FE_Nothing<{}>(dominating)", D)
        } else {
            format!("FE_Nothing<{}>()", D)
        }
    }

    fn sibling_kind(&self) -> SiblingKind {
        SiblingKind::Nothing {
            dominating: self.dominating,
        }
    }

    fn degree(&self) -> usize {
        0
    }

    fn n_dofs_per_cell(&self) -> usize {
        0
    }

    fn n_dofs_per_face(&self) -> usize {
        0
    }

    fn shape_values(&self, _: &Point<f64, D>) -> Vec<Tensor1<D>> {
        Vec::new()
    }

    fn generalized_support_points(&self) -> &[Point<f64, D>] {
        &[]
    }

    fn generalized_face_support_points(&self) -> &Quadrature<1> {
        &self.face_rule
    }

    fn convert_generalized_support_point_values_to_dof_values(
        &self,
        support_point_values: &[Tensor1<D>],
        nodal_values: &mut [f64],
    ) {
        assert!(
            support_point_values.is_empty() && nodal_values.is_empty(),
            "FE_Nothing has no degrees of freedom; cannot convert support point values!"
        );
    }
}
