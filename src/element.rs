/// An element without degrees of freedom
pub mod nothing;

use crate::polynomial::Tensor1;
use crate::quadrature::Quadrature;
use nalgebra::Point;
use thiserror::Error;

pub use nothing::Nothing;

/// What a neighboring element is, from the perspective of hp-compatibility and interpolation.
///
/// Every element reports its own kind once; callers branch on this instead of inspecting types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SiblingKind {
    /// A nodal Raviart-Thomas element with the given maximal polynomial degree
    RaviartThomasNodal { degree: usize },
    /// An element without degrees of freedom
    Nothing { dominating: bool },
    /// Any other element family
    Other { name: String },
}

/// Outcome of comparing two elements which share a vertex, line or face
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domination {
    ThisElementDominates,
    OtherElementDominates,
    NeitherElementDominates,
    EitherElementCanDominate,
    NoRequirements,
}

/// Errors for operations which are only implemented for some pairs of elements
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FeError {
    #[error("{operation} is not implemented against {other}")]
    NotImplemented {
        operation: &'static str,
        other: String,
    },
    #[error("Interpolation is not implemented: {0}")]
    InterpolationNotImplemented(String),
}

/// The contract of a finite element on the reference cell `[0, 1]^D`
///
/// This is what the transfer solvers and the hp machinery need to know about an element.
pub trait FiniteElement<const D: usize>: Send + Sync {
    fn name(&self) -> String;

    fn sibling_kind(&self) -> SiblingKind;

    /// Maximal polynomial degree of the shape functions
    fn degree(&self) -> usize;

    fn n_dofs_per_cell(&self) -> usize;

    fn n_dofs_per_face(&self) -> usize;

    /// Vector values of every shape function at `p`
    fn shape_values(&self, p: &Point<f64, D>) -> Vec<Tensor1<D>>;

    /// One point per degree of freedom (see [`FiniteElement::convert_generalized_support_point_values_to_dof_values`])
    fn generalized_support_points(&self) -> &[Point<f64, D>];

    /// The 1D rule whose `(D-1)`-fold tensor product gives the support points of a face
    fn generalized_face_support_points(&self) -> &Quadrature<1>;

    /// Turn the values of a function at the generalized support points into nodal values
    fn convert_generalized_support_point_values_to_dof_values(
        &self,
        support_point_values: &[Tensor1<D>],
        nodal_values: &mut [f64],
    );
}
