/// The finite element contract, sibling kinds and errors
pub mod element;
/// Reference cell topology and refinement cases
pub mod geometry;
/// 1D polynomials and their anisotropic tensor products
pub mod polynomial;
/// Quadrature rules on the unit interval and their tensor products
pub mod quadrature;
/// The nodal Raviart-Thomas element
pub mod raviart_thomas;
/// Prolongation and restriction matrices between a cell and its children
pub mod transfer;

pub use element::{Domination, FeError, FiniteElement, Nothing, SiblingKind};
pub use geometry::RefinementCase;
pub use quadrature::projection::SubfaceCase;
pub use quadrature::Quadrature;
pub use raviart_thomas::{FaceOrientationTable, RaviartThomasNodal, RtPolynomials};
pub use transfer::{NodalTransferSolver, TransferCache, TransferSolver};
