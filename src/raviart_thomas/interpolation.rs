use super::RaviartThomasNodal;
use crate::element::{FeError, FiniteElement, SiblingKind};
use crate::geometry::faces_per_cell;
use crate::quadrature::projection::{project_to_face, project_to_subface, SubfaceCase};
use log::trace;
use nalgebra::{DMatrix, Point};

impl<const D: usize> RaviartThomasNodal<D> {
    /// Interpolate the face functions of this element onto the face DoFs of `source`.
    ///
    /// Returns a `source.n_dofs_per_face() × self.n_dofs_per_face()` matrix. `source` must be a
    /// nodal Raviart-Thomas element with at least as many face DoFs.
    pub fn face_interpolation_matrix(
        &self,
        source: &dyn FiniteElement<D>,
        face_no: usize,
    ) -> Result<DMatrix<f64>, FeError> {
        self.check_interpolation_source(source, face_no)?;
        let points = project_to_face::<D>(source.generalized_face_support_points(), 0);
        Ok(self.face_values_at(&points))
    }

    /// Like [`RaviartThomasNodal::face_interpolation_matrix`], but onto one child of an
    /// isotropically refined face.
    pub fn subface_interpolation_matrix(
        &self,
        source: &dyn FiniteElement<D>,
        subface: usize,
        face_no: usize,
    ) -> Result<DMatrix<f64>, FeError> {
        self.anisotropic_subface_interpolation_matrix(source, subface, face_no, SubfaceCase::Isotropic)
    }

    /// Subface interpolation for faces refined according to `case`
    pub fn anisotropic_subface_interpolation_matrix(
        &self,
        source: &dyn FiniteElement<D>,
        subface: usize,
        face_no: usize,
        case: SubfaceCase,
    ) -> Result<DMatrix<f64>, FeError> {
        self.check_interpolation_source(source, face_no)?;
        let points =
            project_to_subface::<D>(source.generalized_face_support_points(), 0, subface, case);
        Ok(self.face_values_at(&points))
    }

    fn check_interpolation_source(
        &self,
        source: &dyn FiniteElement<D>,
        face_no: usize,
    ) -> Result<(), FeError> {
        assert!(
            face_no < faces_per_cell(D),
            "Face {} does not exist on a {}D cell; cannot build interpolation matrix!",
            face_no,
            D
        );

        match source.sibling_kind() {
            SiblingKind::RaviartThomasNodal { .. } => {}
            _ => {
                return Err(FeError::InterpolationNotImplemented(format!(
                    "{} can only interpolate from nodal Raviart-Thomas elements, not from {}",
                    self.name(),
                    source.name()
                )))
            }
        }

        // interpolating onto fewer DoFs would lose information
        if source.n_dofs_per_face() < self.n_dofs_per_face() {
            return Err(FeError::InterpolationNotImplemented(format!(
                "{} has fewer face DoFs than {}",
                source.name(),
                self.name()
            )));
        }

        Ok(())
    }

    /// Normal components of the face-0 functions at `points`, one row per point
    pub(super) fn face_values_at(&self, points: &[Point<f64, D>]) -> DMatrix<f64> {
        let n_face = self.n_dofs_per_face();
        let eps = 2e-13 * self.degree() as f64 * (D - 1) as f64;
        trace!("interpolating {} onto {} face points", self.name(), points.len());

        let mut matrix = DMatrix::zeros(points.len(), n_face);
        for (i, p) in points.iter().enumerate() {
            let values = self.shape_values(p);
            for j in 0..n_face {
                let mut value = values[self.face_to_cell_index(j, 0)][0];
                if value.abs() < eps {
                    value = 0.0;
                }
                if (value - 1.0).abs() < eps {
                    value = 1.0;
                }
                matrix[(i, j)] = value;
            }
        }

        // the face functions are a partition of unity on the face
        debug_assert!(
            matrix.row_iter().all(|row| (row.sum() - 1.0).abs() < eps),
            "Face interpolation rows of {} do not sum to one!",
            self.name()
        );

        matrix
    }
}
