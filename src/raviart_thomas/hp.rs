use super::RaviartThomasNodal;
use crate::element::{Domination, FeError, FiniteElement, SiblingKind};

impl<const D: usize> RaviartThomasNodal<D> {
    /// Vertices carry no DoFs, so there is never anything to identify
    pub fn hp_vertex_dof_identities(
        &self,
        other: &dyn FiniteElement<D>,
    ) -> Result<Vec<(usize, usize)>, FeError> {
        match other.sibling_kind() {
            SiblingKind::RaviartThomasNodal { .. } | SiblingKind::Nothing { .. } => Ok(Vec::new()),
            SiblingKind::Other { name } => Err(FeError::NotImplemented {
                operation: "hp_vertex_dof_identities",
                other: name,
            }),
        }
    }

    /// Pairs `(this_dof, other_dof)` of line DoFs which coincide on a shared line.
    ///
    /// Lines only carry DoFs when they are faces, i.e. in 2D.
    pub fn hp_line_dof_identities(
        &self,
        other: &dyn FiniteElement<D>,
    ) -> Result<Vec<(usize, usize)>, FeError> {
        match other.sibling_kind() {
            SiblingKind::RaviartThomasNodal { degree } if D == 2 => {
                let p = self.degree() - 1;
                let q = degree - 1;
                if p == q {
                    Ok((0..=p).map(|i| (i, i)).collect())
                } else if p % 2 == 0 && q % 2 == 0 {
                    // both have a DoF at the midpoint
                    Ok(vec![(p / 2, q / 2)])
                } else {
                    Ok(Vec::new())
                }
            }
            SiblingKind::RaviartThomasNodal { .. } | SiblingKind::Nothing { .. } => Ok(Vec::new()),
            SiblingKind::Other { name } => Err(FeError::NotImplemented {
                operation: "hp_line_dof_identities",
                other: name,
            }),
        }
    }

    /// Pairs `(this_dof, other_dof)` of DoFs which coincide on a shared quadrilateral face (3D)
    pub fn hp_quad_dof_identities(
        &self,
        other: &dyn FiniteElement<D>,
        face_no: usize,
    ) -> Result<Vec<(usize, usize)>, FeError> {
        match other.sibling_kind() {
            SiblingKind::RaviartThomasNodal { .. } if D == 3 => {
                let p = self.n_dofs_on_face(face_no);
                let q = other.n_dofs_per_face();
                if p == q {
                    Ok((0..p).map(|i| (i, i)).collect())
                } else if p % 2 == 1 && q % 2 == 1 {
                    // both faces have a DoF at the center
                    Ok(vec![(p / 2, q / 2)])
                } else {
                    Ok(Vec::new())
                }
            }
            SiblingKind::RaviartThomasNodal { .. } | SiblingKind::Nothing { .. } => Ok(Vec::new()),
            SiblingKind::Other { name } => Err(FeError::NotImplemented {
                operation: "hp_quad_dof_identities",
                other: name,
            }),
        }
    }

    /// Which of two neighboring elements constrains the other on a shared object of codimension `codim`
    pub fn compare_for_domination(
        &self,
        other: &dyn FiniteElement<D>,
        codim: usize,
    ) -> Result<Domination, FeError> {
        assert!(
            codim <= D,
            "Codimension {} exceeds the dimension {}; cannot compare for domination!",
            codim,
            D
        );

        match other.sibling_kind() {
            SiblingKind::RaviartThomasNodal { degree } => {
                let this_degree = self.degree();
                Ok(if this_degree < degree {
                    Domination::ThisElementDominates
                } else if this_degree == degree {
                    Domination::EitherElementCanDominate
                } else {
                    Domination::OtherElementDominates
                })
            }
            SiblingKind::Nothing { dominating: true } => Ok(Domination::OtherElementDominates),
            SiblingKind::Nothing { dominating: false } => Ok(Domination::NoRequirements),
            SiblingKind::Other { name } => Err(FeError::NotImplemented {
                operation: "compare_for_domination",
                other: name,
            }),
        }
    }

    pub fn hp_constraints_are_implemented(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Nothing;
    use proptest::prelude::*;

    struct Foreign;

    impl<const D: usize> FiniteElement<D> for Foreign {
        fn name(&self) -> String {
            "FE_Q<2>(1)".to_string()
        }
        fn sibling_kind(&self) -> SiblingKind {
            SiblingKind::Other { name: "FE_Q<2>(1)".to_string() }
        }
        fn degree(&self) -> usize {
            1
        }
        fn n_dofs_per_cell(&self) -> usize {
            0
        }
        fn n_dofs_per_face(&self) -> usize {
            0
        }
        fn shape_values(&self, _: &nalgebra::Point<f64, D>) -> Vec<[f64; D]> {
            Vec::new()
        }
        fn generalized_support_points(&self) -> &[nalgebra::Point<f64, D>] {
            &[]
        }
        fn generalized_face_support_points(&self) -> &crate::quadrature::Quadrature<1> {
            unimplemented!()
        }
        fn convert_generalized_support_point_values_to_dof_values(&self, _: &[[f64; D]], _: &mut [f64]) {}
    }

    #[test]
    fn line_identities_2d() {
        let fe0 = RaviartThomasNodal::<2>::new(0);
        let fe1 = RaviartThomasNodal::<2>::new(1);
        let fe2 = RaviartThomasNodal::<2>::new(2);

        assert_eq!(fe1.hp_line_dof_identities(&fe1).unwrap(), vec![(0, 0), (1, 1)]);
        assert_eq!(fe0.hp_line_dof_identities(&fe2).unwrap(), vec![(0, 1)]);
        assert!(fe0.hp_line_dof_identities(&fe1).unwrap().is_empty());
        assert!(fe1.hp_line_dof_identities(&Nothing::<2>::new(true)).unwrap().is_empty());
        assert!(fe1.hp_vertex_dof_identities(&fe2).unwrap().is_empty());
    }

    #[test]
    fn quad_identities_3d() {
        let fe0 = RaviartThomasNodal::<3>::new(0);
        let fe1 = RaviartThomasNodal::<3>::new(1);
        let fe2 = RaviartThomasNodal::<3>::new(2);

        assert_eq!(fe1.hp_quad_dof_identities(&fe1, 0).unwrap().len(), 4);
        // 1 and 9 DoFs per face share the center
        assert_eq!(fe0.hp_quad_dof_identities(&fe2, 0).unwrap(), vec![(0, 4)]);
        assert!(fe0.hp_quad_dof_identities(&fe1, 0).unwrap().is_empty());
        // lines carry no DoFs in 3D
        assert!(fe1.hp_line_dof_identities(&fe1).unwrap().is_empty());
    }

    #[test]
    fn foreign_siblings_are_rejected() {
        let fe = RaviartThomasNodal::<2>::new(1);
        let err = fe.compare_for_domination(&Foreign, 1).unwrap_err();
        assert_eq!(
            err,
            FeError::NotImplemented {
                operation: "compare_for_domination",
                other: "FE_Q<2>(1)".to_string()
            }
        );
        assert!(fe.hp_vertex_dof_identities(&Foreign).is_err());
        assert!(fe.hp_line_dof_identities(&Foreign).is_err());
        assert!(fe.hp_quad_dof_identities(&Foreign, 0).is_err());
    }

    #[test]
    fn domination_against_nothing() {
        let fe = RaviartThomasNodal::<2>::new(0);
        assert_eq!(
            fe.compare_for_domination(&Nothing::<2>::new(true), 1),
            Ok(Domination::OtherElementDominates)
        );
        assert_eq!(
            fe.compare_for_domination(&Nothing::<2>::new(false), 1),
            Ok(Domination::NoRequirements)
        );
    }

    #[test]
    #[should_panic]
    fn domination_rejects_large_codim() {
        let fe = RaviartThomasNodal::<2>::new(0);
        let _ = fe.compare_for_domination(&fe, 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn line_identities_are_symmetric(p in 0usize..5, q in 0usize..5) {
            let a = RaviartThomasNodal::<2>::new(p);
            let b = RaviartThomasNodal::<2>::new(q);
            let forward = a.hp_line_dof_identities(&b).unwrap();
            let mut backward: Vec<_> = b
                .hp_line_dof_identities(&a)
                .unwrap()
                .into_iter()
                .map(|(i, j)| (j, i))
                .collect();
            backward.sort_unstable();
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn domination_is_antisymmetric(p in 0usize..5, q in 0usize..5, codim in 0usize..=2) {
            let a = RaviartThomasNodal::<2>::new(p);
            let b = RaviartThomasNodal::<2>::new(q);
            let ab = a.compare_for_domination(&b, codim).unwrap();
            let ba = b.compare_for_domination(&a, codim).unwrap();
            let expected = match ab {
                Domination::ThisElementDominates => Domination::OtherElementDominates,
                Domination::OtherElementDominates => Domination::ThisElementDominates,
                other => other,
            };
            prop_assert_eq!(ba, expected);
            prop_assert_eq!(ab == Domination::EitherElementCanDominate, p == q);
        }
    }
}
