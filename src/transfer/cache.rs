use super::TransferSolver;
use crate::element::FiniteElement;
use crate::geometry::RefinementCase;
use log::debug;
use nalgebra::DMatrix;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransferKind {
    Prolongation,
    Restriction,
}

/// Prolongation and restriction matrices of one element, computed on first request.
///
/// Every refinement case owns one slot per kind holding the matrices of all of its children.
/// A slot goes from empty to populated exactly once and is never reset; populated slots are
/// read without locking. Population happens under a single mutex.
pub struct TransferCache<const D: usize> {
    solver: Arc<dyn TransferSolver<D>>,
    prolongation: Vec<OnceCell<Vec<DMatrix<f64>>>>,
    restriction: Vec<OnceCell<Vec<DMatrix<f64>>>>,
    lock: Mutex<()>,
}

impl<const D: usize> TransferCache<D> {
    pub fn new(solver: Arc<dyn TransferSolver<D>>) -> Self {
        let n_cases = RefinementCase::<D>::n_refined_cases();
        Self {
            solver,
            prolongation: (0..n_cases).map(|_| OnceCell::new()).collect(),
            restriction: (0..n_cases).map(|_| OnceCell::new()).collect(),
            lock: Mutex::new(()),
        }
    }

    /// Embedding matrix of `child` under `case` (computed with `fe` on first request)
    pub fn prolongation(
        &self,
        fe: &dyn FiniteElement<D>,
        child: usize,
        case: RefinementCase<D>,
    ) -> &DMatrix<f64> {
        self.get(fe, TransferKind::Prolongation, child, case)
    }

    /// Projection matrix of `child` under `case` (computed with `fe` on first request)
    pub fn restriction(
        &self,
        fe: &dyn FiniteElement<D>,
        child: usize,
        case: RefinementCase<D>,
    ) -> &DMatrix<f64> {
        self.get(fe, TransferKind::Restriction, child, case)
    }

    /// Whether the prolongation matrices of `case` have been computed yet
    pub fn has_prolongation(&self, case: RefinementCase<D>) -> bool {
        self.slot(TransferKind::Prolongation, case).get().is_some()
    }

    /// Whether the restriction matrices of `case` have been computed yet
    pub fn has_restriction(&self, case: RefinementCase<D>) -> bool {
        self.slot(TransferKind::Restriction, case).get().is_some()
    }

    fn slot(&self, kind: TransferKind, case: RefinementCase<D>) -> &OnceCell<Vec<DMatrix<f64>>> {
        match kind {
            TransferKind::Prolongation => &self.prolongation[case.index()],
            TransferKind::Restriction => &self.restriction[case.index()],
        }
    }

    fn get(
        &self,
        fe: &dyn FiniteElement<D>,
        kind: TransferKind,
        child: usize,
        case: RefinementCase<D>,
    ) -> &DMatrix<f64> {
        assert!(
            case.is_refined(),
            "{:?} matrices are only available for refined cells!",
            kind
        );
        assert!(
            child < case.n_children(),
            "Child {} does not exist for {}; cannot get {:?} matrix!",
            child,
            case,
            kind
        );

        let slot = self.slot(kind, case);
        if let Some(matrices) = slot.get() {
            return &matrices[child];
        }

        let _guard = self.lock.lock();
        if case != RefinementCase::isotropic() && slot.get().is_none() {
            // anisotropic matrices are computed for every case at once
            self.populate_all(fe);
        }
        // populated by another thread while this one waited for the lock?
        let matrices = slot.get_or_init(|| self.solve(fe, kind, case));

        &matrices[child]
    }

    fn populate_all(&self, fe: &dyn FiniteElement<D>) {
        debug!("computing transfer matrices of {} for every refinement case", fe.name());
        for case in RefinementCase::<D>::all_refined() {
            for kind in [TransferKind::Prolongation, TransferKind::Restriction] {
                self.slot(kind, case).get_or_init(|| self.solve(fe, kind, case));
            }
        }
    }

    fn solve(
        &self,
        fe: &dyn FiniteElement<D>,
        kind: TransferKind,
        case: RefinementCase<D>,
    ) -> Vec<DMatrix<f64>> {
        debug!("computing {:?} matrices of {} for {}", kind, fe.name(), case);
        let matrices = match kind {
            TransferKind::Prolongation => self.solver.embedding_matrices(fe, case),
            TransferKind::Restriction => self.solver.projection_matrices(fe, case),
        };

        let n = fe.n_dofs_per_cell();
        assert!(
            matrices.len() == case.n_children() && matrices.iter().all(|m| m.shape() == (n, n)),
            "Transfer solver returned malformed {:?} matrices for {}; cannot populate cache!",
            kind,
            case
        );

        matrices
    }
}
