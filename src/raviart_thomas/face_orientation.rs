/// Number of combinations of (orientation, flip, rotation) a quadrilateral face can take
pub const N_ORIENTATION_STATES: usize = 8;

/// Per face DoF, how the DoF moves and whether it changes sign when a neighbor sees the face
/// in a different orientation.
///
/// States are indexed `orientation * 4 + flip * 2 + rotation`. `index_delta` holds
/// `new_index - local_index`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceOrientationTable {
    index_deltas: Vec<[isize; N_ORIENTATION_STATES]>,
    signs: Vec<[i8; N_ORIENTATION_STATES]>,
}

impl FaceOrientationTable {
    /// The table of an element whose faces are not quadrilaterals (nothing to permute)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table for a quadrilateral face carrying an `n × n` grid of DoFs (lowest axis fastest)
    pub fn for_quad(n: usize) -> Self {
        assert!(n > 0, "A face needs at least one DoF per direction; cannot build orientation table!");
        let n_face = n * n;
        let mut index_deltas = Vec::with_capacity(n_face);

        for local in 0..n_face {
            let (i, j) = (local % n, local / n);
            let last = n - 1;
            let new_indices = [
                j + i * n,
                i + (last - j) * n,
                (last - j) + (last - i) * n,
                (last - i) + j * n,
                local,
                j + (last - i) * n,
                (last - i) + (last - j) * n,
                (last - j) + i * n,
            ];
            index_deltas.push(new_indices.map(|new| new as isize - local as isize));
        }

        // normal components are not flipped by the face permutation itself
        let signs = vec![[1; N_ORIENTATION_STATES]; n_face];

        Self { index_deltas, signs }
    }

    pub fn state_index(orientation: bool, flip: bool, rotation: bool) -> usize {
        usize::from(orientation) * 4 + usize::from(flip) * 2 + usize::from(rotation)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index_deltas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index_deltas.is_empty()
    }

    pub fn index_delta(&self, face_dof: usize, state: usize) -> isize {
        self.index_deltas[face_dof][state]
    }

    pub fn sign(&self, face_dof: usize, state: usize) -> i8 {
        self.signs[face_dof][state]
    }

    /// The face DoF which `face_dof` corresponds to in the given orientation state
    pub fn adjust(&self, face_dof: usize, orientation: bool, flip: bool, rotation: bool) -> usize {
        let state = Self::state_index(orientation, flip, rotation);
        let adjusted = face_dof as isize + self.index_delta(face_dof, state);
        debug_assert!(adjusted >= 0 && (adjusted as usize) < self.len());
        adjusted as usize
    }
}
