use smallvec::SmallVec;
use std::fmt;

/// Number of faces of the reference hypercube
#[inline]
pub const fn faces_per_cell(dim: usize) -> usize {
    2 * dim
}

/// Face on the other side of the cell. Faces `2d` and `2d + 1` sit at `x_d = 0` and `x_d = 1`.
#[inline]
pub const fn opposite_face(face: usize) -> usize {
    face ^ 1
}

/// Coordinate direction of the outward normal of a face
#[inline]
pub const fn unit_normal_direction(face: usize) -> usize {
    face / 2
}

/// Number of children of a face under isotropic refinement
#[inline]
pub const fn max_children_per_face(dim: usize) -> usize {
    1 << (dim - 1)
}

/// Description of an h-Refinement of the reference cell
///
/// Stored as a bit set of the coordinate directions which are bisected.
/// The children are numbered lexicographically over the bisected directions (lowest direction fastest).
///
/// ```text
///     isotropic (2D)      cut x (2D)
///     +-----+-----+       +-----+-----+
///     |  2  |  3  |       |     |     |
///     +-----+-----+       |  0  |  1  |
///     |  0  |  1  |       |     |     |
///     +-----+-----+       +-----+-----+
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefinementCase<const D: usize>(u8);

impl<const D: usize> RefinementCase<D> {
    pub const NO_REFINEMENT: Self = Self(0);

    /// Every direction bisected
    pub const fn isotropic() -> Self {
        Self(((1usize << D) - 1) as u8)
    }

    /// Bisection along a single direction
    pub fn cut_axis(axis: usize) -> Self {
        assert!(axis < D, "Axis {} does not exist in {}D; cannot build RefinementCase!", axis, D);
        Self(1 << axis)
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        if (bits as usize) < (1 << D) {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Every refinement case except `NO_REFINEMENT`, in increasing bit order (isotropic last)
    pub fn all_refined() -> impl Iterator<Item = Self> {
        (1..(1u8 << D)).map(Self)
    }

    /// Number of refinement cases other than `NO_REFINEMENT`
    pub const fn n_refined_cases() -> usize {
        (1 << D) - 1
    }

    #[inline]
    pub fn bits(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_refined(&self) -> bool {
        self.0 != 0
    }

    /// Position among [`RefinementCase::all_refined`]
    #[inline]
    pub fn index(&self) -> usize {
        assert!(self.is_refined(), "No refinement does not have a refined-case index!");
        self.0 as usize - 1
    }

    pub fn cut_axes(&self) -> SmallVec<[usize; 3]> {
        (0..D).filter(|a| self.0 & (1 << a) != 0).collect()
    }

    pub fn n_children(&self) -> usize {
        1 << self.0.count_ones()
    }

    /// Origin and per-direction scaling of a child within the reference cell
    pub fn child_box(&self, child: usize) -> ([f64; D], [f64; D]) {
        assert!(
            child < self.n_children(),
            "Child {} does not exist for {}; cannot locate child cell!",
            child,
            self
        );
        let mut origin = [0.0; D];
        let mut scale = [1.0; D];
        for (bit, axis) in self.cut_axes().into_iter().enumerate() {
            scale[axis] = 0.5;
            origin[axis] = 0.5 * ((child >> bit) & 1) as f64;
        }
        (origin, scale)
    }
}

impl<const D: usize> fmt::Display for RefinementCase<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_refined() {
            let axes: String = self.cut_axes().iter().map(|a| ['x', 'y', 'z'][*a]).collect();
            write!(f, "RefinementCase (cut {})", axes)
        } else {
            write!(f, "RefinementCase (none)")
        }
    }
}
