use super::Quadrature;
use crate::geometry::{faces_per_cell, unit_normal_direction};
use nalgebra::Point;
use smallvec::SmallVec;

/// How a face of the reference cell is split into subfaces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubfaceCase {
    /// every face axis is bisected (2 subfaces on a line, 4 on a quad)
    Isotropic,
    /// only the first face axis is bisected
    CutX,
    /// only the second face axis is bisected (quads only)
    CutY,
}

impl SubfaceCase {
    /// The face-local axes which are bisected by this case on a face of dimension `face_dim`
    pub fn cut_face_axes(&self, face_dim: usize) -> SmallVec<[usize; 2]> {
        match (self, face_dim) {
            (Self::Isotropic, _) => (0..face_dim).collect(),
            (Self::CutX, d) if d >= 1 => SmallVec::from_slice(&[0]),
            (Self::CutY, d) if d >= 2 => SmallVec::from_slice(&[1]),
            _ => panic!(
                "{:?} is not a valid subface case on a {}D face; cannot project to subface!",
                self, face_dim
            ),
        }
    }

    pub fn n_subfaces(&self, face_dim: usize) -> usize {
        1 << self.cut_face_axes(face_dim).len()
    }
}

/// Place the `(D-1)`-fold tensor product of `rule` onto face `face_no` of the reference cell.
///
/// Face points are ordered lexicographically over the remaining cell axes (lowest axis fastest).
pub fn project_to_face<const D: usize>(rule: &Quadrature<1>, face_no: usize) -> Vec<Point<f64, D>> {
    face_points::<D>(rule, face_no, |_, t| t)
}

/// Place the `(D-1)`-fold tensor product of `rule` onto subface `subface` of face `face_no`.
///
/// Subfaces are numbered lexicographically over the bisected face axes.
pub fn project_to_subface<const D: usize>(
    rule: &Quadrature<1>,
    face_no: usize,
    subface: usize,
    case: SubfaceCase,
) -> Vec<Point<f64, D>> {
    let cut_axes = case.cut_face_axes(D - 1);
    assert!(
        subface < (1 << cut_axes.len()),
        "Subface {} does not exist for {:?}; cannot project to subface!",
        subface,
        case
    );

    face_points::<D>(rule, face_no, |face_axis, t| {
        match cut_axes.iter().position(|a| *a == face_axis) {
            Some(bit) => 0.5 * t + 0.5 * ((subface >> bit) & 1) as f64,
            None => t,
        }
    })
}

fn face_points<const D: usize>(
    rule: &Quadrature<1>,
    face_no: usize,
    map_coord: impl Fn(usize, f64) -> f64,
) -> Vec<Point<f64, D>> {
    assert!(
        face_no < faces_per_cell(D),
        "Face {} does not exist on a {}D cell; cannot project to face!",
        face_no,
        D
    );
    let normal = unit_normal_direction(face_no);
    let face_axes: SmallVec<[usize; 2]> = (0..D).filter(|a| *a != normal).collect();
    let coords = rule.coordinates();
    let n_points = coords.len().pow(D as u32 - 1);

    (0..n_points)
        .map(|q| {
            let mut rest = q;
            let mut p = [0.0; D];
            p[normal] = (face_no % 2) as f64;
            for (face_axis, &axis) in face_axes.iter().enumerate() {
                p[axis] = map_coord(face_axis, coords[rest % coords.len()]);
                rest /= coords.len();
            }
            Point::from(p)
        })
        .collect()
}
