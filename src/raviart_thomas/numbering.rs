/// Map from the lexicographic numbering of all vector components to the faces-first numbering.
///
/// `degree` is the number of points in the transverse directions (the maximal polynomial degree).
/// Component `d` occupies the lexicographic block `[d * n_sub, (d + 1) * n_sub)`, ordered with
/// axis 0 fastest; along axis `d` it has `degree + 1` indices `h`, along the other axes `degree`.
///
/// The hierarchic numbering places the DoFs with `h == 0` on face `2d` and those with
/// `h == degree` on face `2d + 1` (each face ordered lexicographically over the remaining axes),
/// followed by the interior DoFs grouped by component.
pub fn lexicographic_to_hierarchic<const D: usize>(degree: usize) -> Vec<usize> {
    assert!(degree > 0, "RT nodal numbering needs at least one point per face direction!");
    let n = degree;
    let n_face = n.pow(D as u32 - 1);
    let n_sub = (n + 1) * n_face;
    let n_interior_per_component = (n - 1) * n_face;

    let mut numbering = Vec::with_capacity(D * n_sub);
    for d in 0..D {
        for i in 0..n_sub {
            let mut rest = i;
            let mut idx = [0; D];
            for (axis, idx_a) in idx.iter_mut().enumerate() {
                let extent = if axis == d { n + 1 } else { n };
                *idx_a = rest % extent;
                rest /= extent;
            }

            let h = idx[d];
            let hierarchic = if h == 0 || h == n {
                let face = 2 * d + usize::from(h == n);
                let mut local = 0;
                let mut stride = 1;
                for (_, idx_a) in idx.iter().enumerate().filter(|(axis, _)| *axis != d) {
                    local += idx_a * stride;
                    stride *= n;
                }
                face * n_face + local
            } else {
                let mut local = 0;
                let mut stride = 1;
                for (axis, idx_a) in idx.iter().enumerate() {
                    if axis == d {
                        local += (idx_a - 1) * stride;
                        stride *= n - 1;
                    } else {
                        local += idx_a * stride;
                        stride *= n;
                    }
                }
                2 * D * n_face + d * n_interior_per_component + local
            };
            numbering.push(hierarchic);
        }
    }

    numbering
}

/// Inverse of a permutation of `[0, n)`
pub fn invert_permutation(permutation: &[usize]) -> Vec<usize> {
    let mut inverse = vec![usize::MAX; permutation.len()];
    for (i, p) in permutation.iter().enumerate() {
        assert!(
            *p < permutation.len() && inverse[*p] == usize::MAX,
            "Input is not a permutation; cannot invert!"
        );
        inverse[*p] = i;
    }
    inverse
}

/// Per vector component, map the component's lexicographic index onto the shared
/// (component 0) tensor space evaluated at the rotated point `p[c] = x[(c + d) % D]`.
///
/// `degree` is the raw element degree: the shared space has `degree + 2` functions along
/// axis 0 and `degree + 1` along the others. For `d = 0` this is the identity; in 2D
/// `d = 1` swaps the two tensor factors, in 3D `d = 1` and `d = 2` are the cyclic
/// permutations `(i, j, k) -> (j, k, i)` and `(i, j, k) -> (k, i, j)`.
pub fn renumber_aniso<const D: usize>(degree: usize) -> [Vec<usize>; D] {
    let n_high = degree + 2;
    let n_low = degree + 1;
    let n_sub = n_high * n_low.pow(D as u32 - 1);

    std::array::from_fn(|d| {
        (0..n_sub)
            .map(|i| {
                // multi-index of component d in cell coordinates
                let mut rest = i;
                let mut idx = [0; D];
                for (axis, idx_a) in idx.iter_mut().enumerate() {
                    let extent = if axis == d { n_high } else { n_low };
                    *idx_a = rest % extent;
                    rest /= extent;
                }

                // the same multi-index in rotated coordinates, flattened with the shared extents
                let mut shared = 0;
                let mut stride = 1;
                for c in 0..D {
                    shared += idx[(c + d) % D] * stride;
                    stride *= if c == 0 { n_high } else { n_low };
                }
                shared
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_order_2d_numbering() {
        // one DoF per edge: component 0 -> faces 0, 1; component 1 -> faces 2, 3
        assert_eq!(lexicographic_to_hierarchic::<2>(1), vec![0, 1, 2, 3]);
    }

    #[test]
    fn numbering_2d_degree_1() {
        let l2h = lexicographic_to_hierarchic::<2>(2);
        // component 0: (h, y) with h fastest; faces 0 and 1 hold h = 0 and h = 2
        assert_eq!(&l2h[0..6], &[0, 8, 2, 1, 9, 3]);
        // component 1: (x, h) with x fastest
        assert_eq!(&l2h[6..12], &[4, 5, 10, 11, 6, 7]);
    }

    #[test]
    fn numbering_is_a_permutation() {
        for degree in 1..=4 {
            let l2h = lexicographic_to_hierarchic::<3>(degree);
            assert_eq!(l2h.len(), 3 * (degree + 1) * degree * degree);
            let h2l = invert_permutation(&l2h);
            for (i, h) in l2h.iter().enumerate() {
                assert_eq!(h2l[*h], i);
            }
        }
    }

    #[test]
    fn aniso_renumbering_matches_explicit_formulas() {
        for degree in 0..=3 {
            let (nh, nl) = (degree + 2, degree + 1);

            let r2 = renumber_aniso::<2>(degree);
            assert!(r2[0].iter().enumerate().all(|(i, r)| i == *r));
            for j in 0..nh {
                for i in 0..nl {
                    assert_eq!(r2[1][j * nl + i], j + i * nh);
                }
            }

            let r3 = renumber_aniso::<3>(degree);
            for k in 0..nl {
                for j in 0..nh {
                    for i in 0..nl {
                        assert_eq!(r3[1][(k * nh + j) * nl + i], j + k * nh + i * nh * nl);
                    }
                }
            }
            for k in 0..nh {
                for j in 0..nl {
                    for i in 0..nl {
                        assert_eq!(r3[2][(k * nl + j) * nl + i], k + i * nh + j * nh * nl);
                    }
                }
            }
        }
    }

    #[test]
    #[should_panic]
    fn invert_rejects_duplicates() {
        invert_permutation(&[0, 0, 1]);
    }
}
