//! Small dense helpers: hyperplanes via cofactors, affine rank, simplex measures.
//!
//! Everything works on `DVector<f64>` so the hull engine stays dimension-agnostic.
//! Sizes are tiny (d ≤ ~8 in practice), so plain cofactor expansion and LU are fine.

use std::cmp::Ordering;

use nalgebra::{DMatrix, DVector};

/// Unit normal `n` and offset `c` of the hyperplane `n·x = c` through `d` points in R^d.
///
/// The normal is the cofactor vector of the rows `p_i − p_0`, so
/// `det[n; p_1−p_0; …; p_{d−1}−p_0] > 0` before normalization. Swapping two
/// points flips the sign. Returns `None` if the points are affinely dependent.
pub(crate) fn hyperplane_through(pts: &[&DVector<f64>]) -> Option<(DVector<f64>, f64)> {
    let d = pts.first()?.len();
    if pts.len() != d || d < 2 {
        return None;
    }
    let rows = d - 1;
    let a = DMatrix::from_fn(rows, d, |i, j| pts[i + 1][j] - pts[0][j]);
    let mut n = DVector::zeros(d);
    for k in 0..d {
        let minor = DMatrix::from_fn(rows, rows, |i, j| a[(i, if j < k { j } else { j + 1 })]);
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        n[k] = sign * minor.determinant();
    }
    let norm = n.norm();
    if !(norm.is_finite() && norm > 0.0) {
        return None;
    }
    n /= norm;
    let c = n.dot(pts[0]);
    Some((n, c))
}

/// Greedy affinely independent subset of hull vertices.
///
/// Starts at the lexicographically smallest point and repeatedly adds the point
/// furthest from the affine span chosen so far, stopping at `d + 1` points or
/// when no point is further than `tol`. `rank = indices.len() − 1`.
///
/// Distances within `tol` of the best count as ties; the tie goes to the point
/// furthest from the start. Among tied points that maximizer is extreme, so a
/// lattice point on an edge is never picked over the edge's endpoints.
pub(crate) struct SimplexSeed {
    pub indices: Vec<usize>,
    pub rank: usize,
}

pub(crate) fn extreme_simplex(points: &[DVector<f64>], tol: f64) -> SimplexSeed {
    let Some((start, origin)) = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| lex_cmp(a, b))
    else {
        return SimplexSeed {
            indices: Vec::new(),
            rank: 0,
        };
    };
    let d = origin.len();
    let residual = |p: &DVector<f64>, basis: &[DVector<f64>]| {
        let mut r = p - origin;
        for q in basis {
            let proj = q.dot(&r);
            r.axpy(-proj, q, 1.0);
        }
        r
    };
    let mut indices = vec![start];
    let mut basis: Vec<DVector<f64>> = Vec::with_capacity(d);
    while indices.len() < d + 1 {
        let dists: Vec<f64> = points.iter().map(|p| residual(p, &basis).norm()).collect();
        let best = dists.iter().copied().fold(0.0f64, f64::max);
        if best <= tol {
            break;
        }
        let mut pick: Option<(usize, f64)> = None;
        for (i, &dist) in dists.iter().enumerate() {
            if dist <= tol || dist < best - tol {
                continue;
            }
            let reach = (&points[i] - origin).norm_squared();
            if pick.map_or(true, |(_, pr)| reach > pr) {
                pick = Some((i, reach));
            }
        }
        let Some((i, _)) = pick else {
            break;
        };
        let r = residual(&points[i], &basis);
        indices.push(i);
        basis.push(r / dists[i]);
    }
    let rank = indices.len() - 1;
    SimplexSeed { indices, rank }
}

/// Lexicographic order on coordinates; the minimum of a finite set is a hull vertex.
fn lex_cmp(a: &DVector<f64>, b: &DVector<f64>) -> Ordering {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Mean of a non-empty point list.
pub(crate) fn centroid<'a, I>(pts: I) -> DVector<f64>
where
    I: IntoIterator<Item = &'a DVector<f64>>,
{
    let mut acc: Option<DVector<f64>> = None;
    let mut count = 0usize;
    for p in pts {
        match acc.as_mut() {
            Some(a) => *a += p,
            None => acc = Some(p.clone()),
        }
        count += 1;
    }
    match acc {
        Some(a) => a / count as f64,
        None => DVector::zeros(0),
    }
}

/// Unsigned d-volume of the simplex spanned by `d + 1` points in R^d.
pub(crate) fn simplex_volume(pts: &[&DVector<f64>]) -> f64 {
    let Some(p0) = pts.first() else {
        return 0.0;
    };
    let d = p0.len();
    if pts.len() != d + 1 {
        return 0.0;
    }
    let m = DMatrix::from_fn(d, d, |i, j| pts[j + 1][i] - p0[i]);
    let fact: f64 = (1..=d).map(|k| k as f64).product();
    m.determinant().abs() / fact
}

/// Circumcenter and circumradius of `d + 1` points in R^d.
///
/// Solves `2 (p_i − p_0)·x = |p_i − p_0|²` for the offset `x` of the center from `p_0`.
pub(crate) fn circumsphere(pts: &[&DVector<f64>]) -> Option<(DVector<f64>, f64)> {
    let p0 = pts.first()?;
    let d = p0.len();
    if pts.len() != d + 1 {
        return None;
    }
    let a = DMatrix::from_fn(d, d, |i, j| 2.0 * (pts[i + 1][j] - p0[j]));
    let b = DVector::from_fn(d, |i, _| (pts[i + 1] - *p0).norm_squared());
    let x = a.lu().solve(&b)?;
    if !x.iter().all(|v| v.is_finite()) {
        return None;
    }
    let radius = x.norm();
    Some((*p0 + x, radius))
}

/// Barycentric coordinates of `p` with respect to `d + 1` points in R^d.
pub(crate) fn barycentric(pts: &[&DVector<f64>], p: &DVector<f64>) -> Option<Vec<f64>> {
    let p0 = pts.first()?;
    let d = p0.len();
    if pts.len() != d + 1 || p.len() != d {
        return None;
    }
    let a = DMatrix::from_fn(d, d, |i, j| pts[j + 1][i] - p0[i]);
    let rhs = p - *p0;
    let x = a.lu().solve(&rhs)?;
    let mut out = Vec::with_capacity(d + 1);
    out.push(1.0 - x.sum());
    out.extend(x.iter().copied());
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    #[test]
    fn hyperplane_2d_edge_is_ccw_oriented() {
        let a = dvector![0.0, 0.0];
        let b = dvector![1.0, 0.0];
        let (n, c) = hyperplane_through(&[&a, &b]).unwrap();
        // det[n; b−a] > 0 ⇒ n = (0, −1) for an edge running +x.
        assert!((n[0]).abs() < 1e-12);
        assert!((n[1] + 1.0).abs() < 1e-12);
        assert!(c.abs() < 1e-12);
    }

    #[test]
    fn hyperplane_3d_orthogonal_to_face() {
        let a = dvector![1.0, 0.0, 0.0];
        let b = dvector![0.0, 1.0, 0.0];
        let c = dvector![0.0, 0.0, 1.0];
        let (n, off) = hyperplane_through(&[&a, &b, &c]).unwrap();
        let expected = 1.0 / 3f64.sqrt();
        for k in 0..3 {
            assert!((n[k].abs() - expected).abs() < 1e-12);
        }
        assert!((n.dot(&b) - off).abs() < 1e-12);
        assert!((n.dot(&c) - off).abs() < 1e-12);
    }

    #[test]
    fn hyperplane_rejects_collinear() {
        let a = dvector![0.0, 0.0, 0.0];
        let b = dvector![1.0, 1.0, 1.0];
        let c = dvector![2.0, 2.0, 2.0];
        assert!(hyperplane_through(&[&a, &b, &c]).is_none());
    }

    #[test]
    fn extreme_simplex_reports_rank() {
        let pts = vec![
            dvector![0.0, 0.0, 0.0],
            dvector![1.0, 0.0, 0.0],
            dvector![0.0, 1.0, 0.0],
            dvector![1.0, 1.0, 0.0],
        ];
        let seed = extreme_simplex(&pts, 1e-10);
        assert_eq!(seed.rank, 2);
        let mut full = pts.clone();
        full.push(dvector![0.2, 0.2, 3.0]);
        let seed = extreme_simplex(&full, 1e-10);
        assert_eq!(seed.rank, 3);
        assert_eq!(seed.indices.len(), 4);
        assert!(seed.indices.contains(&4));
    }

    #[test]
    fn extreme_simplex_skips_lattice_points_on_edges() {
        let mut pts = Vec::new();
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    pts.push(dvector![x as f64, y as f64, z as f64]);
                }
            }
        }
        let seed = extreme_simplex(&pts, 1e-10);
        assert_eq!(seed.rank, 3);
        for &i in &seed.indices {
            assert!(
                pts[i].iter().all(|&c| c == 0.0 || c == 3.0),
                "seed vertex {:?} is not a cube corner",
                pts[i]
            );
        }
    }

    #[test]
    fn lexicographic_start_is_a_vertex() {
        // Three points share the minimal x; only (0, -1) is extreme among them.
        let pts = vec![
            dvector![0.0, 0.0],
            dvector![0.0, -1.0],
            dvector![0.0, 1.0],
            dvector![2.0, 0.0],
        ];
        let seed = extreme_simplex(&pts, 1e-10);
        assert_eq!(seed.indices[0], 1);
        assert!(!seed.indices.contains(&0));
    }

    #[test]
    fn simplex_volume_unit_corner() {
        let o = dvector![0.0, 0.0, 0.0];
        let x = dvector![1.0, 0.0, 0.0];
        let y = dvector![0.0, 1.0, 0.0];
        let z = dvector![0.0, 0.0, 1.0];
        let vol = simplex_volume(&[&o, &x, &y, &z]);
        assert!((vol - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn circumsphere_right_triangle() {
        let a = dvector![0.0, 0.0];
        let b = dvector![2.0, 0.0];
        let c = dvector![0.0, 2.0];
        let (center, r) = circumsphere(&[&a, &b, &c]).unwrap();
        assert!((center[0] - 1.0).abs() < 1e-12 && (center[1] - 1.0).abs() < 1e-12);
        assert!((r - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn barycentric_sums_to_one() {
        let a = dvector![0.0, 0.0];
        let b = dvector![1.0, 0.0];
        let c = dvector![0.0, 1.0];
        let w = barycentric(&[&a, &b, &c], &dvector![0.25, 0.25]).unwrap();
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((w[0] - 0.5).abs() < 1e-12);
    }
}
