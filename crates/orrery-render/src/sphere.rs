//! UV sphere generation.

use std::f32::consts::{PI, TAU};

use crate::geometry::{GeometryBuffer, GeometryError};

/// Largest resolution whose `6·R²` indices still fit in `u32`.
pub const MAX_SPHERE_RESOLUTION: u32 = 26_754;

/// Vertex index of grid cell corner `(p, q)` on a sphere of `resolution`, or
/// `None` when it does not fit in `u32`.
pub fn grid_index(p: u32, q: u32, resolution: u32) -> Option<u32> {
    resolution.checked_add(1)?.checked_mul(p)?.checked_add(q)
}

/// Vertex and index counts `((R+1)², 6·R²)` of a sphere grid.
pub fn sphere_counts(resolution: u32) -> Result<(u32, u32), GeometryError> {
    if resolution < 1 {
        return Err(GeometryError::InvalidResolution(resolution));
    }
    if resolution > MAX_SPHERE_RESOLUTION {
        return Err(GeometryError::ResolutionTooLarge(resolution));
    }
    let side = resolution + 1;
    Ok((side * side, 6 * resolution * resolution))
}

/// Generate a unit UV sphere with `resolution` subdivisions in both the polar
/// and azimuthal direction.
///
/// The grid has `(R+1)²` vertices: row `i` sits at polar angle `iπ/R` from +Z
/// and column `j` at azimuth `j2π/R`. The seam column and the pole rows are
/// duplicated so that every vertex gets its own texture coordinate
/// `(j/R, i/R)`. Normals equal positions.
///
/// The returned buffer is not yet uploaded.
pub fn generate_sphere(resolution: u32) -> Result<GeometryBuffer, GeometryError> {
    let (vertex_count, index_count) = sphere_counts(resolution)?;
    let r = resolution;
    let mut geometry = GeometryBuffer::with_capacity(vertex_count as usize, index_count as usize);

    for i in 0..=r {
        let (sin_polar, cos_polar) = (i as f32 * PI / r as f32).sin_cos();
        for j in 0..=r {
            let (sin_azimuth, cos_azimuth) = (j as f32 * TAU / r as f32).sin_cos();
            let point = [sin_polar * cos_azimuth, sin_polar * sin_azimuth, cos_polar];
            geometry.append_position(point);
            geometry.append_normal(point);
            geometry.append_texcoord([j as f32 / r as f32, i as f32 / r as f32]);
        }
    }

    let at = |p, q| grid_index(p, q, r).ok_or(GeometryError::ResolutionTooLarge(r));
    for i in 0..r {
        for j in 0..r {
            let (corner, below, diagonal, right) =
                (at(i, j)?, at(i + 1, j)?, at(i + 1, j + 1)?, at(i, j + 1)?);
            for index in [corner, below, diagonal, corner, diagonal, right] {
                geometry.append_index(index);
            }
        }
    }

    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_resolution_is_rejected() {
        assert!(matches!(
            generate_sphere(0),
            Err(GeometryError::InvalidResolution(0))
        ));
    }

    #[test]
    fn test_resolution_past_index_range_is_rejected() {
        assert_eq!(
            sphere_counts(MAX_SPHERE_RESOLUTION),
            Ok((26_755 * 26_755, 4_294_659_096))
        );
        for r in [MAX_SPHERE_RESOLUTION + 1, 65_536, u32::MAX] {
            assert_eq!(
                generate_sphere(r).err(),
                Some(GeometryError::ResolutionTooLarge(r)),
                "R={r}"
            );
        }
    }

    #[test]
    fn test_grid_index_overflow_is_none() {
        assert_eq!(grid_index(65_536, 0, 65_536), None);
        assert_eq!(grid_index(0, 5, u32::MAX), None);
        assert_eq!(grid_index(1, 0, u32::MAX - 1), Some(u32::MAX));
    }

    #[test]
    fn test_counts_for_resolution_four() {
        let sphere = generate_sphere(4).unwrap();
        assert_eq!(sphere.vertex_count(), 25);
        assert_eq!(sphere.triangle_count(), 32);
        assert_eq!(sphere.index_count(), 96);
        assert_eq!(grid_index(2, 3, 4), Some(13));
    }

    #[test]
    fn test_counts_scale_with_resolution() {
        for r in [1u32, 2, 3, 8, 17, 32] {
            let sphere = generate_sphere(r).unwrap();
            let n = ((r + 1) * (r + 1)) as usize;
            assert_eq!(sphere.vertex_count(), n, "R={r}");
            assert_eq!(sphere.index_count(), (6 * r * r) as usize, "R={r}");
            assert!(sphere.indices().iter().all(|&i| (i as usize) < n), "R={r}");
            assert!(sphere.validate().is_ok(), "R={r}");
        }
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        let sphere = generate_sphere(16).unwrap();
        for p in sphere.positions() {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5, "vertex {p:?} has length {len}");
        }
    }

    #[test]
    fn test_normals_match_positions() {
        let sphere = generate_sphere(9).unwrap();
        assert_eq!(sphere.positions(), sphere.normals());
    }

    #[test]
    fn test_first_row_is_north_pole() {
        let sphere = generate_sphere(6).unwrap();
        for p in &sphere.positions()[..7] {
            assert!((p[2] - 1.0).abs() < 1e-6);
        }
        let last = sphere.positions()[sphere.vertex_count() - 1];
        assert!((last[2] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_texcoords_follow_grid_without_flip() {
        let r = 4;
        let sphere = generate_sphere(r).unwrap();
        let uv = sphere.texcoords();
        assert_eq!(uv[0], [0.0, 0.0]);
        // v grows with the polar angle: the north pole row has v = 0.
        assert_eq!(uv[grid_index(2, 3, r).unwrap() as usize], [0.75, 0.5]);
        assert_eq!(uv[grid_index(r, r, r).unwrap() as usize], [1.0, 1.0]);
        assert!(uv.iter().flatten().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn test_first_cell_triangles() {
        let r = 3;
        let sphere = generate_sphere(r).unwrap();
        let expected = [
            0,
            grid_index(1, 0, r).unwrap(),
            grid_index(1, 1, r).unwrap(),
            0,
            grid_index(1, 1, r).unwrap(),
            grid_index(0, 1, r).unwrap(),
        ];
        assert_eq!(&sphere.indices()[..6], &expected);
    }

    #[test]
    fn test_generated_sphere_is_uninitialized() {
        let sphere = generate_sphere(2).unwrap();
        assert!(!sphere.is_initialized());
    }
}
