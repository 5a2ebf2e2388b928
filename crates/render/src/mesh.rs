use glam::{UVec3, Vec3};
use spinlab_common::Color;
use std::f32::consts::{PI, TAU};

/// Indexed triangle mesh with one face group per vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Material group of each vertex (box face index, otherwise 0).
    pub faces: Vec<u32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: Vec3, normal: Vec3, face: u32) {
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.faces.push(face);
    }
}

/// One end of a coloured line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineVertex {
    pub position: Vec3,
    pub color: Color,
}

impl LineVertex {
    fn new(position: Vec3, color: Color) -> Self {
        Self { position, color }
    }
}

/// Box with per-axis segment counts. Faces come in +X, -X, +Y, -Y, +Z, -Z
/// order and are numbered 0..6 in [`MeshData::faces`].
pub(crate) fn box_mesh(size: Vec3, segments: UVec3) -> MeshData {
    let segments = segments.max(UVec3::ONE);
    let half = size * 0.5;
    // (normal, u axis, v axis, u extent, v extent, u segments, v segments, depth)
    #[rustfmt::skip]
    let faces = [
        (Vec3::X,     Vec3::NEG_Z, Vec3::Y,     size.z, size.y, segments.z, segments.y, half.x),
        (Vec3::NEG_X, Vec3::Z,     Vec3::Y,     size.z, size.y, segments.z, segments.y, half.x),
        (Vec3::Y,     Vec3::X,     Vec3::NEG_Z, size.x, size.z, segments.x, segments.z, half.y),
        (Vec3::NEG_Y, Vec3::X,     Vec3::Z,     size.x, size.z, segments.x, segments.z, half.y),
        (Vec3::Z,     Vec3::X,     Vec3::Y,     size.x, size.y, segments.x, segments.y, half.z),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y,     size.x, size.y, segments.x, segments.y, half.z),
    ];

    let mut mesh = MeshData::default();
    for (face, &(normal, u, v, u_len, v_len, u_segs, v_segs, depth)) in faces.iter().enumerate() {
        let base = mesh.positions.len() as u32;
        for iy in 0..=v_segs {
            let fy = iy as f32 / v_segs as f32 - 0.5;
            for ix in 0..=u_segs {
                let fx = ix as f32 / u_segs as f32 - 0.5;
                let p = normal * depth + u * (fx * u_len) + v * (fy * v_len);
                mesh.push(p, normal, face as u32);
            }
        }
        let row = u_segs + 1;
        for iy in 0..v_segs {
            for ix in 0..u_segs {
                let a = base + iy * row + ix;
                let b = a + 1;
                let c = b + row;
                let d = a + row;
                mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }
    }
    mesh
}

/// UV sphere. Poles collapse to a single triangle fan per ring.
pub(crate) fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = MeshData::default();

    for iy in 0..=hs {
        let phi = iy as f32 / hs as f32 * PI;
        for ix in 0..=ws {
            let theta = ix as f32 / ws as f32 * TAU;
            let normal = Vec3::new(
                -theta.cos() * phi.sin(),
                phi.cos(),
                theta.sin() * phi.sin(),
            );
            mesh.push(normal * radius, normal, 0);
        }
    }

    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Rectangle in the XY plane facing +Z.
pub(crate) fn plane_mesh(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let mut mesh = MeshData::default();
    for (x, y) in [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)] {
        mesh.push(Vec3::new(x, y, 0.0), Vec3::Z, 0);
    }
    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    mesh
}

/// Three coloured axes from the origin.
pub fn axes_lines(size: f32) -> Vec<LineVertex> {
    [
        (Vec3::X, Color::hex(0xff0000)),
        (Vec3::Y, Color::hex(0x00ff00)),
        (Vec3::Z, Color::hex(0x0000ff)),
    ]
    .into_iter()
    .flat_map(|(axis, color)| {
        [
            LineVertex::new(Vec3::ZERO, color),
            LineVertex::new(axis * size, color),
        ]
    })
    .collect()
}

/// Square grid of `divisions` cells per side on the XZ plane. The two lines
/// through the centre use `center_color`.
pub fn grid_lines(
    size: f32,
    divisions: u32,
    center_color: Color,
    line_color: Color,
) -> Vec<LineVertex> {
    let divisions = divisions.max(1);
    let half = size * 0.5;
    let step = size / divisions as f32;
    let center = divisions / 2;

    let mut verts = Vec::with_capacity((divisions as usize + 1) * 4);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if i == center { center_color } else { line_color };
        // Line along X
        verts.push(LineVertex::new(Vec3::new(-half, 0.0, k), color));
        verts.push(LineVertex::new(Vec3::new(half, 0.0, k), color));
        // Line along Z
        verts.push(LineVertex::new(Vec3::new(k, 0.0, -half), color));
        verts.push(LineVertex::new(Vec3::new(k, 0.0, half), color));
    }
    verts
}

/// Three-axis cross of half-size `size` centred on `position`.
pub fn marker_lines(position: Vec3, size: f32, color: Color) -> Vec<LineVertex> {
    [Vec3::X, Vec3::Y, Vec3::Z]
        .into_iter()
        .flat_map(|axis| {
            [
                LineVertex::new(position - axis * size, color),
                LineVertex::new(position + axis * size, color),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_normals(mesh: &MeshData) {
        for n in &mesh.normals {
            let len = Vec3::from_array(*n).length();
            assert!((len - 1.0).abs() < 1e-5, "normal length {len}");
        }
    }

    fn assert_indices_in_range(mesh: &MeshData) {
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    /// Every triangle's winding agrees with its vertex normals.
    fn assert_ccw(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let p = |i: u32| Vec3::from_array(mesh.positions[i as usize]);
            let face_normal = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            let vertex_normal = Vec3::from_array(mesh.normals[tri[0] as usize]);
            assert!(face_normal.dot(vertex_normal) > 0.0);
        }
    }

    #[test]
    fn unit_cube_counts() {
        let mesh = box_mesh(Vec3::ONE, UVec3::ONE);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_unit_normals(&mesh);
        assert_indices_in_range(&mesh);
        assert_ccw(&mesh);
    }

    #[test]
    fn segmented_box_counts() {
        // One height segment becomes four: side faces get 2x5 vertices.
        let mesh = box_mesh(Vec3::ONE, UVec3::new(1, 4, 1));
        assert_eq!(mesh.vertex_count(), 10 + 10 + 4 + 4 + 10 + 10);
        assert_eq!(mesh.triangle_count(), 2 * (4 + 4 + 1 + 1 + 4 + 4));
        assert_indices_in_range(&mesh);
        assert_ccw(&mesh);
    }

    #[test]
    fn box_faces_are_grouped_in_order() {
        let mesh = box_mesh(Vec3::splat(2.0), UVec3::ONE);
        for (face, chunk) in mesh.faces.chunks(4).enumerate() {
            assert!(chunk.iter().all(|&f| f == face as u32));
        }
        // +X face sits at x = +1
        assert!(mesh.positions[..4].iter().all(|p| p[0] == 1.0));
    }

    #[test]
    fn sphere_counts() {
        let mesh = sphere_mesh(7.0, 12, 8);
        assert_eq!(mesh.vertex_count(), 13 * 9);
        assert_eq!(mesh.triangle_count(), 2 * 12 * 8 - 2 * 12);
        assert_unit_normals(&mesh);
        assert_indices_in_range(&mesh);
        assert_ccw(&mesh);
        for p in &mesh.positions {
            assert!((Vec3::from_array(*p).length() - 7.0).abs() < 1e-4);
        }
    }

    #[test]
    fn plane_faces_plus_z() {
        let mesh = plane_mesh(40.0, 20.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.positions[2], [20.0, 10.0, 0.0]);
        assert_ccw(&mesh);
    }

    #[test]
    fn grid_line_counts_and_center_color() {
        let center = Color::hex(0xff0000);
        let line = Color::hex(0x00ffff);
        let verts = grid_lines(10.0, 100, center, line);
        assert_eq!(verts.len(), 101 * 4);
        let centered: Vec<_> = verts.iter().filter(|v| v.color == center).collect();
        assert_eq!(centered.len(), 4);
        assert!(centered.iter().all(|v| v.position.x == 0.0 || v.position.z == 0.0));
    }

    #[test]
    fn grid_spans_size() {
        let verts = grid_lines(10.0, 10, Color::WHITE, Color::BLACK);
        let max_x = verts.iter().map(|v| v.position.x).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 5.0);
        assert!(verts.iter().all(|v| v.position.y == 0.0));
    }

    #[test]
    fn axes_have_three_colored_segments() {
        let verts = axes_lines(3.0);
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[1].position, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(verts[1].color, Color::hex(0xff0000));
        assert_eq!(verts[5].position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn marker_is_centred() {
        let p = Vec3::new(0.0, 10.0, 0.0);
        let verts = marker_lines(p, 5.0, Color::WHITE);
        assert_eq!(verts.len(), 6);
        let sum: Vec3 = verts.iter().map(|v| v.position).sum();
        assert!((sum / 6.0 - p).length() < 1e-5);
    }
}
