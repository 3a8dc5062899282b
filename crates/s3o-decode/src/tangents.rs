//! Per-vertex tangent basis synthesis.
//!
//! Each triangle contributes its texture-space S (tangent) and T (bitangent)
//! directions to its three vertices. Once all triangles are summed, each
//! vertex's S is made orthogonal to its normal and T is rebuilt from S and
//! the normal, keeping the handedness of the accumulated pair.

use glam::{Vec2, Vec3};

use crate::{PrimitiveKind, STRIP_RESTART, Vertex};

/// Texture-space determinants smaller than this are treated as degenerate.
const DEGENERATE_DETERMINANT: f32 = 0.0001;

/// Normal substituted for vertices whose stored normal is not finite.
const FALLBACK_NORMAL: Vec3 = Vec3::Z;

/// Smoothed tangent basis, one entry per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Tangents {
    /// Unit tangents orthogonal to the vertex normal, or zero where the
    /// accumulated tangent was parallel to the normal.
    pub s: Vec<Vec3>,
    /// Bitangents, `s × normal` signed by the accumulated handedness.
    pub t: Vec<Vec3>,
}

/// Compute the tangent basis for a piece.
///
/// Returns `None` for empty pieces and for quads, which are not
/// tangent-mapped. Vertices with non-finite normals get
/// `(0, 0, 1)` written back as their normal.
///
/// Every non-sentinel index in `draw_order` must be a valid index into
/// `vertices`; the piece decoder checks this before calling.
pub fn synthesize_tangents(
    kind: PrimitiveKind,
    draw_order: &[i32],
    vertices: &mut [Vertex],
) -> Option<Tangents> {
    if draw_order.is_empty() || kind == PrimitiveKind::Quads {
        return None;
    }

    let mut s = vec![Vec3::ZERO; vertices.len()];
    let mut t = vec![Vec3::ZERO; vertices.len()];

    for_each_triangle(kind, draw_order, |[i0, i1, i2]| {
        let (sdir, tdir) = triangle_directions(&vertices[i0], &vertices[i1], &vertices[i2]);
        for i in [i0, i1, i2] {
            s[i] += sdir;
            t[i] += tdir;
        }
    });

    for ((vertex, s), t) in vertices.iter_mut().zip(&mut s).zip(&mut t) {
        if !vertex.normal.is_finite() {
            vertex.normal = FALLBACK_NORMAL;
        }
        (*s, *t) = orthonormalize(vertex.normal, *s, *t);
    }

    Some(Tangents { s, t })
}

/// Visit each triangle of a draw order as vertex indices.
///
/// Triangle lists are read in non-overlapping windows of three. Strips slide
/// one index at a time and swap the last two indices of every odd triangle
/// in a segment, so all triangles share the first one's winding. A window
/// that touches a restart sentinel resumes right after the sentinel, which
/// starts a new segment.
fn for_each_triangle(kind: PrimitiveKind, draw_order: &[i32], mut visit: impl FnMut([usize; 3])) {
    match kind {
        PrimitiveKind::Triangles => {
            for window in draw_order.chunks_exact(3) {
                if let [Some(a), Some(b), Some(c)] = [window[0], window[1], window[2]].map(as_index) {
                    visit([a, b, c]);
                }
            }
        }
        PrimitiveKind::TriangleStrip => {
            let mut i = 0;
            let mut segment_start = 0;
            while i + 2 < draw_order.len() {
                let window = &draw_order[i..i + 3];
                if let Some(k) = window.iter().position(|&index| index == STRIP_RESTART) {
                    i += k + 1;
                    segment_start = i;
                    continue;
                }

                let [a, b, c] = [window[0], window[1], window[2]].map(as_index);
                if let (Some(a), Some(b), Some(c)) = (a, b, c) {
                    if (i - segment_start) % 2 == 1 {
                        visit([a, c, b]);
                    } else {
                        visit([a, b, c]);
                    }
                }
                i += 1;
            }
        }
        PrimitiveKind::Quads => {}
    }
}

fn as_index(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

/// Unnormalized S and T directions of one triangle.
///
/// Both lie in the triangle plane but are not necessarily orthogonal to each
/// other or to the vertex normals.
fn triangle_directions(v0: &Vertex, v1: &Vertex, v2: &Vertex) -> (Vec3, Vec3) {
    let e1 = v1.position - v0.position;
    let e2 = v2.position - v0.position;
    let Vec2 { x: s1, y: t1 } = v1.tex_coord - v0.tex_coord;
    let Vec2 { x: s2, y: t2 } = v2.tex_coord - v0.tex_coord;

    let d = s1 * t2 - s2 * t1;
    let r = if d.abs() < DEGENERATE_DETERMINANT {
        1.0
    } else {
        1.0 / d
    };

    let sdir = (e1 * t2 - e2 * t1) * r;
    let tdir = (e2 * s1 - e1 * s2) * r;
    (sdir, tdir)
}

/// Gram-Schmidt S against the normal and rebuild T with the accumulated
/// handedness.
fn orthonormalize(normal: Vec3, s: Vec3, t: Vec3) -> (Vec3, Vec3) {
    let s = if s == Vec3::ZERO { Vec3::X } else { s };
    let t = if t == Vec3::ZERO { Vec3::Y } else { t };

    let handedness = if normal.cross(s).dot(t) < 0.0 { -1.0 } else { 1.0 };
    let s = (s - normal * normal.dot(s)).normalize_or_zero();
    let t = s.cross(normal) * handedness;
    (s, t)
}
