//! Breaking pieces into debris.

use glam::Vec3;
use rand::Rng;

use crate::model::Piece;
use crate::{PrimitiveKind, STRIP_RESTART, Vertex};

/// Scale of the random velocity added to each fragment.
pub const FRAGMENT_SPEED_JITTER: f32 = 2.0;

/// Parameters for one shatter call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShatterParams {
    /// Probability in `[0, 1]` that a primitive becomes a fragment.
    pub survival_chance: f32,
    pub texture_type: i32,
    pub team: i32,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// One piece of debris. Triangles are stored as quads with a repeated
/// middle vertex, so every fragment has four vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub vertices: [Vertex; 4],
    pub texture_type: i32,
    pub team: i32,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Receives fragments, typically a particle or projectile registry.
pub trait DebrisSink {
    fn add_fragment(&mut self, fragment: Fragment);
}

impl DebrisSink for Vec<Fragment> {
    fn add_fragment(&mut self, fragment: Fragment) {
        self.push(fragment);
    }
}

/// Split a piece's primitives into independent fragments.
///
/// Each primitive survives with probability `params.survival_chance`.
/// Windows that touch a strip restart, and trailing partial windows, are not
/// primitives and draw no sample. The piece is only read.
///
/// Returns the number of fragments handed to `sink`.
pub fn shatter<R, S>(piece: &Piece, params: &ShatterParams, rng: &mut R, sink: &mut S) -> usize
where
    R: Rng + ?Sized,
    S: DebrisSink + ?Sized,
{
    let vertices = piece.vertices();
    let order = piece.draw_order();
    let mut emitted = 0;

    let mut emit = |indices: [i32; 4]| {
        let Some(corners) = corners(vertices, indices) else {
            return;
        };
        if rng.gen_range(0.0..1.0_f32) > params.survival_chance {
            return;
        }
        sink.add_fragment(Fragment {
            vertices: corners,
            texture_type: params.texture_type,
            team: params.team,
            position: params.position,
            velocity: params.velocity + random_in_unit_sphere(&mut *rng) * FRAGMENT_SPEED_JITTER,
        });
        emitted += 1;
    };

    match piece.primitive_kind() {
        PrimitiveKind::Triangles => {
            for w in order.chunks_exact(3).filter(|w| is_primitive(w)) {
                emit([w[0], w[1], w[1], w[2]]);
            }
        }
        PrimitiveKind::TriangleStrip => {
            for w in order.windows(3).filter(|w| is_primitive(w)) {
                emit([w[0], w[1], w[1], w[2]]);
            }
        }
        PrimitiveKind::Quads => {
            for w in order.chunks_exact(4).filter(|w| is_primitive(w)) {
                emit([w[0], w[1], w[2], w[3]]);
            }
        }
    }

    emitted
}

fn is_primitive(window: &[i32]) -> bool {
    !window.contains(&STRIP_RESTART)
}

fn corners(vertices: &[Vertex], indices: [i32; 4]) -> Option<[Vertex; 4]> {
    let [a, b, c, d] =
        indices.map(|i| usize::try_from(i).ok().and_then(|i| vertices.get(i).copied()));
    Some([a?, b?, c?, d?])
}

fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}
