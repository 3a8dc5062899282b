//! Piece record decoding and recursive tree construction.

use std::collections::HashSet;

use glam::Vec3;

use crate::error::{DecodeError, DecodeResult};
use crate::model::{Piece, PieceId};
use crate::reader::ByteReader;
use crate::tangents::synthesize_tangents;
use crate::{DecodeOptions, PrimitiveKind, STRIP_RESTART, Vertex};

/// Size of a piece record in bytes.
pub const PIECE_RECORD_SIZE: usize = 52;

/// Size of a vertex record in bytes.
pub const VERTEX_SIZE: usize = 32;

const INDEX_SIZE: usize = 4;

/// Raw piece record, before its arrays are followed.
///
/// # Format
///
/// - Bytes 0-3: Name string offset
/// - Bytes 4-11: Child count, child offset table offset
/// - Bytes 12-19: Vertex count, vertex array offset
/// - Bytes 20-23: Vertex type (unused)
/// - Bytes 24-27: Primitive kind tag
/// - Bytes 28-35: Draw-order count, draw-order array offset
/// - Bytes 36-39: Collision data offset (unused)
/// - Bytes 40-51: Offset from parent (3 × f32)
#[derive(Debug, Clone, PartialEq)]
struct PieceRecord {
    name: usize,
    child_count: usize,
    child_table: usize,
    vertex_count: usize,
    vertices: usize,
    kind: PrimitiveKind,
    draw_order_count: usize,
    draw_order: usize,
    offset: Vec3,
}

impl PieceRecord {
    fn read(reader: &ByteReader<'_>, at: usize) -> DecodeResult<Self> {
        let field = |delta: usize| reader.usize_at(at + delta);

        reader.bytes(at, PIECE_RECORD_SIZE)?;
        let tag = reader.u32_at(at + 24)?;
        let kind =
            PrimitiveKind::from_tag(tag).ok_or(DecodeError::UnknownPrimitiveKind { tag, offset: at })?;

        Ok(Self {
            name: field(0)?,
            child_count: field(4)?,
            child_table: field(8)?,
            vertex_count: field(12)?,
            vertices: field(16)?,
            kind,
            draw_order_count: field(28)?,
            draw_order: field(32)?,
            offset: reader.vec3_at(at + 40)?,
        })
    }
}

/// Decode `count` consecutive vertex records.
pub fn read_vertices(reader: &ByteReader<'_>, at: usize, count: usize) -> DecodeResult<Vec<Vertex>> {
    reader.check_array(at, count, VERTEX_SIZE)?;
    (0..count)
        .map(|i| {
            let base = at + i * VERTEX_SIZE;
            Ok(Vertex {
                position: reader.vec3_at(base)?,
                normal: reader.vec3_at(base + 12)?,
                tex_coord: reader.vec2_at(base + 24)?,
            })
        })
        .collect()
}

/// Decode a draw-order array of `count` indices.
///
/// A restart sentinel that is not the last stored index is emitted followed
/// by an extra copy of the next stored index, which is then emitted again in
/// its own turn: `[a, -1, b, c]` decodes to `[a, -1, b, b, c]`.
pub fn read_draw_order(reader: &ByteReader<'_>, at: usize, count: usize) -> DecodeResult<Vec<i32>> {
    reader.check_array(at, count, INDEX_SIZE)?;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let index = reader.i32_at(at + i * INDEX_SIZE)?;
        out.push(index);

        if index == STRIP_RESTART && i + 1 != count {
            out.push(reader.i32_at(at + (i + 1) * INDEX_SIZE)?);
        }
    }
    Ok(out)
}

fn validate_draw_order(name: &str, draw_order: &[i32], vertex_count: usize) -> DecodeResult<()> {
    let bad = draw_order.iter().copied().find(|&index| {
        index != STRIP_RESTART && !usize::try_from(index).is_ok_and(|i| i < vertex_count)
    });
    match bad {
        Some(index) => Err(DecodeError::InvalidDrawIndex {
            index,
            vertex_count,
            piece: name.to_owned(),
        }),
        None => Ok(()),
    }
}

/// Depth-first piece tree construction into a pre-order arena.
///
/// Every piece record may be visited once. A record reachable through two
/// child slots, including a cycle back to an ancestor, is corrupt.
pub(crate) struct TreeBuilder<'a, 'o> {
    reader: ByteReader<'a>,
    options: &'o DecodeOptions,
    pieces: Vec<Piece>,
    visited: HashSet<usize>,
}

impl<'a, 'o> TreeBuilder<'a, 'o> {
    pub(crate) fn new(reader: ByteReader<'a>, options: &'o DecodeOptions) -> Self {
        Self {
            reader,
            options,
            pieces: Vec::new(),
            visited: HashSet::new(),
        }
    }

    /// Build the subtree rooted at the record at `at`.
    pub(crate) fn build(&mut self, at: usize) -> DecodeResult<PieceId> {
        self.build_at_depth(at, 0)
    }

    pub(crate) fn finish(self) -> Vec<Piece> {
        self.pieces
    }

    fn build_at_depth(&mut self, at: usize, depth: usize) -> DecodeResult<PieceId> {
        if depth >= self.options.max_depth {
            return Err(DecodeError::TreeTooDeep(self.options.max_depth));
        }
        if self.pieces.len() >= self.options.max_pieces {
            return Err(DecodeError::TooManyPieces(self.options.max_pieces));
        }
        if !self.visited.insert(at) {
            return Err(DecodeError::SharedPiece(at));
        }

        let record = PieceRecord::read(&self.reader, at)?;
        let name = self.reader.cstr_at(record.name)?;
        let mut vertices = read_vertices(&self.reader, record.vertices, record.vertex_count)?;
        let draw_order = read_draw_order(&self.reader, record.draw_order, record.draw_order_count)?;
        validate_draw_order(&name, &draw_order, vertices.len())?;

        let tangents = synthesize_tangents(record.kind, &draw_order, &mut vertices);

        tracing::trace!(
            target: "s3o::piece",
            "piece '{}' at {}: {:?}, {} vertices, {} indices, {} children",
            name,
            at,
            record.kind,
            vertices.len(),
            draw_order.len(),
            record.child_count
        );

        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece {
            name,
            offset: record.offset,
            kind: record.kind,
            vertices,
            draw_order,
            children: Vec::new(),
            tangents,
            bounds: None,
            collision_volume: None,
        });

        self.reader
            .check_array(record.child_table, record.child_count, INDEX_SIZE)?;
        let mut children = Vec::with_capacity(record.child_count);
        for i in 0..record.child_count {
            let child_at = self.reader.usize_at(record.child_table + i * INDEX_SIZE)?;
            children.push(self.build_at_depth(child_at, depth + 1)?);
        }
        self.pieces[id.0].children = children;

        Ok(id)
    }
}
